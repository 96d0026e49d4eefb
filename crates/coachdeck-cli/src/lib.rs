use std::io::{BufRead, Write};

use coachdeck_import::ImportProgress;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One-line progress indicator, e.g. `[ 2/5]  40% Squat.mp4`.
pub fn render_progress_line(progress: &ImportProgress) -> String {
    let width = progress.to_process.to_string().len();
    format!(
        "[{:>width$}/{}] {:>3}% {}",
        progress.processed,
        progress.to_process,
        progress.percent(),
        truncate_string(progress.current_file.as_deref().unwrap_or_default(), 48),
        width = width
    )
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> std::io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{}", out);
    Ok(())
}

/// Log filter from `RUST_LOG`, `info` when unset.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Load `.env`, then initialize tracing for CLI binaries.
///
/// `.env` is read first so a `RUST_LOG` set there takes effect.
pub fn init_tracing() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("Agachamento_avançado.mp4", 12), "Agachamen...");
    }

    #[test]
    fn progress_line_pads_counts() {
        let progress = ImportProgress {
            total: 14,
            to_process: 10,
            processed: 4,
            current_file: Some("Squat.mp4".to_string()),
            ..ImportProgress::default()
        };
        assert_eq!(render_progress_line(&progress), "[ 4/10]  40% Squat.mp4");
    }

    #[test]
    fn log_filter_reads_rust_log_from_dotenv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "RUST_LOG=coachdeck_import=debug\n").unwrap();

        std::env::remove_var("RUST_LOG");
        dotenvy::from_path(&path).unwrap();
        let filter = env_filter().to_string();
        std::env::remove_var("RUST_LOG");

        assert_eq!(filter, "coachdeck_import=debug");
    }

    #[test]
    fn confirm_accepts_yes_variants() {
        let mut out = Vec::new();
        assert!(confirm("Import?", &mut "y\n".as_bytes(), &mut out).unwrap());
        assert!(confirm("Import?", &mut "YES\n".as_bytes(), &mut out).unwrap());
        assert!(!confirm("Import?", &mut "\n".as_bytes(), &mut out).unwrap());
        assert!(!confirm("Import?", &mut "nope\n".as_bytes(), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("Import? [y/N] "));
    }
}
