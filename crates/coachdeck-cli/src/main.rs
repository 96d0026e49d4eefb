//! Coachdeck CLI: bulk import of exercise videos into the catalog.
//!
//! Configuration comes from the environment (or a `.env` file): DATABASE_URL,
//! STORAGE_BACKEND and the matching storage settings, IMPORT_* knobs.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use coachdeck_cli::{confirm, init_tracing, print_json, render_progress_line};
use coachdeck_core::Config;
use coachdeck_db::{ExerciseCatalog, ExerciseRepository};
use coachdeck_import::{
    collect_paths, render_analysis, render_summary, BatchImporter, ImportAnalyzer, ImportProgress,
    ImportReport,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "coachdeck", about = "Exercise library import tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify files as new, duplicate or invalid without importing anything
    Analyze {
        /// Owner (trainer) whose catalog is checked
        #[arg(long, env = "COACHDECK_OWNER_ID")]
        owner: Uuid,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
        /// Files or directories to analyse
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Analyse, confirm, then upload every new file and add it to the catalog
    Import {
        /// Owner (trainer) the exercises are imported for
        #[arg(long, env = "COACHDECK_OWNER_ID")]
        owner: Uuid,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        /// Where to write the JSON report (default: import-report-<timestamp>.json)
        #[arg(long)]
        report: Option<PathBuf>,
        /// Do not write a report file
        #[arg(long, conflicts_with = "report")]
        no_report: bool,
        /// Files or directories to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List catalog exercises of one category
    List {
        #[arg(long, env = "COACHDECK_OWNER_ID")]
        owner: Uuid,
        #[arg(long, default_value = "imported")]
        category: String,
    },
    /// Apply database migrations
    Migrate,
}

async fn open_catalog(config: &Config) -> anyhow::Result<ExerciseRepository> {
    let pool = coachdeck_db::connect(config.require_database_url()?, config.db_max_connections)
        .await
        .context("Failed to connect to the catalog database")?;
    Ok(ExerciseRepository::new(pool))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Analyze { owner, json, paths } => {
            config.import.validate()?;
            let catalog: Arc<dyn ExerciseCatalog> = Arc::new(open_catalog(&config).await?);

            let files = collect_paths(&paths, config.import.max_file_size_bytes).await;
            let analysis = ImportAnalyzer::new(catalog, config.import.clone())
                .analyze(owner, &files)
                .await
                .context("Analysis failed")?;

            if json {
                print_json(&analysis)?;
            } else {
                println!("{}", render_analysis(&analysis));
            }
        }
        Commands::Import {
            owner,
            yes,
            report,
            no_report,
            paths,
        } => {
            config.validate()?;
            let catalog: Arc<dyn ExerciseCatalog> = Arc::new(open_catalog(&config).await?);
            let storage = coachdeck_storage::create_storage(&config)
                .await
                .context("Failed to initialize storage")?;

            let files = collect_paths(&paths, config.import.max_file_size_bytes).await;
            let analysis = ImportAnalyzer::new(catalog.clone(), config.import.clone())
                .analyze(owner, &files)
                .await
                .context("Analysis failed")?;

            println!("{}", render_analysis(&analysis));

            if !analysis.has_importable_files() {
                println!("Nothing to import.");
                return Ok(());
            }

            let proceed = yes
                || confirm(
                    &format!("Import {} new exercise(s)?", analysis.new_exercises),
                    &mut std::io::stdin().lock(),
                    &mut std::io::stdout(),
                )?;
            if !proceed {
                println!("Import cancelled.");
                return Ok(());
            }

            let importer = BatchImporter::new(storage, catalog, config.import.clone());
            let mut stderr = std::io::stderr();
            let mut on_progress = |progress: &ImportProgress| {
                let _ = write!(stderr, "\r{}", render_progress_line(progress));
                let _ = stderr.flush();
            };
            let results = importer
                .import_batch(owner, &files, &analysis, &mut on_progress)
                .await?;
            eprintln!();

            let import_report = ImportReport::new(results);
            println!("{}", render_summary(&import_report.summary));

            if !no_report {
                let path =
                    report.unwrap_or_else(|| PathBuf::from(import_report.default_file_name()));
                import_report
                    .write_to(&path)
                    .await
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                println!("Report written to {}", path.display());
            }
        }
        Commands::List { owner, category } => {
            let repository = open_catalog(&config).await?;
            let exercises = repository.list_by_category(owner, &category).await?;
            print_json(&exercises)?;
        }
        Commands::Migrate => {
            let pool =
                coachdeck_db::connect(config.require_database_url()?, config.db_max_connections)
                    .await?;
            coachdeck_db::run_migrations(&pool).await?;
            println!("Migrations applied.");
        }
    }

    Ok(())
}
