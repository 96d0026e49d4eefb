//! Configuration module
//!
//! `ImportConfig` carries the knobs of the import pipeline itself and has
//! defaults for every field. `Config` wraps it together with the database and
//! storage settings a deployment needs, loaded from the environment.

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_KEY_PREFIX, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_REST_TIME_SECS, DEFAULT_THROTTLE_MS,
    IMPORTED_CATEGORY,
};
use crate::storage_types::StorageBackend;

const DB_MAX_CONNECTIONS: u32 = 10;

/// Import pipeline settings
#[derive(Clone, Debug)]
pub struct ImportConfig {
    /// Files larger than this are classified invalid.
    pub max_file_size_bytes: usize,
    /// Pause inserted between two consecutive uploads.
    pub throttle: Duration,
    /// First segment of every storage key written by the importer.
    pub key_prefix: String,
    /// Category tag of imported catalog records.
    pub category: String,
    pub default_rest_time_secs: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            category: IMPORTED_CATEGORY.to_string(),
            default_rest_time_secs: DEFAULT_REST_TIME_SECS,
        }
    }
}

impl ImportConfig {
    /// Same settings without the inter-file pause (tests, dry environments).
    pub fn without_throttle(mut self) -> Self {
        self.throttle = Duration::ZERO;
        self
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let max_file_size_mb = env::var("IMPORT_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("IMPORT_MAX_FILE_SIZE_MB must be a valid number"))?;

        let throttle_ms = env::var("IMPORT_THROTTLE_MS")
            .unwrap_or_else(|_| DEFAULT_THROTTLE_MS.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("IMPORT_THROTTLE_MS must be a valid number"))?;

        let default_rest_time_secs = env::var("IMPORT_DEFAULT_REST_SECS")
            .unwrap_or_else(|_| DEFAULT_REST_TIME_SECS.to_string())
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("IMPORT_DEFAULT_REST_SECS must be a valid number"))?;

        let max_file_size_bytes = mb_to_bytes(max_file_size_mb)
            .ok_or_else(|| anyhow::anyhow!("IMPORT_MAX_FILE_SIZE_MB is too large"))?;

        Ok(Self {
            max_file_size_bytes,
            throttle: Duration::from_millis(throttle_ms),
            key_prefix: env::var("IMPORT_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string()),
            category: env::var("IMPORT_CATEGORY").unwrap_or_else(|_| IMPORTED_CATEGORY.to_string()),
            default_rest_time_secs,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("IMPORT_MAX_FILE_SIZE_MB must be greater than 0"));
        }
        let prefix = self.key_prefix.trim_matches('/');
        if prefix.is_empty() || prefix.contains("..") {
            return Err(anyhow::anyhow!(
                "IMPORT_KEY_PREFIX must be a non-empty relative path"
            ));
        }
        if self.category.trim().is_empty() {
            return Err(anyhow::anyhow!("IMPORT_CATEGORY must not be empty"));
        }
        Ok(())
    }

    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size_bytes / (1024 * 1024)
    }
}

fn mb_to_bytes(mb: usize) -> Option<usize> {
    mb.checked_mul(1024 * 1024)
}

/// Deployment configuration (database, storage and import settings)
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub import: ImportConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<StorageBackend>()?;

        Ok(Self {
            environment,
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DB_MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(DB_MAX_CONNECTIONS),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            import: ImportConfig::from_env()?,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.import.validate()?;

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET must be set when STORAGE_BACKEND=s3"));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
                    ));
                }
                if self.is_production() && self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set in production"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Database URL, required by every command that touches the catalog.
    pub fn require_database_url(&self) -> Result<&str, anyhow::Error> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))
    }

    pub fn local_storage_base_url(&self) -> &str {
        self.local_storage_base_url
            .as_deref()
            .unwrap_or("http://localhost:3000/media")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> Config {
        Config {
            environment: "development".to_string(),
            database_url: None,
            db_max_connections: DB_MAX_CONNECTIONS,
            storage_backend: StorageBackend::Local,
            local_storage_path: Some("/tmp/coachdeck".to_string()),
            local_storage_base_url: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            import: ImportConfig::default(),
        }
    }

    #[test]
    fn import_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.max_file_size_mb(), 100);
        assert_eq!(config.throttle, Duration::from_millis(100));
        assert_eq!(config.key_prefix, "exercise-videos");
        assert_eq!(config.category, "imported");
        assert_eq!(config.default_rest_time_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn size_limit_conversion_checks_overflow() {
        assert_eq!(mb_to_bytes(100), Some(100 * 1024 * 1024));
        assert_eq!(mb_to_bytes(usize::MAX), None);
    }

    #[test]
    fn malformed_rest_time_is_rejected() {
        std::env::set_var("IMPORT_DEFAULT_REST_SECS", "sixty");
        let result = ImportConfig::from_env();
        std::env::remove_var("IMPORT_DEFAULT_REST_SECS");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("IMPORT_DEFAULT_REST_SECS"));
    }

    #[test]
    fn without_throttle_zeroes_delay() {
        let config = ImportConfig::default().without_throttle();
        assert_eq!(config.throttle, Duration::ZERO);
    }

    #[test]
    fn rejects_traversal_in_key_prefix() {
        let config = ImportConfig {
            key_prefix: "../escape".to_string(),
            ..ImportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn local_backend_requires_path() {
        let mut config = local_config();
        assert!(config.validate().is_ok());
        config.local_storage_path = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn s3_backend_requires_bucket_and_region() {
        let mut config = local_config();
        config.storage_backend = StorageBackend::S3;
        assert!(config.validate().is_err());
        config.s3_bucket = Some("videos".to_string());
        assert!(config.validate().is_err());
        config.s3_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_local_storage_requires_base_url() {
        let mut config = local_config();
        config.environment = "Production".to_string();
        assert!(config.validate().is_err());
        config.local_storage_base_url = Some("https://cdn.example.com".to_string());
        assert!(config.validate().is_ok());
    }
}
