use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct UserServiceConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongodb_uri: Option<Secret<String>>,
    pub mongodb_database: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Mongo,
}

impl UserServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix.
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: StorageBackend = get_env("STORAGE_BACKEND", Some("memory"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let mongodb_uri = match backend {
            StorageBackend::Mongo => Some(get_env(
                "MONGODB_URI",
                Some("mongodb://localhost:27017"),
                is_prod,
            )?),
            StorageBackend::Memory => env::var("MONGODB_URI").ok(),
        };

        Ok(UserServiceConfig {
            common: common_config,
            storage: StorageConfig {
                backend,
                mongodb_uri: mongodb_uri.map(Secret::new),
                mongodb_database: get_env("MONGODB_DATABASE", Some("user_db"), false)?,
            },
        })
    }

    /// Defaults suitable for tests: in-memory storage on an ephemeral port.
    pub fn in_memory() -> Self {
        Self {
            common: core_config::Config {
                port: 0,
                ..core_config::Config::default()
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                mongodb_uri: None,
                mongodb_database: "user_db".to_string(),
            },
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
