use std::path::{Path, PathBuf};

use crate::db::config::{ConfigError, DbConfig};

pub const DEFAULT_SCHEMA_FILE: &str = "schema.sql";
pub const DEFAULT_PLACEHOLDER: &str = "controle_estoque";

pub const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub log: LogConfig,
    pub schema: SchemaConfig,
    pub db: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            log: LogConfig::from_lookup(&lookup),
            schema: SchemaConfig::from_lookup(&lookup),
            db: DbConfig::from_lookup(&lookup)?,
        })
    }

    /// Name substituted for the placeholder. Falls back to the placeholder
    /// itself, which leaves statements untouched.
    pub fn target_database(&self) -> &str {
        self.db
            .database
            .as_deref()
            .unwrap_or(self.schema.placeholder.as_str())
    }
}

/// Log filter plus the optional daily log file.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub file_enabled: bool,
    pub dir: PathBuf,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let file_enabled = matches!(lookup("ENABLE_FILE_LOGS").as_deref(), Some("true") | Some("1"));
        let dir = lookup("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());

        Self {
            level,
            file_enabled,
            dir: PathBuf::from(dir),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaConfig {
    pub path: PathBuf,
    pub placeholder: String,
}

impl SchemaConfig {
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_path = lookup("SCHEMA_PATH").unwrap_or_else(|| DEFAULT_SCHEMA_FILE.to_string());
        let placeholder = lookup("SCHEMA_PLACEHOLDER")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string());

        Self {
            path: resolve_path_relative_to_manifest_dir(&raw_path),
            placeholder,
        }
    }
}

fn resolve_path_relative_to_manifest_dir(value: &str) -> PathBuf {
    let raw = Path::new(value);
    if raw.is_absolute() {
        return raw.to_path_buf();
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(raw)
}
