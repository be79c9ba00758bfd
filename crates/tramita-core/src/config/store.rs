//! Record store backend configuration.

use serde::{Deserialize, Serialize};

use super::DatabaseConfig;

/// Which persistence backend to use for cases and reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-memory maps mirrored to flat JSON files.
    Flatfile,
    /// PostgreSQL tables with JSONB document columns.
    Postgres,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Selected backend.
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    /// Flat-file backend settings.
    #[serde(default)]
    pub flatfile: FlatFileConfig,
    /// PostgreSQL backend settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            flatfile: FlatFileConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

/// Flat-file backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatFileConfig {
    /// Directory holding the JSON store files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for FlatFileConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_backend() -> StoreBackend {
    StoreBackend::Flatfile
}

fn default_data_dir() -> String {
    "./data/store".to_string()
}
