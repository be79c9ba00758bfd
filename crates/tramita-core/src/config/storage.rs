//! File storage configuration.

use serde::{Deserialize, Serialize};

/// Local file storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored document files.
    #[serde(default = "default_root")]
    pub root: String,
    /// Public URL prefix under which stored files are addressed.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            base_url: default_base_url(),
        }
    }
}

fn default_root() -> String {
    "./data/files".to_string()
}

fn default_base_url() -> String {
    "/files".to_string()
}
