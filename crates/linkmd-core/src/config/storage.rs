//! Physical mirror configuration.

use serde::{Deserialize, Serialize};

/// Where the physical mirror lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the mirror. Each project owns `<root>/<project_id>/`.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
        }
    }
}

fn default_root_path() -> String {
    "./data/originals".to_string()
}
