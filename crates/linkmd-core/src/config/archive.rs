//! Archive import and naming configuration.

use serde::{Deserialize, Serialize};

/// Limits applied when documents are archived, and naming knobs for splits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Document file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Maximum number of inputs accepted by a single archive call.
    #[serde(default = "default_max_files")]
    pub max_files_per_upload: usize,
    /// Maximum size of a single input in bytes (default 10 MB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Maximum combined size of all inputs in bytes (default 50 MB).
    #[serde(default = "default_max_total_size")]
    pub max_total_size_bytes: u64,
    /// Maximum number of characters kept from a heading in split filenames.
    #[serde(default = "default_split_title_max")]
    pub split_title_max_chars: usize,
}

impl ArchiveConfig {
    /// The document extension without a leading dot.
    pub fn bare_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            max_files_per_upload: default_max_files(),
            max_file_size_bytes: default_max_file_size(),
            max_total_size_bytes: default_max_total_size(),
            split_title_max_chars: default_split_title_max(),
        }
    }
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_max_files() -> usize {
    100
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_total_size() -> u64 {
    50 * 1024 * 1024
}

fn default_split_title_max() -> usize {
    50
}
