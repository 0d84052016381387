//! Browsable directory configuration.

use serde::{Deserialize, Serialize};

/// Browsable directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory exposed through `/api/files`. Empty means the process
    /// working directory at startup.
    #[serde(default)]
    pub root_dir: String,
}
