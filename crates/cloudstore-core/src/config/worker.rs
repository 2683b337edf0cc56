//! Background worker and trash retention configuration.

use serde::{Deserialize, Serialize};

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled jobs run inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Trash retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashConfig {
    /// Days a resource stays in trash before it is purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Cron expression (with seconds) for the retention sweep.
    #[serde(default = "default_purge_cron")]
    pub purge_cron: String,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            purge_cron: default_purge_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> i64 {
    30
}

fn default_purge_cron() -> String {
    "0 0 3 * * *".to_string()
}
