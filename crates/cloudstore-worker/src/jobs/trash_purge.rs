//! Retention sweep that permanently deletes old trash.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use cloudstore_service::trash::TrashService;

use crate::executor::{JobExecutionError, JobHandler};

/// Job type of the retention sweep.
pub const TRASH_PURGE: &str = "trash_purge";

/// Purges items trashed longer ago than the retention period
#[derive(Debug)]
pub struct TrashPurgeJobHandler {
    /// Trash service
    trash: Arc<TrashService>,
}

impl TrashPurgeJobHandler {
    /// Create a new handler
    pub fn new(trash: Arc<TrashService>) -> Self {
        Self { trash }
    }
}

#[async_trait]
impl JobHandler for TrashPurgeJobHandler {
    fn job_type(&self) -> &str {
        TRASH_PURGE
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        tracing::info!("Running trash retention sweep");

        let report = self
            .trash
            .purge_expired()
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Trash purge failed: {e}")))?;

        Ok(serde_json::json!({
            "task": TRASH_PURGE,
            "purged": report.success_count,
            "failed": report.error_count,
        }))
    }
}
