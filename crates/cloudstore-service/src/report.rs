//! Outcome of best-effort bulk operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cloudstore_core::error::AppError;
use cloudstore_entity::resource::{ResourceKey, ResourceType};

/// One failed item in a bulk operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkError {
    /// Type of the item.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// ID of the item.
    pub id: Uuid,
    /// Why it failed.
    pub message: String,
}

/// Counts and per-item errors of a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    /// Items that succeeded.
    pub success_count: u32,
    /// Items that failed.
    pub error_count: u32,
    /// Failure details.
    pub errors: Vec<BulkError>,
}

impl BulkReport {
    /// Count one success.
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    /// Count one failure.
    pub fn record_failure(&mut self, key: ResourceKey, err: &AppError) {
        self.error_count += 1;
        self.errors.push(BulkError {
            resource_type: key.resource_type,
            id: key.resource_id,
            message: err.message.clone(),
        });
    }

    /// Whether every item succeeded.
    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }
}
