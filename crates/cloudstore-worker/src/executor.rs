//! Job executor that dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use cloudstore_core::error::AppError;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The job type this handler processes
    fn job_type(&self) -> &str;

    /// Run the job once, returning a summary
    async fn execute(&self) -> Result<Value, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure; retrying will not help
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure; the next run may succeed
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Dispatches jobs to the appropriate handler by job type
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered job handlers by type
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create an empty executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!("Registered job handler for type '{}'", job_type);
        self.handlers.insert(job_type, handler);
    }

    /// Run the handler registered for `job_type`
    pub async fn execute(&self, job_type: &str) -> Result<Value, JobExecutionError> {
        let handler = self.handlers.get(job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!("No handler registered for job type '{job_type}'"))
        })?;

        tracing::info!("Executing job '{}'", job_type);
        handler.execute().await
    }

    /// Check if a handler is registered for a job type
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    /// Registered job types
    pub fn registered_types(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}
