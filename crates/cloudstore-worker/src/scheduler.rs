//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use cloudstore_core::error::AppError;

use crate::executor::JobExecutor;
use crate::jobs::trash_purge::TRASH_PURGE;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Executor the scheduled jobs dispatch through
    executor: Arc<JobExecutor>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("jobs", &self.executor.registered_types())
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(executor: Arc<JobExecutor>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            executor,
        })
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Trash retention sweep on the configured schedule
    pub async fn register_trash_purge(&self, cron: &str) -> Result<(), AppError> {
        self.register(TRASH_PURGE, cron).await
    }

    /// Fire the handler for `job_type` on `cron` (six fields, with seconds)
    pub async fn register(&self, job_type: &str, cron: &str) -> Result<(), AppError> {
        if !self.executor.has_handler(job_type) {
            return Err(AppError::configuration(format!(
                "No handler registered for scheduled job '{job_type}'"
            )));
        }

        let executor = Arc::clone(&self.executor);
        let name = job_type.to_string();
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let name = name.clone();
            Box::pin(async move {
                match executor.execute(&name).await {
                    Ok(summary) => tracing::info!("Scheduled job '{}' finished: {}", name, summary),
                    Err(e) => tracing::error!("Scheduled job '{}' failed: {}", name, e),
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid schedule '{cron}' for {job_type}: {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {job_type} schedule: {e}")))?;

        tracing::info!("Registered: {} ({})", job_type, cron);
        Ok(())
    }
}
