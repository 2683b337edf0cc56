//! Scheduled maintenance for CloudStore.
//!
//! This crate provides:
//! - A job executor that dispatches named jobs to their handlers
//! - A cron scheduler that fires registered jobs
//! - The trash retention sweep

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use jobs::TrashPurgeJobHandler;
pub use scheduler::CronScheduler;
