//! Application builder and server lifecycle.

use std::sync::Arc;

use axum::Router;

use cloudstore_core::config::AppConfig;
use cloudstore_core::error::AppError;
use cloudstore_database::open_stores;
use cloudstore_service::Services;
use cloudstore_worker::{CronScheduler, JobExecutor, TrashPurgeJobHandler};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the CloudStore server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CloudStore server...");

    let (stores, db_pool) = open_stores(&config.database).await?;
    let services = Services::new(stores, config.sharing.clone(), config.trash.clone());

    let mut scheduler = if config.worker.enabled {
        Some(start_scheduler(&services, &config).await?)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, services, db_pool.clone());
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("CloudStore server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("CloudStore server stopped");
    Ok(())
}

/// Registers and starts the scheduled maintenance jobs.
async fn start_scheduler(services: &Services, config: &AppConfig) -> Result<CronScheduler, AppError> {
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(TrashPurgeJobHandler::new(Arc::clone(
        &services.trash,
    ))));

    let scheduler = CronScheduler::new(Arc::new(executor)).await?;
    scheduler
        .register_trash_purge(&config.trash.purge_cron)
        .await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
