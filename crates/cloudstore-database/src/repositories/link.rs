//! Public link repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use cloudstore_core::error::{AppError, ErrorKind};
use cloudstore_core::result::AppResult;
use cloudstore_core::types::{LinkId, UserId};
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::{CreateLink, PublicLink};

use crate::store::LinkStore;

/// Repository for public links.
#[derive(Debug, Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    /// Create a new link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for LinkRepository {
    async fn replace(&self, data: &CreateLink) -> AppResult<PublicLink> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM public_links WHERE resource_type = $1 AND resource_id = $2")
            .bind(data.resource.resource_type)
            .bind(data.resource.resource_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to drop previous link", e)
            })?;

        let link = sqlx::query_as::<_, PublicLink>(
            "INSERT INTO public_links \
                (id, resource_type, resource_id, token, permission, expires_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(LinkId::new())
        .bind(data.resource.resource_type)
        .bind(data.resource.resource_id)
        .bind(&data.token)
        .bind(data.permission)
        .bind(data.expires_at)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("public_links_token_key") =>
            {
                AppError::conflict("Share token collision; retry")
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("public_links_resource_key") =>
            {
                AppError::conflict("A link for this resource was issued concurrently")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create link", e),
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit link replacement", e)
        })?;
        Ok(link)
    }

    async fn find_for_resource(&self, resource: ResourceKey) -> AppResult<Option<PublicLink>> {
        sqlx::query_as::<_, PublicLink>(
            "SELECT * FROM public_links WHERE resource_type = $1 AND resource_id = $2",
        )
        .bind(resource.resource_type)
        .bind(resource.resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find link", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<PublicLink>> {
        sqlx::query_as::<_, PublicLink>("SELECT * FROM public_links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find link by token", e)
            })
    }

    async fn list_by_creator(&self, created_by: UserId) -> AppResult<Vec<PublicLink>> {
        sqlx::query_as::<_, PublicLink>(
            "SELECT * FROM public_links WHERE created_by = $1 ORDER BY created_at DESC",
        )
        .bind(created_by)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list links", e))
    }

    async fn record_access(&self, id: LinkId) -> AppResult<()> {
        sqlx::query("UPDATE public_links SET access_count = access_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to record link access", e)
            })?;
        Ok(())
    }

    async fn delete_for_resource(&self, resource: ResourceKey) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM public_links WHERE resource_type = $1 AND resource_id = $2")
                .bind(resource.resource_type)
                .bind(resource.resource_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete link", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
