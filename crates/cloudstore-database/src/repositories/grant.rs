//! Access grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use cloudstore_core::error::{AppError, ErrorKind};
use cloudstore_core::result::AppResult;
use cloudstore_core::types::{GrantId, UserId};
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::{AccessGrant, CreateGrant, SharePermission};

use crate::store::GrantStore;

/// Repository for per-user access grants.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GrantStore for GrantRepository {
    async fn create(&self, data: &CreateGrant) -> AppResult<AccessGrant> {
        sqlx::query_as::<_, AccessGrant>(
            "INSERT INTO access_grants \
                (id, resource_type, resource_id, grantee_id, grantee_email, permission, shared_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(GrantId::new())
        .bind(data.resource.resource_type)
        .bind(data.resource.resource_id)
        .bind(data.grantee_id)
        .bind(&data.grantee_email)
        .bind(data.permission)
        .bind(data.shared_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("access_grants_resource_grantee_key") =>
            {
                AppError::already_granted(&data.grantee_email)
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create grant", e),
        })
    }

    async fn find_by_id(&self, id: GrantId) -> AppResult<Option<AccessGrant>> {
        sqlx::query_as::<_, AccessGrant>("SELECT * FROM access_grants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grant", e))
    }

    async fn find_for_grantee(
        &self,
        resource: ResourceKey,
        grantee_id: UserId,
    ) -> AppResult<Option<AccessGrant>> {
        sqlx::query_as::<_, AccessGrant>(
            "SELECT * FROM access_grants \
             WHERE resource_type = $1 AND resource_id = $2 AND grantee_id = $3",
        )
        .bind(resource.resource_type)
        .bind(resource.resource_id)
        .bind(grantee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grant", e))
    }

    async fn list_for_resource(&self, resource: ResourceKey) -> AppResult<Vec<AccessGrant>> {
        sqlx::query_as::<_, AccessGrant>(
            "SELECT * FROM access_grants WHERE resource_type = $1 AND resource_id = $2 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(resource.resource_type)
        .bind(resource.resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }

    async fn list_for_grantee(&self, grantee_id: UserId) -> AppResult<Vec<AccessGrant>> {
        sqlx::query_as::<_, AccessGrant>(
            "SELECT * FROM access_grants WHERE grantee_id = $1 ORDER BY created_at DESC",
        )
        .bind(grantee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list grants for grantee", e)
        })
    }

    async fn list_by_sharer(&self, shared_by: UserId) -> AppResult<Vec<AccessGrant>> {
        sqlx::query_as::<_, AccessGrant>(
            "SELECT * FROM access_grants WHERE shared_by = $1 ORDER BY created_at DESC",
        )
        .bind(shared_by)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list grants by sharer", e)
        })
    }

    async fn update_permission(
        &self,
        id: GrantId,
        permission: SharePermission,
    ) -> AppResult<Option<AccessGrant>> {
        sqlx::query_as::<_, AccessGrant>(
            "UPDATE access_grants SET permission = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(permission)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update grant", e))
    }

    async fn set_starred(&self, id: GrantId, starred: bool) -> AppResult<Option<AccessGrant>> {
        sqlx::query_as::<_, AccessGrant>(
            "UPDATE access_grants SET is_starred = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(starred)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to star grant", e))
    }

    async fn delete(&self, id: GrantId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM access_grants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete grant", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_resource(&self, resource: ResourceKey) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM access_grants WHERE resource_type = $1 AND resource_id = $2",
        )
        .bind(resource.resource_type)
        .bind(resource.resource_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete resource grants", e)
        })?;
        Ok(result.rows_affected())
    }
}
