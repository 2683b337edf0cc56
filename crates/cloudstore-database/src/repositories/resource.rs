//! File and folder repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use cloudstore_core::error::{AppError, ErrorKind};
use cloudstore_core::result::AppResult;
use cloudstore_core::types::{FileId, FolderId, UserId};
use cloudstore_entity::file::{CreateFile, File};
use cloudstore_entity::folder::{CreateFolder, Folder};
use cloudstore_entity::resource::{Resource, ResourceKey, ResourceType};

use crate::store::{MAX_ANCESTRY_DEPTH, ResourceStore};

/// Recursive CTE selecting a folder and every folder below it as `tree(id)`.
const SUBTREE: &str = "WITH RECURSIVE tree AS ( \
        SELECT id FROM folders WHERE id = $1 \
        UNION ALL \
        SELECT f.id FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
     ) ";

/// Repository for the file/folder tree.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }

    async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn list_folders(&self, sql: &str, id: uuid::Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn list_files(&self, sql: &str, id: uuid::Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }
}

fn merge(folders: Vec<Folder>, files: Vec<File>) -> Vec<Resource> {
    folders
        .into_iter()
        .map(Resource::Folder)
        .chain(files.into_iter().map(Resource::File))
        .collect()
}

#[async_trait]
impl ResourceStore for ResourceRepository {
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn create_file(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, name, owner_id, folder_id, size, mime_type) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(FileId::new())
        .bind(&data.name)
        .bind(data.owner_id)
        .bind(data.folder_id)
        .bind(data.size)
        .bind(&data.mime_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, owner_id, parent_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(FolderId::new())
        .bind(&data.name)
        .bind(data.owner_id)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    async fn rename(&self, key: ResourceKey, name: &str) -> AppResult<Option<Resource>> {
        let renamed = match key.resource_type {
            ResourceType::File => sqlx::query_as::<_, File>(
                "UPDATE files SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(key.resource_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map(|f| f.map(Resource::File)),
            ResourceType::Folder => sqlx::query_as::<_, Folder>(
                "UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(key.resource_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map(|f| f.map(Resource::Folder)),
        };
        renamed
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename resource", e))
    }

    async fn set_parent(
        &self,
        key: ResourceKey,
        parent_id: Option<FolderId>,
    ) -> AppResult<Option<Resource>> {
        let mut tx = self.begin().await?;

        let moved = match key.resource_type {
            ResourceType::File => sqlx::query_as::<_, File>(
                "UPDATE files SET folder_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(key.resource_id)
            .bind(parent_id)
            .fetch_optional(&mut *tx)
            .await
            .map(|f| f.map(Resource::File)),
            ResourceType::Folder => {
                if let Some(target) = parent_id {
                    let cycle: bool = sqlx::query_scalar(
                        "WITH RECURSIVE chain AS ( \
                            SELECT id, parent_id, 1 AS depth FROM folders WHERE id = $1 \
                            UNION ALL \
                            SELECT p.id, p.parent_id, c.depth + 1 FROM folders p \
                            INNER JOIN chain c ON p.id = c.parent_id WHERE c.depth < $3 \
                         ) SELECT EXISTS (SELECT 1 FROM chain WHERE id = $2)",
                    )
                    .bind(target)
                    .bind(key.resource_id)
                    .bind(MAX_ANCESTRY_DEPTH as i32)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to check folder chain", e)
                    })?;
                    if cycle {
                        return Err(AppError::validation(
                            "Cannot move a folder into itself or one of its subfolders",
                        ));
                    }
                }
                sqlx::query_as::<_, Folder>(
                    "UPDATE folders SET parent_id = $2, updated_at = NOW() \
                     WHERE id = $1 RETURNING *",
                )
                .bind(key.resource_id)
                .bind(parent_id)
                .fetch_optional(&mut *tx)
                .await
                .map(|f| f.map(Resource::Folder))
            }
        }
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move resource", e))?;

        Self::commit(tx).await?;
        Ok(moved)
    }

    async fn list_children(&self, folder_id: FolderId) -> AppResult<Vec<Resource>> {
        let folders = self
            .list_folders(
                "SELECT * FROM folders WHERE parent_id = $1 AND is_deleted = FALSE \
                 ORDER BY name ASC",
                folder_id.0,
            )
            .await?;
        let files = self
            .list_files(
                "SELECT * FROM files WHERE folder_id = $1 AND is_deleted = FALSE \
                 ORDER BY name ASC",
                folder_id.0,
            )
            .await?;
        Ok(merge(folders, files))
    }

    async fn list_root(&self, owner_id: UserId) -> AppResult<Vec<Resource>> {
        let folders = self
            .list_folders(
                "SELECT * FROM folders \
                 WHERE owner_id = $1 AND parent_id IS NULL AND is_deleted = FALSE \
                 ORDER BY name ASC",
                owner_id.0,
            )
            .await?;
        let files = self
            .list_files(
                "SELECT * FROM files \
                 WHERE owner_id = $1 AND folder_id IS NULL AND is_deleted = FALSE \
                 ORDER BY name ASC",
                owner_id.0,
            )
            .await?;
        Ok(merge(folders, files))
    }

    async fn set_starred(&self, key: ResourceKey, starred: bool) -> AppResult<Option<Resource>> {
        let updated = match key.resource_type {
            ResourceType::File => sqlx::query_as::<_, File>(
                "UPDATE files SET is_starred = $2 WHERE id = $1 RETURNING *",
            )
            .bind(key.resource_id)
            .bind(starred)
            .fetch_optional(&self.pool)
            .await
            .map(|f| f.map(Resource::File)),
            ResourceType::Folder => sqlx::query_as::<_, Folder>(
                "UPDATE folders SET is_starred = $2 WHERE id = $1 RETURNING *",
            )
            .bind(key.resource_id)
            .bind(starred)
            .fetch_optional(&self.pool)
            .await
            .map(|f| f.map(Resource::Folder)),
        };
        updated
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to star resource", e))
    }

    async fn list_starred(&self, owner_id: UserId) -> AppResult<Vec<Resource>> {
        let folders = self
            .list_folders(
                "SELECT * FROM folders \
                 WHERE owner_id = $1 AND is_starred = TRUE AND is_deleted = FALSE \
                 ORDER BY name ASC",
                owner_id.0,
            )
            .await?;
        let files = self
            .list_files(
                "SELECT * FROM files \
                 WHERE owner_id = $1 AND is_starred = TRUE AND is_deleted = FALSE \
                 ORDER BY name ASC",
                owner_id.0,
            )
            .await?;
        Ok(merge(folders, files))
    }

    async fn count_children(&self, folder_id: FolderId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM folders WHERE parent_id = $1) \
                  + (SELECT COUNT(*) FROM files WHERE folder_id = $1)",
        )
        .bind(folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count children", e))?;
        Ok(count.max(0) as u64)
    }

    async fn ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE chain AS ( \
                SELECT f.*, 1 AS depth FROM folders f WHERE f.id = $1 \
                UNION ALL \
                SELECT p.*, c.depth + 1 FROM folders p \
                INNER JOIN chain c ON p.id = c.parent_id WHERE c.depth < $2 \
             ) SELECT id, name, owner_id, parent_id, is_starred, is_deleted, deleted_at, \
                      deleted_by, created_at, updated_at \
               FROM chain ORDER BY depth ASC",
        )
        .bind(folder_id)
        .bind(MAX_ANCESTRY_DEPTH as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    async fn trash(
        &self,
        key: ResourceKey,
        deleted_by: UserId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let map_err = |e: sqlx::Error| {
            AppError::with_source(ErrorKind::Database, "Failed to move resource to trash", e)
        };

        if key.resource_type == ResourceType::File {
            let result = sqlx::query(
                "UPDATE files SET is_deleted = TRUE, deleted_at = $2, deleted_by = $3, \
                                  updated_at = $2 \
                 WHERE id = $1 AND is_deleted = FALSE",
            )
            .bind(key.resource_id)
            .bind(deleted_at)
            .bind(deleted_by)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
            return Ok(result.rows_affected());
        }

        let mut tx = self.begin().await?;
        let folders = sqlx::query(&format!(
            "{SUBTREE}UPDATE folders SET is_deleted = TRUE, deleted_at = $2, deleted_by = $3, \
                                          updated_at = $2 \
             WHERE id IN (SELECT id FROM tree) AND is_deleted = FALSE"
        ))
        .bind(key.resource_id)
        .bind(deleted_at)
        .bind(deleted_by)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        let files = sqlx::query(&format!(
            "{SUBTREE}UPDATE files SET is_deleted = TRUE, deleted_at = $2, deleted_by = $3, \
                                        updated_at = $2 \
             WHERE folder_id IN (SELECT id FROM tree) AND is_deleted = FALSE"
        ))
        .bind(key.resource_id)
        .bind(deleted_at)
        .bind(deleted_by)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        Self::commit(tx).await?;

        Ok(folders.rows_affected() + files.rows_affected())
    }

    async fn restore(&self, key: ResourceKey) -> AppResult<u64> {
        let map_err = |e: sqlx::Error| {
            AppError::with_source(ErrorKind::Database, "Failed to restore resource", e)
        };
        let mut tx = self.begin().await?;

        let table = match key.resource_type {
            ResourceType::File => "files",
            ResourceType::Folder => "folders",
        };
        let stamp: Option<Option<DateTime<Utc>>> = sqlx::query_scalar(&format!(
            "SELECT deleted_at FROM {table} WHERE id = $1 FOR UPDATE"
        ))
        .bind(key.resource_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_err)?;
        let Some(stamp) = stamp.flatten() else {
            return Ok(0);
        };

        let restored = match key.resource_type {
            ResourceType::File => sqlx::query(
                "UPDATE files SET is_deleted = FALSE, deleted_at = NULL, deleted_by = NULL, \
                                  updated_at = NOW() \
                 WHERE id = $1 AND deleted_at = $2",
            )
            .bind(key.resource_id)
            .bind(stamp)
            .execute(&mut *tx)
            .await
            .map_err(map_err)?
            .rows_affected(),
            ResourceType::Folder => {
                let folders = sqlx::query(&format!(
                    "{SUBTREE}UPDATE folders SET is_deleted = FALSE, deleted_at = NULL, \
                                                  deleted_by = NULL, updated_at = NOW() \
                     WHERE id IN (SELECT id FROM tree) AND deleted_at = $2"
                ))
                .bind(key.resource_id)
                .bind(stamp)
                .execute(&mut *tx)
                .await
                .map_err(map_err)?;
                let files = sqlx::query(&format!(
                    "{SUBTREE}UPDATE files SET is_deleted = FALSE, deleted_at = NULL, \
                                                deleted_by = NULL, updated_at = NOW() \
                     WHERE folder_id IN (SELECT id FROM tree) AND deleted_at = $2"
                ))
                .bind(key.resource_id)
                .bind(stamp)
                .execute(&mut *tx)
                .await
                .map_err(map_err)?;
                folders.rows_affected() + files.rows_affected()
            }
        };

        Self::commit(tx).await?;
        Ok(restored)
    }

    async fn purge(&self, key: ResourceKey) -> AppResult<bool> {
        let mut tx = self.begin().await?;

        if key.resource_type == ResourceType::Folder {
            let busy: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM folders WHERE parent_id = $1) \
                     OR EXISTS (SELECT 1 FROM files WHERE folder_id = $1)",
            )
            .bind(key.resource_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check folder contents", e)
            })?;
            if busy {
                return Err(AppError::not_empty(
                    "Folder still contains items; purge them first",
                ));
            }
        }

        for sql in [
            "DELETE FROM access_grants WHERE resource_type = $1 AND resource_id = $2",
            "DELETE FROM public_links WHERE resource_type = $1 AND resource_id = $2",
        ] {
            sqlx::query(sql)
                .bind(key.resource_type)
                .bind(key.resource_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to drop sharing rows", e)
                })?;
        }

        let sql = match key.resource_type {
            ResourceType::File => "DELETE FROM files WHERE id = $1",
            ResourceType::Folder => "DELETE FROM folders WHERE id = $1",
        };
        let result = sqlx::query(sql)
            .bind(key.resource_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::not_empty("Folder still contains items; purge them first")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to purge resource", e),
            })?;

        Self::commit(tx).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_trash(&self, owner_id: UserId) -> AppResult<Vec<Resource>> {
        let folders = self
            .list_folders(
                "SELECT f.* FROM folders f LEFT JOIN folders p ON p.id = f.parent_id \
                 WHERE f.owner_id = $1 AND f.is_deleted = TRUE \
                   AND (p.id IS NULL OR p.is_deleted = FALSE \
                        OR p.deleted_at IS DISTINCT FROM f.deleted_at)",
                owner_id.0,
            )
            .await?;
        let files = self
            .list_files(
                "SELECT f.* FROM files f LEFT JOIN folders p ON p.id = f.folder_id \
                 WHERE f.owner_id = $1 AND f.is_deleted = TRUE \
                   AND (p.id IS NULL OR p.is_deleted = FALSE \
                        OR p.deleted_at IS DISTINCT FROM f.deleted_at)",
                owner_id.0,
            )
            .await?;
        let mut items = merge(folders, files);
        items.sort_by(|a, b| b.deleted_at().cmp(&a.deleted_at()));
        Ok(items)
    }

    async fn list_cascade(
        &self,
        folder_id: FolderId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<Vec<Resource>> {
        let folders = sqlx::query_as::<_, Folder>(&format!(
            "{SUBTREE}SELECT * FROM folders \
             WHERE id IN (SELECT id FROM tree) AND id <> $1 \
               AND is_deleted = TRUE AND deleted_at = $2"
        ))
        .bind(folder_id)
        .bind(deleted_at)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))?;
        let files = sqlx::query_as::<_, File>(&format!(
            "{SUBTREE}SELECT * FROM files \
             WHERE folder_id IN (SELECT id FROM tree) \
               AND is_deleted = TRUE AND deleted_at = $2"
        ))
        .bind(folder_id)
        .bind(deleted_at)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))?;
        Ok(merge(folders, files))
    }

    async fn list_trashed_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Resource>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE is_deleted = TRUE AND deleted_at < $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list expired folders", e)
        })?;
        let files = sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE is_deleted = TRUE AND deleted_at < $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list expired files", e)
        })?;
        let mut items = merge(folders, files);
        items.sort_by_key(|r| r.deleted_at());
        Ok(items)
    }
}
