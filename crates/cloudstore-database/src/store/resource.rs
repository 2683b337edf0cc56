//! File and folder store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use cloudstore_core::result::AppResult;
use cloudstore_core::types::{FileId, FolderId, UserId};
use cloudstore_entity::file::{CreateFile, File};
use cloudstore_entity::folder::{CreateFolder, Folder};
use cloudstore_entity::resource::{Resource, ResourceKey, ResourceType};

/// Upper bound on parent-chain walks.
pub const MAX_ANCESTRY_DEPTH: usize = 100;

/// Persistence of the file/folder tree and its trash state.
#[async_trait]
pub trait ResourceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by ID, trashed or not.
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// Find a folder by ID, trashed or not.
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find either kind by key.
    async fn find(&self, key: ResourceKey) -> AppResult<Option<Resource>> {
        match key.resource_type {
            ResourceType::File => Ok(self
                .find_file(FileId::from_uuid(key.resource_id))
                .await?
                .map(Resource::File)),
            ResourceType::Folder => Ok(self
                .find_folder(FolderId::from_uuid(key.resource_id))
                .await?
                .map(Resource::Folder)),
        }
    }

    /// Insert a file.
    async fn create_file(&self, data: &CreateFile) -> AppResult<File>;

    /// Insert a folder.
    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename a resource.
    async fn rename(&self, key: ResourceKey, name: &str) -> AppResult<Option<Resource>>;

    /// Re-parent a resource. Fails with a validation error when a folder
    /// would become its own ancestor.
    async fn set_parent(
        &self,
        key: ResourceKey,
        parent_id: Option<FolderId>,
    ) -> AppResult<Option<Resource>>;

    /// Non-trashed children of a folder, folders first, each group by name.
    async fn list_children(&self, folder_id: FolderId) -> AppResult<Vec<Resource>>;

    /// Non-trashed root-level resources of an owner.
    async fn list_root(&self, owner_id: UserId) -> AppResult<Vec<Resource>>;

    /// Set the owner's star. Returns `None` if the resource no longer exists.
    async fn set_starred(&self, key: ResourceKey, starred: bool) -> AppResult<Option<Resource>>;

    /// Non-trashed resources a user owns and has starred, by name.
    async fn list_starred(&self, owner_id: UserId) -> AppResult<Vec<Resource>>;

    /// Number of child rows of a folder, trashed ones included.
    async fn count_children(&self, folder_id: FolderId) -> AppResult<u64>;

    /// The folder chain starting at `folder_id` and walking up, nearest
    /// first, capped at [`MAX_ANCESTRY_DEPTH`] entries.
    async fn ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>>;

    /// Trash a resource. For a folder, every non-trashed descendant is
    /// stamped with the same `deleted_at` in the same transaction.
    /// Returns the number of rows flagged.
    async fn trash(
        &self,
        key: ResourceKey,
        deleted_by: UserId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Un-trash a resource and every descendant sharing its `deleted_at`.
    /// Returns the number of rows restored.
    async fn restore(&self, key: ResourceKey) -> AppResult<u64>;

    /// Delete a resource row together with its grants and link.
    /// Fails with a conflict if a folder still has child rows.
    async fn purge(&self, key: ResourceKey) -> AppResult<bool>;

    /// Trashed resources owned by a user, most recently trashed first.
    ///
    /// Only roots are listed: an item whose parent folder was trashed in
    /// the same operation (same `deleted_at`) travels with that folder.
    async fn list_trash(&self, owner_id: UserId) -> AppResult<Vec<Resource>>;

    /// Descendants of `folder_id` trashed together with it, whatever
    /// their owner. The folder itself is excluded.
    async fn list_cascade(
        &self,
        folder_id: FolderId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<Vec<Resource>>;

    /// Trashed resources whose `deleted_at` is older than `cutoff`.
    async fn list_trashed_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Resource>>;
}
