//! Access grant store.

use async_trait::async_trait;

use cloudstore_core::result::AppResult;
use cloudstore_core::types::{GrantId, UserId};
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::{AccessGrant, CreateGrant, SharePermission};

/// Persistence of per-user grants.
///
/// At most one grant exists per `(resource, grantee)`; `create` reports
/// a conflict for a duplicate even under concurrent inserts.
#[async_trait]
pub trait GrantStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a grant.
    async fn create(&self, data: &CreateGrant) -> AppResult<AccessGrant>;

    /// Find a grant by ID.
    async fn find_by_id(&self, id: GrantId) -> AppResult<Option<AccessGrant>>;

    /// Find the grant a user holds on a resource.
    async fn find_for_grantee(
        &self,
        resource: ResourceKey,
        grantee_id: UserId,
    ) -> AppResult<Option<AccessGrant>>;

    /// All grants on a resource, oldest first.
    async fn list_for_resource(&self, resource: ResourceKey) -> AppResult<Vec<AccessGrant>>;

    /// All grants held by a user, newest first.
    async fn list_for_grantee(&self, grantee_id: UserId) -> AppResult<Vec<AccessGrant>>;

    /// All grants issued by a user, newest first.
    async fn list_by_sharer(&self, shared_by: UserId) -> AppResult<Vec<AccessGrant>>;

    /// Change a grant's permission. Returns `None` if it no longer exists.
    async fn update_permission(
        &self,
        id: GrantId,
        permission: SharePermission,
    ) -> AppResult<Option<AccessGrant>>;

    /// Set the grantee's star on a grant. Returns `None` if it no longer exists.
    async fn set_starred(&self, id: GrantId, starred: bool) -> AppResult<Option<AccessGrant>>;

    /// Delete a grant. Returns whether a row was removed.
    async fn delete(&self, id: GrantId) -> AppResult<bool>;

    /// Delete every grant on a resource, returning the count.
    async fn delete_for_resource(&self, resource: ResourceKey) -> AppResult<u64>;
}
