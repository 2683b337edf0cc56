//! Visibility resolver over the resource and grant stores.

use std::sync::Arc;

use tracing::debug;

use cloudstore_core::error::AppError;
use cloudstore_core::result::AppResult;
use cloudstore_core::types::{FolderId, UserId};
use cloudstore_database::store::{GrantStore, ResourceStore};
use cloudstore_entity::folder::Folder;
use cloudstore_entity::resource::{Resource, ResourceKey};
use cloudstore_entity::share::AccessLevel;

use super::decision::{AccessDecision, AccessScope, AccessSource};

/// Whether an item inside a folder is visible to `viewer`.
///
/// Viewers see the folder owner's items plus their own; the owner
/// therefore sees only their own items, never a grantee's additions.
pub fn is_visible_in(folder_owner: UserId, viewer: UserId, item_owner: UserId) -> bool {
    item_owner == folder_owner || item_owner == viewer
}

/// Resolves effective access from ownership, grants, and trash state.
#[derive(Debug, Clone)]
pub struct VisibilityResolver {
    /// File/folder tree.
    resources: Arc<dyn ResourceStore>,
    /// Per-user grants.
    grants: Arc<dyn GrantStore>,
}

impl VisibilityResolver {
    /// Creates a new resolver.
    pub fn new(resources: Arc<dyn ResourceStore>, grants: Arc<dyn GrantStore>) -> Self {
        Self { resources, grants }
    }

    /// Resolve `actor`'s access to `resource`.
    pub async fn can_access(
        &self,
        actor: UserId,
        resource: &Resource,
        scope: AccessScope,
    ) -> AppResult<AccessDecision> {
        let chain = self.parent_chain(resource).await?;
        let is_owner = resource.owner_id() == actor;

        if resource.is_deleted() || chain.iter().any(|f| f.is_deleted) {
            if is_owner && scope == AccessScope::Trash {
                return Ok(AccessDecision::allow(AccessLevel::Owner, AccessSource::Owner));
            }
            return Ok(AccessDecision::deny(AccessSource::Trashed));
        }

        if is_owner {
            return Ok(AccessDecision::allow(AccessLevel::Owner, AccessSource::Owner));
        }

        if let Some(grant) = self.grants.find_for_grantee(resource.key(), actor).await? {
            return Ok(AccessDecision::allow(
                grant.permission.into(),
                AccessSource::DirectGrant,
            ));
        }

        for folder in chain.iter().filter(|f| f.owner_id == resource.owner_id()) {
            if let Some(grant) = self
                .grants
                .find_for_grantee(ResourceKey::folder(folder.id), actor)
                .await?
            {
                debug!(
                    user_id = %actor,
                    resource = %resource.key(),
                    folder_id = %folder.id,
                    "Access inherited from folder grant"
                );
                return Ok(AccessDecision::allow(
                    grant.permission.into(),
                    AccessSource::InheritedGrant,
                ));
            }
        }

        Ok(AccessDecision::deny(AccessSource::Denied))
    }

    /// Load a resource and check `actor` reaches `required` on it.
    ///
    /// Returns the resource with the effective level.
    pub async fn require(
        &self,
        actor: UserId,
        key: ResourceKey,
        required: AccessLevel,
        scope: AccessScope,
    ) -> AppResult<(Resource, AccessLevel)> {
        let resource = self.load(key).await?;
        let decision = self.can_access(actor, &resource, scope).await?;
        let level = decision.require(required, &resource)?;
        Ok((resource, level))
    }

    /// Load a resource or fail with not found.
    pub async fn load(&self, key: ResourceKey) -> AppResult<Resource> {
        self.resources
            .find(key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} not found", key)))
    }

    /// Whether the resource or any ancestor is in trash.
    pub async fn is_trashed(&self, resource: &Resource) -> AppResult<bool> {
        if resource.is_deleted() {
            return Ok(true);
        }
        Ok(self.parent_chain(resource).await?.iter().any(|f| f.is_deleted))
    }

    /// Non-trashed children of `folder` that `viewer` can see.
    ///
    /// The caller must already have resolved `viewer`'s access to the folder.
    pub async fn list_visible_children(
        &self,
        viewer: UserId,
        folder: &Folder,
    ) -> AppResult<Vec<Resource>> {
        let children = self.resources.list_children(folder.id).await?;
        Ok(children
            .into_iter()
            .filter(|child| is_visible_in(folder.owner_id, viewer, child.owner_id()))
            .collect())
    }

    /// Whether `resource` is `root` or lies somewhere below it.
    pub async fn is_within(&self, root: FolderId, resource: &Resource) -> AppResult<bool> {
        if resource.folder_id() == Some(root) {
            return Ok(true);
        }
        Ok(self.parent_chain(resource).await?.iter().any(|f| f.id == root))
    }

    async fn parent_chain(&self, resource: &Resource) -> AppResult<Vec<Folder>> {
        match resource.parent_id() {
            Some(parent_id) => self.resources.ancestors(parent_id).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use cloudstore_core::error::ErrorKind;
    use cloudstore_database::store::{Stores, UserStore};
    use cloudstore_entity::file::CreateFile;
    use cloudstore_entity::folder::CreateFolder;
    use cloudstore_entity::share::{CreateGrant, SharePermission};
    use cloudstore_entity::user::CreateUser;

    use super::*;

    struct Fixture {
        stores: Stores,
        resolver: VisibilityResolver,
    }

    impl Fixture {
        fn new() -> Self {
            let stores = Stores::memory();
            let resolver = VisibilityResolver::new(stores.resources.clone(), stores.grants.clone());
            Self { stores, resolver }
        }

        async fn user(&self, email: &str) -> UserId {
            self.stores
                .users
                .create(&CreateUser {
                    email: email.to_string(),
                    full_name: email.to_string(),
                })
                .await
                .expect("user")
                .id
        }

        async fn folder(&self, owner: UserId, parent: Option<FolderId>) -> Folder {
            self.stores
                .resources
                .create_folder(&CreateFolder {
                    name: "Team".to_string(),
                    owner_id: owner,
                    parent_id: parent,
                })
                .await
                .expect("folder")
        }

        async fn file(&self, owner: UserId, parent: Option<FolderId>, name: &str) -> Resource {
            self.stores
                .resources
                .create_file(&CreateFile {
                    name: name.to_string(),
                    owner_id: owner,
                    folder_id: parent,
                    size: 3,
                    mime_type: "text/plain".to_string(),
                })
                .await
                .map(Resource::File)
                .expect("file")
        }

        async fn share(&self, owner: UserId, folder: &Folder, grantee: UserId, perm: SharePermission) {
            self.stores
                .grants
                .create(&CreateGrant {
                    resource: ResourceKey::folder(folder.id),
                    grantee_id: grantee,
                    grantee_email: format!("{grantee}@x.com"),
                    permission: perm,
                    shared_by: owner,
                })
                .await
                .expect("grant");
        }
    }

    #[tokio::test]
    async fn test_owner_precedence_over_grants() {
        let fx = Fixture::new();
        let owner = fx.user("o@x.com").await;
        let team = fx.folder(owner, None).await;
        fx.share(owner, &team, owner, SharePermission::View).await;

        let decision = fx
            .resolver
            .can_access(owner, &Resource::Folder(team), AccessScope::Active)
            .await
            .expect("resolve");
        assert_eq!(decision.permission, Some(AccessLevel::Owner));
        assert_eq!(decision.source, AccessSource::Owner);
    }

    #[tokio::test]
    async fn test_folder_grant_reaches_owner_items_only() {
        let fx = Fixture::new();
        let owner = fx.user("o@x.com").await;
        let alice = fx.user("alice@x.com").await;
        let bob = fx.user("bob@x.com").await;
        let team = fx.folder(owner, None).await;
        fx.share(owner, &team, alice, SharePermission::Edit).await;
        fx.share(owner, &team, bob, SharePermission::View).await;

        let owners_file = fx.file(owner, Some(team.id), "y.txt").await;
        let alices_file = fx.file(alice, Some(team.id), "x.txt").await;

        let bob_on_owner = fx
            .resolver
            .can_access(bob, &owners_file, AccessScope::Active)
            .await
            .expect("resolve");
        assert_eq!(bob_on_owner.permission, Some(AccessLevel::View));
        assert_eq!(bob_on_owner.source, AccessSource::InheritedGrant);

        let bob_on_alice = fx
            .resolver
            .can_access(bob, &alices_file, AccessScope::Active)
            .await
            .expect("resolve");
        assert!(!bob_on_alice.allowed);

        let owner_on_alice = fx
            .resolver
            .can_access(owner, &alices_file, AccessScope::Active)
            .await
            .expect("resolve");
        assert!(!owner_on_alice.allowed);
    }

    #[tokio::test]
    async fn test_visibility_asymmetry() {
        let fx = Fixture::new();
        let owner = fx.user("o@x.com").await;
        let alice = fx.user("alice@x.com").await;
        let team = fx.folder(owner, None).await;
        fx.share(owner, &team, alice, SharePermission::Edit).await;

        fx.file(alice, Some(team.id), "x.txt").await;
        let names = |items: Vec<Resource>| {
            items
                .iter()
                .map(|r| r.name().to_string())
                .collect::<Vec<_>>()
        };

        let owner_view = fx.resolver.list_visible_children(owner, &team).await.expect("list");
        let alice_view = fx.resolver.list_visible_children(alice, &team).await.expect("list");
        assert!(owner_view.is_empty());
        assert_eq!(names(alice_view), vec!["x.txt"]);

        fx.file(owner, Some(team.id), "y.txt").await;
        let owner_view = fx.resolver.list_visible_children(owner, &team).await.expect("list");
        let alice_view = fx.resolver.list_visible_children(alice, &team).await.expect("list");
        assert_eq!(names(owner_view), vec!["y.txt"]);
        assert_eq!(names(alice_view), vec!["x.txt", "y.txt"]);
    }

    #[tokio::test]
    async fn test_trashed_ancestor_suppresses_access() {
        let fx = Fixture::new();
        let owner = fx.user("o@x.com").await;
        let alice = fx.user("alice@x.com").await;
        let team = fx.folder(owner, None).await;
        let inner = fx.folder(owner, Some(team.id)).await;
        fx.share(owner, &team, alice, SharePermission::Edit).await;
        let doc = fx.file(owner, Some(inner.id), "doc.txt").await;

        fx.stores
            .resources
            .trash(ResourceKey::folder(team.id), owner, Utc::now())
            .await
            .expect("trash");
        let doc = fx.resolver.load(doc.key()).await.expect("reload");

        let err = fx
            .resolver
            .require(alice, doc.key(), AccessLevel::View, AccessScope::Active)
            .await
            .expect_err("trashed");
        assert_eq!(err.kind, ErrorKind::NotFound);

        let owner_active = fx
            .resolver
            .can_access(owner, &doc, AccessScope::Active)
            .await
            .expect("resolve");
        assert_eq!(owner_active.source, AccessSource::Trashed);

        let owner_trash = fx
            .resolver
            .can_access(owner, &doc, AccessScope::Trash)
            .await
            .expect("resolve");
        assert_eq!(owner_trash.permission, Some(AccessLevel::Owner));
    }

    #[tokio::test]
    async fn test_is_within_walks_up() {
        let fx = Fixture::new();
        let owner = fx.user("o@x.com").await;
        let team = fx.folder(owner, None).await;
        let inner = fx.folder(owner, Some(team.id)).await;
        let other = fx.folder(owner, None).await;
        let doc = fx.file(owner, Some(inner.id), "doc.txt").await;

        assert!(fx.resolver.is_within(team.id, &doc).await.expect("walk"));
        assert!(!fx.resolver.is_within(other.id, &doc).await.expect("walk"));
    }
}
