//! Folder and file operations gated by the visibility resolver.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use cloudstore_auth::visibility::{AccessScope, VisibilityResolver};
use cloudstore_core::error::AppError;
use cloudstore_core::types::{FileId, FolderId};
use cloudstore_database::store::ResourceStore;
use cloudstore_entity::file::{CreateFile, File};
use cloudstore_entity::folder::{CreateFolder, Folder};
use cloudstore_entity::resource::{Resource, ResourceKey};
use cloudstore_entity::share::AccessLevel;

use super::view::{DownloadDescriptor, FolderContents, ResourceView};
use crate::context::RequestContext;
use crate::report::BulkReport;

/// Maximum length of a file or folder name.
const MAX_NAME_LEN: usize = 255;

/// MIME type used when the client reports none.
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Metadata of an uploaded file to register.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    /// File name.
    pub name: String,
    /// Target folder (root when absent).
    pub folder_id: Option<FolderId>,
    /// Size in bytes.
    #[serde(default)]
    pub size: i64,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Handles folder and file operations.
#[derive(Debug, Clone)]
pub struct DriveService {
    /// File/folder store.
    resources: Arc<dyn ResourceStore>,
    /// Access checks.
    resolver: Arc<VisibilityResolver>,
}

impl DriveService {
    /// Creates a new drive service.
    pub fn new(resources: Arc<dyn ResourceStore>, resolver: Arc<VisibilityResolver>) -> Self {
        Self {
            resources,
            resolver,
        }
    }

    /// Creates a folder owned by the caller.
    ///
    /// Creating inside a folder requires `edit` on it.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<Folder, AppError> {
        let name = validate_name(name)?;
        if let Some(parent_id) = parent_id {
            self.require_folder(ctx, parent_id, AccessLevel::Edit).await?;
        }

        let folder = self
            .resources
            .create_folder(&CreateFolder {
                name,
                owner_id: ctx.user_id,
                parent_id,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?parent_id,
            "Folder created"
        );
        Ok(folder)
    }

    /// Registers an uploaded file owned by the caller.
    pub async fn create_file(&self, ctx: &RequestContext, req: NewFile) -> Result<File, AppError> {
        let name = validate_name(&req.name)?;
        if req.size < 0 {
            return Err(AppError::validation("File size must not be negative"));
        }
        if let Some(folder_id) = req.folder_id {
            self.require_folder(ctx, folder_id, AccessLevel::Edit).await?;
        }

        let mime_type = req
            .mime_type
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let file = self
            .resources
            .create_file(&CreateFile {
                name,
                owner_id: ctx.user_id,
                folder_id: req.folder_id,
                size: req.size,
                mime_type,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            folder_id = ?file.folder_id,
            size = file.size,
            "File registered"
        );
        Ok(file)
    }

    /// A resource with the caller's effective level.
    pub async fn get(&self, ctx: &RequestContext, key: ResourceKey) -> Result<ResourceView, AppError> {
        let (resource, permission) = self
            .resolver
            .require(ctx.user_id, key, AccessLevel::View, AccessScope::Active)
            .await?;
        Ok(ResourceView {
            resource,
            permission,
        })
    }

    /// The caller's own active root-level items.
    pub async fn list_root(&self, ctx: &RequestContext) -> Result<Vec<Resource>, AppError> {
        self.resources.list_root(ctx.user_id).await
    }

    /// A folder's children as visible to the caller.
    pub async fn list_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<FolderContents, AppError> {
        let (folder, permission) = self.require_folder(ctx, folder_id, AccessLevel::View).await?;
        let items = self
            .resolver
            .list_visible_children(ctx.user_id, &folder)
            .await?;
        Ok(FolderContents {
            folder,
            permission,
            items,
        })
    }

    /// Renames a resource; requires `edit`.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        name: &str,
    ) -> Result<Resource, AppError> {
        let name = validate_name(name)?;
        self.resolver
            .require(ctx.user_id, key, AccessLevel::Edit, AccessScope::Active)
            .await?;

        let renamed = self
            .resources
            .rename(key, &name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{key} not found")))?;

        info!(user_id = %ctx.user_id, resource = %key, "Resource renamed");
        Ok(renamed)
    }

    /// Flips the owner's star on a resource.
    pub async fn toggle_star(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
    ) -> Result<Resource, AppError> {
        let (resource, _) = self
            .resolver
            .require(ctx.user_id, key, AccessLevel::Owner, AccessScope::Active)
            .await?;

        let starred = !resource.is_starred();
        let updated = self
            .resources
            .set_starred(key, starred)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{key} not found")))?;

        info!(user_id = %ctx.user_id, resource = %key, starred = starred, "Star toggled");
        Ok(updated)
    }

    /// The caller's own starred items that are not in trash.
    pub async fn starred(&self, ctx: &RequestContext) -> Result<Vec<Resource>, AppError> {
        self.resources.list_starred(ctx.user_id).await
    }

    /// Moves items into `target` (or the root), best-effort.
    ///
    /// Each item needs `edit`. An item the caller does not own may only
    /// move into folders of its owner, and only its owner may move it to
    /// the root.
    pub async fn move_items(
        &self,
        ctx: &RequestContext,
        items: &[ResourceKey],
        target: Option<FolderId>,
    ) -> Result<BulkReport, AppError> {
        let target_folder = match target {
            Some(folder_id) => Some(self.require_folder(ctx, folder_id, AccessLevel::Edit).await?.0),
            None => None,
        };

        let mut report = BulkReport::default();
        for key in items {
            match self.move_one(ctx, *key, target_folder.as_ref()).await {
                Ok(()) => report.record_success(),
                Err(e) => report.record_failure(*key, &e),
            }
        }

        info!(
            user_id = %ctx.user_id,
            target = ?target,
            moved = report.success_count,
            failed = report.error_count,
            "Items moved"
        );
        Ok(report)
    }

    /// Download descriptor for a file the caller can view.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<DownloadDescriptor, AppError> {
        let (resource, _) = self
            .resolver
            .require(
                ctx.user_id,
                ResourceKey::file(file_id),
                AccessLevel::View,
                AccessScope::Active,
            )
            .await?;
        let file = resource
            .as_file()
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File download authorized");
        Ok(DownloadDescriptor::from(file))
    }

    async fn move_one(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        target: Option<&Folder>,
    ) -> Result<(), AppError> {
        let (resource, level) = self
            .resolver
            .require(ctx.user_id, key, AccessLevel::Edit, AccessScope::Active)
            .await?;

        match target {
            None if !level.is_owner() => {
                return Err(AppError::permission_denied(
                    "Only the owner can move this item to the root",
                ));
            }
            Some(folder) if !level.is_owner() && folder.owner_id != resource.owner_id() => {
                return Err(AppError::permission_denied(
                    "Items can only move within their owner's folders",
                ));
            }
            _ => {}
        }

        self.resources
            .set_parent(key, target.map(|f| f.id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("{key} not found")))?;
        Ok(())
    }

    async fn require_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        required: AccessLevel,
    ) -> Result<(Folder, AccessLevel), AppError> {
        let (resource, level) = self
            .resolver
            .require(
                ctx.user_id,
                ResourceKey::folder(folder_id),
                required,
                AccessScope::Active,
            )
            .await?;
        match resource {
            Resource::Folder(folder) => Ok((folder, level)),
            Resource::File(_) => Err(AppError::not_found("Folder not found")),
        }
    }
}

/// Trim and check a file or folder name.
fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(AppError::validation(format!("Invalid name: '{name}'")));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use cloudstore_core::error::ErrorKind;
    use cloudstore_entity::share::SharePermission;

    use super::*;
    use crate::testing::Harness;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Team ").ok(), Some("Team".to_string()));
        assert!(validate_name("   ").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }

    #[tokio::test]
    async fn test_view_grantee_cannot_create_inside() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let bob = h.user("bob@x.com").await;
        let team = h.folder(&owner, "Team", None).await;
        h.share(&owner, ResourceKey::folder(team.id), "bob@x.com", SharePermission::View)
            .await;

        let err = h
            .drive
            .create_folder(&bob, "Mine", Some(team.id))
            .await
            .expect_err("view is read-only");
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_listing_is_creator_scoped() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let alice = h.user("alice@x.com").await;
        let team = h.folder(&owner, "Team", None).await;
        h.share(&owner, ResourceKey::folder(team.id), "alice@x.com", SharePermission::Edit)
            .await;

        h.file(&alice, "x.txt", Some(team.id)).await;

        let owner_view = h.drive.list_folder(&owner, team.id).await.expect("owner");
        let alice_view = h.drive.list_folder(&alice, team.id).await.expect("alice");
        assert!(owner_view.items.is_empty());
        assert_eq!(owner_view.permission, AccessLevel::Owner);
        assert_eq!(alice_view.items.len(), 1);
        assert_eq!(alice_view.permission, AccessLevel::Edit);
    }

    #[tokio::test]
    async fn test_move_reports_per_item() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let stranger = h.user("s@x.com").await;
        let dest = h.folder(&owner, "Dest", None).await;
        let mine = h.file(&owner, "mine.txt", None).await;
        let theirs = h.file(&stranger, "theirs.txt", None).await;

        let report = h
            .drive
            .move_items(
                &owner,
                &[ResourceKey::file(mine.id), ResourceKey::file(theirs.id)],
                Some(dest.id),
            )
            .await
            .expect("move");
        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 1);

        let listing = h.drive.list_folder(&owner, dest.id).await.expect("list");
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].name(), "mine.txt");
    }

    #[tokio::test]
    async fn test_owner_star_toggles_and_lists() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let alice = h.user("alice@x.com").await;
        let team = h.folder(&owner, "Team", None).await;
        let doc = h.file(&owner, "doc.txt", None).await;
        h.file(&owner, "other.txt", None).await;
        let team_key = ResourceKey::folder(team.id);
        h.share(&owner, team_key, "alice@x.com", SharePermission::Edit)
            .await;

        let starred = h.drive.toggle_star(&owner, team_key).await.expect("star");
        assert!(starred.is_starred());
        h.drive
            .toggle_star(&owner, ResourceKey::file(doc.id))
            .await
            .expect("star");

        let names: Vec<String> = h
            .drive
            .starred(&owner)
            .await
            .expect("starred")
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["Team", "doc.txt"]);

        let err = h
            .drive
            .toggle_star(&alice, team_key)
            .await
            .expect_err("owner only");
        assert_eq!(err.kind, ErrorKind::Authorization);

        let unstarred = h.drive.toggle_star(&owner, team_key).await.expect("unstar");
        assert!(!unstarred.is_starred());
        assert_eq!(h.drive.starred(&owner).await.expect("starred").len(), 1);
    }

    #[tokio::test]
    async fn test_trashed_items_leave_starred_listing() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let doc = h.file(&owner, "doc.txt", None).await;
        let key = ResourceKey::file(doc.id);
        h.drive.toggle_star(&owner, key).await.expect("star");

        h.trash.trash(&owner, key).await.expect("trash");
        assert!(h.drive.starred(&owner).await.expect("starred").is_empty());
        let err = h.drive.toggle_star(&owner, key).await.expect_err("trashed");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_folder_cannot_move_into_itself() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let outer = h.folder(&owner, "Outer", None).await;
        let inner = h.folder(&owner, "Inner", Some(outer.id)).await;

        let report = h
            .drive
            .move_items(&owner, &[ResourceKey::folder(outer.id)], Some(inner.id))
            .await
            .expect("move");
        assert_eq!(report.error_count, 1);
    }
}
