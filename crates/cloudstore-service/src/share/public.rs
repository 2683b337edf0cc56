//! Anonymous access through a public link token.
//!
//! A link holder sees the shared resource the way its owner does: inside a
//! linked folder, only items owned by the link's creator are listed, and
//! descent or downloads outside the linked subtree are refused.

use std::sync::Arc;

use tracing::info;

use cloudstore_auth::visibility::VisibilityResolver;
use cloudstore_core::error::{AppError, ErrorKind};
use cloudstore_core::types::{FileId, FolderId};
use cloudstore_entity::file::File;
use cloudstore_entity::folder::Folder;
use cloudstore_entity::resource::{Resource, ResourceKey};
use cloudstore_entity::share::PublicLink;

use super::link::{LinkService, ResolvedLink};
use super::view::{PublicShareView, SubfolderEntry};
use crate::drive::DownloadDescriptor;
use crate::user::UserService;

/// Serves what anonymous link holders may see and download.
#[derive(Debug, Clone)]
pub struct PublicShareService {
    /// Token resolution.
    links: Arc<LinkService>,
    /// Tree and trash checks.
    resolver: Arc<VisibilityResolver>,
    /// Owner summaries.
    users: Arc<UserService>,
}

impl PublicShareService {
    /// Creates a new public share service.
    pub fn new(
        links: Arc<LinkService>,
        resolver: Arc<VisibilityResolver>,
        users: Arc<UserService>,
    ) -> Self {
        Self {
            links,
            resolver,
            users,
        }
    }

    /// The linked file, or the linked folder with its first level.
    pub async fn view(&self, token: &str) -> Result<PublicShareView, AppError> {
        let ResolvedLink { link, resource } = self.links.resolve(token).await?;
        self.render(&link, resource).await
    }

    /// A subfolder below a linked folder.
    pub async fn folder(
        &self,
        token: &str,
        subfolder_id: FolderId,
    ) -> Result<PublicShareView, AppError> {
        let ResolvedLink { link, resource } = self.links.resolve(token).await?;
        let root = resource
            .folder_id()
            .ok_or_else(|| AppError::validation("This link does not point to a folder"))?;

        let subfolder = self
            .resolve_within(&link, root, ResourceKey::folder(subfolder_id))
            .await
            .map_err(|e| hide_as(e, "Folder not found"))?;
        self.render(&link, subfolder).await
    }

    /// Authorizes a download through the link.
    ///
    /// For a folder link, `file_id` picks a file inside the linked subtree.
    pub async fn download(
        &self,
        token: &str,
        file_id: Option<FileId>,
    ) -> Result<DownloadDescriptor, AppError> {
        let ResolvedLink { link, resource } = self.links.resolve(token).await?;

        let file = match &resource {
            Resource::File(file) => {
                if file_id.is_some_and(|id| id != file.id) {
                    return Err(AppError::not_found("File not found"));
                }
                file.clone()
            }
            Resource::Folder(root) => {
                let file_id = file_id.ok_or_else(|| {
                    AppError::validation("fileId is required to download from a shared folder")
                })?;
                let found = self
                    .resolve_within(&link, root.id, ResourceKey::file(file_id))
                    .await
                    .map_err(|e| hide_as(e, "File not found"))?;
                match found {
                    Resource::File(file) => file,
                    Resource::Folder(_) => return Err(AppError::not_found("File not found")),
                }
            }
        };

        info!(link_id = %link.id, file_id = %file.id, "Public download authorized");
        Ok(DownloadDescriptor::from(&file))
    }

    /// Loads `key` and checks it is an active item of the link owner
    /// inside `root`.
    async fn resolve_within(
        &self,
        link: &PublicLink,
        root: FolderId,
        key: ResourceKey,
    ) -> Result<Resource, AppError> {
        let resource = self.resolver.load(key).await?;
        if resource.owner_id() != link.created_by
            || self.resolver.is_trashed(&resource).await?
            || !self.resolver.is_within(root, &resource).await?
        {
            return Err(AppError::not_found(format!("{key} not found")));
        }
        Ok(resource)
    }

    async fn render(
        &self,
        link: &PublicLink,
        resource: Resource,
    ) -> Result<PublicShareView, AppError> {
        let shared_by = self.users.summary(link.created_by).await?;

        let (files, subfolders, item_count) = match &resource {
            Resource::File(_) => (None, None, None),
            Resource::Folder(folder) => {
                let (files, subfolders) = self.contents(link, folder).await?;
                let count = files.len() + subfolders.len();
                (Some(files), Some(subfolders), Some(count))
            }
        };

        Ok(PublicShareView {
            resource,
            permission: link.permission,
            shared_by,
            expires_at: link.expires_at,
            files,
            subfolders,
            item_count,
        })
    }

    async fn contents(
        &self,
        link: &PublicLink,
        folder: &Folder,
    ) -> Result<(Vec<File>, Vec<SubfolderEntry>), AppError> {
        let children = self
            .resolver
            .list_visible_children(link.created_by, folder)
            .await?;

        let mut files = Vec::new();
        let mut subfolders = Vec::new();
        for child in children {
            match child {
                Resource::File(file) => files.push(file),
                Resource::Folder(sub) => {
                    let item_count = self
                        .resolver
                        .list_visible_children(link.created_by, &sub)
                        .await?
                        .len();
                    subfolders.push(SubfolderEntry {
                        folder: sub,
                        item_count,
                    });
                }
            }
        }
        Ok((files, subfolders))
    }
}

/// Replaces a not-found message so it does not echo internal keys.
fn hide_as(err: AppError, message: &str) -> AppError {
    if err.is(ErrorKind::NotFound) {
        AppError::not_found(message)
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use cloudstore_entity::share::SharePermission;

    use super::*;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_folder_view_shows_owner_items_only() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let alice = h.user("alice@x.com").await;
        let team = h.folder(&owner, "Team", None).await;
        h.share(&owner, ResourceKey::folder(team.id), "alice@x.com", SharePermission::Edit)
            .await;
        let docs = h.folder(&owner, "Docs", Some(team.id)).await;
        h.file(&owner, "plan.txt", Some(team.id)).await;
        h.file(&owner, "inner.txt", Some(docs.id)).await;
        h.file(&alice, "alice.txt", Some(team.id)).await;

        let link = h
            .links
            .create(&owner, ResourceKey::folder(team.id), SharePermission::View, None)
            .await
            .expect("link");
        let view = h.public.view(&link.token).await.expect("view");

        assert_eq!(view.item_count, Some(2));
        let files = view.files.expect("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "plan.txt");
        let subfolders = view.subfolders.expect("subfolders");
        assert_eq!(subfolders[0].folder.id, docs.id);
        assert_eq!(subfolders[0].item_count, 1);
        assert_eq!(
            view.shared_by.map(|u| u.email),
            Some("o@x.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_view_has_no_listing() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let file = h.file(&owner, "a.txt", None).await;
        let link = h
            .links
            .create(&owner, ResourceKey::file(file.id), SharePermission::View, None)
            .await
            .expect("link");

        let view = h.public.view(&link.token).await.expect("view");
        assert!(view.files.is_none());
        assert!(view.item_count.is_none());

        let download = h.public.download(&link.token, None).await.expect("download");
        assert_eq!(download.file_id, file.id);
    }

    #[tokio::test]
    async fn test_descent_stays_inside_linked_folder() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let team = h.folder(&owner, "Team", None).await;
        let docs = h.folder(&owner, "Docs", Some(team.id)).await;
        let outside = h.folder(&owner, "Private", None).await;
        let link = h
            .links
            .create(&owner, ResourceKey::folder(team.id), SharePermission::View, None)
            .await
            .expect("link");

        let view = h.public.folder(&link.token, docs.id).await.expect("descend");
        assert_eq!(view.resource.id(), docs.id.0);

        let err = h
            .public
            .folder(&link.token, outside.id)
            .await
            .expect_err("outside");
        assert_eq!(err.kind, ErrorKind::NotFound);

        h.trash
            .trash(&owner, ResourceKey::folder(docs.id))
            .await
            .expect("trash");
        let err = h.public.folder(&link.token, docs.id).await.expect_err("trashed");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_folder_download_rules() {
        let h = Harness::new();
        let owner = h.user("o@x.com").await;
        let alice = h.user("alice@x.com").await;
        let team = h.folder(&owner, "Team", None).await;
        h.share(&owner, ResourceKey::folder(team.id), "alice@x.com", SharePermission::Edit)
            .await;
        let docs = h.folder(&owner, "Docs", Some(team.id)).await;
        let nested = h.file(&owner, "nested.txt", Some(docs.id)).await;
        let foreign = h.file(&alice, "alice.txt", Some(team.id)).await;
        let link = h
            .links
            .create(&owner, ResourceKey::folder(team.id), SharePermission::View, None)
            .await
            .expect("link");

        let err = h.public.download(&link.token, None).await.expect_err("no id");
        assert_eq!(err.kind, ErrorKind::Validation);

        let ok = h
            .public
            .download(&link.token, Some(nested.id))
            .await
            .expect("nested");
        assert_eq!(ok.file_name, "nested.txt");

        let err = h
            .public
            .download(&link.token, Some(foreign.id))
            .await
            .expect_err("not the owner's");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
