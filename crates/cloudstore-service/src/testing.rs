//! Fixtures for service tests.

use std::ops::Deref;

use cloudstore_core::types::FolderId;
use cloudstore_entity::file::File;
use cloudstore_entity::folder::Folder;
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::{AccessGrant, SharePermission};

use crate::context::RequestContext;
use crate::drive::NewFile;
use crate::services::Services;
use crate::share::ShareRequest;

/// In-memory services plus shortcuts for building trees.
pub struct Harness {
    services: Services,
}

impl Deref for Harness {
    type Target = Services;

    fn deref(&self) -> &Services {
        &self.services
    }
}

impl Harness {
    pub fn new() -> Self {
        Self {
            services: Services::in_memory(),
        }
    }

    pub async fn user(&self, email: &str) -> RequestContext {
        let user = self
            .services
            .users
            .register(email, email)
            .await
            .expect("register");
        RequestContext::system(user.id)
    }

    pub async fn folder(&self, ctx: &RequestContext, name: &str, parent: Option<FolderId>) -> Folder {
        self.services
            .drive
            .create_folder(ctx, name, parent)
            .await
            .expect("create folder")
    }

    pub async fn file(&self, ctx: &RequestContext, name: &str, parent: Option<FolderId>) -> File {
        self.services
            .drive
            .create_file(
                ctx,
                NewFile {
                    name: name.to_string(),
                    folder_id: parent,
                    size: 1,
                    mime_type: None,
                },
            )
            .await
            .expect("create file")
    }

    pub async fn share(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        email: &str,
        permission: SharePermission,
    ) -> AccessGrant {
        self.services
            .grants
            .grant(
                ctx,
                key,
                &ShareRequest {
                    email: email.to_string(),
                    permission,
                    send_email: false,
                    message: None,
                },
            )
            .await
            .expect("share")
    }
}
