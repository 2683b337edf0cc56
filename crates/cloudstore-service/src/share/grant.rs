//! Per-user access grants.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cloudstore_auth::visibility::{AccessScope, VisibilityResolver};
use cloudstore_core::error::{AppError, ErrorKind};
use cloudstore_core::types::GrantId;
use cloudstore_database::store::{GrantStore, LinkStore, UserStore};
use cloudstore_entity::resource::{Resource, ResourceKey};
use cloudstore_entity::share::{AccessGrant, AccessLevel, CreateGrant, SharePermission};
use cloudstore_entity::user::{is_valid_email, normalize_email};

use super::link::LinkService;
use super::view::{RemoveAllOutcome, SharedByMeEntry, SharedWithMeEntry};
use crate::context::RequestContext;
use crate::trash::TrashService;
use crate::user::UserSummary;

/// Request to share a resource with a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    /// Grantee email.
    pub email: String,
    /// Permission to grant.
    pub permission: SharePermission,
    /// Whether to notify the grantee.
    #[serde(default)]
    pub send_email: bool,
    /// Optional note for the notification.
    #[serde(default)]
    pub message: Option<String>,
}

/// Manages grants on resources the caller owns.
#[derive(Debug, Clone)]
pub struct GrantService {
    /// User directory.
    users: Arc<dyn UserStore>,
    /// Grant store.
    grants: Arc<dyn GrantStore>,
    /// Link store.
    links: Arc<dyn LinkStore>,
    /// Access checks.
    resolver: Arc<VisibilityResolver>,
    /// Link views for shared-by-me.
    link_service: Arc<LinkService>,
    /// Cascade trash for remove-all.
    trash: Arc<TrashService>,
}

impl GrantService {
    /// Creates a new grant service.
    pub fn new(
        users: Arc<dyn UserStore>,
        grants: Arc<dyn GrantStore>,
        links: Arc<dyn LinkStore>,
        resolver: Arc<VisibilityResolver>,
        link_service: Arc<LinkService>,
        trash: Arc<TrashService>,
    ) -> Self {
        Self {
            users,
            grants,
            links,
            resolver,
            link_service,
            trash,
        }
    }

    /// Grants `req.permission` on `key` to the user registered under `req.email`.
    ///
    /// Fails with a conflict when that user already holds a grant.
    pub async fn grant(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        req: &ShareRequest,
    ) -> Result<AccessGrant, AppError> {
        self.require_owner(ctx, key).await?;

        let email = normalize_email(&req.email);
        if !is_valid_email(&email) {
            return Err(AppError::invalid_email(&req.email));
        }
        let grantee = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No registered user with email {email}")))?;
        if grantee.id == ctx.user_id {
            return Err(AppError::validation(
                "You cannot share a resource with yourself",
            ));
        }

        let grant = self
            .grants
            .create(&CreateGrant {
                resource: key,
                grantee_id: grantee.id,
                grantee_email: grantee.email.clone(),
                permission: req.permission,
                shared_by: ctx.user_id,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            grant_id = %grant.id,
            resource = %key,
            grantee_id = %grantee.id,
            permission = %grant.permission,
            "Grant created"
        );
        if req.send_email {
            info!(
                grantee = %grantee.email,
                has_message = req.message.as_deref().is_some_and(|m| !m.trim().is_empty()),
                "Share notification requested"
            );
        }
        Ok(grant)
    }

    /// Creates the grant, or changes the permission of the existing one.
    ///
    /// Returns the grant and whether it was newly created.
    pub async fn share_or_update(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        req: &ShareRequest,
    ) -> Result<(AccessGrant, bool), AppError> {
        match self.grant(ctx, key, req).await {
            Ok(grant) => Ok((grant, true)),
            Err(e) if e.is(ErrorKind::Conflict) => {
                let email = normalize_email(&req.email);
                let Some(grantee) = self.users.find_by_email(&email).await? else {
                    return Err(e);
                };
                let Some(existing) = self.grants.find_for_grantee(key, grantee.id).await? else {
                    return Err(e);
                };
                let updated = self
                    .update_permission(ctx, key, existing.id, req.permission)
                    .await?;
                Ok((updated, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Changes a grant's permission. Unchanged permissions are a no-op.
    pub async fn update_permission(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        grant_id: GrantId,
        permission: SharePermission,
    ) -> Result<AccessGrant, AppError> {
        self.require_owner(ctx, key).await?;
        let grant = self.find_grant(key, grant_id).await?;
        if grant.permission == permission {
            return Ok(grant);
        }

        let updated = self
            .grants
            .update_permission(grant_id, permission)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        info!(
            user_id = %ctx.user_id,
            grant_id = %grant_id,
            from = %grant.permission,
            to = %permission,
            "Grant permission updated"
        );
        Ok(updated)
    }

    /// Deletes a grant.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        grant_id: GrantId,
    ) -> Result<(), AppError> {
        self.require_owner(ctx, key).await?;
        self.find_grant(key, grant_id).await?;

        if !self.grants.delete(grant_id).await? {
            return Err(AppError::not_found("Share not found"));
        }

        info!(user_id = %ctx.user_id, grant_id = %grant_id, resource = %key, "Grant revoked");
        Ok(())
    }

    /// All grants on a resource; owner only.
    pub async fn list_for_resource(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
    ) -> Result<Vec<AccessGrant>, AppError> {
        self.require_owner(ctx, key).await?;
        self.grants.list_for_resource(key).await
    }

    /// Deletes every grant and the link, then trashes the resource.
    pub async fn remove_all(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
    ) -> Result<RemoveAllOutcome, AppError> {
        self.require_owner(ctx, key).await?;

        let grants_removed = self.grants.delete_for_resource(key).await?;
        let link_removed = self.links.delete_for_resource(key).await?;
        let trashed = self.trash.trash(ctx, key).await?;

        warn!(
            user_id = %ctx.user_id,
            resource = %key,
            grants_removed = grants_removed,
            link_removed = link_removed,
            "All access removed and resource trashed"
        );
        Ok(RemoveAllOutcome {
            grants_removed,
            link_removed,
            trashed,
        })
    }

    /// Drops the caller's own grant on a resource.
    pub async fn remove_self(&self, ctx: &RequestContext, key: ResourceKey) -> Result<(), AppError> {
        let grant = self
            .grants
            .find_for_grantee(key, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("You do not have a share on this resource"))?;
        self.grants.delete(grant.id).await?;

        info!(user_id = %ctx.user_id, grant_id = %grant.id, resource = %key, "Left share");
        Ok(())
    }

    /// Flips the caller's own star on a resource shared with them.
    ///
    /// The star lives on the caller's grant, so it is independent of the
    /// owner's star and disappears with the grant.
    pub async fn toggle_star(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
    ) -> Result<AccessGrant, AppError> {
        self.resolver
            .require(ctx.user_id, key, AccessLevel::View, AccessScope::Active)
            .await?;
        let grant = self
            .grants
            .find_for_grantee(key, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("You do not have a share on this resource"))?;

        let starred = !grant.is_starred;
        let updated = self
            .grants
            .set_starred(grant.id, starred)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        info!(
            user_id = %ctx.user_id,
            grant_id = %grant.id,
            starred = starred,
            "Shared star toggled"
        );
        Ok(updated)
    }

    /// Active resources shared with the caller, newest share first.
    ///
    /// Each resource's `is_starred` is the caller's own star from the grant.
    pub async fn shared_with_me(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<SharedWithMeEntry>, AppError> {
        let grants = self.grants.list_for_grantee(ctx.user_id).await?;
        let mut entries = Vec::with_capacity(grants.len());

        for grant in grants {
            let Some(mut resource) = self.active_resource(grant.resource_key()).await? else {
                continue;
            };
            resource.set_starred(grant.is_starred);
            let shared_by = self
                .users
                .find_by_id(grant.shared_by)
                .await?
                .map(UserSummary::from);
            entries.push(SharedWithMeEntry {
                resource,
                permission: grant.permission,
                shared_by,
                shared_at: grant.created_at,
            });
        }
        Ok(entries)
    }

    /// The caller's active resources that have grants or a link.
    pub async fn shared_by_me(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<SharedByMeEntry>, AppError> {
        let grants = self.grants.list_by_sharer(ctx.user_id).await?;
        let links = self.links.list_by_creator(ctx.user_id).await?;

        let mut seen = HashSet::new();
        let keys: Vec<ResourceKey> = grants
            .iter()
            .map(AccessGrant::resource_key)
            .chain(links.iter().map(|l| l.resource_key()))
            .filter(|key| seen.insert(*key))
            .collect();

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(resource) = self.active_resource(key).await? else {
                continue;
            };
            if resource.owner_id() != ctx.user_id {
                continue;
            }
            let shared_with_count = grants.iter().filter(|g| g.resource_key() == key).count();
            let public_link = links
                .iter()
                .find(|l| l.resource_key() == key)
                .map(|l| self.link_service.view(l));
            entries.push(SharedByMeEntry {
                resource,
                shared_with_count,
                has_public_link: public_link.is_some(),
                public_link,
            });
        }
        Ok(entries)
    }

    async fn require_owner(&self, ctx: &RequestContext, key: ResourceKey) -> Result<(), AppError> {
        self.resolver
            .require(ctx.user_id, key, AccessLevel::Owner, AccessScope::Active)
            .await?;
        Ok(())
    }

    async fn find_grant(&self, key: ResourceKey, grant_id: GrantId) -> Result<AccessGrant, AppError> {
        self.grants
            .find_by_id(grant_id)
            .await?
            .filter(|g| g.resource_key() == key)
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    async fn active_resource(&self, key: ResourceKey) -> Result<Option<Resource>, AppError> {
        let resource = match self.resolver.load(key).await {
            Ok(resource) => resource,
            Err(e) if e.is(ErrorKind::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        if self.resolver.is_trashed(&resource).await? {
            return Ok(None);
        }
        Ok(Some(resource))
    }
}
