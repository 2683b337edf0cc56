//! Public link issuance and token resolution.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use cloudstore_auth::visibility::{AccessScope, VisibilityResolver};
use cloudstore_core::config::SharingConfig;
use cloudstore_core::error::AppError;
use cloudstore_database::store::LinkStore;
use cloudstore_entity::resource::{Resource, ResourceKey};
use cloudstore_entity::share::{AccessLevel, CreateLink, PublicLink, SharePermission};

use super::view::LinkView;
use crate::context::RequestContext;

/// Random bytes per token; 43 characters once encoded.
const TOKEN_BYTES: usize = 32;

/// A token that resolved to a live resource.
#[derive(Debug, Clone)]
pub struct ResolvedLink {
    /// The link, with the access just recorded counted in.
    pub link: PublicLink,
    /// The linked resource.
    pub resource: Resource,
}

/// Issues, revokes, and resolves public links.
#[derive(Debug, Clone)]
pub struct LinkService {
    /// Link store.
    links: Arc<dyn LinkStore>,
    /// Access checks.
    resolver: Arc<VisibilityResolver>,
    /// URL and expiry settings.
    config: SharingConfig,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        links: Arc<dyn LinkStore>,
        resolver: Arc<VisibilityResolver>,
        config: SharingConfig,
    ) -> Self {
        Self {
            links,
            resolver,
            config,
        }
    }

    /// Generates a URL-safe token from 256 bits of OS randomness.
    pub fn generate_token() -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Issues a link on `key`, replacing any existing one.
    ///
    /// `expires_in_days` of `None` or `0` means the link never expires.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
        permission: SharePermission,
        expires_in_days: Option<i64>,
    ) -> Result<LinkView, AppError> {
        self.resolver
            .require(ctx.user_id, key, AccessLevel::Owner, AccessScope::Active)
            .await?;

        let expires_at = match expires_in_days {
            None | Some(0) => None,
            Some(days) if (1..=self.config.max_link_expiry_days).contains(&days) => {
                Some(Utc::now() + Duration::days(days))
            }
            Some(days) => {
                return Err(AppError::validation(format!(
                    "expiresIn must be between 1 and {} days, got {days}",
                    self.config.max_link_expiry_days
                )));
            }
        };

        let link = self
            .links
            .replace(&CreateLink {
                resource: key,
                token: Self::generate_token(),
                permission,
                expires_at,
                created_by: ctx.user_id,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            link_id = %link.id,
            resource = %key,
            permission = %permission,
            expires_at = ?expires_at,
            "Public link issued"
        );
        Ok(self.view(&link))
    }

    /// The current link on a resource; owner only.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
    ) -> Result<Option<LinkView>, AppError> {
        self.resolver
            .require(ctx.user_id, key, AccessLevel::Owner, AccessScope::Active)
            .await?;
        let link = self.links.find_for_resource(key).await?;
        Ok(link.as_ref().map(|l| self.view(l)))
    }

    /// Deletes the link on a resource.
    pub async fn revoke(&self, ctx: &RequestContext, key: ResourceKey) -> Result<(), AppError> {
        self.resolver
            .require(ctx.user_id, key, AccessLevel::Owner, AccessScope::Active)
            .await?;

        if !self.links.delete_for_resource(key).await? {
            return Err(AppError::not_found("This resource has no public link"));
        }

        info!(user_id = %ctx.user_id, resource = %key, "Public link revoked");
        Ok(())
    }

    /// Resolves an anonymous token and counts the access.
    pub async fn resolve(&self, token: &str) -> Result<ResolvedLink, AppError> {
        let mut link = self
            .links
            .find_by_token(token)
            .await?
            .ok_or_else(AppError::link_not_found)?;

        if link.is_expired_at(Utc::now()) {
            debug!(link_id = %link.id, "Expired link presented");
            return Err(AppError::link_expired());
        }

        let resource = self.resolver.load(link.resource_key()).await?;
        if self.resolver.is_trashed(&resource).await? {
            return Err(AppError::not_found(format!(
                "This shared {} is no longer available",
                resource.resource_type()
            )));
        }

        match self.links.record_access(link.id).await {
            Ok(()) => link.access_count += 1,
            Err(e) => warn!(link_id = %link.id, error = %e, "Failed to record link access"),
        }

        Ok(ResolvedLink { link, resource })
    }

    /// Owner-facing projection of a link.
    pub fn view(&self, link: &PublicLink) -> LinkView {
        LinkView {
            resource_type: link.resource_type,
            resource_id: link.resource_id,
            token: link.token.clone(),
            url: self.config.share_url(&link.token),
            permission: link.permission,
            expires_at: link.expires_at,
            access_count: link.access_count,
            created_at: link.created_at,
        }
    }
}
