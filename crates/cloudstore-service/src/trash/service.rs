//! Trash, restore, purge, and the retention sweep.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use cloudstore_auth::visibility::{AccessScope, VisibilityResolver};
use cloudstore_core::config::TrashConfig;
use cloudstore_core::error::{AppError, ErrorKind};
use cloudstore_database::store::ResourceStore;
use cloudstore_entity::resource::{Resource, ResourceKey};
use cloudstore_entity::share::AccessLevel;

use crate::context::RequestContext;
use crate::report::BulkReport;

/// Manages soft deletion and permanent removal of resources.
#[derive(Debug, Clone)]
pub struct TrashService {
    /// File/folder store.
    resources: Arc<dyn ResourceStore>,
    /// Access checks.
    resolver: Arc<VisibilityResolver>,
    /// Retention settings.
    config: TrashConfig,
}

impl TrashService {
    /// Creates a new trash service.
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        resolver: Arc<VisibilityResolver>,
        config: TrashConfig,
    ) -> Self {
        Self {
            resources,
            resolver,
            config,
        }
    }

    /// Moves a resource, and for a folder every active descendant, to trash.
    ///
    /// Allowed for the owner and for `edit` grantees. Returns the number
    /// of rows flagged.
    pub async fn trash(&self, ctx: &RequestContext, key: ResourceKey) -> Result<u64, AppError> {
        self.resolver
            .require(ctx.user_id, key, AccessLevel::Edit, AccessScope::Active)
            .await?;

        let flagged = self.resources.trash(key, ctx.user_id, Utc::now()).await?;

        info!(
            user_id = %ctx.user_id,
            resource = %key,
            flagged = flagged,
            "Resource moved to trash"
        );
        Ok(flagged)
    }

    /// Restores a trashed resource and everything trashed with it.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        key: ResourceKey,
    ) -> Result<Resource, AppError> {
        let (resource, _) = self
            .resolver
            .require(ctx.user_id, key, AccessLevel::Owner, AccessScope::Trash)
            .await?;

        if !resource.is_deleted() {
            return Err(AppError::conflict(format!(
                "This {} is not in trash",
                resource.resource_type()
            )));
        }

        if let Some(parent_id) = resource.parent_id() {
            let parent = self.resolver.load(ResourceKey::folder(parent_id)).await?;
            if self.resolver.is_trashed(&parent).await? {
                return Err(AppError::conflict(
                    "The containing folder is in trash; restore it first",
                ));
            }
        }

        let restored = self.resources.restore(key).await?;

        info!(
            user_id = %ctx.user_id,
            resource = %key,
            restored = restored,
            "Resource restored from trash"
        );
        self.resolver.load(key).await
    }

    /// Permanently deletes a trashed resource with its grants and link.
    ///
    /// A folder takes along everything trashed with it, including items
    /// other users created inside it.
    pub async fn purge(&self, ctx: &RequestContext, key: ResourceKey) -> Result<(), AppError> {
        let (resource, _) = self
            .resolver
            .require(ctx.user_id, key, AccessLevel::Owner, AccessScope::Trash)
            .await?;

        if !resource.is_deleted() {
            return Err(AppError::conflict(format!(
                "Only trashed items can be permanently deleted; move this {} to trash first",
                resource.resource_type()
            )));
        }

        let cascade = self.cascade_of(&resource).await?;
        if !cascade.is_empty() {
            let report = self.purge_in_passes(cascade).await;
            if !report.is_clean() {
                warn!(
                    resource = %key,
                    failed = report.error_count,
                    "Some contents of a purged folder could not be removed"
                );
            }
        }
        self.resources.purge(key).await?;

        info!(user_id = %ctx.user_id, resource = %key, "Resource permanently deleted");
        Ok(())
    }

    /// The caller's trashed resources, most recent first.
    pub async fn list_trash(&self, ctx: &RequestContext) -> Result<Vec<Resource>, AppError> {
        self.resources.list_trash(ctx.user_id).await
    }

    /// Purges everything in the caller's trash, best-effort.
    pub async fn empty_trash(&self, ctx: &RequestContext) -> Result<BulkReport, AppError> {
        let roots = self.resources.list_trash(ctx.user_id).await?;
        let mut items = Vec::with_capacity(roots.len());
        for root in roots {
            items.extend(self.cascade_of(&root).await?);
            items.push(root);
        }
        let report = self.purge_in_passes(items).await;

        info!(
            user_id = %ctx.user_id,
            purged = report.success_count,
            failed = report.error_count,
            "Trash emptied"
        );
        Ok(report)
    }

    /// Purges everything trashed longer ago than the retention period.
    pub async fn purge_expired(&self) -> Result<BulkReport, AppError> {
        let cutoff = Utc::now() - Duration::days(self.config.retention_days);
        let items = self.resources.list_trashed_before(cutoff).await?;
        if items.is_empty() {
            return Ok(BulkReport::default());
        }

        let report = self.purge_in_passes(items).await;
        if !report.is_clean() {
            warn!(
                failed = report.error_count,
                "Some expired trash items could not be purged"
            );
        }
        info!(
            purged = report.success_count,
            cutoff = %cutoff,
            "Expired trash purged"
        );
        Ok(report)
    }

    /// Everything trashed together with a folder, below it.
    async fn cascade_of(&self, resource: &Resource) -> Result<Vec<Resource>, AppError> {
        match (resource, resource.deleted_at()) {
            (Resource::Folder(folder), Some(stamp)) => {
                self.resources.list_cascade(folder.id, stamp).await
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Purge files first, then folders, repeating while a pass makes
    /// progress so that nested folders empty bottom-up.
    async fn purge_in_passes(&self, mut pending: Vec<Resource>) -> BulkReport {
        pending.sort_by_key(|r| matches!(r, Resource::Folder(_)));
        let mut report = BulkReport::default();

        loop {
            let attempted = pending.len();
            let mut deferred = Vec::new();

            for resource in pending {
                match self.resources.purge(resource.key()).await {
                    Ok(_) => report.record_success(),
                    Err(e) if e.is(ErrorKind::Conflict) => deferred.push((resource, e)),
                    Err(e) => report.record_failure(resource.key(), &e),
                }
            }

            if deferred.is_empty() {
                break;
            }
            if deferred.len() == attempted {
                for (resource, err) in &deferred {
                    report.record_failure(resource.key(), err);
                }
                break;
            }
            pending = deferred.into_iter().map(|(resource, _)| resource).collect();
        }

        report
    }
}
