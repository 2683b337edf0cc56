//! Per-user access grant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cloudstore_core::types::{GrantId, UserId};

use super::permission::SharePermission;
use crate::resource::{ResourceKey, ResourceType};

/// A grant of `view` or `edit` on one resource to one registered user.
///
/// Unique per `(resource_type, resource_id, grantee_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Unique grant identifier.
    pub id: GrantId,
    /// Type of the shared resource.
    pub resource_type: ResourceType,
    /// ID of the shared resource.
    pub resource_id: Uuid,
    /// The user receiving access.
    pub grantee_id: UserId,
    /// The grantee's normalized email.
    #[serde(rename = "email")]
    pub grantee_email: String,
    /// Granted permission.
    pub permission: SharePermission,
    /// The owner who created the grant.
    pub shared_by: UserId,
    /// Starred by the grantee. Independent of the owner's star.
    pub is_starred: bool,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// When the permission last changed.
    pub updated_at: DateTime<Utc>,
}

impl AccessGrant {
    /// The key of the shared resource.
    pub fn resource_key(&self) -> ResourceKey {
        ResourceKey::new(self.resource_type, self.resource_id)
    }
}

/// Data required to create a grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGrant {
    /// The shared resource.
    pub resource: ResourceKey,
    /// The user receiving access.
    pub grantee_id: UserId,
    /// The grantee's normalized email.
    pub grantee_email: String,
    /// Granted permission.
    pub permission: SharePermission,
    /// The owner creating the grant.
    pub shared_by: UserId,
}
