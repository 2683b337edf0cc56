//! Public share link entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cloudstore_core::types::{LinkId, UserId};

use super::permission::SharePermission;
use crate::resource::{ResourceKey, ResourceType};

/// A bearer-token link granting anonymous access to one resource.
///
/// At most one exists per resource; issuing a new one replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicLink {
    /// Unique link identifier.
    pub id: LinkId,
    /// Type of the linked resource.
    pub resource_type: ResourceType,
    /// ID of the linked resource.
    pub resource_id: Uuid,
    /// Opaque URL-safe token; the sole credential.
    pub token: String,
    /// Permission granted to link holders.
    pub permission: SharePermission,
    /// When the link stops resolving (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Number of successful anonymous resolutions.
    pub access_count: i64,
    /// The owner who issued the link.
    pub created_by: UserId,
    /// When the link was issued.
    pub created_at: DateTime<Utc>,
}

impl PublicLink {
    /// The key of the linked resource.
    pub fn resource_key(&self) -> ResourceKey {
        ResourceKey::new(self.resource_type, self.resource_id)
    }

    /// Check whether the link is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

/// Data required to issue a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLink {
    /// The linked resource.
    pub resource: ResourceKey,
    /// Generated token.
    pub token: String,
    /// Permission for link holders.
    pub permission: SharePermission,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// The issuing owner.
    pub created_by: UserId,
}
