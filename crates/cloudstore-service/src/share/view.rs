//! Response shapes for sharing operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cloudstore_entity::file::File;
use cloudstore_entity::folder::Folder;
use cloudstore_entity::resource::{Resource, ResourceType};
use cloudstore_entity::share::SharePermission;

use crate::user::UserSummary;

/// A public link as shown to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    /// Resource type.
    pub resource_type: ResourceType,
    /// Resource ID.
    pub resource_id: Uuid,
    /// Bearer token.
    pub token: String,
    /// Full share URL for the front-end.
    pub url: String,
    /// Permission for link holders.
    pub permission: SharePermission,
    /// Expiry, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Successful anonymous resolutions so far.
    pub access_count: i64,
    /// When the link was issued.
    pub created_at: DateTime<Utc>,
}

/// A resource someone shared with the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedWithMeEntry {
    /// The resource; `isStarred` carries the grantee's own star.
    #[serde(flatten)]
    pub resource: Resource,
    /// Granted permission.
    pub permission: SharePermission,
    /// The owner who shared it.
    pub shared_by: Option<UserSummary>,
    /// When it was shared.
    pub shared_at: DateTime<Utc>,
}

/// One of the caller's resources that has grants or a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedByMeEntry {
    /// The resource.
    #[serde(flatten)]
    pub resource: Resource,
    /// Number of users with a grant.
    pub shared_with_count: usize,
    /// Whether a public link exists.
    pub has_public_link: bool,
    /// The link, if any.
    pub public_link: Option<LinkView>,
}

/// What "remove all access" did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveAllOutcome {
    /// Grants deleted.
    pub grants_removed: u64,
    /// Whether a link was deleted.
    pub link_removed: bool,
    /// Rows moved to trash.
    pub trashed: u64,
}

/// A subfolder in an anonymous folder view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubfolderEntry {
    /// The subfolder.
    #[serde(flatten)]
    pub folder: Folder,
    /// Number of items visible inside it.
    pub item_count: usize,
}

/// What an anonymous link holder sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicShareView {
    /// The shared file or folder (or the subfolder descended into).
    pub resource: Resource,
    /// Permission carried by the link.
    pub permission: SharePermission,
    /// The link owner.
    pub shared_by: Option<UserSummary>,
    /// Link expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Files directly inside, for folder views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<File>>,
    /// Subfolders directly inside, for folder views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfolders: Option<Vec<SubfolderEntry>>,
    /// Total visible items, for folder views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
}
