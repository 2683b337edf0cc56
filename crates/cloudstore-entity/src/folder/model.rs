//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cloudstore_core::types::{FolderId, UserId};

/// A folder in a user's drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// The creator; never changes.
    pub owner_id: UserId,
    /// Parent folder ID (null for root-level folders).
    pub parent_id: Option<FolderId>,
    /// Starred by the owner.
    pub is_starred: bool,
    /// Whether the folder is in trash.
    pub is_deleted: bool,
    /// When the folder was moved to trash.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Who moved the folder to trash.
    pub deleted_by: Option<UserId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// The creator, who becomes the owner.
    pub owner_id: UserId,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
}
