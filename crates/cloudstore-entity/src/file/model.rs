//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cloudstore_core::types::{FileId, FolderId, UserId};

/// Metadata for an uploaded file. Content bytes live outside this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// File name including extension.
    pub name: String,
    /// The uploader; never changes.
    pub owner_id: UserId,
    /// Containing folder (null for root-level files).
    pub folder_id: Option<FolderId>,
    /// Size in bytes.
    pub size: i64,
    /// MIME type reported at upload.
    pub mime_type: String,
    /// Starred by the owner.
    pub is_starred: bool,
    /// Whether the file is in trash.
    pub is_deleted: bool,
    /// When the file was moved to trash.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Who moved the file to trash.
    pub deleted_by: Option<UserId>,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// File name.
    pub name: String,
    /// The uploader, who becomes the owner.
    pub owner_id: UserId,
    /// Containing folder.
    pub folder_id: Option<FolderId>,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
}
