//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use cloudstore_core::error::AppError;
use cloudstore_core::types::{FileId, FolderId};
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::SharePermission;
use cloudstore_service::drive::NewFile;
use cloudstore_service::share::ShareRequest;

/// Runs `validator` rules and maps failures to a validation error.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

/// Share with a registered user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShareBody {
    /// Grantee email.
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,
    /// `view` or `edit`.
    pub permission: SharePermission,
    /// Whether to notify the grantee.
    #[serde(default)]
    pub send_email: bool,
    /// Optional note for the notification.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

impl From<ShareBody> for ShareRequest {
    fn from(body: ShareBody) -> Self {
        Self {
            email: body.email,
            permission: body.permission,
            send_email: body.send_email,
            message: body.message,
        }
    }
}

/// Change a grant's permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGrantRequest {
    /// New permission.
    pub permission: SharePermission,
}

/// Issue or replace a public link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Permission for link holders.
    #[serde(default = "default_link_permission")]
    pub permission: SharePermission,
    /// Lifetime in days; absent or 0 means no expiry.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

fn default_link_permission() -> SharePermission {
    SharePermission::View
}

/// Create a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Parent folder; root when absent.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// Register an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    /// File name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Containing folder; root when absent.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Size in bytes.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub size: i64,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl From<CreateFileRequest> for NewFile {
    fn from(req: CreateFileRequest) -> Self {
        Self {
            name: req.name,
            folder_id: req.folder_id,
            size: req.size,
            mime_type: req.mime_type,
        }
    }
}

/// Rename a file or folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Move several items at once.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemsRequest {
    /// Items to move.
    #[validate(length(min = 1, max = 1000, message = "Select at least one item"))]
    pub items: Vec<ResourceKey>,
    /// Destination; root when absent.
    #[serde(default)]
    pub target_folder_id: Option<FolderId>,
}

/// `?fileId=` on public downloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
    /// File inside a linked folder.
    #[serde(default)]
    pub file_id: Option<FileId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_request_defaults() {
        let req: CreateLinkRequest = serde_json::from_str("{}").expect("parse");
        assert_eq!(req.permission, SharePermission::View);
        assert!(req.expires_in.is_none());

        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"permission":"edit","expiresIn":7}"#).expect("parse");
        assert_eq!(req.expires_in, Some(7));
    }

    #[test]
    fn test_move_requires_items() {
        let req = MoveItemsRequest {
            items: Vec::new(),
            target_folder_id: None,
        };
        assert!(validate_body(&req).is_err());
    }
}
