//! Response shapes for drive operations.

use serde::{Deserialize, Serialize};

use cloudstore_core::types::FileId;
use cloudstore_entity::file::File;
use cloudstore_entity::folder::Folder;
use cloudstore_entity::resource::Resource;
use cloudstore_entity::share::AccessLevel;

/// A resource together with the caller's effective level on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceView {
    /// The resource, with its `type` discriminant inlined.
    #[serde(flatten)]
    pub resource: Resource,
    /// Effective access level.
    pub permission: AccessLevel,
}

/// A folder listing filtered for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderContents {
    /// The folder itself.
    pub folder: Folder,
    /// Effective access level on the folder.
    pub permission: AccessLevel,
    /// Visible, non-trashed children; folders first.
    pub items: Vec<Resource>,
}

/// Authorization to fetch a file's bytes from the content store.
///
/// Content streaming lives outside this service; the descriptor carries
/// what a download proxy needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDescriptor {
    /// The file.
    pub file_id: FileId,
    /// File name for `Content-Disposition`.
    pub file_name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
}

impl From<&File> for DownloadDescriptor {
    fn from(file: &File) -> Self {
        Self {
            file_id: file.id,
            file_name: file.name.clone(),
            size: file.size,
            mime_type: file.mime_type.clone(),
        }
    }
}
