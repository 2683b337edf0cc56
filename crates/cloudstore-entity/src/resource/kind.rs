//! Resource type discriminant and the `(type, id)` key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cloudstore_core::types::{FileId, FolderId};

/// Which table a shared resource lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A file resource.
    File,
    /// A folder resource.
    Folder,
}

impl ResourceType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = cloudstore_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "files" => Ok(Self::File),
            "folder" | "folders" => Ok(Self::Folder),
            _ => Err(cloudstore_core::AppError::validation(format!(
                "Invalid resource type: '{s}'"
            ))),
        }
    }
}

/// Addresses a file or folder for grant and link lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceKey {
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Resource ID.
    #[serde(rename = "id")]
    pub resource_id: Uuid,
}

impl ResourceKey {
    /// Create a key.
    pub fn new(resource_type: ResourceType, resource_id: Uuid) -> Self {
        Self {
            resource_type,
            resource_id,
        }
    }

    /// Key for a file.
    pub fn file(id: FileId) -> Self {
        Self::new(ResourceType::File, id.0)
    }

    /// Key for a folder.
    pub fn folder(id: FolderId) -> Self {
        Self::new(ResourceType::Folder, id.0)
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.resource_type, self.resource_id)
    }
}
