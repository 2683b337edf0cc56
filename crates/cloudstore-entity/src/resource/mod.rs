//! The `Resource = File | Folder` sum type and its addressing key.

pub mod kind;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cloudstore_core::types::{FileId, FolderId, UserId};

use crate::file::File;
use crate::folder::Folder;

pub use kind::{ResourceKey, ResourceType};

/// A file or a folder, discriminated by a `type` field on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resource {
    /// A file.
    File(File),
    /// A folder.
    Folder(Folder),
}

impl Resource {
    /// The resource type discriminant.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::File(_) => ResourceType::File,
            Self::Folder(_) => ResourceType::Folder,
        }
    }

    /// The raw identifier.
    pub fn id(&self) -> Uuid {
        match self {
            Self::File(f) => f.id.0,
            Self::Folder(f) => f.id.0,
        }
    }

    /// The `(type, id)` key used by grant and link stores.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.resource_type(), self.id())
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => &f.name,
            Self::Folder(f) => &f.name,
        }
    }

    /// The owner (creator).
    pub fn owner_id(&self) -> UserId {
        match self {
            Self::File(f) => f.owner_id,
            Self::Folder(f) => f.owner_id,
        }
    }

    /// The containing folder, if any.
    pub fn parent_id(&self) -> Option<FolderId> {
        match self {
            Self::File(f) => f.folder_id,
            Self::Folder(f) => f.parent_id,
        }
    }

    /// Whether the resource itself is flagged as trashed.
    pub fn is_deleted(&self) -> bool {
        match self {
            Self::File(f) => f.is_deleted,
            Self::Folder(f) => f.is_deleted,
        }
    }

    /// Whether the resource carries a star.
    pub fn is_starred(&self) -> bool {
        match self {
            Self::File(f) => f.is_starred,
            Self::Folder(f) => f.is_starred,
        }
    }

    /// Replace the star, e.g. with a grantee's own star for display.
    pub fn set_starred(&mut self, starred: bool) {
        match self {
            Self::File(f) => f.is_starred = starred,
            Self::Folder(f) => f.is_starred = starred,
        }
    }

    /// When the resource was trashed.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::File(f) => f.deleted_at,
            Self::Folder(f) => f.deleted_at,
        }
    }

    /// Return the file, if this is one.
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Self::File(f) => Some(f),
            Self::Folder(_) => None,
        }
    }

    /// Return the folder, if this is one.
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(f) => Some(f),
            Self::File(_) => None,
        }
    }

    /// Return the file ID, if this is a file.
    pub fn file_id(&self) -> Option<FileId> {
        self.as_file().map(|f| f.id)
    }

    /// Return the folder ID, if this is a folder.
    pub fn folder_id(&self) -> Option<FolderId> {
        self.as_folder().map(|f| f.id)
    }
}

impl From<File> for Resource {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

impl From<Folder> for Resource {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}
