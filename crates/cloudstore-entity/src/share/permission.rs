//! Share permissions and effective access levels.

use serde::{Deserialize, Serialize};

/// Permission carried by a grant or a public link. `Edit` implies `View`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    /// Read and download.
    View,
    /// Read, download, create, rename, move, and trash.
    Edit,
}

impl SharePermission {
    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl std::fmt::Display for SharePermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SharePermission {
    type Err = cloudstore_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            _ => Err(cloudstore_core::AppError::validation(format!(
                "Invalid permission: '{s}' (expected 'view' or 'edit')"
            ))),
        }
    }
}

/// Effective access an actor holds on a resource.
///
/// Ordered so that `Owner > Edit > View`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Read-only.
    View,
    /// Read and mutate contents.
    Edit,
    /// Full control, including sharing administration.
    Owner,
}

impl AccessLevel {
    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Owner => "owner",
        }
    }

    /// Whether this level may mutate the resource or its contents.
    pub fn can_edit(&self) -> bool {
        *self >= Self::Edit
    }

    /// Whether this level may administer sharing.
    pub fn is_owner(&self) -> bool {
        *self == Self::Owner
    }

    /// Whether this level satisfies `required`.
    pub fn satisfies(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl From<SharePermission> for AccessLevel {
    fn from(permission: SharePermission) -> Self {
        match permission {
            SharePermission::View => Self::View,
            SharePermission::Edit => Self::Edit,
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
