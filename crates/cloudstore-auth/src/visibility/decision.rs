//! Outcome of a visibility check.

use serde::{Deserialize, Serialize};

use cloudstore_core::error::AppError;
use cloudstore_core::result::AppResult;
use cloudstore_entity::resource::Resource;
use cloudstore_entity::share::AccessLevel;

/// Whether a check is made on behalf of a live operation or a trash one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Normal operations; trashed resources are unreachable.
    Active,
    /// Restore and purge; the owner may reach trashed resources.
    Trash,
}

/// Where an access decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessSource {
    /// The actor created the resource.
    Owner,
    /// A grant on the resource itself.
    DirectGrant,
    /// A grant on an ancestor folder with the same owner.
    InheritedGrant,
    /// A public link token.
    PublicLink,
    /// The resource or an ancestor is in trash.
    Trashed,
    /// No applicable permission found.
    Denied,
}

/// Result of resolving an actor's access to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    /// Whether any access is granted.
    pub allowed: bool,
    /// The effective level when allowed.
    pub permission: Option<AccessLevel>,
    /// Why.
    pub source: AccessSource,
}

impl AccessDecision {
    /// An allowing decision.
    pub fn allow(level: AccessLevel, source: AccessSource) -> Self {
        Self {
            allowed: true,
            permission: Some(level),
            source,
        }
    }

    /// A denying decision.
    pub fn deny(source: AccessSource) -> Self {
        Self {
            allowed: false,
            permission: None,
            source,
        }
    }

    /// Turn the decision into the effective level, or the error the caller
    /// should see when it does not reach `required`.
    ///
    /// Trashed resources surface as not found so their existence does not leak.
    pub fn require(&self, required: AccessLevel, resource: &Resource) -> AppResult<AccessLevel> {
        match (self.permission, self.source) {
            (_, AccessSource::Trashed) => Err(AppError::not_found(format!(
                "{} not found",
                capitalize(resource.resource_type().as_str())
            ))),
            (Some(level), _) if level.satisfies(required) => Ok(level),
            (Some(_), _) if required.is_owner() => Err(AppError::not_owner(format!(
                "this {}",
                resource.resource_type()
            ))),
            (Some(_), _) => Err(AppError::permission_denied(format!(
                "This action requires {required} access to the {}",
                resource.resource_type()
            ))),
            (None, _) => Err(AppError::permission_denied(format!(
                "You do not have access to this {}",
                resource.resource_type()
            ))),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
