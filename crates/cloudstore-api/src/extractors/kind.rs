//! Type-level `{kind}` path segment, so one generic handler serves both
//! `/files/...` and `/folders/...`.

use uuid::Uuid;

use cloudstore_entity::resource::{ResourceKey, ResourceType};

/// A resource kind fixed at route registration.
pub trait ResourceKind: Send + Sync + 'static {
    /// The resource type the routes address.
    const TYPE: ResourceType;

    /// Key for the `{id}` path segment.
    fn key(id: Uuid) -> ResourceKey {
        ResourceKey::new(Self::TYPE, id)
    }
}

/// Routes under `/files`.
#[derive(Debug, Clone, Copy)]
pub struct FileKind;

impl ResourceKind for FileKind {
    const TYPE: ResourceType = ResourceType::File;
}

/// Routes under `/folders`.
#[derive(Debug, Clone, Copy)]
pub struct FolderKind;

impl ResourceKind for FolderKind {
    const TYPE: ResourceType = ResourceType::Folder;
}
