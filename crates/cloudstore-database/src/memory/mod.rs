//! In-process store backend.
//!
//! One [`MemoryStore`] implements every store trait over a single
//! `RwLock`-guarded state, so each trait method runs as one atomic
//! critical section. Used by the `memory` database driver and by tests.

mod resource;
mod share;
mod user;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;

use cloudstore_core::types::{FileId, FolderId, GrantId, LinkId, UserId};
use cloudstore_entity::file::File;
use cloudstore_entity::folder::Folder;
use cloudstore_entity::resource::{Resource, ResourceKey, ResourceType};
use cloudstore_entity::share::{AccessGrant, PublicLink};
use cloudstore_entity::user::User;

/// Tables held by the memory backend.
#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    files: HashMap<FileId, File>,
    folders: HashMap<FolderId, Folder>,
    grants: HashMap<GrantId, AccessGrant>,
    links: HashMap<LinkId, PublicLink>,
}

impl MemoryState {
    fn resource(&self, key: ResourceKey) -> Option<Resource> {
        match key.resource_type {
            ResourceType::File => self
                .files
                .get(&FileId::from_uuid(key.resource_id))
                .cloned()
                .map(Resource::File),
            ResourceType::Folder => self
                .folders
                .get(&FolderId::from_uuid(key.resource_id))
                .cloned()
                .map(Resource::Folder),
        }
    }

    /// The folder and all folders below it, breadth-first.
    fn subtree_folders(&self, root: FolderId) -> Vec<FolderId> {
        let mut seen = HashSet::from([root]);
        let mut order = vec![root];
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for folder in self.folders.values() {
                if folder.parent_id == Some(current) && seen.insert(folder.id) {
                    order.push(folder.id);
                    queue.push_back(folder.id);
                }
            }
        }
        order
    }

    /// Whether `candidate` is `start` or one of its ancestors.
    fn chain_contains(&self, start: FolderId, candidate: FolderId) -> bool {
        let mut current = Some(start);
        let mut steps = 0;
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            steps += 1;
            if steps > crate::store::MAX_ANCESTRY_DEPTH {
                return false;
            }
            current = self.folders.get(&id).and_then(|f| f.parent_id);
        }
        false
    }

    fn has_children(&self, folder_id: FolderId) -> bool {
        self.folders
            .values()
            .any(|f| f.parent_id == Some(folder_id))
            || self.files.values().any(|f| f.folder_id == Some(folder_id))
    }

    fn drop_sharing(&mut self, key: ResourceKey) {
        self.grants.retain(|_, g| g.resource_key() != key);
        self.links.retain(|_, l| l.resource_key() != key);
    }
}

/// In-memory implementation of all store traits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort helper shared by listing methods: folders first, then by name.
fn sort_listing(items: &mut [Resource]) {
    items.sort_by(|a, b| {
        let rank = |r: &Resource| match r {
            Resource::Folder(_) => 0,
            Resource::File(_) => 1,
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.name().cmp(b.name()))
    });
}
