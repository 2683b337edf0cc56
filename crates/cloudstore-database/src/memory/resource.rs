use async_trait::async_trait;
use chrono::{DateTime, Utc};

use cloudstore_core::error::AppError;
use cloudstore_core::result::AppResult;
use cloudstore_core::types::{FileId, FolderId, UserId};
use cloudstore_entity::file::{CreateFile, File};
use cloudstore_entity::folder::{CreateFolder, Folder};
use cloudstore_entity::resource::{Resource, ResourceKey, ResourceType};

use super::{MemoryStore, sort_listing};
use crate::store::{MAX_ANCESTRY_DEPTH, ResourceStore};

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn create_file(&self, data: &CreateFile) -> AppResult<File> {
        let now = Utc::now();
        let file = File {
            id: FileId::new(),
            name: data.name.clone(),
            owner_id: data.owner_id,
            folder_id: data.folder_id,
            size: data.size,
            mime_type: data.mime_type.clone(),
            is_starred: false,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            name: data.name.clone(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            is_starred: false,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
        };
        self.state
            .write()
            .await
            .folders
            .insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn rename(&self, key: ResourceKey, name: &str) -> AppResult<Option<Resource>> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        match key.resource_type {
            ResourceType::File => {
                if let Some(file) = state.files.get_mut(&FileId::from_uuid(key.resource_id)) {
                    file.name = name.to_string();
                    file.updated_at = now;
                }
            }
            ResourceType::Folder => {
                if let Some(folder) = state
                    .folders
                    .get_mut(&FolderId::from_uuid(key.resource_id))
                {
                    folder.name = name.to_string();
                    folder.updated_at = now;
                }
            }
        }
        Ok(state.resource(key))
    }

    async fn set_parent(
        &self,
        key: ResourceKey,
        parent_id: Option<FolderId>,
    ) -> AppResult<Option<Resource>> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        match key.resource_type {
            ResourceType::File => {
                if let Some(file) = state.files.get_mut(&FileId::from_uuid(key.resource_id)) {
                    file.folder_id = parent_id;
                    file.updated_at = now;
                }
            }
            ResourceType::Folder => {
                let id = FolderId::from_uuid(key.resource_id);
                if let Some(target) = parent_id
                    && state.chain_contains(target, id)
                {
                    return Err(AppError::validation(
                        "Cannot move a folder into itself or one of its subfolders",
                    ));
                }
                if let Some(folder) = state.folders.get_mut(&id) {
                    folder.parent_id = parent_id;
                    folder.updated_at = now;
                }
            }
        }
        Ok(state.resource(key))
    }

    async fn list_children(&self, folder_id: FolderId) -> AppResult<Vec<Resource>> {
        let state = self.state.read().await;
        let mut items: Vec<Resource> = state
            .folders
            .values()
            .filter(|f| f.parent_id == Some(folder_id) && !f.is_deleted)
            .cloned()
            .map(Resource::Folder)
            .chain(
                state
                    .files
                    .values()
                    .filter(|f| f.folder_id == Some(folder_id) && !f.is_deleted)
                    .cloned()
                    .map(Resource::File),
            )
            .collect();
        sort_listing(&mut items);
        Ok(items)
    }

    async fn list_root(&self, owner_id: UserId) -> AppResult<Vec<Resource>> {
        let state = self.state.read().await;
        let mut items: Vec<Resource> = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && f.parent_id.is_none() && !f.is_deleted)
            .cloned()
            .map(Resource::Folder)
            .chain(
                state
                    .files
                    .values()
                    .filter(|f| f.owner_id == owner_id && f.folder_id.is_none() && !f.is_deleted)
                    .cloned()
                    .map(Resource::File),
            )
            .collect();
        sort_listing(&mut items);
        Ok(items)
    }

    async fn set_starred(&self, key: ResourceKey, starred: bool) -> AppResult<Option<Resource>> {
        let mut state = self.state.write().await;
        match key.resource_type {
            ResourceType::File => {
                if let Some(file) = state.files.get_mut(&FileId::from_uuid(key.resource_id)) {
                    file.is_starred = starred;
                }
            }
            ResourceType::Folder => {
                if let Some(folder) = state
                    .folders
                    .get_mut(&FolderId::from_uuid(key.resource_id))
                {
                    folder.is_starred = starred;
                }
            }
        }
        Ok(state.resource(key))
    }

    async fn list_starred(&self, owner_id: UserId) -> AppResult<Vec<Resource>> {
        let state = self.state.read().await;
        let mut items: Vec<Resource> = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && f.is_starred && !f.is_deleted)
            .cloned()
            .map(Resource::Folder)
            .chain(
                state
                    .files
                    .values()
                    .filter(|f| f.owner_id == owner_id && f.is_starred && !f.is_deleted)
                    .cloned()
                    .map(Resource::File),
            )
            .collect();
        sort_listing(&mut items);
        Ok(items)
    }

    async fn count_children(&self, folder_id: FolderId) -> AppResult<u64> {
        let state = self.state.read().await;
        let folders = state
            .folders
            .values()
            .filter(|f| f.parent_id == Some(folder_id))
            .count();
        let files = state
            .files
            .values()
            .filter(|f| f.folder_id == Some(folder_id))
            .count();
        Ok((folders + files) as u64)
    }

    async fn ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let mut chain = Vec::new();
        let mut current = Some(folder_id);
        while let Some(id) = current {
            if chain.len() >= MAX_ANCESTRY_DEPTH {
                break;
            }
            let Some(folder) = state.folders.get(&id) else {
                break;
            };
            current = folder.parent_id;
            chain.push(folder.clone());
        }
        Ok(chain)
    }

    async fn trash(
        &self,
        key: ResourceKey,
        deleted_by: UserId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut flagged = 0;

        match key.resource_type {
            ResourceType::File => {
                if let Some(file) = state.files.get_mut(&FileId::from_uuid(key.resource_id))
                    && !file.is_deleted
                {
                    file.is_deleted = true;
                    file.deleted_at = Some(deleted_at);
                    file.deleted_by = Some(deleted_by);
                    file.updated_at = deleted_at;
                    flagged += 1;
                }
            }
            ResourceType::Folder => {
                let subtree = state.subtree_folders(FolderId::from_uuid(key.resource_id));
                for id in &subtree {
                    if let Some(folder) = state.folders.get_mut(id)
                        && !folder.is_deleted
                    {
                        folder.is_deleted = true;
                        folder.deleted_at = Some(deleted_at);
                        folder.deleted_by = Some(deleted_by);
                        folder.updated_at = deleted_at;
                        flagged += 1;
                    }
                }
                for file in state.files.values_mut() {
                    let inside = file.folder_id.is_some_and(|f| subtree.contains(&f));
                    if inside && !file.is_deleted {
                        file.is_deleted = true;
                        file.deleted_at = Some(deleted_at);
                        file.deleted_by = Some(deleted_by);
                        file.updated_at = deleted_at;
                        flagged += 1;
                    }
                }
            }
        }
        Ok(flagged)
    }

    async fn restore(&self, key: ResourceKey) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let Some(stamp) = state.resource(key).and_then(|r| r.deleted_at()) else {
            return Ok(0);
        };
        let now = Utc::now();
        let mut restored = 0;

        let (folders, files) = match key.resource_type {
            ResourceType::File => (Vec::new(), vec![FileId::from_uuid(key.resource_id)]),
            ResourceType::Folder => {
                let folders = state.subtree_folders(FolderId::from_uuid(key.resource_id));
                let files = state
                    .files
                    .values()
                    .filter(|f| f.folder_id.is_some_and(|p| folders.contains(&p)))
                    .map(|f| f.id)
                    .collect();
                (folders, files)
            }
        };

        for id in folders {
            if let Some(folder) = state.folders.get_mut(&id)
                && folder.deleted_at == Some(stamp)
            {
                folder.is_deleted = false;
                folder.deleted_at = None;
                folder.deleted_by = None;
                folder.updated_at = now;
                restored += 1;
            }
        }
        for id in files {
            if let Some(file) = state.files.get_mut(&id)
                && file.deleted_at == Some(stamp)
            {
                file.is_deleted = false;
                file.deleted_at = None;
                file.deleted_by = None;
                file.updated_at = now;
                restored += 1;
            }
        }
        Ok(restored)
    }

    async fn purge(&self, key: ResourceKey) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let removed = match key.resource_type {
            ResourceType::File => state
                .files
                .remove(&FileId::from_uuid(key.resource_id))
                .is_some(),
            ResourceType::Folder => {
                let id = FolderId::from_uuid(key.resource_id);
                if state.has_children(id) {
                    return Err(AppError::not_empty(
                        "Folder still contains items; purge them first",
                    ));
                }
                state.folders.remove(&id).is_some()
            }
        };
        if removed {
            state.drop_sharing(key);
        }
        Ok(removed)
    }

    async fn list_trash(&self, owner_id: UserId) -> AppResult<Vec<Resource>> {
        let state = self.state.read().await;
        let cascaded = |parent: Option<FolderId>, at: Option<DateTime<Utc>>| {
            parent
                .and_then(|id| state.folders.get(&id))
                .is_some_and(|p| p.is_deleted && p.deleted_at == at)
        };
        let mut items: Vec<Resource> = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && f.is_deleted)
            .filter(|f| !cascaded(f.parent_id, f.deleted_at))
            .cloned()
            .map(Resource::Folder)
            .chain(
                state
                    .files
                    .values()
                    .filter(|f| f.owner_id == owner_id && f.is_deleted)
                    .filter(|f| !cascaded(f.folder_id, f.deleted_at))
                    .cloned()
                    .map(Resource::File),
            )
            .collect();
        items.sort_by(|a, b| b.deleted_at().cmp(&a.deleted_at()));
        Ok(items)
    }

    async fn list_cascade(
        &self,
        folder_id: FolderId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<Vec<Resource>> {
        let state = self.state.read().await;
        let subtree = state.subtree_folders(folder_id);
        let stamped = |at: Option<DateTime<Utc>>| at == Some(deleted_at);
        let items: Vec<Resource> = subtree
            .iter()
            .filter(|id| **id != folder_id)
            .filter_map(|id| state.folders.get(id))
            .filter(|f| f.is_deleted && stamped(f.deleted_at))
            .cloned()
            .map(Resource::Folder)
            .chain(
                state
                    .files
                    .values()
                    .filter(|f| f.folder_id.is_some_and(|p| subtree.contains(&p)))
                    .filter(|f| f.is_deleted && stamped(f.deleted_at))
                    .cloned()
                    .map(Resource::File),
            )
            .collect();
        Ok(items)
    }

    async fn list_trashed_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Resource>> {
        let state = self.state.read().await;
        let expired = |at: Option<DateTime<Utc>>| at.is_some_and(|t| t < cutoff);
        let mut items: Vec<Resource> = state
            .folders
            .values()
            .filter(|f| f.is_deleted && expired(f.deleted_at))
            .cloned()
            .map(Resource::Folder)
            .chain(
                state
                    .files
                    .values()
                    .filter(|f| f.is_deleted && expired(f.deleted_at))
                    .cloned()
                    .map(Resource::File),
            )
            .collect();
        items.sort_by_key(|r| r.deleted_at());
        Ok(items)
    }
}
