use async_trait::async_trait;
use chrono::Utc;

use cloudstore_core::error::AppError;
use cloudstore_core::result::AppResult;
use cloudstore_core::types::{GrantId, LinkId, UserId};
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::{AccessGrant, CreateGrant, CreateLink, PublicLink, SharePermission};

use super::MemoryStore;
use crate::store::{GrantStore, LinkStore};

#[async_trait]
impl GrantStore for MemoryStore {
    async fn create(&self, data: &CreateGrant) -> AppResult<AccessGrant> {
        let mut state = self.state.write().await;
        let exists = state
            .grants
            .values()
            .any(|g| g.resource_key() == data.resource && g.grantee_id == data.grantee_id);
        if exists {
            return Err(AppError::already_granted(&data.grantee_email));
        }

        let now = Utc::now();
        let grant = AccessGrant {
            id: GrantId::new(),
            resource_type: data.resource.resource_type,
            resource_id: data.resource.resource_id,
            grantee_id: data.grantee_id,
            grantee_email: data.grantee_email.clone(),
            permission: data.permission,
            shared_by: data.shared_by,
            is_starred: false,
            created_at: now,
            updated_at: now,
        };
        state.grants.insert(grant.id, grant.clone());
        Ok(grant)
    }

    async fn find_by_id(&self, id: GrantId) -> AppResult<Option<AccessGrant>> {
        Ok(self.state.read().await.grants.get(&id).cloned())
    }

    async fn find_for_grantee(
        &self,
        resource: ResourceKey,
        grantee_id: UserId,
    ) -> AppResult<Option<AccessGrant>> {
        let state = self.state.read().await;
        Ok(state
            .grants
            .values()
            .find(|g| g.resource_key() == resource && g.grantee_id == grantee_id)
            .cloned())
    }

    async fn list_for_resource(&self, resource: ResourceKey) -> AppResult<Vec<AccessGrant>> {
        let state = self.state.read().await;
        let mut grants: Vec<_> = state
            .grants
            .values()
            .filter(|g| g.resource_key() == resource)
            .cloned()
            .collect();
        grants.sort_by_key(|g| (g.created_at, g.id));
        Ok(grants)
    }

    async fn list_for_grantee(&self, grantee_id: UserId) -> AppResult<Vec<AccessGrant>> {
        let state = self.state.read().await;
        let mut grants: Vec<_> = state
            .grants
            .values()
            .filter(|g| g.grantee_id == grantee_id)
            .cloned()
            .collect();
        grants.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(grants)
    }

    async fn list_by_sharer(&self, shared_by: UserId) -> AppResult<Vec<AccessGrant>> {
        let state = self.state.read().await;
        let mut grants: Vec<_> = state
            .grants
            .values()
            .filter(|g| g.shared_by == shared_by)
            .cloned()
            .collect();
        grants.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(grants)
    }

    async fn update_permission(
        &self,
        id: GrantId,
        permission: SharePermission,
    ) -> AppResult<Option<AccessGrant>> {
        let mut state = self.state.write().await;
        Ok(state.grants.get_mut(&id).map(|grant| {
            grant.permission = permission;
            grant.updated_at = Utc::now();
            grant.clone()
        }))
    }

    async fn set_starred(&self, id: GrantId, starred: bool) -> AppResult<Option<AccessGrant>> {
        let mut state = self.state.write().await;
        Ok(state.grants.get_mut(&id).map(|grant| {
            grant.is_starred = starred;
            grant.clone()
        }))
    }

    async fn delete(&self, id: GrantId) -> AppResult<bool> {
        Ok(self.state.write().await.grants.remove(&id).is_some())
    }

    async fn delete_for_resource(&self, resource: ResourceKey) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.grants.len();
        state.grants.retain(|_, g| g.resource_key() != resource);
        Ok((before - state.grants.len()) as u64)
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn replace(&self, data: &CreateLink) -> AppResult<PublicLink> {
        let mut state = self.state.write().await;
        state.links.retain(|_, l| l.resource_key() != data.resource);
        if state.links.values().any(|l| l.token == data.token) {
            return Err(AppError::conflict("Share token collision; retry"));
        }

        let link = PublicLink {
            id: LinkId::new(),
            resource_type: data.resource.resource_type,
            resource_id: data.resource.resource_id,
            token: data.token.clone(),
            permission: data.permission,
            expires_at: data.expires_at,
            access_count: 0,
            created_by: data.created_by,
            created_at: Utc::now(),
        };
        state.links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn find_for_resource(&self, resource: ResourceKey) -> AppResult<Option<PublicLink>> {
        let state = self.state.read().await;
        Ok(state
            .links
            .values()
            .find(|l| l.resource_key() == resource)
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<PublicLink>> {
        let state = self.state.read().await;
        Ok(state.links.values().find(|l| l.token == token).cloned())
    }

    async fn list_by_creator(&self, created_by: UserId) -> AppResult<Vec<PublicLink>> {
        let state = self.state.read().await;
        let mut links: Vec<_> = state
            .links
            .values()
            .filter(|l| l.created_by == created_by)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn record_access(&self, id: LinkId) -> AppResult<()> {
        if let Some(link) = self.state.write().await.links.get_mut(&id) {
            link.access_count += 1;
        }
        Ok(())
    }

    async fn delete_for_resource(&self, resource: ResourceKey) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.links.len();
        state.links.retain(|_, l| l.resource_key() != resource);
        Ok(state.links.len() < before)
    }
}
