use std::sync::Arc;

use async_trait::async_trait;

use crate::entity::{Entity, EntityKey, KeyField};
use crate::error::StoreError;
use crate::pagination::PageRequest;

/// A keyed store of entities. Keys are unique within a repository.
#[async_trait]
pub trait IdRepository<T: Entity, K: EntityKey>: Send + Sync {
    fn key_field(&self) -> &KeyField<T, K>;

    fn key_of(&self, entity: &T) -> K {
        self.key_field().get(entity)
    }

    /// Store a new entity. Fails with [`StoreError::Conflict`] if its key is taken.
    async fn insert(&self, entity: &T) -> Result<K, StoreError>;

    /// Insert or replace. Returns `true` if the entity was created.
    async fn put(&self, entity: &T) -> Result<bool, StoreError>;

    async fn get(&self, key: &K) -> Result<Option<T>, StoreError>;

    /// Returns `true` if an entity was removed.
    async fn delete(&self, key: &K) -> Result<bool, StoreError>;

    /// One page of entities in ascending key order.
    async fn list(&self, page: PageRequest) -> Result<Vec<T>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Remove every entity. Returns how many were removed.
    async fn clear(&self) -> Result<u64, StoreError>;
}

pub type SharedRepository<T, K> = Arc<dyn IdRepository<T, K>>;
