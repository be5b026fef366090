use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::entity::{Entity, EntityKey, KeyField};
use crate::error::StoreError;
use crate::pagination::PageRequest;
use crate::repository::IdRepository;

/// In-process repository. Clones share the same map.
pub struct MemoryIdRepository<T, K> {
    key: KeyField<T, K>,
    entries: Arc<RwLock<BTreeMap<K, T>>>,
}

impl<T: Entity, K: EntityKey> MemoryIdRepository<T, K> {
    pub fn new(key: KeyField<T, K>) -> Self {
        Self {
            key,
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn with_entries(key: KeyField<T, K>, entities: impl IntoIterator<Item = T>) -> Self {
        let entries = entities
            .into_iter()
            .map(|entity| (key.get(&entity), entity))
            .collect();
        Self {
            key,
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    // Poisoning is ignored: no write leaves the map half-updated.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<K, T>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<K, T>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T, K> Clone for MemoryIdRepository<T, K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            entries: Arc::clone(&self.entries),
        }
    }
}

#[async_trait]
impl<T: Entity, K: EntityKey> IdRepository<T, K> for MemoryIdRepository<T, K> {
    fn key_field(&self) -> &KeyField<T, K> {
        &self.key
    }

    async fn insert(&self, entity: &T) -> Result<K, StoreError> {
        let key = self.key.get(entity);
        let mut entries = self.write();
        if entries.contains_key(&key) {
            return Err(StoreError::Conflict(key.to_string()));
        }
        entries.insert(key.clone(), entity.clone());
        Ok(key)
    }

    async fn put(&self, entity: &T) -> Result<bool, StoreError> {
        let key = self.key.get(entity);
        Ok(self.write().insert(key, entity.clone()).is_none())
    }

    async fn get(&self, key: &K) -> Result<Option<T>, StoreError> {
        Ok(self.read().get(key).cloned())
    }

    async fn delete(&self, key: &K) -> Result<bool, StoreError> {
        Ok(self.write().remove(key).is_some())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<T>, StoreError> {
        let page = page.clamped();
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(self
            .read()
            .values()
            .skip(skip)
            .take(page.per_page as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.read().len() as u64)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut entries = self.write();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}
