//! MongoDB-backed repository.
//!
//! Each entity type lives in its own collection. The key field is stored as
//! the document `_id`, so key uniqueness comes from MongoDB's primary index.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection, Database};
use tracing::debug;

use crate::entity::{Entity, EntityKey, EntityType, KeyField};
use crate::error::StoreError;
use crate::pagination::PageRequest;
use crate::repository::IdRepository;

const ID_FIELD: &str = "_id";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB connection settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoSettings {
    /// Connection string (default `mongodb://localhost:27017`). Env var: `MONGODB_URL`.
    pub url: String,
    /// Database holding the collections (default `crudkit`). Env var: `MONGODB_DATABASE`.
    pub database: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_owned(),
            database: "crudkit".to_owned(),
        }
    }
}

impl MongoSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("MONGODB_URL").unwrap_or(defaults.url),
            database: std::env::var("MONGODB_DATABASE").unwrap_or(defaults.database),
        }
    }

    pub async fn connect(&self) -> Result<Database, StoreError> {
        let client = Client::with_uri_str(&self.url).await?;
        Ok(client.database(&self.database))
    }
}

/// Moves the key field to `_id` on the way in and back on the way out.
pub struct DocumentMapper<T, K> {
    key: KeyField<T, K>,
}

impl<T: Entity, K: EntityKey> DocumentMapper<T, K> {
    pub fn new(key: KeyField<T, K>) -> Self {
        Self { key }
    }

    pub fn to_document(&self, entity: &T) -> Result<Document, StoreError> {
        let mut document =
            bson::to_document(entity).map_err(|e| StoreError::Codec(e.to_string()))?;
        let id = document
            .remove(self.key.name())
            .ok_or(StoreError::MissingKeyField(self.key.name()))?;
        document.insert(ID_FIELD, id);
        Ok(document)
    }

    pub fn from_document(&self, mut document: Document) -> Result<T, StoreError> {
        if let Some(id) = document.remove(ID_FIELD) {
            document.insert(self.key.name(), id);
        }
        bson::from_document(document).map_err(|e| StoreError::Codec(e.to_string()))
    }

    pub fn key_filter(&self, key: &K) -> Result<Document, StoreError> {
        let id = bson::to_bson(key).map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(doc! { "_id": id })
    }
}

pub struct MongoIdRepository<T, K> {
    collection: Collection<Document>,
    key: KeyField<T, K>,
    mapper: DocumentMapper<T, K>,
}

impl<T: Entity, K: EntityKey> MongoIdRepository<T, K> {
    pub fn new(database: &Database, entity_type: &EntityType<T>, key: KeyField<T, K>) -> Self {
        Self {
            collection: database.collection(entity_type.name()),
            key,
            mapper: DocumentMapper::new(key),
        }
    }

    pub async fn connect(
        settings: &MongoSettings,
        entity_type: &EntityType<T>,
        key: KeyField<T, K>,
    ) -> Result<Self, StoreError> {
        let database = settings.connect().await?;
        debug!(
            database = %settings.database,
            collection = entity_type.name(),
            "mongodb repository ready"
        );
        Ok(Self::new(&database, entity_type, key))
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(w)) if w.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl<T: Entity, K: EntityKey> IdRepository<T, K> for MongoIdRepository<T, K> {
    fn key_field(&self) -> &KeyField<T, K> {
        &self.key
    }

    async fn insert(&self, entity: &T) -> Result<K, StoreError> {
        let key = self.key.get(entity);
        let document = self.mapper.to_document(entity)?;
        match self.collection.insert_one(document).await {
            Ok(_) => Ok(key),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Conflict(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, entity: &T) -> Result<bool, StoreError> {
        let key = self.key.get(entity);
        let filter = self.mapper.key_filter(&key)?;
        let document = self.mapper.to_document(entity)?;
        let result = self
            .collection
            .replace_one(filter, document)
            .upsert(true)
            .await?;
        Ok(result.upserted_id.is_some())
    }

    async fn get(&self, key: &K) -> Result<Option<T>, StoreError> {
        let filter = self.mapper.key_filter(key)?;
        self.collection
            .find_one(filter)
            .await?
            .map(|document| self.mapper.from_document(document))
            .transpose()
    }

    async fn delete(&self, key: &K) -> Result<bool, StoreError> {
        let filter = self.mapper.key_filter(key)?;
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<T>, StoreError> {
        let page = page.clamped();
        let documents: Vec<Document> = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .skip(page.offset())
            .limit(i64::from(page.per_page))
            .await?
            .try_collect()
            .await?;
        documents
            .into_iter()
            .map(|document| self.mapper.from_document(document))
            .collect()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let result = self.collection.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }
}
