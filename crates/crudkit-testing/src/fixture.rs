use std::fmt::Debug;
use std::sync::Arc;

use reqwest::StatusCode;
use tracing::debug;

use crudkit_core::settings::ServerSettings;
use crudkit_core::tracing::init_test_tracing;
use crudkit_rest::{Client, ClientError, Server, ServerError, ServerPort, crud, key_path};
use crudkit_store::{
    Entity, EntityKey, EntityType, KeyField, MemoryIdRepository, MongoIdRepository,
    MongoSettings, SharedRepository, StoreError,
};

const LIST_PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("server has not been started")]
    NotStarted,
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("unreadable response body")]
    Body(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Supplies the entities a CRUD round trip works on.
pub trait CrudCase<T> {
    /// Entities to create. Keys must be distinct and not already stored.
    fn create_objects(&self) -> Vec<T>;

    /// A modified copy of `object` with the same key.
    fn change_object(&self, object: &T) -> T;
}

/// A repository served through the CRUD routes on an embedded server.
///
/// Two states: stopped and running. The client exists only while running
/// and always targets the address the server reported when it started.
pub struct CrudFixture<T: Entity, K: EntityKey, P: ServerPort> {
    repository: SharedRepository<T, K>,
    server: Server<P>,
    client: Option<Client>,
}

impl<T: Entity, K: EntityKey, P: ServerPort> CrudFixture<T, K, P> {
    pub fn new(repository: SharedRepository<T, K>, adapter: P, settings: ServerSettings) -> Self {
        init_test_tracing();
        Self {
            repository,
            server: Server::new(adapter, settings),
            client: None,
        }
    }

    pub fn in_memory(key: KeyField<T, K>, adapter: P) -> Self {
        Self::new(
            Arc::new(MemoryIdRepository::new(key)),
            adapter,
            ServerSettings::from_env(),
        )
    }

    /// Fixture over the MongoDB collection named by `entity_type`, using
    /// `MONGODB_URL`/`MONGODB_DATABASE` and the `CRUD_BIND_*` settings.
    pub async fn mongo(
        entity_type: EntityType<T>,
        key: KeyField<T, K>,
        adapter: P,
    ) -> Result<Self, FixtureError> {
        let repository =
            MongoIdRepository::connect(&MongoSettings::from_env(), &entity_type, key).await?;
        Ok(Self::new(
            Arc::new(repository),
            adapter,
            ServerSettings::from_env(),
        ))
    }

    pub fn repository(&self) -> &SharedRepository<T, K> {
        &self.repository
    }

    pub fn server(&self) -> &Server<P> {
        &self.server
    }

    /// Mount the CRUD routes at `/`, start listening and build the client.
    pub async fn start_server(&mut self) -> Result<(), FixtureError> {
        if self.server.is_running() {
            return Err(ServerError::AlreadyRunning.into());
        }
        self.server
            .router()
            .path("/", crud(Arc::clone(&self.repository)));
        let addr = self.server.run().await?;
        self.client = Some(Client::for_addr(addr));
        debug!(%addr, "crud fixture started");
        Ok(())
    }

    pub async fn stop_server(&mut self) -> Result<(), FixtureError> {
        self.server.stop().await?;
        self.client = None;
        debug!("crud fixture stopped");
        Ok(())
    }

    pub fn client(&self) -> Result<&Client, FixtureError> {
        self.client.as_ref().ok_or(FixtureError::NotStarted)
    }

    /// Create every object of `case`, read it back, replace it with its
    /// changed version, find it in the listing, delete it and confirm it is
    /// gone from both the routes and the repository.
    ///
    /// Unexpected statuses or bodies panic; transport and store failures are
    /// returned.
    pub async fn crud_operations_behave_properly<C>(&self, case: &C) -> Result<(), FixtureError>
    where
        C: CrudCase<T>,
        T: PartialEq + Debug,
    {
        let client = self.client()?;
        let objects = case.create_objects();
        assert!(!objects.is_empty(), "crud case produced no objects");
        let changed: Vec<T> = objects.iter().map(|o| case.change_object(o)).collect();
        let keys: Vec<K> = objects.iter().map(|o| self.repository.key_of(o)).collect();

        for (object, key) in objects.iter().zip(&keys) {
            let response = client.post("/", object).await?;
            assert_eq!(response.status(), StatusCode::CREATED, "create {key}");
            let created: K = response.json().await?;
            assert_eq!(&created, key, "create {key} returned another key");

            let response = client.get(&key_path(key)).await?;
            assert_eq!(response.status(), StatusCode::OK, "read {key}");
            assert_eq!(&response.json::<T>().await?, object, "read {key}");
        }

        for (object, key) in changed.iter().zip(&keys) {
            assert_eq!(
                &self.repository.key_of(object),
                key,
                "change_object altered the key"
            );
            let response = client.put(&key_path(key), object).await?;
            assert_eq!(response.status(), StatusCode::OK, "update {key}");

            let response = client.get(&key_path(key)).await?;
            assert_eq!(&response.json::<T>().await?, object, "read updated {key}");
        }

        let listed = self.list_all(client).await?;
        for object in &changed {
            assert!(listed.contains(object), "{object:?} missing from listing");
        }

        for key in &keys {
            let response = client.delete(&key_path(key)).await?;
            assert_eq!(response.status(), StatusCode::NO_CONTENT, "delete {key}");

            let response = client.get(&key_path(key)).await?;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "read deleted {key}");
            assert!(
                self.repository.get(key).await?.is_none(),
                "{key} still stored after delete"
            );
        }
        Ok(())
    }

    async fn list_all(&self, client: &Client) -> Result<Vec<T>, FixtureError> {
        let mut all = Vec::new();
        for page in 1.. {
            let response = client
                .get(&format!("/?per-page={LIST_PAGE_SIZE}&page={page}"))
                .await?;
            assert_eq!(response.status(), StatusCode::OK, "list page {page}");
            let entities: Vec<T> = response.json().await?;
            let last = entities.len() < LIST_PAGE_SIZE;
            all.extend(entities);
            if last {
                break;
            }
        }
        Ok(all)
    }
}
