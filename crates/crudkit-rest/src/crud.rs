//! Generic CRUD route set over an [`IdRepository`](crudkit_store::IdRepository).
//!
//! | verb   | path     | result                                 |
//! |--------|----------|----------------------------------------|
//! | POST   | `/`      | 201 + key, 409 if the key is taken     |
//! | GET    | `/`      | 200 + page, `x-total-count` header     |
//! | GET    | `/{key}` | 200 + entity, 404                      |
//! | PUT    | `/{key}` | 201 created / 200 replaced, 400 on key mismatch |
//! | DELETE | `/{key}` | 204, 404                               |

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    routing::{get, post},
};
use tracing::debug;

use crudkit_store::{Entity, EntityKey, PageRequest, SharedRepository};

use crate::error::CrudError;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

// Extractors whose rejections render as `CrudError` bodies.

#[derive(FromRequest)]
#[from_request(via(Json), rejection(CrudError))]
struct Body<T>(T);

#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(CrudError))]
struct KeyParam<K>(K);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(CrudError))]
struct PageParams<Q>(Q);

/// Build the CRUD routes for `repository`. Mount with
/// [`ServerRouter::path`](crate::server::ServerRouter::path) or `Router::nest`.
pub fn crud<T: Entity, K: EntityKey>(repository: SharedRepository<T, K>) -> Router {
    Router::new()
        .route("/", post(create::<T, K>).get(list::<T, K>))
        .route(
            "/{key}",
            get(read::<T, K>).put(upsert::<T, K>).delete(remove::<T, K>),
        )
        .with_state(repository)
}

async fn create<T: Entity, K: EntityKey>(
    State(repository): State<SharedRepository<T, K>>,
    Body(entity): Body<T>,
) -> Result<(StatusCode, Json<K>), CrudError> {
    let key = repository.insert(&entity).await?;
    debug!(%key, "entity created");
    Ok((StatusCode::CREATED, Json(key)))
}

async fn list<T: Entity, K: EntityKey>(
    State(repository): State<SharedRepository<T, K>>,
    PageParams(page): PageParams<PageRequest>,
) -> Result<(HeaderMap, Json<Vec<T>>), CrudError> {
    let total = repository.count().await?;
    let entities = repository.list(page.clamped()).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(TOTAL_COUNT_HEADER),
        HeaderValue::from(total),
    );
    Ok((headers, Json(entities)))
}

async fn read<T: Entity, K: EntityKey>(
    State(repository): State<SharedRepository<T, K>>,
    KeyParam(key): KeyParam<K>,
) -> Result<Json<T>, CrudError> {
    repository
        .get(&key)
        .await?
        .map(Json)
        .ok_or(CrudError::NotFound)
}

async fn upsert<T: Entity, K: EntityKey>(
    State(repository): State<SharedRepository<T, K>>,
    KeyParam(key): KeyParam<K>,
    Body(entity): Body<T>,
) -> Result<(StatusCode, Json<T>), CrudError> {
    if repository.key_of(&entity) != key {
        return Err(CrudError::KeyMismatch);
    }
    let created = repository.put(&entity).await?;
    debug!(%key, created, "entity stored");
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(entity)))
}

async fn remove<T: Entity, K: EntityKey>(
    State(repository): State<SharedRepository<T, K>>,
    KeyParam(key): KeyParam<K>,
) -> Result<StatusCode, CrudError> {
    if repository.delete(&key).await? {
        debug!(%key, "entity deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CrudError::NotFound)
    }
}
