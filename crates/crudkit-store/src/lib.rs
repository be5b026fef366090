//! Keyed entity repositories.
//!
//! An entity is any serde type; its key is pulled out with a [`KeyField`].
//! [`IdRepository`] is the storage seam, implemented by
//! [`MemoryIdRepository`] and [`MongoIdRepository`].

pub mod entity;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod pagination;
pub mod repository;

pub use entity::{Entity, EntityKey, EntityType, KeyField};
pub use error::StoreError;
pub use memory::MemoryIdRepository;
pub use mongo::{DocumentMapper, MongoIdRepository, MongoSettings};
pub use pagination::PageRequest;
pub use repository::{IdRepository, SharedRepository};
