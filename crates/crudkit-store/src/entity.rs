//! Entity bounds and descriptors.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Anything that can be stored in a repository.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Entity for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Anything that can identify an entity.
pub trait EntityKey:
    Serialize + DeserializeOwned + Clone + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

impl<K> EntityKey for K where
    K: Serialize
        + DeserializeOwned
        + Clone
        + Ord
        + fmt::Debug
        + fmt::Display
        + Send
        + Sync
        + 'static
{
}

/// Describes an entity type by the name its collection is stored under.
pub struct EntityType<T> {
    name: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> EntityType<T> {
    /// Uses the simple type name, e.g. `Person` for `people::Person`.
    pub fn of() -> Self {
        let full = std::any::type_name::<T>();
        let path = full.split('<').next().unwrap_or(full);
        let simple = path.rsplit("::").next().unwrap_or(path);
        Self::named(simple)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _entity: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for EntityType<T> {
    fn clone(&self) -> Self {
        Self::named(self.name.clone())
    }
}

impl<T> fmt::Debug for EntityType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityType").field(&self.name).finish()
    }
}

/// The key of an entity: the serialized field name plus an accessor.
///
/// The name is what document stores index on; the accessor is what
/// everything else uses.
pub struct KeyField<T, K> {
    name: &'static str,
    get: fn(&T) -> K,
}

impl<T, K> KeyField<T, K> {
    pub const fn new(name: &'static str, get: fn(&T) -> K) -> Self {
        Self { name, get }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, entity: &T) -> K {
        (self.get)(entity)
    }
}

impl<T, K> Clone for KeyField<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K> Copy for KeyField<T, K> {}

impl<T, K> fmt::Debug for KeyField<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyField").field(&self.name).finish()
    }
}
