use serde::{Deserialize, Serialize};

use crudkit_store::{EntityType, KeyField};

pub const PEOPLE_COLLECTION: &str = "people";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub email: String,
}

pub fn person_key() -> KeyField<Person, String> {
    KeyField::new("id", |p: &Person| p.id.clone())
}

pub fn person_type() -> EntityType<Person> {
    EntityType::named(PEOPLE_COLLECTION)
}
