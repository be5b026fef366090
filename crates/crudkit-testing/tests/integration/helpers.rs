use serde::{Deserialize, Serialize};

use crudkit_rest::AxumPort;
use crudkit_store::KeyField;
use crudkit_testing::{CrudCase, CrudFixture};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: u32,
}

pub fn person(id: &str, name: &str, age: u32) -> Person {
    Person {
        id: id.to_owned(),
        name: name.to_owned(),
        age,
    }
}

pub fn person_key() -> KeyField<Person, String> {
    KeyField::new("id", |p: &Person| p.id.clone())
}

pub fn memory_fixture() -> CrudFixture<Person, String, AxumPort> {
    CrudFixture::in_memory(person_key(), AxumPort::new())
}

/// Three people; changing one makes them a year older.
pub struct PeopleCase;

impl CrudCase<Person> for PeopleCase {
    fn create_objects(&self) -> Vec<Person> {
        vec![
            person("ada", "Ada Lovelace", 36),
            person("alan", "Alan Turing", 41),
            person("grace", "Grace Hopper", 85),
        ]
    }

    fn change_object(&self, object: &Person) -> Person {
        Person {
            age: object.age + 1,
            ..object.clone()
        }
    }
}

/// Keys carrying characters that are reserved in URLs.
pub struct ReservedKeysCase;

impl CrudCase<Person> for ReservedKeysCase {
    fn create_objects(&self) -> Vec<Person> {
        vec![
            person("a/b", "Slash", 1),
            person("c#", "Hash", 2),
            person("what?", "Question", 3),
            person("x%41", "Percent", 4),
            person("50%off", "Bare percent", 5),
        ]
    }

    fn change_object(&self, object: &Person) -> Person {
        Person {
            name: format!("{} (renamed)", object.name),
            ..object.clone()
        }
    }
}

/// Changes the key, which the round trip must refuse.
pub struct RekeyingCase;

impl CrudCase<Person> for RekeyingCase {
    fn create_objects(&self) -> Vec<Person> {
        vec![person("ada", "Ada Lovelace", 36)]
    }

    fn change_object(&self, object: &Person) -> Person {
        Person {
            id: format!("{}-2", object.id),
            ..object.clone()
        }
    }
}
