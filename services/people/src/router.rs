use crudkit_rest::{Server, ServerPort, crud};
use crudkit_store::SharedRepository;

use crate::person::Person;

pub const PEOPLE_PATH: &str = "/people";

/// Mount the people routes on `server`.
pub fn mount<P: ServerPort>(server: &mut Server<P>, repository: SharedRepository<Person, String>) {
    server.router().path(PEOPLE_PATH, crud(repository));
}
