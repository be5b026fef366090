//! Test utilities for crudkit repositories and routes.
//!
//! [`CrudFixture`] wires a repository, the CRUD routes and an embedded server
//! together and drives the standard create/read/update/delete round trip.
//! Use from tests only.

pub mod fixture;

pub use fixture::{CrudCase, CrudFixture, FixtureError};
