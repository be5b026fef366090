//! Ambient pieces shared by every crudkit crate: tracing setup, health
//! handlers, request-id middleware and server settings.

pub mod health;
pub mod middleware;
pub mod settings;
pub mod tracing;
