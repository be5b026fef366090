pub mod config;
pub mod person;
pub mod router;
