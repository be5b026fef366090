//! HTTP side of crudkit: the generic CRUD route set, an embedded server with
//! pluggable transport and a small JSON client.

pub mod client;
pub mod crud;
pub mod error;
pub mod port;
pub mod server;

pub use client::{Client, ClientError, key_path};
pub use crud::crud;
pub use error::CrudError;
pub use port::{AxumPort, ServerPort};
pub use server::{Server, ServerError, ServerRouter};
