use std::net::{IpAddr, Ipv4Addr};

use crudkit_core::settings::ServerSettings;
use crudkit_store::MongoSettings;

const DEFAULT_PORT: u16 = 3120;

/// People service configuration loaded from environment variables.
#[derive(Debug)]
pub struct PeopleConfig {
    /// MongoDB connection. Env vars: `MONGODB_URL`, `MONGODB_DATABASE`.
    pub mongo: MongoSettings,
    /// Address to bind (default 0.0.0.0). Env var: `PEOPLE_BIND_ADDRESS`.
    /// TCP port for the HTTP server (default 3120). Env var: `PEOPLE_PORT`.
    pub server: ServerSettings,
}

impl PeopleConfig {
    pub fn from_env() -> Self {
        Self {
            mongo: MongoSettings::from_env(),
            server: server_settings(|name| std::env::var(name).ok()),
        }
    }
}

fn server_settings(lookup: impl Fn(&str) -> Option<String>) -> ServerSettings {
    let defaults = ServerSettings {
        bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        bind_port: DEFAULT_PORT,
    };
    ServerSettings::from_vars(lookup, "PEOPLE_BIND_ADDRESS", "PEOPLE_PORT", defaults)
}
