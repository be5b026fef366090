use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Embedded server settings loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address to bind (default 127.0.0.1). Env var: `CRUD_BIND_ADDRESS`.
    pub bind_address: IpAddr,
    /// Port to bind, 0 lets the OS pick one (default 0). Env var: `CRUD_BIND_PORT`.
    pub bind_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            bind_port: 0,
        }
    }
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup. Unparseable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_vars(lookup, "CRUD_BIND_ADDRESS", "CRUD_BIND_PORT", Self::default())
    }

    /// Like [`from_lookup`](Self::from_lookup), for services that name
    /// their own variables and defaults.
    pub fn from_vars(
        lookup: impl Fn(&str) -> Option<String>,
        address_var: &str,
        port_var: &str,
        defaults: Self,
    ) -> Self {
        Self {
            bind_address: lookup(address_var)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_address),
            bind_port: lookup(port_var)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_port),
        }
    }

    pub fn with_port(self, bind_port: u16) -> Self {
        Self { bind_port, ..self }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.bind_port)
    }
}
