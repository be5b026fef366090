//! Embedded HTTP server with a pluggable [`ServerPort`].

use std::io;
use std::net::{IpAddr, SocketAddr};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crudkit_core::health::health_routes;
use crudkit_core::middleware::{propagate_request_id_layer, request_id_layer};
use crudkit_core::settings::ServerSettings;

use crate::port::ServerPort;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server is already running")]
    AlreadyRunning,
    #[error("server is not running")]
    NotRunning,
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server i/o error")]
    Io(#[from] io::Error),
    #[error("server task failed: {0}")]
    Task(String),
}

/// Route sets attached to a server, keyed by path prefix.
#[derive(Default)]
pub struct ServerRouter {
    paths: Vec<(String, Router)>,
}

impl ServerRouter {
    /// Attach `routes` under `pattern`. `"/"` mounts at the root; attaching
    /// the same prefix again replaces the earlier route set.
    pub fn path(&mut self, pattern: &str, routes: Router) -> &mut Self {
        let prefix = normalize_prefix(pattern);
        match self.paths.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = routes,
            None => self.paths.push((prefix, routes)),
        }
        self
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|(p, _)| p.as_str())
    }

    fn build(&self) -> Router {
        let mut app = health_routes();
        for (prefix, routes) in &self.paths {
            app = if prefix.is_empty() {
                app.merge(routes.clone())
            } else {
                app.nest(prefix, routes.clone())
            };
        }
        app.layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
    }
}

// Root is stored as "", everything else as "/segment" without a trailing slash.
fn normalize_prefix(pattern: &str) -> String {
    let trimmed = pattern.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

pub struct Server<P: ServerPort> {
    port: P,
    settings: ServerSettings,
    router: ServerRouter,
    local_addr: Option<SocketAddr>,
}

impl<P: ServerPort> Server<P> {
    pub fn new(port: P, settings: ServerSettings) -> Self {
        Self {
            port,
            settings,
            router: ServerRouter::default(),
            local_addr: None,
        }
    }

    pub fn router(&mut self) -> &mut ServerRouter {
        &mut self.router
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    pub fn bind_address(&self) -> IpAddr {
        self.settings.bind_address
    }

    /// Port actually bound; `None` while stopped.
    pub fn runtime_port(&self) -> Option<u16> {
        self.local_addr.map(|addr| addr.port())
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.local_addr.is_some()
    }

    /// Start listening. Returns the bound address once connections are accepted.
    pub async fn run(&mut self) -> Result<SocketAddr, ServerError> {
        if self.is_running() {
            return Err(ServerError::AlreadyRunning);
        }
        let app = self.router.build();
        let addr = self.port.start(app, self.settings.socket_addr()).await?;
        info!(adapter = self.port.name(), %addr, "server listening");
        self.local_addr = Some(addr);
        Ok(addr)
    }

    /// Stop listening. Returns once the socket is released.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let addr = self.local_addr.take().ok_or(ServerError::NotRunning)?;
        self.port.shutdown().await?;
        info!(%addr, "server stopped");
        Ok(())
    }
}
