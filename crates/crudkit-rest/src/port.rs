use std::net::SocketAddr;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::server::ServerError;

/// The listening mechanism underneath a [`Server`](crate::server::Server).
#[async_trait]
pub trait ServerPort: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Bind `addr` and start serving `router`. Returns once the socket is
    /// listening, with the address actually bound.
    async fn start(&mut self, router: Router, addr: SocketAddr) -> Result<SocketAddr, ServerError>;

    /// Stop serving. Returns once the listening socket has been released.
    async fn shutdown(&mut self) -> Result<(), ServerError>;
}

struct Running {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Tokio listener plus `axum::serve`, with graceful shutdown.
///
/// Dropping a running port also shuts it down: the serving task sees the
/// shutdown channel close.
#[derive(Default)]
pub struct AxumPort {
    running: Option<Running>,
}

impl AxumPort {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServerPort for AxumPort {
    fn name(&self) -> &'static str {
        "axum"
    }

    async fn start(&mut self, router: Router, addr: SocketAddr) -> Result<SocketAddr, ServerError> {
        if self.running.is_some() {
            return Err(ServerError::AlreadyRunning);
        }
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        self.running = Some(Running { shutdown, task });
        Ok(local_addr)
    }

    async fn shutdown(&mut self) -> Result<(), ServerError> {
        let running = self.running.take().ok_or(ServerError::NotRunning)?;
        if running.shutdown.send(()).is_err() {
            warn!("serving task already gone before shutdown");
        }
        running
            .task
            .await
            .map_err(|e| ServerError::Task(e.to_string()))??;
        Ok(())
    }
}
