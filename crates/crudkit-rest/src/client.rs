//! Minimal JSON-over-HTTP client for talking to a running [`Server`](crate::server::Server).

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use reqwest::{RequestBuilder, Response};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Client for a server bound at `addr`. Wildcard bind addresses are
    /// reached through the loopback interface.
    pub fn for_addr(addr: SocketAddr) -> Self {
        let ip = match addr.ip() {
            IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };
        Self::new(format!("http://{}", SocketAddr::new(ip, addr.port())))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Result<Response, ClientError> {
        let url = self.url(path);
        let request = self.http.get(&url);
        send(url, request).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError> {
        let url = self.url(path);
        let request = self.http.post(&url).json(body);
        send(url, request).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError> {
        let url = self.url(path);
        let request = self.http.put(&url).json(body);
        send(url, request).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, ClientError> {
        let url = self.url(path);
        let request = self.http.delete(&url);
        send(url, request).await
    }
}

/// Path of the entity stored under `key`, encoded as a single segment.
pub fn key_path(key: &impl Display) -> String {
    format!("/{}", urlencoding::encode(&key.to_string()))
}

async fn send(url: String, request: RequestBuilder) -> Result<Response, ClientError> {
    request
        .send()
        .await
        .map_err(|source| ClientError::Request { url, source })
}
