//! Meilisearch REST client.
//!
//! [`MeiliClient`] binds a set of [`Coordinates`] to a [`Transport`]
//! and offers one helper per HTTP verb.  The transport is the seam
//! between this crate and the network: production code uses
//! [`HttpTransport`], tests plug in an in-memory fake.

pub mod http;

pub use http::HttpTransport;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Default Meilisearch address.
pub const DEFAULT_URL: &str = "http://localhost:7700";

/// Base URL and API key identifying one Meilisearch instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub url: String,
    pub api_key: Option<String>,
}

impl Coordinates {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Parse the base URL, accepting only `http` and `https`.
    pub fn parsed_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url).map_err(|e| Error::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Caller-facing view; never contains the key itself.
    pub fn view(&self) -> CoordinatesView {
        CoordinatesView {
            url: self.url.clone(),
            api_key_set: self.api_key.is_some(),
        }
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinates")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Connection coordinates as reported to tool callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatesView {
    pub url: String,
    pub api_key_set: bool,
}

impl CoordinatesView {
    pub fn masked_key(&self) -> &'static str {
        if self.api_key_set {
            "********"
        } else {
            "Not set"
        }
    }
}

impl fmt::Display for CoordinatesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "URL: {}\nAPI Key: {}", self.url, self.masked_key())
    }
}

/// A single REST call, relative to the coordinates' base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Unencoded path segments, e.g. `["indexes", "movies", "search"]`.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn with_query(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(v) = value {
            self.query.push((key.to_string(), v.to_string()));
        }
        self
    }

    /// Slash-joined path, used for logging and by test transports.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes [`ApiRequest`]s against a Meilisearch instance.
///
/// Implementations return the decoded JSON body (`Value::Null` for an
/// empty success body) or an [`Error`] describing the failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, coordinates: &Coordinates, request: ApiRequest) -> Result<Value>;
}

/// Meilisearch client bound to one set of coordinates.
pub struct MeiliClient {
    coordinates: Coordinates,
    transport: Arc<dyn Transport>,
}

impl MeiliClient {
    /// Build a client, rejecting unusable base URLs up front.
    pub fn new(coordinates: Coordinates, transport: Arc<dyn Transport>) -> Result<Self> {
        coordinates.parsed_url()?;
        Ok(Self {
            coordinates,
            transport,
        })
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!(
            method = %request.method,
            path = %request.path(),
            url = %self.coordinates.url,
            "meilisearch request"
        );
        self.transport.send(&self.coordinates, request).await
    }

    pub async fn get<S: Into<String>>(&self, segments: impl IntoIterator<Item = S>) -> Result<Value> {
        self.send(ApiRequest::new(Method::GET, segments)).await
    }

    pub async fn post<S: Into<String>>(
        &self,
        segments: impl IntoIterator<Item = S>,
        body: Value,
    ) -> Result<Value> {
        self.send(ApiRequest::new(Method::POST, segments).with_body(body))
            .await
    }

    pub async fn patch<S: Into<String>>(
        &self,
        segments: impl IntoIterator<Item = S>,
        body: Value,
    ) -> Result<Value> {
        self.send(ApiRequest::new(Method::PATCH, segments).with_body(body))
            .await
    }

    pub async fn delete<S: Into<String>>(
        &self,
        segments: impl IntoIterator<Item = S>,
    ) -> Result<Value> {
        self.send(ApiRequest::new(Method::DELETE, segments)).await
    }

    /// `GET /health`; true only for `{"status": "available"}`.
    pub async fn is_healthy(&self) -> bool {
        match self.get(["health"]).await {
            Ok(body) => body.get("status").and_then(Value::as_str) == Some("available"),
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }
}
