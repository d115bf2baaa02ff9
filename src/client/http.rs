//! `reqwest`-backed [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiRequest, Coordinates, Transport};
use crate::error::{Error, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Shape of Meilisearch's error responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Sends requests over HTTP with a shared connection pool.
///
/// The pool is independent of the coordinates, so one transport
/// survives any number of reconfigurations.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("meilisearch-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, coordinates: &Coordinates, request: ApiRequest) -> Result<Value> {
        let mut url = coordinates.parsed_url()?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                url: coordinates.url.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(&request.segments);

        let mut builder = self.client.request(request.method.clone(), url.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(key) = &coordinates.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| Error::Transport {
            message: format!("request to {url} failed: {e}"),
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| Error::Transport {
            message: format!("failed to read response from {url}: {e}"),
        })?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => Error::Remote {
                    status: status.as_u16(),
                    code: body.code,
                    message: body.message,
                },
                Err(_) => Error::Remote {
                    status: status.as_u16(),
                    code: None,
                    message: if text.trim().is_empty() {
                        format!("Meilisearch returned {status}")
                    } else {
                        format!("Meilisearch returned {status}: {}", text.trim())
                    },
                },
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}
