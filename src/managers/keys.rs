use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{ApiRequest, MeiliClient};
use crate::error::{Error, Result};

/// Body of `POST /keys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub actions: Vec<String>,
    pub indexes: Vec<String>,
    /// RFC 3339 timestamp; `None` means the key never expires.
    #[serde(default)]
    pub expires_at: Option<String>,
}

pub struct KeyManager {
    client: Arc<MeiliClient>,
}

impl KeyManager {
    pub fn new(client: Arc<MeiliClient>) -> Self {
        Self { client }
    }

    pub async fn get_keys(&self, offset: Option<u64>, limit: Option<u64>) -> Result<Value> {
        let request = ApiRequest::new(Method::GET, ["keys"])
            .with_query("offset", offset)
            .with_query("limit", limit);
        self.client
            .send(request)
            .await
            .map_err(Error::failed("get keys"))
    }

    pub async fn get_key(&self, key: &str) -> Result<Value> {
        self.client
            .get(["keys", key])
            .await
            .map_err(Error::failed("get key"))
    }

    pub async fn create_key(&self, options: &KeyOptions) -> Result<Value> {
        let body = serde_json::to_value(options)
            .map_err(|e| Error::invalid_arguments("create-key", e.to_string()))?;
        self.client
            .post(["keys"], body)
            .await
            .map_err(Error::failed("create key"))
    }

    /// Only `name` and `description` are mutable on an existing key.
    pub async fn update_key(
        &self,
        key: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({});
        if let Some(name) = name {
            body["name"] = Value::String(name.to_string());
        }
        if let Some(description) = description {
            body["description"] = Value::String(description.to_string());
        }
        self.client
            .patch(["keys", key], body)
            .await
            .map_err(Error::failed("update key"))
    }

    pub async fn delete_key(&self, key: &str) -> Result<Value> {
        self.client
            .delete(["keys", key])
            .await
            .map_err(Error::failed("delete key"))
    }
}
