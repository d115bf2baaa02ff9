use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{ApiRequest, MeiliClient};
use crate::error::{Error, Result};

/// An index as reported by `GET /indexes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecord {
    pub uid: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of [`IndexRecord`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexList {
    pub results: Vec<IndexRecord>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub total: u64,
}

pub struct IndexManager {
    client: Arc<MeiliClient>,
}

impl IndexManager {
    pub fn new(client: Arc<MeiliClient>) -> Self {
        Self { client }
    }

    pub async fn create_index(&self, uid: &str, primary_key: Option<&str>) -> Result<Value> {
        let mut body = json!({ "uid": uid });
        if let Some(pk) = primary_key {
            body["primaryKey"] = Value::String(pk.to_string());
        }
        self.client
            .post(["indexes"], body)
            .await
            .map_err(Error::failed("create index"))
    }

    pub async fn list_indexes(&self, offset: Option<u64>, limit: Option<u64>) -> Result<IndexList> {
        let request = ApiRequest::new(Method::GET, ["indexes"])
            .with_query("offset", offset)
            .with_query("limit", limit);
        let body = self
            .client
            .send(request)
            .await
            .map_err(Error::failed("list indexes"))?;
        serde_json::from_value(body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))
            .map_err(Error::failed("list indexes"))
    }

    pub async fn get_index(&self, uid: &str) -> Result<IndexRecord> {
        let body = self
            .client
            .get(["indexes", uid])
            .await
            .map_err(Error::failed("get index"))?;
        serde_json::from_value(body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))
            .map_err(Error::failed("get index"))
    }

    pub async fn update_index(&self, uid: &str, primary_key: &str) -> Result<Value> {
        self.client
            .patch(["indexes", uid], json!({ "primaryKey": primary_key }))
            .await
            .map_err(Error::failed("update index"))
    }

    pub async fn delete_index(&self, uid: &str) -> Result<Value> {
        self.client
            .delete(["indexes", uid])
            .await
            .map_err(Error::failed("delete index"))
    }

    /// Atomically swap the documents of each `[a, b]` pair.
    pub async fn swap_indexes(&self, swaps: &[[String; 2]]) -> Result<Value> {
        let body: Vec<Value> = swaps
            .iter()
            .map(|pair| json!({ "indexes": pair }))
            .collect();
        self.client
            .post(["swap-indexes"], Value::Array(body))
            .await
            .map_err(Error::failed("swap indexes"))
    }
}
