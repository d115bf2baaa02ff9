//! Server-wide and per-index statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::MeiliClient;
use crate::error::{Error, Result};

/// Subset of `GET /stats` this module relies on.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlobalStats {
    #[serde(default)]
    database_size: u64,
    #[serde(default)]
    last_update: Option<String>,
    #[serde(default)]
    indexes: Map<String, Value>,
}

/// Subset of `GET /indexes/{uid}/stats`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStats {
    #[serde(default)]
    number_of_documents: u64,
    #[serde(default)]
    is_indexing: bool,
    #[serde(default)]
    field_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    index_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexHealth {
    pub uid: String,
    pub documents_count: u64,
    pub is_indexing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub database_size: u64,
    pub last_update: Option<String>,
    pub indexes_count: usize,
    pub indexes_info: Vec<IndexHealth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexMetrics {
    pub number_of_documents: u64,
    pub field_distribution: BTreeMap<String, u64>,
    pub is_indexing: bool,
    pub index_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    pub version: Value,
    pub database_size: u64,
    pub last_update: Option<String>,
    pub indexes: Map<String, Value>,
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| Error::InvalidResponse(e.to_string()))
}

pub struct MonitoringManager {
    client: Arc<MeiliClient>,
}

impl MonitoringManager {
    pub fn new(client: Arc<MeiliClient>) -> Self {
        Self { client }
    }

    pub async fn version(&self) -> Result<Value> {
        self.client
            .get(["version"])
            .await
            .map_err(Error::failed("get version"))
    }

    pub async fn stats(&self) -> Result<Value> {
        self.client
            .get(["stats"])
            .await
            .map_err(Error::failed("get stats"))
    }

    /// Health summary derived from the global stats aggregate, which
    /// already carries per-index document counts.
    pub async fn health_status(&self) -> Result<HealthStatus> {
        let stats: GlobalStats = self
            .client
            .get(["stats"])
            .await
            .and_then(decode)
            .map_err(Error::failed("get health status"))?;

        let indexes_info: Vec<IndexHealth> = stats
            .indexes
            .iter()
            .map(|(uid, index)| IndexHealth {
                uid: uid.clone(),
                documents_count: index
                    .get("numberOfDocuments")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
                is_indexing: index
                    .get("isIndexing")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            })
            .collect();

        Ok(HealthStatus {
            is_healthy: true,
            database_size: stats.database_size,
            last_update: stats.last_update,
            indexes_count: indexes_info.len(),
            indexes_info,
        })
    }

    pub async fn index_metrics(&self, index_uid: &str) -> Result<IndexMetrics> {
        let stats: IndexStats = self
            .client
            .get(["indexes", index_uid, "stats"])
            .await
            .and_then(decode)
            .map_err(Error::failed("get index metrics"))?;
        Ok(IndexMetrics {
            number_of_documents: stats.number_of_documents,
            field_distribution: stats.field_distribution,
            is_indexing: stats.is_indexing,
            index_size: stats.index_size,
        })
    }

    pub async fn system_information(&self) -> Result<SystemInfo> {
        let version = self
            .client
            .get(["version"])
            .await
            .map_err(Error::failed("get system information"))?;
        let stats: GlobalStats = self
            .client
            .get(["stats"])
            .await
            .and_then(decode)
            .map_err(Error::failed("get system information"))?;
        Ok(SystemInfo {
            version,
            database_size: stats.database_size,
            last_update: stats.last_update,
            indexes: stats.indexes,
        })
    }
}
