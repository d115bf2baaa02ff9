//! Single- and multi-index search.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::client::{ApiRequest, MeiliClient};
use crate::error::{Error, Result};
use crate::logs::Logger;

/// Upper bound on indexes visited by one multi-index search.
const MAX_INDEXES: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub limit: u64,
    pub offset: u64,
    pub filter: Option<String>,
    pub sort: Option<Vec<String>>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            filter: None,
            sort: None,
        }
    }
}

impl SearchParams {
    fn body(&self, query: &str) -> Value {
        let mut body = json!({
            "q": query,
            "limit": self.limit,
            "offset": self.offset,
        });
        if let Some(filter) = &self.filter {
            body["filter"] = Value::String(filter.clone());
        }
        if let Some(sort) = &self.sort {
            body["sort"] = json!(sort);
        }
        body
    }
}

/// Aggregate returned when no target index is given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiIndexResults {
    pub multi_index: bool,
    pub query: String,
    /// Index uid to search response, in index-list order.
    pub results: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Single(Value),
    Multi(MultiIndexResults),
}

pub struct SearchManager {
    client: Arc<MeiliClient>,
    logger: Logger,
}

impl SearchManager {
    pub fn new(client: Arc<MeiliClient>, logger: Logger) -> Self {
        Self { client, logger }
    }

    /// Search one index, or every index when `index_uid` is absent or
    /// empty.
    pub async fn search(
        &self,
        query: &str,
        index_uid: Option<&str>,
        params: &SearchParams,
    ) -> Result<SearchOutcome> {
        match index_uid.filter(|uid| !uid.is_empty()) {
            Some(uid) => self
                .search_index(uid, query, params)
                .await
                .map(SearchOutcome::Single)
                .map_err(Error::failed("search")),
            None => self.search_all(query, params).await.map(SearchOutcome::Multi),
        }
    }

    async fn search_index(&self, uid: &str, query: &str, params: &SearchParams) -> Result<Value> {
        self.client
            .post(["indexes", uid, "search"], params.body(query))
            .await
    }

    async fn search_all(&self, query: &str, params: &SearchParams) -> Result<MultiIndexResults> {
        let request =
            ApiRequest::new(Method::GET, ["indexes"]).with_query("limit", Some(MAX_INDEXES));
        let listing = self
            .client
            .send(request)
            .await
            .map_err(Error::failed("search"))?;

        let uids: Vec<String> = listing
            .get("results")
            .and_then(Value::as_array)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|index| index.get("uid").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut results = Map::new();
        for uid in uids {
            match self.search_index(&uid, query, params).await {
                Ok(response) => {
                    let has_hits = response
                        .get("hits")
                        .and_then(Value::as_array)
                        .is_some_and(|hits| !hits.is_empty());
                    if has_hits {
                        results.insert(uid, response);
                    }
                }
                Err(e) => {
                    self.logger.warn(
                        &format!("Failed to search index {uid}"),
                        json!({ "index_uid": uid, "error": e.to_string() }),
                    );
                }
            }
        }

        Ok(MultiIndexResults {
            multi_index: true,
            query: query.to_string(),
            results,
        })
    }
}
