//! In-memory stand-in for a Meilisearch instance.
//!
//! `FakeMeili` implements [`Transport`] over a small mutable state:
//! an ordered index list, per-index settings and scripted search
//! behaviour.  Every request is recorded with the base URL it was
//! sent to so tests can check which coordinates a call used.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use meilisearch_mcp::client::{ApiRequest, Coordinates, Transport};
use meilisearch_mcp::connection::Connection;
use meilisearch_mcp::logs::Logger;
use meilisearch_mcp::Error;
use reqwest::Method;
use serde_json::{json, Map, Value};

pub const BASE_URL: &str = "http://meili-a:7700";

/// A request as seen by the fake.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub base_url: String,
    pub api_key: Option<String>,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum SearchScript {
    Hits(Vec<Value>),
    Fail(String),
}

#[derive(Default)]
struct State {
    indexes: Vec<String>,
    settings: HashMap<String, Map<String, Value>>,
    search: HashMap<String, SearchScript>,
    requests: Vec<Recorded>,
    unreachable: bool,
    next_task: u64,
}

#[derive(Default)]
pub struct FakeMeili {
    state: Mutex<State>,
}

impl FakeMeili {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_index(&self, uid: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.indexes.iter().any(|i| i == uid) {
            state.indexes.push(uid.to_string());
        }
    }

    pub fn script_search(&self, uid: &str, script: SearchScript) {
        self.add_index(uid);
        self.state
            .lock()
            .unwrap()
            .search
            .insert(uid.to_string(), script);
    }

    /// Make every request fail as if the host were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }
}

fn not_found(uid: &str) -> Error {
    Error::Remote {
        status: 404,
        code: Some("index_not_found".into()),
        message: format!("Index `{uid}` not found."),
    }
}

impl State {
    fn task(&mut self, index_uid: Option<&str>, kind: &str) -> Value {
        self.next_task += 1;
        json!({
            "taskUid": self.next_task,
            "indexUid": index_uid,
            "status": "enqueued",
            "type": kind,
            "enqueuedAt": "2024-01-01T00:00:00Z",
        })
    }

    fn require_index(&self, uid: &str) -> Result<(), Error> {
        if self.indexes.iter().any(|i| i == uid) {
            Ok(())
        } else {
            Err(not_found(uid))
        }
    }

    fn route(&mut self, request: &ApiRequest) -> Result<Value, Error> {
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let method = request.method.clone();
        match (method, segments.as_slice()) {
            (Method::GET, ["health"]) => Ok(json!({"status": "available"})),
            (Method::GET, ["version"]) => Ok(json!({
                "commitSha": "b46889b5f0f2f8b91438a08a358ba8f05fc09fc1",
                "commitDate": "2024-01-01T00:00:00Z",
                "pkgVersion": "1.6.0",
            })),
            (Method::GET, ["stats"]) => {
                let indexes: Map<String, Value> = self
                    .indexes
                    .iter()
                    .map(|uid| {
                        (
                            uid.clone(),
                            json!({"numberOfDocuments": 2, "isIndexing": false, "fieldDistribution": {"id": 2}}),
                        )
                    })
                    .collect();
                Ok(json!({
                    "databaseSize": 4096,
                    "lastUpdate": "2024-01-01T00:00:00Z",
                    "indexes": indexes,
                }))
            }
            (Method::GET, ["indexes"]) => {
                let results: Vec<Value> = self
                    .indexes
                    .iter()
                    .map(|uid| {
                        json!({
                            "uid": uid,
                            "primaryKey": "id",
                            "createdAt": "2024-01-01T00:00:00Z",
                            "updatedAt": "2024-01-02T00:00:00Z",
                        })
                    })
                    .collect();
                let total = results.len();
                Ok(json!({"results": results, "offset": 0, "limit": 20, "total": total}))
            }
            (Method::POST, ["indexes"]) => {
                let uid = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("uid"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if !self.indexes.contains(&uid) {
                    self.indexes.push(uid.clone());
                }
                Ok(self.task(Some(&uid), "indexCreation"))
            }
            (Method::GET, ["indexes", uid]) => {
                self.require_index(uid)?;
                Ok(json!({
                    "uid": uid,
                    "primaryKey": "id",
                    "createdAt": "2024-01-01T00:00:00Z",
                    "updatedAt": "2024-01-02T00:00:00Z",
                }))
            }
            (Method::GET, ["indexes", uid, "settings"]) => {
                self.require_index(uid)?;
                let mut settings = json!({
                    "rankingRules": ["words", "typo", "proximity", "attribute", "sort", "exactness"],
                    "distinctAttribute": null,
                });
                if let Some(stored) = self.settings.get(*uid) {
                    for (k, v) in stored {
                        settings[k] = v.clone();
                    }
                }
                Ok(settings)
            }
            (Method::PATCH, ["indexes", uid, "settings"]) => {
                self.require_index(uid)?;
                if let Some(Value::Object(patch)) = &request.body {
                    let stored = self.settings.entry(uid.to_string()).or_default();
                    for (k, v) in patch {
                        stored.insert(k.clone(), v.clone());
                    }
                }
                Ok(self.task(Some(*uid), "settingsUpdate"))
            }
            (Method::DELETE, ["indexes", uid, "settings"]) => {
                self.require_index(uid)?;
                self.settings.remove(*uid);
                Ok(self.task(Some(*uid), "settingsUpdate"))
            }
            (Method::GET, ["indexes", uid, "stats"]) => {
                self.require_index(uid)?;
                Ok(json!({
                    "numberOfDocuments": 2,
                    "isIndexing": false,
                    "fieldDistribution": {"id": 2, "title": 2},
                }))
            }
            (Method::POST, ["indexes", uid, "search"]) => {
                self.require_index(uid)?;
                let query = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("q"))
                    .cloned()
                    .unwrap_or(Value::Null);
                match self.search.get(*uid) {
                    Some(SearchScript::Fail(message)) => Err(Error::Remote {
                        status: 500,
                        code: Some("internal".into()),
                        message: message.clone(),
                    }),
                    Some(SearchScript::Hits(hits)) => Ok(json!({
                        "hits": hits,
                        "query": query,
                        "processingTimeMs": 1,
                        "limit": 20,
                        "offset": 0,
                        "estimatedTotalHits": hits.len(),
                    })),
                    None => Ok(json!({
                        "hits": [],
                        "query": query,
                        "processingTimeMs": 0,
                        "limit": 20,
                        "offset": 0,
                        "estimatedTotalHits": 0,
                    })),
                }
            }
            (Method::GET, ["tasks"]) => Ok(json!({
                "results": [],
                "total": 0,
                "limit": 20,
                "from": null,
                "next": null,
            })),
            (Method::DELETE, ["indexes", uid]) => {
                self.require_index(uid)?;
                self.indexes.retain(|i| i != uid);
                Ok(self.task(Some(*uid), "indexDeletion"))
            }
            (_, ["indexes", uid, ..]) => {
                let uid = uid.to_string();
                self.require_index(&uid)?;
                Ok(self.task(Some(&uid), "documentAdditionOrUpdate"))
            }
            _ => Ok(self.task(None, "other")),
        }
    }
}

#[async_trait]
impl Transport for FakeMeili {
    async fn send(
        &self,
        coordinates: &Coordinates,
        request: ApiRequest,
    ) -> meilisearch_mcp::Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded {
            base_url: coordinates.url.clone(),
            api_key: coordinates.api_key.clone(),
            method: request.method.clone(),
            path: request.path(),
            query: request.query.clone(),
            body: request.body.clone(),
        });
        if state.unreachable {
            return Err(Error::Transport {
                message: format!("error sending request for url ({})", coordinates.url),
            });
        }
        state.route(&request)
    }
}

/// Connection over `fake` at [`BASE_URL`] with a console-only logger.
pub fn connection(fake: &Arc<FakeMeili>) -> Arc<Connection> {
    connection_with_logger(fake, Logger::console("test"))
}

pub fn connection_with_logger(fake: &Arc<FakeMeili>, logger: Logger) -> Arc<Connection> {
    let coordinates = Coordinates::new(BASE_URL, Some("masterKey".into()));
    Arc::new(Connection::new(coordinates, fake.clone(), logger).unwrap())
}

/// All JSON records written under `dir`, in file order.
pub fn read_records(dir: &Path) -> Vec<Value> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
        .collect();
    files.sort();
    files
        .iter()
        .flat_map(|p| {
            std::fs::read_to_string(p)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str::<Value>(l).unwrap())
                .collect::<Vec<_>>()
        })
        .collect()
}
