use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::client::{ApiRequest, MeiliClient};
use crate::error::{Error, Result};

/// Query filters shared by the task list, cancel and delete routes.
///
/// List values are sent comma-separated, as Meilisearch expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    pub uids: Option<Vec<u64>>,
    pub index_uids: Option<Vec<String>>,
    pub types: Option<Vec<String>>,
    pub statuses: Option<Vec<String>>,
    pub from: Option<u64>,
    pub limit: Option<u64>,
}

impl TaskFilters {
    pub fn for_index(index_uid: &str) -> Self {
        Self {
            index_uids: Some(vec![index_uid.to_string()]),
            ..Self::default()
        }
    }

    fn is_selective(&self) -> bool {
        self.uids.is_some()
            || self.index_uids.is_some()
            || self.types.is_some()
            || self.statuses.is_some()
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .with_query("uids", self.uids.as_ref().map(|v| join(v)))
            .with_query("indexUids", self.index_uids.as_ref().map(|v| join(v)))
            .with_query("types", self.types.as_ref().map(|v| join(v)))
            .with_query("statuses", self.statuses.as_ref().map(|v| join(v)))
            .with_query("from", self.from)
            .with_query("limit", self.limit)
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub struct TaskManager {
    client: Arc<MeiliClient>,
}

impl TaskManager {
    pub fn new(client: Arc<MeiliClient>) -> Self {
        Self { client }
    }

    pub async fn get_task(&self, task_uid: u64) -> Result<Value> {
        self.client
            .get(["tasks".to_string(), task_uid.to_string()])
            .await
            .map_err(Error::failed("get task"))
    }

    pub async fn get_tasks(&self, filters: &TaskFilters) -> Result<Value> {
        let request = filters.apply(ApiRequest::new(Method::GET, ["tasks"]));
        self.client
            .send(request)
            .await
            .map_err(Error::failed("get tasks"))
    }

    /// Cancel enqueued or processing tasks matching `filters`.
    ///
    /// Meilisearch refuses an unfiltered cancel, so an empty filter set
    /// targets every cancellable status instead.
    pub async fn cancel_tasks(&self, filters: &TaskFilters) -> Result<Value> {
        let filters = if filters.is_selective() {
            filters.clone()
        } else {
            TaskFilters {
                statuses: Some(vec!["enqueued".into(), "processing".into()]),
                ..filters.clone()
            }
        };
        let request = filters.apply(ApiRequest::new(Method::POST, ["tasks", "cancel"]));
        self.client
            .send(request)
            .await
            .map_err(Error::failed("cancel tasks"))
    }

    /// Delete finished tasks matching `filters`.
    pub async fn delete_tasks(&self, filters: &TaskFilters) -> Result<Value> {
        let filters = if filters.is_selective() {
            filters.clone()
        } else {
            TaskFilters {
                statuses: Some(vec!["succeeded".into(), "failed".into(), "canceled".into()]),
                ..filters.clone()
            }
        };
        let request = filters.apply(ApiRequest::new(Method::DELETE, ["tasks"]));
        self.client
            .send(request)
            .await
            .map_err(Error::failed("delete tasks"))
    }
}
