//! Tool dispatcher.
//!
//! [`Dispatcher::call_tool`] validates a `(name, arguments)` pair into a
//! [`ToolCall`], runs it against a snapshot of the connection's
//! managers and renders the outcome as one text block.  This is the
//! only place errors turn into text: every failure becomes
//! `"Error: <message>"` and is logged with the (masked) arguments.

pub mod args;
pub mod catalog;

pub use args::ToolCall;
pub use catalog::{catalog, ToolDescriptor};

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::logs::Logger;
use crate::managers::SearchOutcome;

const MASK: &str = "********";

/// Text payload of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            text: format!("Error: {err}"),
            is_error: true,
        }
    }
}

fn compact<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

/// Replace every `api_key` value with a fixed mask, at any depth.
pub fn mask_secrets(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if k == "api_key" && !v.is_null() {
                        Value::String(MASK.to_string())
                    } else {
                        mask_secrets(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_secrets).collect()),
        other => other.clone(),
    }
}

pub struct Dispatcher {
    connection: Arc<Connection>,
    logger: Logger,
}

impl Dispatcher {
    pub fn new(connection: Arc<Connection>, logger: Logger) -> Self {
        Self { connection, logger }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn list_tools(&self) -> &'static [ToolDescriptor] {
        catalog()
    }

    pub async fn call_tool(&self, name: &str, arguments: Option<Map<String, Value>>) -> ToolOutput {
        let outcome = match ToolCall::parse(name, arguments.as_ref()) {
            Ok(call) => self.execute(call).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(text) => ToolOutput::ok(text),
            Err(e) => {
                let arguments = arguments.map(Value::Object).unwrap_or(Value::Null);
                self.logger.error(
                    &format!("Error executing tool {name}"),
                    json!({
                        "error": e.to_string(),
                        "tool": name,
                        "arguments": mask_secrets(&arguments),
                    }),
                );
                ToolOutput::error(&e)
            }
        }
    }

    async fn execute(&self, call: ToolCall) -> Result<String> {
        let m = self.connection.managers();
        let text = match call {
            ToolCall::GetConnectionSettings => format!(
                "Current connection settings:\n{}",
                self.connection.current_coordinates()
            ),
            ToolCall::UpdateConnectionSettings(a) => {
                let view = self.connection.reconfigure(a.url, a.api_key).await?;
                format!("Successfully updated connection settings to URL: {}", view.url)
            }
            ToolCall::HealthCheck => {
                let state = if self.connection.health_check().await {
                    "available"
                } else {
                    "unavailable"
                };
                format!("Meilisearch is {state}")
            }
            ToolCall::GetVersion => format!("Version info: {}", compact(&m.monitoring.version().await?)),
            ToolCall::GetStats => format!("Database stats: {}", compact(&m.monitoring.stats().await?)),

            ToolCall::CreateIndex(a) => {
                let task = m.indexes.create_index(&a.uid, a.primary_key.as_deref()).await?;
                format!("Created index: {}", compact(&task))
            }
            ToolCall::ListIndexes(a) => {
                let list = m.indexes.list_indexes(a.offset, a.limit).await?;
                format!("Indexes:\n{}", pretty(&list))
            }
            ToolCall::GetIndex(a) => format!("Index: {}", compact(&m.indexes.get_index(&a.uid).await?)),
            ToolCall::UpdateIndex(a) => {
                let task = m.indexes.update_index(&a.uid, &a.primary_key).await?;
                format!("Index updated: {}", compact(&task))
            }
            ToolCall::DeleteIndex(a) => {
                let task = m.indexes.delete_index(&a.uid).await?;
                format!("Deletion task created: {}", compact(&task))
            }
            ToolCall::SwapIndexes(a) => {
                let task = m.indexes.swap_indexes(&a.swaps).await?;
                format!("Swap task created: {}", compact(&task))
            }

            ToolCall::GetDocuments(a) => {
                let docs = m
                    .documents
                    .get_documents(&a.index_uid, a.offset, a.limit, a.fields.as_deref())
                    .await?;
                format!("Documents: {}", compact(&docs))
            }
            ToolCall::GetDocument(a) => {
                let doc = m
                    .documents
                    .get_document(&a.index_uid, &a.document_id.to_string())
                    .await?;
                format!("Document: {}", compact(&doc))
            }
            ToolCall::AddDocuments(a) => {
                let docs = a.documents.into_iter().map(Value::Object).collect();
                let task = m
                    .documents
                    .add_documents(&a.index_uid, docs, a.primary_key.as_deref())
                    .await?;
                format!("Added documents: {}", compact(&task))
            }
            ToolCall::UpdateDocuments(a) => {
                let docs = a.documents.into_iter().map(Value::Object).collect();
                let task = m
                    .documents
                    .update_documents(&a.index_uid, docs, a.primary_key.as_deref())
                    .await?;
                format!("Updated documents: {}", compact(&task))
            }
            ToolCall::DeleteDocument(a) => {
                let task = m
                    .documents
                    .delete_document(&a.index_uid, &a.document_id.to_string())
                    .await?;
                format!("Document deletion task created: {}", compact(&task))
            }
            ToolCall::DeleteDocuments(a) => {
                let ids: Vec<String> = a.document_ids.iter().map(ToString::to_string).collect();
                let task = m.documents.delete_documents(&a.index_uid, &ids).await?;
                format!("Document deletion task created: {}", compact(&task))
            }
            ToolCall::DeleteAllDocuments(a) => {
                let task = m.documents.delete_all_documents(&a.index_uid).await?;
                format!("All documents deletion task created: {}", compact(&task))
            }

            ToolCall::GetSettings(a) => {
                format!("Current settings: {}", compact(&m.settings.get_settings(&a.index_uid).await?))
            }
            ToolCall::UpdateSettings(a) => {
                let task = m
                    .settings
                    .update_settings(&a.index_uid, Value::Object(a.settings))
                    .await?;
                format!("Settings updated: {}", compact(&task))
            }
            ToolCall::ResetSettings(a) => {
                format!("Settings reset: {}", compact(&m.settings.reset_settings(&a.index_uid).await?))
            }
            ToolCall::ApplyTemplate(a) => {
                let task = m.settings.apply_template(&a.index_uid, a.template).await?;
                format!(
                    "Applied {} template to index {}: {}",
                    a.template,
                    a.index_uid,
                    compact(&task)
                )
            }

            ToolCall::Search(a) => {
                let outcome = m
                    .search
                    .search(&a.query, a.index_uid.as_deref(), &a.params())
                    .await?;
                let body = match &outcome {
                    SearchOutcome::Single(v) => pretty(v),
                    SearchOutcome::Multi(multi) => pretty(multi),
                };
                format!("Search results for '{}':\n{body}", a.query)
            }

            ToolCall::GetTask(a) => {
                format!("Task information: {}", compact(&m.tasks.get_task(a.task_uid).await?))
            }
            ToolCall::GetTasks(a) => {
                format!("Tasks: {}", compact(&m.tasks.get_tasks(&a.into()).await?))
            }
            ToolCall::CancelTasks(a) => {
                format!("Tasks cancelled: {}", compact(&m.tasks.cancel_tasks(&a.into()).await?))
            }
            ToolCall::DeleteTasks(a) => {
                format!("Tasks deleted: {}", compact(&m.tasks.delete_tasks(&a.into()).await?))
            }

            ToolCall::GetKeys(a) => {
                format!("API keys: {}", compact(&m.keys.get_keys(a.offset, a.limit).await?))
            }
            ToolCall::GetKey(a) => format!("API key: {}", compact(&m.keys.get_key(&a.key).await?)),
            ToolCall::CreateKey(a) => {
                let key = m.keys.create_key(&a.into()).await?;
                format!("Created API key: {}", compact(&key))
            }
            ToolCall::UpdateKey(a) => {
                let key = m
                    .keys
                    .update_key(&a.key, a.name.as_deref(), a.description.as_deref())
                    .await?;
                format!("Updated API key: {}", compact(&key))
            }
            ToolCall::DeleteKey(a) => {
                m.keys.delete_key(&a.key).await?;
                format!("Successfully deleted API key: {}", a.key)
            }

            ToolCall::GetHealthStatus => {
                let status = m.monitoring.health_status().await?;
                self.logger.info("Health status checked", json!({ "status": status }));
                format!("Health status: {}", compact(&status))
            }
            ToolCall::GetIndexMetrics(a) => {
                let metrics = m.monitoring.index_metrics(&a.index_uid).await?;
                self.logger.info(
                    "Index metrics retrieved",
                    json!({ "index": a.index_uid, "metrics": metrics }),
                );
                format!("Index metrics: {}", compact(&metrics))
            }
            ToolCall::GetSystemInfo => {
                let info = m.monitoring.system_information().await?;
                self.logger.info("System information retrieved", json!({ "info": info }));
                format!("System information: {}", compact(&info))
            }
        };
        Ok(text)
    }
}
