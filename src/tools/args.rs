//! Typed tool arguments.
//!
//! Every tool's argument object is deserialized into one of these
//! structs before any handler runs.  The same structs generate the
//! JSON Schemas advertised in the catalog, so the contract a client
//! sees and the one enforced here cannot drift apart.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::managers::{KeyOptions, SearchParams, TaskFilters};
use crate::templates::SettingsTemplate;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
pub struct NoArgs {}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
pub struct ConnectionArgs {
    /// New Meilisearch base URL.
    #[serde(default)]
    pub url: Option<String>,
    /// New API key.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexArgs {
    pub uid: String,
    #[serde(default)]
    pub primary_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
pub struct PageArgs {
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UidArgs {
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIndexArgs {
    pub uid: String,
    pub primary_key: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct SwapIndexesArgs {
    /// Pairs of index uids whose contents are exchanged.
    pub swaps: Vec<[String; 2]>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexArgs {
    pub index_uid: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetDocumentsArgs {
    pub index_uid: String,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    /// Attributes to include in each returned document.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

/// Document identifiers may be strings or integers.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DocumentId {
    Number(u64),
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(n) => write!(f, "{n}"),
            DocumentId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentArgs {
    pub index_uid: String,
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsArgs {
    pub index_uid: String,
    pub documents: Vec<Map<String, Value>>,
    #[serde(default)]
    pub primary_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocumentsArgs {
    pub index_uid: String,
    pub document_ids: Vec<DocumentId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsArgs {
    pub index_uid: String,
    /// Partial settings object; omitted settings are left unchanged.
    pub settings: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateArgs {
    pub index_uid: String,
    pub template: SettingsTemplate,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    pub query: String,
    /// Index to search; every index is searched when omitted.
    #[serde(default)]
    pub index_uid: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    /// Meilisearch filter expression.
    #[serde(default)]
    pub filter: Option<String>,
    /// Sort rules such as `price:asc`.
    #[serde(default)]
    pub sort: Option<Vec<String>>,
}

impl SearchArgs {
    pub fn params(&self) -> SearchParams {
        let defaults = SearchParams::default();
        SearchParams {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskArgs {
    pub task_uid: u64,
}

/// Accepts either a JSON array or a comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput<T> {
    Many(Vec<T>),
    Joined(String),
}

fn list<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
    T::Err: fmt::Display,
{
    match Option::<ListInput<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ListInput::Many(values)) => Ok(Some(values)),
        Some(ListInput::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<T>().map_err(serde::de::Error::custom))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Some),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryArgs {
    #[serde(default, deserialize_with = "list")]
    pub index_uids: Option<Vec<String>>,
    /// Task types, e.g. `documentAdditionOrUpdate`.
    #[serde(default, deserialize_with = "list")]
    pub types: Option<Vec<String>>,
    /// Task statuses, e.g. `enqueued`, `failed`.
    #[serde(default, deserialize_with = "list")]
    pub statuses: Option<Vec<String>>,
    /// Uid of the first task returned.
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl From<TaskQueryArgs> for TaskFilters {
    fn from(args: TaskQueryArgs) -> Self {
        TaskFilters {
            index_uids: args.index_uids,
            types: args.types,
            statuses: args.statuses,
            from: args.from,
            limit: args.limit,
            ..TaskFilters::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilterArgs {
    #[serde(default, deserialize_with = "list")]
    pub uids: Option<Vec<u64>>,
    #[serde(default, deserialize_with = "list")]
    pub index_uids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "list")]
    pub types: Option<Vec<String>>,
    #[serde(default, deserialize_with = "list")]
    pub statuses: Option<Vec<String>>,
}

impl From<TaskFilterArgs> for TaskFilters {
    fn from(args: TaskFilterArgs) -> Self {
        TaskFilters {
            uids: args.uids,
            index_uids: args.index_uids,
            types: args.types,
            statuses: args.statuses,
            ..TaskFilters::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct KeyArgs {
    /// Key value or uid.
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyArgs {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Permitted actions, e.g. `search` or `*`.
    pub actions: Vec<String>,
    /// Index uids the key applies to, or `*`.
    pub indexes: Vec<String>,
    /// RFC 3339 expiry; the key never expires when omitted.
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl From<CreateKeyArgs> for KeyOptions {
    fn from(args: CreateKeyArgs) -> Self {
        KeyOptions {
            name: args.name,
            description: args.description,
            actions: args.actions,
            indexes: args.indexes,
            expires_at: args.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateKeyArgs {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    GetConnectionSettings,
    UpdateConnectionSettings(ConnectionArgs),
    HealthCheck,
    GetVersion,
    GetStats,
    CreateIndex(CreateIndexArgs),
    ListIndexes(PageArgs),
    GetIndex(UidArgs),
    UpdateIndex(UpdateIndexArgs),
    DeleteIndex(UidArgs),
    SwapIndexes(SwapIndexesArgs),
    GetDocuments(GetDocumentsArgs),
    GetDocument(DocumentArgs),
    AddDocuments(DocumentsArgs),
    UpdateDocuments(DocumentsArgs),
    DeleteDocument(DocumentArgs),
    DeleteDocuments(DeleteDocumentsArgs),
    DeleteAllDocuments(IndexArgs),
    GetSettings(IndexArgs),
    UpdateSettings(UpdateSettingsArgs),
    ResetSettings(IndexArgs),
    ApplyTemplate(ApplyTemplateArgs),
    Search(SearchArgs),
    GetTask(TaskArgs),
    GetTasks(TaskQueryArgs),
    CancelTasks(TaskFilterArgs),
    DeleteTasks(TaskFilterArgs),
    GetKeys(PageArgs),
    GetKey(KeyArgs),
    CreateKey(CreateKeyArgs),
    UpdateKey(UpdateKeyArgs),
    DeleteKey(KeyArgs),
    GetHealthStatus,
    GetIndexMetrics(IndexArgs),
    GetSystemInfo,
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| Error::invalid_arguments(tool, e.to_string()))
}

impl ToolCall {
    /// Resolve `name` and validate `arguments` against its contract.
    ///
    /// Missing arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: Option<&Map<String, Value>>) -> Result<Self> {
        let empty = Map::new();
        let a = arguments.unwrap_or(&empty);
        let call = match name {
            "get-connection-settings" => {
                decode::<NoArgs>(name, a)?;
                ToolCall::GetConnectionSettings
            }
            "update-connection-settings" => ToolCall::UpdateConnectionSettings(decode(name, a)?),
            "health-check" => {
                decode::<NoArgs>(name, a)?;
                ToolCall::HealthCheck
            }
            "get-version" => {
                decode::<NoArgs>(name, a)?;
                ToolCall::GetVersion
            }
            "get-stats" => {
                decode::<NoArgs>(name, a)?;
                ToolCall::GetStats
            }
            "create-index" => ToolCall::CreateIndex(decode(name, a)?),
            "list-indexes" => ToolCall::ListIndexes(decode(name, a)?),
            "get-index" => ToolCall::GetIndex(decode(name, a)?),
            "update-index" => ToolCall::UpdateIndex(decode(name, a)?),
            "delete-index" => ToolCall::DeleteIndex(decode(name, a)?),
            "swap-indexes" => ToolCall::SwapIndexes(decode(name, a)?),
            "get-documents" => ToolCall::GetDocuments(decode(name, a)?),
            "get-document" => ToolCall::GetDocument(decode(name, a)?),
            "add-documents" => ToolCall::AddDocuments(decode(name, a)?),
            "update-documents" => ToolCall::UpdateDocuments(decode(name, a)?),
            "delete-document" => ToolCall::DeleteDocument(decode(name, a)?),
            "delete-documents" => ToolCall::DeleteDocuments(decode(name, a)?),
            "delete-all-documents" => ToolCall::DeleteAllDocuments(decode(name, a)?),
            "get-settings" => ToolCall::GetSettings(decode(name, a)?),
            "update-settings" => ToolCall::UpdateSettings(decode(name, a)?),
            "reset-settings" => ToolCall::ResetSettings(decode(name, a)?),
            "apply-template" => ToolCall::ApplyTemplate(decode(name, a)?),
            "search" => ToolCall::Search(decode(name, a)?),
            "get-task" => ToolCall::GetTask(decode(name, a)?),
            "get-tasks" => ToolCall::GetTasks(decode(name, a)?),
            "cancel-tasks" => ToolCall::CancelTasks(decode(name, a)?),
            "delete-tasks" => ToolCall::DeleteTasks(decode(name, a)?),
            "get-keys" => ToolCall::GetKeys(decode(name, a)?),
            "get-key" => ToolCall::GetKey(decode(name, a)?),
            "create-key" => ToolCall::CreateKey(decode(name, a)?),
            "update-key" => ToolCall::UpdateKey(decode(name, a)?),
            "delete-key" => ToolCall::DeleteKey(decode(name, a)?),
            "get-health-status" => {
                decode::<NoArgs>(name, a)?;
                ToolCall::GetHealthStatus
            }
            "get-index-metrics" => ToolCall::GetIndexMetrics(decode(name, a)?),
            "get-system-info" => {
                decode::<NoArgs>(name, a)?;
                ToolCall::GetSystemInfo
            }
            other => return Err(Error::UnknownTool(other.to_string())),
        };
        Ok(call)
    }
}
