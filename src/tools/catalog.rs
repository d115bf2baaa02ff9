//! Static catalog of tool descriptors.

use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::args::*;

/// A named, schema-bearing tool definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema object for the tool's arguments.
    pub input_schema: Value,
}

fn schema<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
    if let Some(obj) = schema.as_object_mut() {
        // Clients only need the object schema itself.
        obj.remove("$schema");
        obj.remove("title");
        obj.entry("properties")
            .or_insert_with(|| Value::Object(Default::default()));
    }
    schema
}

fn tool<T: JsonSchema>(name: &'static str, description: &'static str) -> ToolDescriptor {
    ToolDescriptor {
        name,
        description,
        input_schema: schema::<T>(),
    }
}

/// Every tool, in a stable order.  Built on first use.
pub fn catalog() -> &'static [ToolDescriptor] {
    static CATALOG: OnceLock<Vec<ToolDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(build)
}

#[cfg(test)]
fn find(name: &str) -> Option<&'static ToolDescriptor> {
    catalog().iter().find(|t| t.name == name)
}

fn build() -> Vec<ToolDescriptor> {
    vec![
        // ── connection ──
        tool::<NoArgs>(
            "get-connection-settings",
            "Get current Meilisearch connection settings",
        ),
        tool::<ConnectionArgs>(
            "update-connection-settings",
            "Update Meilisearch connection settings",
        ),
        tool::<NoArgs>("health-check", "Check Meilisearch server health"),
        tool::<NoArgs>("get-version", "Get Meilisearch version information"),
        tool::<NoArgs>("get-stats", "Get database statistics"),
        // ── indexes ──
        tool::<CreateIndexArgs>("create-index", "Create a new Meilisearch index"),
        tool::<PageArgs>("list-indexes", "List all Meilisearch indexes"),
        tool::<UidArgs>("get-index", "Get information about an index"),
        tool::<UpdateIndexArgs>("update-index", "Change the primary key of an index"),
        tool::<UidArgs>("delete-index", "Delete a Meilisearch index"),
        tool::<SwapIndexesArgs>(
            "swap-indexes",
            "Swap the documents, settings and task history of pairs of indexes",
        ),
        // ── documents ──
        tool::<GetDocumentsArgs>("get-documents", "Get documents from an index"),
        tool::<DocumentArgs>("get-document", "Get one document by its identifier"),
        tool::<DocumentsArgs>("add-documents", "Add documents to an index"),
        tool::<DocumentsArgs>(
            "update-documents",
            "Add documents or partially update existing ones",
        ),
        tool::<DocumentArgs>("delete-document", "Delete one document by its identifier"),
        tool::<DeleteDocumentsArgs>("delete-documents", "Delete several documents by identifier"),
        tool::<IndexArgs>("delete-all-documents", "Delete every document in an index"),
        // ── settings ──
        tool::<IndexArgs>("get-settings", "Get current settings for an index"),
        tool::<UpdateSettingsArgs>("update-settings", "Update settings for an index"),
        tool::<IndexArgs>("reset-settings", "Reset the settings of an index to their defaults"),
        tool::<ApplyTemplateArgs>(
            "apply-template",
            "Apply a predefined settings template (ecommerce, content_search, saas_app) to an index",
        ),
        // ── search ──
        tool::<SearchArgs>(
            "search",
            "Search through Meilisearch indices. If indexUid is not provided, it will search across all indices.",
        ),
        // ── tasks ──
        tool::<TaskArgs>("get-task", "Get information about a specific task"),
        tool::<TaskQueryArgs>("get-tasks", "Get list of tasks with optional filters"),
        tool::<TaskFilterArgs>("cancel-tasks", "Cancel tasks based on filters"),
        tool::<TaskFilterArgs>("delete-tasks", "Delete finished tasks based on filters"),
        // ── keys ──
        tool::<PageArgs>("get-keys", "Get list of API keys"),
        tool::<KeyArgs>("get-key", "Get one API key"),
        tool::<CreateKeyArgs>("create-key", "Create a new API key"),
        tool::<UpdateKeyArgs>("update-key", "Update the name or description of an API key"),
        tool::<KeyArgs>("delete-key", "Delete an API key"),
        // ── monitoring ──
        tool::<NoArgs>(
            "get-health-status",
            "Get comprehensive health status of Meilisearch",
        ),
        tool::<IndexArgs>("get-index-metrics", "Get detailed metrics for an index"),
        tool::<NoArgs>("get-system-info", "Get system-level information"),
    ]
}
