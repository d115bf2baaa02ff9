//! MCP surface: tools, the settings prompt and per-index resources.

use std::sync::Arc;

use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    AnnotateAble, CallToolRequestParams, CallToolResult, Content, GetPromptRequestParams,
    GetPromptResult, Implementation, ListPromptsResult, ListResourcesResult, ListToolsResult,
    PaginatedRequestParams, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
    ProtocolVersion, RawResource, ReadResourceRequestParams, ReadResourceResult, Resource,
    ResourceContents, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer};
use serde_json::{json, Map, Value};

use crate::error::ErrorKind;
use crate::prompts;
use crate::resources::{ResourceKind, ResourceUri};
use crate::tools::{Dispatcher, ToolDescriptor};

/// Largest index page fetched when listing resources.
const RESOURCE_INDEX_LIMIT: u64 = 1000;

#[derive(Clone)]
pub struct MeiliMcpServer {
    dispatcher: Arc<Dispatcher>,
}

impl MeiliMcpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher.list_tools().iter().map(to_tool).collect()
    }

    /// Run a tool.  Failures come back as error results, never as
    /// protocol errors.
    pub async fn run_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> CallToolResult {
        let output = self.dispatcher.call_tool(name, arguments).await;
        let content = vec![Content::text(output.text)];
        if output.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }

    pub fn prompts(&self) -> Result<Vec<Prompt>, McpError> {
        Ok(vec![optimize_settings_prompt()?])
    }

    pub fn prompt(
        &self,
        name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<GetPromptResult, McpError> {
        let text = prompts::render(name, arguments)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        Ok(GetPromptResult {
            description: Some(prompts::DESCRIPTION.to_string()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }

    /// Three resources (stats, settings, tasks) per index.
    pub async fn resources(&self) -> Result<Vec<Resource>, McpError> {
        let managers = self.dispatcher.connection().managers();
        let indexes = managers
            .indexes
            .list_indexes(None, Some(RESOURCE_INDEX_LIMIT))
            .await
            .map_err(to_mcp_error)?;
        Ok(indexes
            .results
            .iter()
            .flat_map(|index| {
                ResourceKind::ALL
                    .into_iter()
                    .map(move |kind| index_resource(&index.uid, kind))
            })
            .collect())
    }

    pub async fn resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let parsed = ResourceUri::parse(uri).map_err(|e| {
            McpError::resource_not_found(e.to_string(), Some(json!({ "uri": uri })))
        })?;
        let managers = self.dispatcher.connection().managers();
        let text = parsed.read(&managers).await.map_err(to_mcp_error)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

fn to_tool(descriptor: &ToolDescriptor) -> Tool {
    let schema = match &descriptor.input_schema {
        Value::Object(map) => map.clone(),
        _ => Default::default(),
    };
    Tool::new(descriptor.name, descriptor.description, Arc::new(schema))
}

fn optimize_settings_prompt() -> Result<Prompt, McpError> {
    let arguments = prompts::ARGUMENTS
        .iter()
        .map(|(name, description)| {
            serde_json::from_value::<PromptArgument>(json!({
                "name": name,
                "description": description,
                "required": true,
            }))
            .map_err(|e| McpError::internal_error(e.to_string(), None))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Prompt::new(
        prompts::OPTIMIZE_SETTINGS,
        Some(prompts::DESCRIPTION),
        Some(arguments),
    ))
}

fn index_resource(index_uid: &str, kind: ResourceKind) -> Resource {
    let uri = ResourceUri::new(index_uid, kind);
    let mut raw = RawResource::new(uri.to_string(), kind.name(index_uid));
    raw.description = Some(kind.description(index_uid));
    raw.mime_type = Some("text/plain".to_string());
    raw.no_annotation()
}

fn to_mcp_error(err: crate::error::Error) -> McpError {
    match err.kind() {
        ErrorKind::InvalidInput => McpError::invalid_params(err.to_string(), None),
        _ => McpError::internal_error(err.to_string(), None),
    }
}

impl ServerHandler for MeiliMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "meilisearch".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Meilisearch MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Manage a Meilisearch instance: indexes, documents, settings, search, \
                 tasks, API keys and monitoring. Use update-connection-settings to \
                 point the server at another instance."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_tool(&request.name, request.arguments).await)
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(self.prompts()?))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompt(&request.name, request.arguments.as_ref())
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resources().await?))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.resource(&request.uri).await
    }
}
