//! MCP server: resolves tool calls against the flow catalog
//!
//! This is the dispatcher boundary of the adapter. Every per-call
//! failure is caught here and turned into a reported failure of that
//! single call; nothing that happens during a tool call may take the
//! process down.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio_stream::StreamExt;

use super::protocol::*;
use super::transport::Transport;
use crate::catalog::{check_arguments, FlowCatalog};
use crate::client::XingchenClient;
use crate::error::{FlowBridgeError, Result};

/// MCP server configuration
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Server name reported in the initialize handshake
    pub name: String,
    /// Server version reported in the initialize handshake
    pub version: String,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            name: "flowbridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// MCP server exposing one tool per configured flow
pub struct McpServer {
    config: McpServerConfig,
    catalog: Arc<FlowCatalog>,
    client: XingchenClient,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    delta: Option<Delta>,
}

#[derive(Deserialize)]
struct Delta {
    content: Option<String>,
}

impl McpServer {
    pub fn new(catalog: Arc<FlowCatalog>, client: XingchenClient) -> Self {
        Self::with_config(McpServerConfig::default(), catalog, client)
    }

    pub fn with_config(
        config: McpServerConfig,
        catalog: Arc<FlowCatalog>,
        client: XingchenClient,
    ) -> Self {
        Self {
            config,
            catalog,
            client,
        }
    }

    /// One tool descriptor per flow, in catalog order.
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.catalog.descriptors()
    }

    /// Invoke the flow registered under `name` and collect its streamed
    /// output into content blocks.
    ///
    /// # Errors
    ///
    /// `UnknownTool` if no flow carries that name, `InvalidArguments` if
    /// a required parameter is absent, `Remote` on a non-success HTTP
    /// status, and `MalformedChunk` if a decoded chunk does not carry
    /// the expected delta shape.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Vec<ContentBlock>> {
        let flow = self
            .catalog
            .resolve(name)
            .ok_or_else(|| FlowBridgeError::UnknownTool(name.to_string()))?;
        check_arguments(flow, arguments)?;

        let mut chunks = self.client.chat_stream(flow, arguments).await?;
        let mut content = Vec::new();
        while let Some(chunk) = chunks.next().await {
            content.push(ContentBlock::text(delta_text(chunk?)?));
        }
        Ok(content)
    }

    /// Handle one JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => JsonRpcResponse::success(request.id, Value::Null),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => JsonRpcResponse::error(request.id, JsonRpcError::method_not_found()),
        }
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: InitializeParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing initialize params"),
                );
            }
        };
        tracing::debug!(
            "initialize from {} {}",
            params.client_info.name,
            params.client_info.version
        );

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
        };

        JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result).unwrap_or(Value::Null),
        )
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.list_tools(),
        };
        JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result).unwrap_or(Value::Null),
        )
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: ToolCallParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid tool call params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing tool call params"),
                );
            }
        };

        match self.call_tool(&params.name, &params.arguments).await {
            Ok(content) => {
                let result = ToolCallResult {
                    content,
                    is_error: None,
                };
                JsonRpcResponse::success(
                    request.id,
                    serde_json::to_value(result).unwrap_or(Value::Null),
                )
            }
            Err(err @ FlowBridgeError::UnknownTool(_)) => {
                JsonRpcResponse::error(request.id, JsonRpcError::tool_not_found(err.to_string()))
            }
            Err(err @ FlowBridgeError::InvalidArguments(_)) => {
                JsonRpcResponse::error(request.id, JsonRpcError::invalid_params(err.to_string()))
            }
            Err(err) => {
                // Execution failures are reported as an errored tool
                // result, not a protocol error.
                tracing::error!("tool call '{}' failed: {err}", params.name);
                let result = ToolCallResult {
                    content: vec![ContentBlock::text(format!("Error: {err}"))],
                    is_error: Some(true),
                };
                JsonRpcResponse::success(
                    request.id,
                    serde_json::to_value(result).unwrap_or(Value::Null),
                )
            }
        }
    }

    /// Drive the server over a transport until the peer disconnects.
    pub async fn run<T: Transport>(&self, mut transport: T) -> Result<()> {
        loop {
            match transport.receive().await {
                Ok(Some(request)) => {
                    let response = self.handle_request(request).await;
                    transport.send(response).await?;
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("transport error: {e}");
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Pull the text delta out of one decoded stream chunk.
fn delta_text(chunk: Value) -> Result<String> {
    let malformed = || FlowBridgeError::MalformedChunk(chunk.to_string());

    let parsed: StreamChunk = serde_json::from_value(chunk.clone()).map_err(|_| malformed())?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .ok_or_else(malformed)
}
