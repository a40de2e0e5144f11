//! MCP boundary: protocol types, transports, and the server loop

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{
    ContentBlock, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpTool, RequestId,
    ToolCallParams, ToolCallResult, ToolsListResult,
};
pub use server::{McpServer, McpServerConfig};
pub use transport::{MemoryTransport, StdioTransport, Transport};
