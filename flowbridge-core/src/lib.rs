//! # Flowbridge - Remote Workflows as Callable Tools
//!
//! Flowbridge exposes a catalog of remotely-hosted workflow endpoints as
//! MCP tools. A declarative YAML configuration becomes the tool catalog;
//! each tool call becomes an HTTP request against the workflow API, with
//! streaming responses translated into ordered text content.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use flowbridge_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let flows = load_flows("flows.yaml")?;
//!     let catalog = Arc::new(FlowCatalog::build(flows)?);
//!     let server = McpServer::new(catalog, XingchenClient::new());
//!     server.run(StdioTransport::new()).await
//! }
//! ```
//!
//! ## Architecture
//!
//! - **config**: loads and validates the flow configuration document
//! - **catalog**: immutable flow collection with name lookup and
//!   input-schema derivation
//! - **client**: outbound HTTP requests, streaming and non-streaming
//! - **stream**: event-stream decoding with per-frame failure isolation
//! - **mcp**: the JSON-RPC boundary that lists and dispatches tools
//!
//! The catalog is built once at startup and read-only afterwards, so
//! concurrent tool calls share it without locking.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod stream;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{check_arguments, input_schema, FlowCatalog};
    pub use crate::client::{ChunkStream, XingchenClient, DEFAULT_BASE_URL};
    pub use crate::config::{load_flows, Flow, Param, ParamType};
    pub use crate::error::{FlowBridgeError, Result};
    pub use crate::mcp::{
        ContentBlock, McpServer, McpServerConfig, McpTool, MemoryTransport, StdioTransport,
        Transport,
    };
    pub use crate::stream::decode_chunks;
}
