//! Error types for flowbridge operations

/// Result type for flowbridge operations
pub type Result<T> = std::result::Result<T, FlowBridgeError>;

/// Error types for the workflow-to-tool adapter
#[derive(Debug, thiserror::Error)]
pub enum FlowBridgeError {
    /// Flow configuration file missing or unreadable
    #[error("Flow configuration not found: {0}")]
    ConfigNotFound(String),

    /// Flow configuration present but malformed
    #[error("Invalid flow configuration: {0}")]
    ConfigInvalid(String),

    /// Two flows share the same tool name
    #[error("Duplicate flow name: {0}")]
    DuplicateFlow(String),

    /// Tool call named a flow that is not in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool call arguments failed the required-parameter check
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Remote API answered with a non-success status
    #[error("Remote API error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// A decoded stream chunk did not carry the expected delta shape
    #[error("Malformed response chunk: {0}")]
    MalformedChunk(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
