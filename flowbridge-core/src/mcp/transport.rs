//! MCP transport implementations
//!
//! Transports carry newline-delimited JSON-RPC messages. The stdio
//! transport is what MCP clients launch this server with; the in-memory
//! transport exists for tests.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
use crate::error::Result;

/// Transport trait for MCP communication
#[async_trait]
pub trait Transport: Send + Sync {
    /// Receive the next request, or `None` when the peer disconnects.
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>>;

    /// Send a response to the peer.
    async fn send(&mut self, response: JsonRpcResponse) -> Result<()>;
}

/// Stdio transport: one JSON-RPC message per line on stdin/stdout
pub struct StdioTransport {
    stdin: BufReader<Stdin>,
    stdout: Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(tokio::io::stdin()),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>> {
        loop {
            let mut line = String::new();
            if self.stdin.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str(trimmed) {
                Ok(request) => return Ok(Some(request)),
                Err(err) => {
                    // A bad line must not kill the server; answer with a
                    // parse error and keep reading.
                    tracing::warn!("discarding unparseable request line: {err}");
                    self.send(JsonRpcResponse::error(
                        RequestId::Null,
                        JsonRpcError::parse_error(),
                    ))
                    .await?;
                }
            }
        }
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<()> {
        let json = serde_json::to_string(&response)?;
        self.stdout.write_all(json.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await?;
        Ok(())
    }
}

/// In-memory transport for tests
pub struct MemoryTransport {
    requests: std::collections::VecDeque<JsonRpcRequest>,
    responses: Vec<JsonRpcResponse>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            requests: std::collections::VecDeque::new(),
            responses: Vec::new(),
        }
    }

    /// Queue a request to be received.
    pub fn push_request(&mut self, request: JsonRpcRequest) {
        self.requests.push_back(request);
    }

    /// All responses sent so far.
    pub fn responses(&self) -> &[JsonRpcResponse] {
        &self.responses
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>> {
        Ok(self.requests.pop_front())
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<()> {
        self.responses.push(response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport_round_trip() {
        let mut transport = MemoryTransport::new();
        transport.push_request(JsonRpcRequest::new(1i64, "tools/list"));

        let request = transport.receive().await.unwrap().unwrap();
        assert_eq!(request.method, "tools/list");

        transport
            .send(JsonRpcResponse::success(
                RequestId::Number(1),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(transport.responses().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_transport_drained() {
        let mut transport = MemoryTransport::new();
        assert!(transport.receive().await.unwrap().is_none());
    }
}
