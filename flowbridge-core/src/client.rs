//! HTTP client for the Xingchen workflow API

use futures::Stream;
use serde::Serialize;
use serde_json::{Map, Value};
use std::pin::Pin;
use tokio_stream::StreamExt;

use crate::config::Flow;
use crate::error::{FlowBridgeError, Result};
use crate::stream::decode_chunks;

/// Production endpoint for the workflow API
pub const DEFAULT_BASE_URL: &str = "https://xingchen-api.xf-yun.com";

/// Lazy, single-pass sequence of decoded response chunks.
///
/// Dropping the stream closes the underlying HTTP connection, which is
/// how a cancelled tool-call turn releases its resources.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send>>;

/// Client for issuing chat requests against remotely-hosted flows
pub struct XingchenClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    flow_id: &'a str,
    parameters: &'a Map<String, Value>,
    stream: bool,
}

impl XingchenClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_chat(
        &self,
        flow: &Flow,
        inputs: &Map<String, Value>,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let url = format!("{}/workflow/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", flow.credential))
            .header("Content-Type", "application/json")
            .json(&ChatRequest {
                flow_id: &flow.id,
                parameters: inputs,
                stream,
            })
            .send()
            .await?;

        error_for_status(response).await
    }

    /// Issue a non-streaming chat request and return the decoded body.
    pub async fn chat_message(&self, flow: &Flow, inputs: &Map<String, Value>) -> Result<Value> {
        let response = self.send_chat(flow, inputs, false).await?;
        Ok(response.json().await?)
    }

    /// Issue a streaming chat request.
    ///
    /// Returns a lazy stream of decoded chunks as delivered by the
    /// transport; the stream ends when the remote closes the connection.
    /// No retry is attempted on failure.
    pub async fn chat_stream(
        &self,
        flow: &Flow,
        inputs: &Map<String, Value>,
    ) -> Result<ChunkStream> {
        let response = self.send_chat(flow, inputs, true).await?;

        let bytes_stream = response.bytes_stream();
        let reader = tokio_util::io::StreamReader::new(
            bytes_stream.map(|r| r.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))),
        );

        Ok(Box::pin(decode_chunks(reader)))
    }

    /// Fetch remote metadata for a flow (description, parameters).
    pub async fn flow_info(&self, flow: &Flow) -> Result<Value> {
        let url = format!("{}/workflow/v1/flows/{}", self.base_url, flow.id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", flow.credential))
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }
}

impl Default for XingchenClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(FlowBridgeError::Remote {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_stream::StreamExt;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_flow() -> Flow {
        Flow {
            id: "flow-123".to_string(),
            name: "weather".to_string(),
            description: "Weather lookup".to_string(),
            credential: "key:secret".to_string(),
            parameters: Vec::new(),
        }
    }

    fn inputs() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("city".to_string(), json!("Berlin"));
        map
    }

    #[test]
    fn test_client_defaults_to_production_endpoint() {
        let client = XingchenClient::new();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_chat_message_returns_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workflow/v1/chat/completions"))
            .and(header("Authorization", "Bearer key:secret"))
            .and(body_json(json!({
                "flow_id": "flow-123",
                "parameters": {"city": "Berlin"},
                "stream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"x": 1})))
            .mount(&server)
            .await;

        let client = XingchenClient::with_base_url(server.uri());
        let body = client.chat_message(&test_flow(), &inputs()).await.unwrap();
        assert_eq!(body, json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workflow/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = XingchenClient::with_base_url(server.uri());
        let result = client.chat_message(&test_flow(), &inputs()).await;

        match result {
            Err(FlowBridgeError::Remote { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected Remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_stream_yields_decoded_chunks() {
        let server = MockServer::start().await;
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n";
        Mock::given(method("POST"))
            .and(path("/workflow/v1/chat/completions"))
            .and(body_json(json!({
                "flow_id": "flow-123",
                "parameters": {"city": "Berlin"},
                "stream": true,
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"),
            )
            .mount(&server)
            .await;

        let client = XingchenClient::with_base_url(server.uri());
        let stream = client.chat_stream(&test_flow(), &inputs()).await.unwrap();
        let chunks: Vec<Value> = stream.map(|c| c.unwrap()).collect().await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0]["choices"][0]["delta"]["content"], json!("a"));
        assert_eq!(chunks[1]["choices"][0]["delta"]["content"], json!("b"));
    }

    #[tokio::test]
    async fn test_chat_stream_rejects_error_status_before_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workflow/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = XingchenClient::with_base_url(server.uri());
        let result = client.chat_stream(&test_flow(), &inputs()).await;
        assert!(matches!(
            result,
            Err(FlowBridgeError::Remote { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_flow_info_hits_flow_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflow/v1/flows/flow-123"))
            .and(header("Authorization", "Bearer key:secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "weather"})),
            )
            .mount(&server)
            .await;

        let client = XingchenClient::with_base_url(server.uri());
        let info = client.flow_info(&test_flow()).await.unwrap();
        assert_eq!(info["name"], json!("weather"));
    }
}
