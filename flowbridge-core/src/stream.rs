//! Event stream decoding for streaming chat responses
//!
//! The remote API streams responses in a line-oriented event format
//! where only lines prefixed with `data:` carry a JSON payload. Blank
//! lines separate events, and any other line type (comments, keepalives)
//! is ignored for forward compatibility.

use futures::Stream;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;

use crate::error::{FlowBridgeError, Result};

/// Decode a line-oriented event stream into JSON chunks.
///
/// The returned stream is lazy, single-pass, and ends when the reader
/// does. A frame that fails to decode is logged and skipped so that one
/// corrupt event never aborts the rest of the response; a transport
/// read error is surfaced as an `Err` item.
pub fn decode_chunks<R>(reader: R) -> impl Stream<Item = Result<Value>> + Send
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let lines = BufReader::new(reader).lines();

    LinesStream::new(lines).filter_map(|line| match line {
        Ok(line) => {
            let line = line.trim_end();
            if line.is_empty() {
                // Event separator, carries no payload.
                return None;
            }
            let Some(payload) = line.strip_prefix("data:") else {
                return None;
            };
            match serde_json::from_str(payload) {
                Ok(chunk) => Some(Ok(chunk)),
                Err(err) => {
                    tracing::warn!("skipping undecodable event frame: {err}");
                    None
                }
            }
        }
        Err(err) => Some(Err(FlowBridgeError::Io(err))),
    })
}
