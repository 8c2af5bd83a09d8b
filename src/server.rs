//! Newline-delimited JSON-RPC over a byte stream (stdio in production).
//!
//! Requests are handled strictly one at a time: a line is fully resolved,
//! including every git call it triggers, before the next line is read.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolRequest, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::repo_tools::backend::GitBackend;
use crate::repo_tools::dispatcher::Dispatcher;

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "git-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct McpServer<B> {
    dispatcher: Dispatcher<B>,
}

impl<B: GitBackend> McpServer<B> {
    pub fn new(dispatcher: Dispatcher<B>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }

    /// Serve until the reader hits EOF.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            // A bad frame is answered like any other unparsable message.
            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim_end_matches(['\r', '\n'])).await,
                Err(err) => Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: invalid UTF-8: {}", err)),
                )),
            };
            if let Some(response) = response {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        info!("input closed, stopping");
        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", err)),
                ));
            }
        };

        // `"id": null` is still a request; only a missing id marks a notification.
        let has_id = value.as_object().is_some_and(|obj| obj.contains_key("id"));
        let id_hint = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(err) => {
                return Some(JsonRpcResponse::failure(
                    id_hint,
                    JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", err)),
                ));
            }
        };

        if !has_id {
            debug!(method = %request.method, "notification");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        Some(match self.handle_request(&request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    async fn handle_request(&self, request: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        debug!(method = %request.method, "request");
        match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": MCP_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.dispatcher.list_tools() })),
            "tools/call" => {
                let params = request.params.clone().unwrap_or(Value::Null);
                let call: ToolRequest = serde_json::from_value(params).map_err(|err| {
                    JsonRpcError::new(INVALID_PARAMS, format!("Invalid tool call: {}", err))
                })?;
                let response = self.dispatcher.dispatch(&call).await;
                serde_json::to_value(response)
                    .map_err(|err| JsonRpcError::new(INTERNAL_ERROR, err.to_string()))
            }
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }
}
