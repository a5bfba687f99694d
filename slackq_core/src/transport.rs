use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::ConnectorError;
use crate::mcp_server::JsonRpcHandler;

/// `-32700` reply for a frame that is not JSON; the id is unknown so it is null.
pub(crate) fn parse_error_response(e: &serde_json::Error) -> Value {
    let mut error = ConnectorError::ParseError.to_jsonrpc_error();
    error["data"]["detail"] = Value::String(e.to_string());
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": error,
        "id": null
    })
}

/// Stdio transport for MCP server: one JSON-RPC message per line.
pub struct StdioTransport {
    handler: JsonRpcHandler,
}

impl StdioTransport {
    pub fn new(handler: JsonRpcHandler) -> Self {
        Self { handler }
    }

    /// Run the stdio transport, reading from stdin and writing to stdout
    pub async fn run(&self) -> io::Result<()> {
        info!("Starting stdio transport");

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let mut reader = AsyncBufReader::new(stdin);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        debug!("EOF reached on stdin");
                        break;
                    }
                    Ok(_) => {
                        if !line.trim().is_empty() {
                            if let Err(e) = tx.send(line.clone()) {
                                error!("Failed to send line: {}", e);
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Error reading from stdin: {}", e);
                        break;
                    }
                }
            }
        });

        while let Some(line) = rx.recv().await {
            if let Err(e) = self.process_line(&line).await {
                error!("Error processing line: {}", e);
            }
        }

        Ok(())
    }

    async fn process_line(&self, line: &str) -> io::Result<()> {
        debug!("Processing line: {}", line);

        match serde_json::from_str::<Value>(line) {
            Ok(request) => {
                if let Some(response) = self.handler.handle_request(request).await {
                    self.write_response(&response).await?;
                }
            }
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                self.write_response(&parse_error_response(&e)).await?;
            }
        }

        Ok(())
    }

    async fn write_response(&self, response: &Value) -> io::Result<()> {
        let mut stdout = tokio::io::stdout();
        let response_str = serde_json::to_string(response)?;

        stdout.write_all(response_str.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;

        debug!("Sent response: {}", response_str);

        Ok(())
    }
}

/// HTTP transport: `POST /mcp` takes one JSON-RPC message, `GET /health` for health checks.
pub struct HttpTransport {
    handler: Arc<JsonRpcHandler>,
    addr: String,
}

impl HttpTransport {
    pub fn new(handler: JsonRpcHandler, addr: impl Into<String>) -> Self {
        Self {
            handler: Arc::new(handler),
            addr: addr.into(),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/mcp", post(handle_mcp))
            .route("/health", get(|| async { "ok" }))
            .with_state(self.handler.clone())
    }

    pub async fn run(&self) -> io::Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("HTTP transport listening on {}", self.addr);
        axum::serve(listener, self.router()).await
    }
}

async fn handle_mcp(State(handler): State<Arc<JsonRpcHandler>>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to parse JSON-RPC request: {}", e);
            return (StatusCode::BAD_REQUEST, Json(parse_error_response(&e))).into_response();
        }
    };

    match handler.handle_request(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::slack::api::{GatewayError, SlackApi, SlackMethod};
    use crate::mcp_server::McpServer;
    use crate::SlackConnector;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct Offline;

    #[async_trait]
    impl SlackApi for Offline {
        async fn call(&self, _: SlackMethod, _: &[(&str, String)]) -> Result<Value, GatewayError> {
            Err(GatewayError::Status(503))
        }
    }

    fn transport() -> HttpTransport {
        let connector = SlackConnector::new(Arc::new(Offline));
        HttpTransport::new(
            JsonRpcHandler::new(McpServer::new(Arc::new(connector))),
            "127.0.0.1:0",
        )
    }

    async fn post(body: &'static str) -> (StatusCode, Vec<u8>) {
        let resp = transport()
            .router()
            .oneshot(
                Request::post("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[test]
    fn parse_error_uses_jsonrpc_code() {
        let err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let resp = parse_error_response(&err);
        assert_eq!(resp["error"]["code"], -32700);
        assert_eq!(resp["error"]["data"]["kind"], "parse_error");
        assert!(resp["id"].is_null());
    }

    #[tokio::test]
    async fn http_rejects_malformed_body() {
        let (status, body) = post("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn http_accepts_notifications_without_body() {
        let (status, body) =
            post(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn http_answers_ping() {
        let (status, body) = post(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["id"], 1);
        assert!(v["result"].is_object());
    }
}
