use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{Connector, ConnectorError};
use rmcp::model::*;

/// MCP server over a single connector.
pub struct McpServer {
    connector: Arc<dyn Connector>,
}

impl McpServer {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    pub async fn handle_initialize(
        &self,
        request: InitializeRequestParam,
    ) -> Result<InitializeResult, ConnectorError> {
        info!(
            client = %request.client_info.name,
            client_version = %request.client_info.version,
            "MCP client initializing"
        );
        self.connector.initialize(request).await
    }

    pub async fn handle_list_tools(
        &self,
        request: Option<PaginatedRequestParam>,
    ) -> Result<ListToolsResult, ConnectorError> {
        self.connector.list_tools(request).await
    }

    pub async fn handle_call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ConnectorError> {
        info!(tool = %request.name, "tool call");
        self.connector.call_tool(request).await
    }
}

/// JSON-RPC message handler for the MCP server
pub struct JsonRpcHandler {
    server: McpServer,
}

impl JsonRpcHandler {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }

    /// Process one JSON-RPC message. Notifications (no `id`) yield `None`.
    pub async fn handle_request(&self, request: Value) -> Option<Value> {
        debug!("Handling JSON-RPC request: {:?}", request);

        let method = request
            .get("method")
            .and_then(|m| m.as_str())
            .unwrap_or("")
            .to_string();
        let Some(id) = request.get("id").cloned() else {
            debug!(%method, "notification received");
            return None;
        };
        let params = request.get("params").cloned().unwrap_or(Value::Null);

        let result = self.dispatch(&method, params).await;

        Some(match result {
            Ok(result) => json!({
                "jsonrpc": "2.0",
                "result": result,
                "id": id,
            }),
            Err(error) => {
                warn!(%method, error = %error, "JSON-RPC request failed");
                json!({
                    "jsonrpc": "2.0",
                    "error": error.to_jsonrpc_error(),
                    "id": id,
                })
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, ConnectorError> {
        match method {
            "initialize" => {
                let req: InitializeRequestParam = serde_json::from_value(params)
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;
                to_value(self.server.handle_initialize(req).await?)
            }
            "ping" => Ok(json!({})),
            "tools/list" => {
                let req: Option<PaginatedRequestParam> = optional_params(params)?;
                to_value(self.server.handle_list_tools(req).await?)
            }
            "tools/call" => {
                let req: CallToolRequestParam = serde_json::from_value(params)
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;
                to_value(self.server.handle_call_tool(req).await?)
            }
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            other => Err(ConnectorError::MethodNotFound(other.to_string())),
        }
    }
}

fn optional_params<T: serde::de::DeserializeOwned>(
    params: Value,
) -> Result<Option<T>, ConnectorError> {
    if params.is_null() {
        return Ok(None);
    }
    serde_json::from_value(params)
        .map(Some)
        .map_err(|e| ConnectorError::InvalidParams(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, ConnectorError> {
    serde_json::to_value(value).map_err(ConnectorError::SerdeJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::slack::api::{GatewayError, SlackApi, SlackMethod};
    use crate::SlackConnector;
    use async_trait::async_trait;

    struct FakeSlack;

    #[async_trait]
    impl SlackApi for FakeSlack {
        async fn call(
            &self,
            method: SlackMethod,
            _params: &[(&str, String)],
        ) -> Result<Value, GatewayError> {
            match method {
                SlackMethod::ConversationsHistory => Ok(json!({
                    "ok": true,
                    "messages": [
                        {"user": "U1", "text": "hi", "ts": "1.0"},
                        {"user": "U2", "text": "yo", "ts": "2.0"}
                    ]
                })),
                SlackMethod::UsersList => Ok(json!({
                    "ok": true,
                    "members": [{"id": "U1", "name": "alice", "real_name": "Alice"}]
                })),
                SlackMethod::UsersInfo | SlackMethod::ChatPostMessage => {
                    Err(GatewayError::Status(500))
                }
            }
        }
    }

    fn handler() -> JsonRpcHandler {
        let connector = SlackConnector::new(Arc::new(FakeSlack));
        JsonRpcHandler::new(McpServer::new(Arc::new(connector)))
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let resp = handler()
            .handle_request(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "0.0.1"}
                }
            }))
            .await
            .unwrap();
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["serverInfo"]["name"], "slack");
        assert!(resp["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn lists_four_tools() {
        let resp = handler()
            .handle_request(json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"}))
            .await
            .unwrap();
        let names: Vec<&str> = resp["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "get_recent_slack_messages",
                "get_slack_user_info",
                "get_messages_from_user",
                "post_slack_message"
            ]
        );
        let schema = &resp["result"]["tools"][0]["inputSchema"];
        assert_eq!(schema["required"], json!(["channel_id"]));
    }

    #[tokio::test]
    async fn tool_call_returns_formatted_text() {
        let resp = handler()
            .handle_request(json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {
                    "name": "get_recent_slack_messages",
                    "arguments": {"channel_id": "C1"}
                }
            }))
            .await
            .unwrap();
        assert_eq!(resp["result"]["isError"], false);
        assert_eq!(
            resp["result"]["content"][0]["text"],
            "[1.0] Alice: hi\n---\n[2.0] U2: yo"
        );
    }

    #[tokio::test]
    async fn failed_post_is_a_tool_result_not_a_protocol_error() {
        let resp = handler()
            .handle_request(json!({
                "jsonrpc": "2.0",
                "id": 8,
                "method": "tools/call",
                "params": {
                    "name": "post_slack_message",
                    "arguments": {"channel_id": "C1", "text": "hello"}
                }
            }))
            .await
            .unwrap();
        assert!(resp.get("error").is_none());
        assert_eq!(
            resp["result"]["content"][0]["text"],
            "Failed to post message: unknown error"
        );
    }

    #[tokio::test]
    async fn protocol_errors() {
        let h = handler();
        let unknown_tool = h
            .handle_request(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "delete_workspace", "arguments": {}}
            }))
            .await
            .unwrap();
        assert_eq!(unknown_tool["error"]["code"], -32602);

        let missing_arg = h
            .handle_request(json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "get_slack_user_info", "arguments": {}}
            }))
            .await
            .unwrap();
        assert_eq!(missing_arg["error"]["code"], -32602);

        let unknown_method = h
            .handle_request(json!({"jsonrpc": "2.0", "id": 4, "method": "sampling/createMessage"}))
            .await
            .unwrap();
        assert_eq!(unknown_method["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let resp = handler()
            .handle_request(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;
        assert!(resp.is_none());
    }
}
