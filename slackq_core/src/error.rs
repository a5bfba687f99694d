// src/error.rs
use serde_json::json;

/// Errors surfaced to the MCP host as JSON-RPC error objects.
///
/// Slack failures never end up here: the tool layer flattens those into
/// display strings. These are protocol-level problems with the request itself.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Parse error")]
    ParseError,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ConnectorError {
    pub fn code_str(&self) -> &'static str {
        match self {
            ConnectorError::InvalidParams(_) => "invalid_params",
            ConnectorError::SerdeJson(_) => "invalid_params",
            ConnectorError::ToolNotFound(_) => "tool_not_found",
            ConnectorError::MethodNotFound(_) => "method_not_found",
            ConnectorError::ParseError => "parse_error",
            ConnectorError::InternalError(_) => "internal_error",
        }
    }

    pub fn to_jsonrpc_error(&self) -> serde_json::Value {
        let code = match self {
            ConnectorError::ParseError => -32700,
            ConnectorError::MethodNotFound(_) => -32601,
            ConnectorError::InvalidParams(_)
            | ConnectorError::SerdeJson(_)
            | ConnectorError::ToolNotFound(_) => -32602,
            ConnectorError::InternalError(_) => -32603,
        };

        json!({
            "code": code,
            "message": self.to_string(),
            "data": { "kind": self.code_str() },
        })
    }
}

/// Startup configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_jsonrpc_codes() {
        let err = ConnectorError::MethodNotFound("bogus/method".into());
        let v = err.to_jsonrpc_error();
        assert_eq!(v["code"], -32601);
        assert_eq!(v["data"]["kind"], "method_not_found");
        assert!(v["message"].as_str().unwrap().contains("bogus/method"));

        assert_eq!(
            ConnectorError::ToolNotFound("nope".into()).to_jsonrpc_error()["code"],
            -32602
        );
        assert_eq!(ConnectorError::ParseError.to_jsonrpc_error()["code"], -32700);
        assert_eq!(
            ConnectorError::InternalError("boom".into()).to_jsonrpc_error()["code"],
            -32603
        );
    }
}
