//! Request gateway for the Slack Web API.
//!
//! Every call is a form-encoded `POST <api_base>/<method>` carrying a bearer
//! token. Failures keep their cause here (`GatewayError`) and are only
//! flattened into display strings by the tool layer.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SlackConfig;

/// The Slack methods this crate consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlackMethod {
    ConversationsHistory,
    UsersList,
    UsersInfo,
    ChatPostMessage,
}

impl SlackMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlackMethod::ConversationsHistory => "conversations.history",
            SlackMethod::UsersList => "users.list",
            SlackMethod::UsersInfo => "users.info",
            SlackMethod::ChatPostMessage => "chat.postMessage",
        }
    }
}

impl std::fmt::Display for SlackMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Slack API error: {0}")]
    Api(String),
}

impl GatewayError {
    /// The Slack error code (`channel_not_found`, ...) when the API answered `ok:false`.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            GatewayError::Api(code) => Some(code),
            _ => None,
        }
    }
}

/// Raw access to the Web API. Returns the decoded body of any 2xx response,
/// whatever its `ok` flag says.
#[async_trait]
pub trait SlackApi: Send + Sync {
    async fn call(&self, method: SlackMethod, params: &[(&str, String)])
        -> Result<Value, GatewayError>;
}

#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    api_base: String,
    token: String,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(config: &SlackConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("slackq/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl SlackApi for HttpGateway {
    async fn call(
        &self,
        method: SlackMethod,
        params: &[(&str, String)],
    ) -> Result<Value, GatewayError> {
        let url = format!("{}/{}", self.api_base, method);
        debug!(%method, params = params.len(), "calling Slack");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .form(params)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Calls `method` and insists on `ok:true`. Any failure is logged here once.
pub async fn api_call(
    api: &dyn SlackApi,
    method: SlackMethod,
    params: &[(&str, String)],
) -> Result<Value, GatewayError> {
    let result = api.call(method, params).await.and_then(|v| {
        if v.get("ok").and_then(|x| x.as_bool()) == Some(true) {
            Ok(v)
        } else {
            let code = v
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("unknown_error");
            Err(GatewayError::Api(code.to_string()))
        }
    });

    if let Err(e) = &result {
        warn!(%method, error = %e, "Slack API call failed");
    }
    result
}

/// Like [`api_call`], decoding the successful body into `T`.
pub async fn api_call_as<T: DeserializeOwned>(
    api: &dyn SlackApi,
    method: SlackMethod,
    params: &[(&str, String)],
) -> Result<T, GatewayError> {
    let v = api_call(api, method, params).await?;
    serde_json::from_value(v).map_err(|e| {
        warn!(%method, error = %e, "Slack response had an unexpected shape");
        GatewayError::Decode(e)
    })
}
