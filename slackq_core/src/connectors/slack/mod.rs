use async_trait::async_trait;
use rmcp::model::*;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::SlackConfig;
use crate::error::ConnectorError;
use crate::Connector;

pub mod api;
pub mod directory;
pub mod format;
pub mod tools;
pub mod types;

use api::{GatewayError, HttpGateway, SlackApi};
use types::{MessagesFromUserInput, PostMessageInput, RecentMessagesInput, UserInfoInput};

pub const TOOL_RECENT_MESSAGES: &str = "get_recent_slack_messages";
pub const TOOL_USER_INFO: &str = "get_slack_user_info";
pub const TOOL_MESSAGES_FROM_USER: &str = "get_messages_from_user";
pub const TOOL_POST_MESSAGE: &str = "post_slack_message";

#[derive(Clone)]
pub struct SlackConnector {
    api: Arc<dyn SlackApi>,
}

impl SlackConnector {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }

    pub fn from_config(config: &SlackConfig) -> Result<Self, GatewayError> {
        Ok(Self::new(Arc::new(HttpGateway::new(config)?)))
    }

    pub(crate) fn api(&self) -> &dyn SlackApi {
        self.api.as_ref()
    }
}

fn input_schema<T: JsonSchema>() -> Result<Arc<JsonObject>, ConnectorError> {
    let schema = serde_json::to_value(schemars::schema_for!(T))?;
    match schema {
        Value::Object(map) => Ok(Arc::new(map)),
        _ => Err(ConnectorError::InternalError(
            "tool schema is not an object".to_string(),
        )),
    }
}

fn parse_input<T: DeserializeOwned>(args: JsonObject) -> Result<T, ConnectorError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ConnectorError::InvalidParams(e.to_string()))
}

#[async_trait]
impl Connector for SlackConnector {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn description(&self) -> &'static str {
        "Slack Web API: recent channel messages, user lookup, per-user message filter, posting."
    }

    async fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: Some(Default::default()),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
    ) -> Result<InitializeResult, ConnectorError> {
        Ok(InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: self.capabilities().await,
            server_info: Implementation {
                name: self.name().to_string(),
                title: Some("Slack".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read recent Slack channel messages, look up users, filter a channel by author, and post messages. Channel arguments are channel IDs (C...), not names."
                    .to_string(),
            ),
        })
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
    ) -> Result<ListToolsResult, ConnectorError> {
        let tools = vec![
            Tool {
                name: Cow::Borrowed(TOOL_RECENT_MESSAGES),
                title: None,
                description: Some(Cow::Borrowed(
                    "Fetch recent messages from a Slack channel, newest first, with sender names resolved.",
                )),
                input_schema: input_schema::<RecentMessagesInput>()?,
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed(TOOL_USER_INFO),
                title: None,
                description: Some(Cow::Borrowed(
                    "Look up a Slack user by handle or real name and return id, handle, real name and email.",
                )),
                input_schema: input_schema::<UserInfoInput>()?,
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed(TOOL_MESSAGES_FROM_USER),
                title: None,
                description: Some(Cow::Borrowed(
                    "Fetch recent messages in a channel written by one user (handle or real name).",
                )),
                input_schema: input_schema::<MessagesFromUserInput>()?,
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed(TOOL_POST_MESSAGE),
                title: None,
                description: Some(Cow::Borrowed("Post a message to a Slack channel.")),
                input_schema: input_schema::<PostMessageInput>()?,
                output_schema: None,
                annotations: None,
                icons: None,
            },
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ConnectorError> {
        let name = request.name.as_ref();
        let args = request.arguments.unwrap_or_default();

        let text = match name {
            TOOL_RECENT_MESSAGES => {
                let input: RecentMessagesInput = parse_input(args)?;
                self.recent_messages(&input.channel_id, input.limit).await
            }
            TOOL_USER_INFO => {
                let input: UserInfoInput = parse_input(args)?;
                self.user_info(&input.username).await
            }
            TOOL_MESSAGES_FROM_USER => {
                let input: MessagesFromUserInput = parse_input(args)?;
                self.messages_from_user(&input.channel_id, &input.username, input.limit)
                    .await
            }
            TOOL_POST_MESSAGE => {
                let input: PostMessageInput = parse_input(args)?;
                self.post_message(&input.channel_id, &input.text).await
            }
            other => return Err(ConnectorError::ToolNotFound(other.to_string())),
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}
