use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

// Slack payloads (only the fields the tools read)

/// Missing and `null` both decode to an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Sender id. Absent on bot and system messages.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ts: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// `users.info` replies may leave this out; callers already know the id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersListResponse {
    #[serde(default)]
    pub members: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserInfoResponse {
    pub user: User,
}

// Tool inputs

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecentMessagesInput {
    /// The ID of the Slack channel (e.g. C0123456789)
    pub channel_id: String,
    /// Number of recent messages to fetch
    #[serde(default = "default_recent_limit")]
    #[schemars(default = "default_recent_limit", range(min = 1))]
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UserInfoInput {
    /// Slack handle or real name of the user
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MessagesFromUserInput {
    /// The ID of the Slack channel
    pub channel_id: String,
    /// Slack handle or real name of the author
    pub username: String,
    /// Maximum number of matching messages to return
    #[serde(default = "default_user_limit")]
    #[schemars(default = "default_user_limit", range(min = 1))]
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PostMessageInput {
    /// The ID of the Slack channel to post into
    pub channel_id: String,
    /// Message text (Slack mrkdwn)
    pub text: String,
}

pub(crate) fn default_recent_limit() -> u32 {
    5
}

pub(crate) fn default_user_limit() -> u32 {
    10
}
