//! The four Slack tools. Each returns one display string; every failure is
//! rendered into that string instead of being propagated.

use tracing::{debug, info};

use super::api::{api_call, api_call_as, SlackMethod};
use super::directory::{fetch_directory, non_empty};
use super::format::{format_messages, NOT_AVAILABLE};
use super::types::{HistoryResponse, Message, UserInfoResponse};
use super::SlackConnector;

/// One page of history is scanned when filtering by author.
pub const HISTORY_SCAN_LIMIT: u32 = 200;

pub const MSG_FETCH_FAILED: &str = "Unable to fetch Slack messages.";
pub const MSG_NO_MESSAGES: &str = "No messages found in the channel.";
pub const USERS_FETCH_FAILED: &str = "Unable to fetch Slack users.";
pub const POST_SUCCEEDED: &str = "Message posted successfully.";
const UNKNOWN_ERROR: &str = "unknown error";

pub fn user_not_found(username: &str) -> String {
    format!("User '{}' not found.", username)
}

pub fn user_info_failed(username: &str) -> String {
    format!("Unable to fetch user info for '{}'.", username)
}

pub fn no_messages_from(username: &str) -> String {
    format!("No messages from '{}' found in the channel.", username)
}

pub fn post_failed(reason: &str) -> String {
    format!("Failed to post message: {}", reason)
}

impl SlackConnector {
    async fn channel_history(&self, channel_id: &str, limit: u32) -> Option<Vec<Message>> {
        let params = [
            ("channel", channel_id.to_string()),
            ("limit", limit.max(1).to_string()),
        ];
        api_call_as::<HistoryResponse>(self.api(), SlackMethod::ConversationsHistory, &params)
            .await
            .ok()
            .map(|r| r.messages)
    }

    pub async fn recent_messages(&self, channel_id: &str, limit: u32) -> String {
        let Some(messages) = self.channel_history(channel_id, limit).await else {
            return MSG_FETCH_FAILED.to_string();
        };
        if messages.is_empty() {
            return MSG_NO_MESSAGES.to_string();
        }

        // labels are best effort: a failed directory fetch leaves raw ids
        let directory = fetch_directory(self.api()).await.unwrap_or_default();
        debug!(
            channel = channel_id,
            count = messages.len(),
            members = directory.members().len(),
            "formatting recent messages"
        );
        format_messages(&messages, &directory)
    }

    pub async fn user_info(&self, username: &str) -> String {
        let directory = match fetch_directory(self.api()).await {
            Ok(d) => d,
            Err(_) => return USERS_FETCH_FAILED.to_string(),
        };
        let Some(user_id) = directory.resolve(username) else {
            return user_not_found(username);
        };

        let params = [("user", user_id.to_string())];
        let info = match api_call_as::<UserInfoResponse>(self.api(), SlackMethod::UsersInfo, &params)
            .await
        {
            Ok(r) => r.user,
            Err(_) => return user_info_failed(username),
        };

        let profile = info.profile.unwrap_or_default();
        let real_name = non_empty(info.real_name.as_deref())
            .or_else(|| non_empty(profile.real_name.as_deref()))
            .unwrap_or(NOT_AVAILABLE);
        let email = non_empty(profile.email.as_deref()).unwrap_or(NOT_AVAILABLE);

        format!(
            "User ID: {}\nUsername: {}\nReal Name: {}\nEmail: {}",
            user_id, info.name, real_name, email
        )
    }

    pub async fn messages_from_user(&self, channel_id: &str, username: &str, limit: u32) -> String {
        let directory = match fetch_directory(self.api()).await {
            Ok(d) => d,
            Err(_) => return USERS_FETCH_FAILED.to_string(),
        };
        let Some(user_id) = directory.resolve(username) else {
            return user_not_found(username);
        };

        let Some(messages) = self.channel_history(channel_id, HISTORY_SCAN_LIMIT).await else {
            return MSG_FETCH_FAILED.to_string();
        };
        let authored: Vec<&Message> = filter_by_sender(&messages, user_id, limit);
        if authored.is_empty() {
            return no_messages_from(username);
        }
        format_messages(authored, &directory)
    }

    pub async fn post_message(&self, channel_id: &str, text: &str) -> String {
        let params = [
            ("channel", channel_id.to_string()),
            ("text", text.to_string()),
        ];
        match api_call(self.api(), SlackMethod::ChatPostMessage, &params).await {
            Ok(_) => {
                info!(channel = channel_id, "posted message");
                POST_SUCCEEDED.to_string()
            }
            Err(e) => post_failed(e.api_code().unwrap_or(UNKNOWN_ERROR)),
        }
    }
}

fn filter_by_sender<'a>(messages: &'a [Message], user_id: &str, limit: u32) -> Vec<&'a Message> {
    messages
        .iter()
        .filter(|m| m.user.as_deref() == Some(user_id))
        .take(limit.max(1) as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(user: &str, ts: &str) -> Message {
        Message {
            user: Some(user.to_string()),
            text: format!("from {}", user),
            ts: ts.to_string(),
        }
    }

    #[test]
    fn filters_by_sender_and_applies_limit() {
        let messages = vec![msg("U1", "5"), msg("U2", "4"), msg("U1", "3"), msg("U1", "2")];
        let picked = filter_by_sender(&messages, "U1", 2);
        let ts: Vec<&str> = picked.iter().map(|m| m.ts.as_str()).collect();
        assert_eq!(ts, vec!["5", "3"]);

        assert_eq!(filter_by_sender(&messages, "U1", 0).len(), 1);
        assert!(filter_by_sender(&messages, "U7", 10).is_empty());
    }
}
