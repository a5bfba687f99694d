use super::directory::UserDirectory;
use super::types::Message;

pub const MESSAGE_SEPARATOR: &str = "\n---\n";
pub const UNKNOWN_SENDER: &str = "unknown user";
pub const NOT_AVAILABLE: &str = "Not available";

/// `[ts] label: text`
pub fn format_message(msg: &Message, directory: &UserDirectory) -> String {
    let label = match msg.user.as_deref() {
        Some(id) => directory.label_for(id),
        None => UNKNOWN_SENDER,
    };
    format!("[{}] {}: {}", msg.ts, label, msg.text)
}

/// Joins formatted messages in the order given (the API's order).
pub fn format_messages<'a, I>(messages: I, directory: &UserDirectory) -> String
where
    I: IntoIterator<Item = &'a Message>,
{
    messages
        .into_iter()
        .map(|m| format_message(m, directory))
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::slack::types::User;

    fn msg(user: Option<&str>, text: &str, ts: &str) -> Message {
        Message {
            user: user.map(str::to_string),
            text: text.to_string(),
            ts: ts.to_string(),
        }
    }

    #[test]
    fn formats_with_labels_and_raw_id_fallback() {
        let dir = UserDirectory::from_members(vec![User {
            id: "U1".into(),
            name: "alice".into(),
            real_name: Some("Alice".into()),
            profile: None,
        }]);
        let messages = vec![msg(Some("U1"), "hi", "1.0"), msg(Some("U2"), "yo", "2.0")];
        assert_eq!(
            format_messages(&messages, &dir),
            "[1.0] Alice: hi\n---\n[2.0] U2: yo"
        );
    }

    #[test]
    fn senderless_messages_use_placeholder() {
        let out = format_message(&msg(None, "deployed", "3.0"), &UserDirectory::default());
        assert_eq!(out, "[3.0] unknown user: deployed");
    }

    #[test]
    fn keeps_input_order() {
        let messages = vec![msg(Some("U2"), "b", "2.0"), msg(Some("U1"), "a", "1.0")];
        let out = format_messages(&messages, &UserDirectory::default());
        assert!(out.starts_with("[2.0] U2: b"));
    }
}
