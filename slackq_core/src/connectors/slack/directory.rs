use std::collections::HashMap;

use super::api::{api_call_as, GatewayError, SlackApi, SlackMethod};
use super::types::{User, UsersListResponse};

/// Workspace members from one `users.list` fetch, plus their display labels.
///
/// Built fresh for every tool invocation and never cached.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    members: Vec<User>,
    labels: HashMap<String, String>,
}

impl UserDirectory {
    pub fn from_members(members: Vec<User>) -> Self {
        let labels = members
            .iter()
            .map(|u| (u.id.clone(), display_label(u).to_string()))
            .collect();
        Self { members, labels }
    }

    pub fn members(&self) -> &[User] {
        &self.members
    }

    /// Label for a sender id; unknown ids label themselves.
    pub fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.labels.get(id).map(String::as_str).unwrap_or(id)
    }

    /// First member (in API order) whose handle or real name equals `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|u| u.name == name || u.real_name.as_deref() == Some(name))
            .map(|u| u.id.as_str())
    }
}

/// `None` for absent, empty and whitespace-only values.
pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// real name, then profile display name, then handle, then the id itself.
pub fn display_label(user: &User) -> &str {
    non_empty(user.real_name.as_deref())
        .or_else(|| non_empty(user.profile.as_ref().and_then(|p| p.display_name.as_deref())))
        .or_else(|| non_empty(Some(user.name.as_str())))
        .unwrap_or(user.id.as_str())
}

/// Fetches the full member list (single page).
pub async fn fetch_directory(api: &dyn SlackApi) -> Result<UserDirectory, GatewayError> {
    let resp: UsersListResponse = api_call_as(api, SlackMethod::UsersList, &[]).await?;
    Ok(UserDirectory::from_members(resp.members))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::slack::types::Profile;

    fn user(id: &str, name: &str, real_name: Option<&str>) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            real_name: real_name.map(str::to_string),
            profile: None,
        }
    }

    #[test]
    fn first_member_wins_when_handle_and_real_name_collide() {
        let dir = UserDirectory::from_members(vec![
            user("U1", "a", Some("dup")),
            user("U2", "dup", Some("b")),
        ]);
        assert_eq!(dir.resolve("dup"), Some("U1"));
        // same answer on a second lookup
        assert_eq!(dir.resolve("dup"), Some("U1"));
        assert_eq!(dir.resolve("b"), Some("U2"));
        assert_eq!(dir.resolve("nobody"), None);
    }

    #[test]
    fn resolution_is_exact() {
        let dir = UserDirectory::from_members(vec![user("U1", "alice", Some("Alice Smith"))]);
        assert_eq!(dir.resolve("Alice"), None);
        assert_eq!(dir.resolve("alice"), Some("U1"));
        assert_eq!(dir.resolve("Alice Smith"), Some("U1"));
    }

    #[test]
    fn label_precedence() {
        let mut with_profile = user("U3", "carol", Some(""));
        with_profile.profile = Some(Profile {
            display_name: Some("Caz".to_string()),
            ..Default::default()
        });
        let dir = UserDirectory::from_members(vec![
            user("U1", "alice", Some("Alice")),
            user("U2", "bob", None),
            with_profile,
            user("U4", "", None),
        ]);
        assert_eq!(dir.label_for("U1"), "Alice");
        assert_eq!(dir.label_for("U2"), "bob");
        assert_eq!(dir.label_for("U3"), "Caz");
        assert_eq!(dir.label_for("U4"), "U4");
    }

    #[test]
    fn unknown_sender_falls_back_to_raw_id() {
        let dir = UserDirectory::from_members(vec![user("U1", "alice", Some("Alice"))]);
        assert_eq!(dir.label_for("U9"), "U9");
        assert_eq!(UserDirectory::default().label_for("U1"), "U1");
    }
}
