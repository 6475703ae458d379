//! Whitelist-style command permissions.
//!
//! A command's permissions are three allow-lists: users, roles and channels.
//! A caller is admitted when *any* of them matches; there is no deny tier.
//! Empty lists everywhere mean the command is unrestricted.

use serde::{Deserialize, Serialize};

/// The allow-lists attached to a single command.
///
/// IDs are compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandPermissions {
    /// Users allowed to run the command.
    #[serde(rename = "users", alias = "user_ids")]
    pub user_ids: Vec<String>,
    /// Roles whose members may run the command.
    #[serde(rename = "roles", alias = "role_ids")]
    pub role_ids: Vec<String>,
    /// Channels the command may be run in.
    #[serde(rename = "channels", alias = "channel_ids")]
    pub channel_ids: Vec<String>,
}

impl CommandPermissions {
    /// Creates an unrestricted permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds users to the user whitelist.
    pub fn users<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds roles to the role whitelist.
    pub fn roles<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds channels to the channel whitelist.
    pub fn channels<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channel_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if all three whitelists are empty.
    pub fn is_unrestricted(&self) -> bool {
        self.user_ids.is_empty() && self.role_ids.is_empty() && self.channel_ids.is_empty()
    }

    /// Shorthand for [`check_permissions`].
    pub fn check<S: AsRef<str>>(&self, user_id: &str, role_ids: &[S], channel_id: &str) -> bool {
        check_permissions(self, user_id, role_ids, channel_id)
    }
}

/// Decides whether a caller may run a command.
///
/// Evaluated as `user || any(role) || channel`, short-circuiting in that
/// order. Any positive match wins.
pub fn check_permissions<S: AsRef<str>>(
    perms: &CommandPermissions,
    user_id: &str,
    role_ids: &[S],
    channel_id: &str,
) -> bool {
    if perms.is_unrestricted() {
        return true;
    }

    if contains_ignore_case(&perms.user_ids, user_id) {
        return true;
    }

    if role_ids
        .iter()
        .any(|role| contains_ignore_case(&perms.role_ids, role.as_ref()))
    {
        return true;
    }

    contains_ignore_case(&perms.channel_ids, channel_id)
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    let value = value.to_lowercase();
    list.iter().any(|entry| entry.to_lowercase() == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ROLES: &[&str] = &[];

    #[test]
    fn test_empty_whitelists_permit_everyone() {
        let perms = CommandPermissions::new();
        assert!(perms.check("anyone", NO_ROLES, "anywhere"));
        assert!(perms.check("", &["r1", "r2"], ""));
    }

    #[test]
    fn test_role_match_is_case_insensitive() {
        let perms = CommandPermissions::new().roles(["R1"]);
        assert!(perms.check("u1", &["r0", "r1"], "c1"));
        assert!(!perms.check("u1", &["r2"], "c1"));
        assert!(!perms.check("u1", NO_ROLES, "c1"));
    }

    #[test]
    fn test_user_and_channel_matches() {
        let perms = CommandPermissions::new().users(["Alice"]).channels(["Ops"]);
        assert!(perms.check("alice", NO_ROLES, "general"));
        assert!(perms.check("bob", NO_ROLES, "OPS"));
        assert!(!perms.check("bob", NO_ROLES, "general"));
    }

    #[test]
    fn test_any_match_wins() {
        // No deny tier: the channel admits a caller the user list does not name.
        let perms = CommandPermissions::new()
            .users(["admin"])
            .roles(["mods"])
            .channels(["c1"]);
        assert!(perms.check("guest", &["members"], "c1"));
        assert!(perms.check("guest", &["MODS"], "c2"));
        assert!(!perms.check("guest", &["members"], "c2"));
    }

    #[test]
    fn test_deserialize_short_keys() {
        let perms: CommandPermissions =
            serde_json::from_str(r#"{"users":["1"],"channels":["9"]}"#).unwrap();
        assert_eq!(perms.user_ids, vec!["1"]);
        assert!(perms.role_ids.is_empty());
        assert_eq!(perms.channel_ids, vec!["9"]);
    }
}
