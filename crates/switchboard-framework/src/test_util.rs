//! In-memory session used by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use switchboard_core::{PlatformError, PlatformResult, Session};

pub(crate) struct MockSession {
    id: String,
    sent: Mutex<Vec<(String, String)>>,
    roles: Mutex<HashMap<(String, String), Vec<String>>>,
    fail_roles: AtomicBool,
}

impl MockSession {
    pub(crate) fn new() -> Self {
        Self {
            id: "bot".into(),
            sent: Mutex::new(Vec::new()),
            roles: Mutex::new(HashMap::new()),
            fail_roles: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_roles(self, guild_id: &str, user_id: &str, roles: &[&str]) -> Self {
        self.roles.lock().insert(
            (guild_id.to_string(), user_id.to_string()),
            roles.iter().map(|r| r.to_string()).collect(),
        );
        self
    }

    pub(crate) fn failing_roles(self) -> Self {
        self.fail_roles.store(true, Ordering::SeqCst);
        self
    }

    /// All `(channel, content)` pairs sent so far.
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    /// Just the contents sent so far.
    pub(crate) fn replies(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, c)| c.clone()).collect()
    }
}

#[async_trait]
impl Session for MockSession {
    fn self_id(&self) -> &str {
        &self.id
    }

    async fn send_text(&self, channel_id: &str, content: &str) -> PlatformResult<String> {
        let mut sent = self.sent.lock();
        sent.push((channel_id.to_string(), content.to_string()));
        Ok(format!("m{}", sent.len()))
    }

    async fn member_roles(&self, guild_id: &str, user_id: &str) -> PlatformResult<Vec<String>> {
        if self.fail_roles.load(Ordering::SeqCst) {
            return Err(PlatformError::member_lookup(guild_id, user_id, "unavailable"));
        }
        Ok(self
            .roles
            .lock()
            .get(&(guild_id.to_string(), user_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
