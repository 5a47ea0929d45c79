// Conversation memory
// Per-user capped history behind one get/append/cap/put interface

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

/// Hard cap on remembered lines per user; the oldest are evicted first.
pub const HISTORY_CAP: usize = 10;

/// Capped per-user conversation history.
///
/// One interface covering get-or-default, append, cap, and put, so the
/// backing store can be swapped (for an external key-value store, say)
/// without touching the chat flow.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Remembered lines for the user, oldest first; empty when unknown.
    async fn recent(&self, user_id: &str) -> Result<Vec<String>>;

    /// Append one exchange (the user line then the AI line) and evict from
    /// the front past the cap.
    async fn remember(&self, user_id: &str, user_line: String, ai_line: String) -> Result<()>;
}

/// Process-local store. History lives for the process lifetime only and is
/// not shared across instances.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemorySessionStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn recent(&self, user_id: &str) -> Result<Vec<String>> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow::anyhow!("Session store mutex poisoned"))?;
        Ok(sessions.get(user_id).cloned().unwrap_or_default())
    }

    async fn remember(&self, user_id: &str, user_line: String, ai_line: String) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow::anyhow!("Session store mutex poisoned"))?;

        let history = sessions.entry(user_id.to_string()).or_default();
        history.push(user_line);
        history.push(ai_line);
        if history.len() > HISTORY_CAP {
            history.drain(..history.len() - HISTORY_CAP);
        }

        Ok(())
    }
}
