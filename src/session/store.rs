//! Legacy per-browsing-session store: the portal-owned rendition of the
//! original local storage, keyed by the `knoldg_sid` cookie.

use secrecy::SecretString;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Heuristic "was this session previously authenticated" marker.
/// Never authoritative; presence without a cookie token means stale state.
#[derive(Debug, Clone, Copy)]
pub struct UserMarker {
    pub since: Instant,
}

#[derive(Debug, Default)]
struct LocalEntry {
    token: Option<SecretString>,
    user: Option<UserMarker>,
    observed_at: Option<Instant>,
}

/// In-memory store of legacy session artifacts.
#[derive(Debug, Default)]
pub struct LocalStore {
    entries: Mutex<HashMap<String, LocalEntry>>,
}

impl LocalStore {
    /// Records a successful login landing: legacy token copy plus marker.
    pub async fn login(&self, sid: &str, token: SecretString) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        entries.insert(
            sid.to_string(),
            LocalEntry {
                token: Some(token),
                user: Some(UserMarker { since: now }),
                observed_at: Some(now),
            },
        );
    }

    /// Writes the legacy token copy only. The authoritative cookie is set by
    /// the external identity provider during its redirect flow.
    pub async fn set_token(&self, sid: &str, token: SecretString) {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(sid.to_string()).or_default();
        entry.token = Some(token);
        entry.observed_at = Some(Instant::now());
    }

    /// Legacy fallback token read. No side effects.
    pub async fn token(&self, sid: &str) -> Option<SecretString> {
        let entries = self.entries.lock().await;
        entries.get(sid).and_then(|entry| entry.token.clone())
    }

    /// Whether a user marker exists for the session.
    pub async fn has_user(&self, sid: &str) -> bool {
        let entries = self.entries.lock().await;
        entries.get(sid).is_some_and(|entry| entry.user.is_some())
    }

    /// Refreshes the last-observed timestamp for a known session.
    pub async fn observe(&self, sid: &str) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(sid) {
            entry.observed_at = Some(Instant::now());
        }
    }

    /// Removes the legacy token and user marker for a session.
    ///
    /// Returns `true` only for the caller that actually removed artifacts,
    /// so cleanup side effects fire exactly once per detection.
    pub async fn clear(&self, sid: &str) -> bool {
        let mut entries = self.entries.lock().await;
        entries
            .remove(sid)
            .is_some_and(|entry| entry.token.is_some() || entry.user.is_some())
    }

    /// Drops sessions not observed within `max_age`, returning their ids.
    pub async fn prune(&self, max_age: Duration) -> Vec<String> {
        let mut entries = self.entries.lock().await;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| {
                entry
                    .observed_at
                    .is_none_or(|observed| observed.elapsed() >= max_age)
            })
            .map(|(sid, _)| sid.clone())
            .collect();
        for sid in &stale {
            entries.remove(sid);
        }
        stale
    }

    /// Number of tracked sessions.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the store tracks no sessions.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
