// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::state::SessionState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStoreConfig {
    /// Soft cap. Reaching it evicts idle sessions on create; when none are
    /// idle the new session is admitted anyway, so live sessions never lose
    /// their document to a newcomer.
    pub max_sessions: usize,
    pub idle_timeout_seconds: u64,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_timeout_seconds: 3600,
        }
    }
}

#[derive(Debug)]
pub struct SessionEntry {
    pub state: SessionState,
    created_at: Instant,
    last_activity: Instant,
    closed: bool,
}

impl SessionEntry {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            state: SessionState::new(),
            created_at: now,
            last_activity: now,
            closed: false,
        }
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Mark the entry as removed from the store. A request that resolved
    /// the handle before removal must not store anything in it.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.last_activity.elapsed() > idle_timeout
    }
}

/// Shared handle to one session. Holding the lock serializes requests
/// within that session.
pub type SessionHandle = Arc<Mutex<SessionEntry>>;

/// Server-side session storage keyed by session id
pub struct SessionStore {
    config: SessionStoreConfig,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.config.idle_timeout_seconds)
    }

    /// Create an empty session. When the store is full, expired sessions
    /// are evicted first; the returned states belong to those sessions so
    /// the caller can release their resources. The cap is soft: with no
    /// idle session to evict, the store grows past `max_sessions`.
    pub async fn create(&self) -> (String, SessionHandle, Vec<SessionState>) {
        let session_id = Self::generate_id();
        let handle = Arc::new(Mutex::new(SessionEntry::new()));

        let evicted = {
            let mut sessions = self.sessions.write().await;
            let evicted = if sessions.len() >= self.config.max_sessions {
                Self::remove_expired(&mut sessions, self.idle_timeout())
            } else {
                Vec::new()
            };
            sessions.insert(session_id.clone(), handle.clone());
            evicted
        };

        (session_id, handle, Self::take_states(evicted).await)
    }

    /// Look up a live session and refresh its activity time
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let handle = {
            let sessions = self.sessions.read().await;
            sessions.get(session_id).cloned()?
        };

        let mut entry = handle.lock().await;
        if entry.is_expired(self.idle_timeout()) {
            return None;
        }
        entry.touch();
        drop(entry);

        Some(handle)
    }

    /// Remove a session, returning its handle if it existed
    pub async fn invalidate(&self, session_id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id)
    }

    pub async fn exists(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove idle sessions, returning their final states
    pub async fn cleanup_expired(&self) -> Vec<SessionState> {
        let removed = {
            let mut sessions = self.sessions.write().await;
            Self::remove_expired(&mut sessions, self.idle_timeout())
        };
        Self::take_states(removed).await
    }

    fn remove_expired(
        sessions: &mut HashMap<String, SessionHandle>,
        idle_timeout: Duration,
    ) -> Vec<SessionHandle> {
        // A locked session is serving a request, so it is not idle
        let expired_ids: Vec<String> = sessions
            .iter()
            .filter(|(_, handle)| {
                handle
                    .try_lock()
                    .map(|entry| entry.is_expired(idle_timeout))
                    .unwrap_or(false)
            })
            .map(|(id, _)| id.clone())
            .collect();

        expired_ids
            .iter()
            .filter_map(|id| sessions.remove(id))
            .collect()
    }

    // Runs after the map lock is released; a request holding an entry lock
    // may itself be waiting on the map.
    async fn take_states(handles: Vec<SessionHandle>) -> Vec<SessionState> {
        let mut states = Vec::with_capacity(handles.len());
        for handle in handles {
            let mut entry = handle.lock().await;
            entry.close();
            states.push(std::mem::take(&mut entry.state));
        }
        states
    }
}
