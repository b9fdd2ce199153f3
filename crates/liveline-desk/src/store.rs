//! Session store — the authoritative map of live sessions

use chrono::{DateTime, Utc};
use liveline_core::{DeskConfig, Session, SessionId};
use std::collections::HashMap;

#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.id.clone(), session);
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Sessions past either lifetime threshold at `now`.
    pub fn expired(&self, now: DateTime<Utc>, config: &DeskConfig) -> Vec<SessionId> {
        self.sessions
            .values()
            .filter(|s| {
                let age = now - s.created_at;
                let idle = now - s.last_activity;
                age > config.max_session_age() || idle > config.idle_timeout()
            })
            .map(|s| s.id.clone())
            .collect()
    }
}
