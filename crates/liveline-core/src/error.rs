//! Error types for Liveline
//!
//! Being at capacity is not an error: a connect request that cannot be
//! admitted becomes a queued outcome, never an `Err`. The variants here are
//! either ambient failures or genuine invariant violations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Reserve was called on an agent already at its concurrency maximum.
    /// Selection and reservation run inside one critical section, so this
    /// surfacing at all means the admission invariant broke.
    #[error("agent {agent} is at capacity")]
    CapacityExceeded { agent: String },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn capacity_exceeded(agent: impl Into<String>) -> Self {
        Self::CapacityExceeded {
            agent: agent.into(),
        }
    }

    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound(id.into())
    }

    pub fn agent_not_found(id: impl Into<String>) -> Self {
        Self::AgentNotFound(id.into())
    }

    /// True for errors a caller can recover from (surfaced as not-found),
    /// false for invariant violations.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}
