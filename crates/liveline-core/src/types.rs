//! Core types for Liveline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

macro_rules! arc_str_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Hash, Eq, PartialEq)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(Arc::from(s.into()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                Ok(Self::new(String::deserialize(deserializer)?))
            }
        }
    };
}

arc_str_id! {
    /// Session identifier - cheaply cloneable
    SessionId
}

arc_str_id! {
    /// Agent identifier - cheaply cloneable
    AgentId
}

arc_str_id! {
    /// User identifier - cheaply cloneable
    UserId
}

/// Derived agent status. Never stored: recomputed from active vs max.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Available,
    Busy,
}

/// A unit of human-support capacity. Agents are pre-provisioned and never
/// created or destroyed at runtime; only the active-session count mutates.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub languages: Vec<String>,
    pub max_sessions: usize,
    pub active: usize,
}

impl Agent {
    pub fn status(&self) -> AgentStatus {
        if self.active < self.max_sessions {
            AgentStatus::Available
        } else {
            AgentStatus::Busy
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.active < self.max_sessions
    }

    pub fn speaks(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// A message exchanged within a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sent_at,
        }
    }

    pub fn agent(text: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::Agent,
            text: text.into(),
            sent_at,
        }
    }
}

/// An active conversation binding one user to one agent. The agent binding
/// is immutable once created; ending a session releases capacity, it never
/// reassigns.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub agent_id: AgentId,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl Session {
    pub fn new(
        id: SessionId,
        user_id: UserId,
        agent_id: AgentId,
        language: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            agent_id,
            language: language.into(),
            created_at: now,
            last_activity: now,
            messages: Vec::new(),
        }
    }

    /// Append a message and refresh the liveness signal the sweeper reads.
    pub fn append(&mut self, message: ChatMessage) {
        self.last_activity = message.sent_at;
        self.messages.push(message);
    }
}
