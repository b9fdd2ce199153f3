//! HTTP wire protocol — JSON bodies for the gateway API
//!
//! Field names stay camelCase to match the clients that already speak this
//! API:
//!
//!   POST /api/agent/connect    { "userId": "...", "language": "en" }
//!     → { "success": true, "sessionId": "...", "agentName": "...", "message": "..." }
//!     → { "queued": true, "position": 1 }
//!
//!   POST /api/agent/message    { "sessionId": "...", "message": "..." }
//!     → { "response": "...", "timestamp": "..." }
//!
//!   POST /api/agent/disconnect { "sessionId": "..." }
//!     → { "success": true }

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client → Server requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    /// Anonymous clients omit this; the gateway mints an id for them.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistRequest {
    pub message: String,
    #[serde(default = "default_language")]
    pub language: String,
}

// ---------------------------------------------------------------------------
// Server → Client responses
// ---------------------------------------------------------------------------

/// Connect admits immediately or queues; both are success-shaped replies.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConnectResponse {
    #[serde(rename_all = "camelCase")]
    Connected {
        success: bool,
        session_id: String,
        agent_name: String,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Queued { queued: bool, position: usize },
}

impl ConnectResponse {
    pub fn connected(
        session_id: impl Into<String>,
        agent_name: impl Into<String>,
        greeting: impl Into<String>,
    ) -> Self {
        Self::Connected {
            success: true,
            session_id: session_id.into(),
            agent_name: agent_name.into(),
            message: greeting.into(),
        }
    }

    pub fn queued(position: usize) -> Self {
        Self::Queued {
            queued: true,
            position,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistResponse {
    pub response: String,
    pub suggest_live_agent: bool,
}

/// Poll result for a queued connect.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueuePollResponse {
    #[serde(rename_all = "camelCase")]
    Ready {
        success: bool,
        session_id: String,
        agent_name: String,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Waiting {
        waiting: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub available_agents: usize,
    pub active_sessions: usize,
    pub queue_length: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
