//! Wait queue — requests that could not be admitted
//!
//! Strict FIFO. Entries leave the queue only when admitted (resolved through
//! their oneshot) or when their waiter abandoned the ticket. Position is the
//! 1-based index at enqueue time and is advisory only.

use chrono::{DateTime, Utc};
use liveline_core::UserId;
use std::collections::VecDeque;
use tokio::sync::oneshot;

use crate::desk::SessionGrant;

pub struct QueuedRequest {
    pub user_id: UserId,
    pub language: String,
    pub enqueued_at: DateTime<Utc>,
    pub grant_tx: oneshot::Sender<SessionGrant>,
}

#[derive(Default)]
pub struct WaitQueue {
    entries: VecDeque<QueuedRequest>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue and return the 1-based position.
    pub fn push(&mut self, request: QueuedRequest) -> usize {
        self.entries.push_back(request);
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current 1-based position of a user's oldest entry.
    pub fn position_of(&self, user: &UserId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| &e.user_id == user)
            .map(|i| i + 1)
    }

    /// Take the whole queue for a drain pass. The drainer pushes back the
    /// entries that still cannot be admitted, preserving order.
    pub fn take_all(&mut self) -> VecDeque<QueuedRequest> {
        std::mem::take(&mut self.entries)
    }

    pub fn push_back(&mut self, request: QueuedRequest) {
        self.entries.push_back(request);
    }
}
