//! Affinity tracker — which agents a user has already been paired with
//!
//! History persists across sessions and grows until every eligible agent has
//! been seen, at which point the engine resets it and rotates. This is a
//! fairness policy: users cycle through the whole roster instead of being
//! pinned to (or starved of) one agent.

use liveline_core::{AgentId, UserId};
use std::collections::HashMap;

#[derive(Default)]
pub struct AffinityTracker {
    history: HashMap<UserId, Vec<AgentId>>,
}

impl AffinityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agents previously assigned to this user, in pairing order.
    pub fn history(&self, user: &UserId) -> &[AgentId] {
        self.history.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, user: &UserId, agent: &AgentId) -> bool {
        self.history(user).contains(agent)
    }

    /// Append an agent to the user's history if absent.
    pub fn record(&mut self, user: &UserId, agent: &AgentId) {
        let entries = self.history.entry(user.clone()).or_default();
        if !entries.contains(agent) {
            entries.push(agent.clone());
        }
    }

    /// Clear a user's history. Invoked when no unseen agent remains eligible.
    pub fn reset(&mut self, user: &UserId) {
        self.history.remove(user);
    }
}
