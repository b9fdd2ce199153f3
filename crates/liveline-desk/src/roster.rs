//! Agent roster — the fixed pool of support capacity
//!
//! Agents are provisioned once at construction. The roster owns the
//! active-session counts; status (`available`/`busy`) is always derived,
//! never stored.

use liveline_core::{Agent, AgentId, AgentSpec, Error, Result};
use tracing::debug;

pub struct AgentRoster {
    // Roster order is stable and meaningful: it breaks load ties.
    agents: Vec<Agent>,
}

impl AgentRoster {
    pub fn new(specs: Vec<AgentSpec>) -> Self {
        let agents = specs
            .into_iter()
            .map(|spec| Agent {
                id: AgentId::new(spec.id),
                name: spec.name,
                languages: spec.languages,
                max_sessions: spec.max_sessions.max(1),
                active: 0,
            })
            .collect();
        Self { agents }
    }

    pub fn get(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| &a.id == id)
    }

    fn get_mut(&mut self, id: &AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| &a.id == id)
    }

    /// Capacity-eligible agents supporting `language`, ascending by current
    /// load. The sort is stable, so equally loaded agents keep roster order.
    pub fn list_available(&self, language: &str) -> Vec<AgentId> {
        let mut eligible: Vec<&Agent> = self
            .agents
            .iter()
            .filter(|a| a.has_capacity() && a.speaks(language))
            .collect();
        eligible.sort_by_key(|a| a.active);
        eligible.into_iter().map(|a| a.id.clone()).collect()
    }

    /// Increment an agent's active-session count. Must only be called after
    /// a successful selection in the same critical section.
    pub fn reserve(&mut self, id: &AgentId) -> Result<()> {
        let agent = self
            .get_mut(id)
            .ok_or_else(|| Error::agent_not_found(id.as_str()))?;
        if !agent.has_capacity() {
            return Err(Error::capacity_exceeded(id.as_str()));
        }
        agent.active += 1;
        debug!(
            agent = %id,
            active = agent.active,
            max = agent.max_sessions,
            "reserved agent slot"
        );
        Ok(())
    }

    /// Decrement an agent's active-session count, floored at zero.
    pub fn release(&mut self, id: &AgentId) {
        if let Some(agent) = self.get_mut(id) {
            agent.active = agent.active.saturating_sub(1);
            debug!(agent = %id, active = agent.active, "released agent slot");
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Agents with at least one spare slot, regardless of language.
    pub fn available_count(&self) -> usize {
        self.agents.iter().filter(|a| a.has_capacity()).count()
    }

    pub fn total_active(&self) -> usize {
        self.agents.iter().map(|a| a.active).sum()
    }

    pub fn total_capacity(&self) -> usize {
        self.agents.iter().map(|a| a.max_sessions).sum()
    }
}
