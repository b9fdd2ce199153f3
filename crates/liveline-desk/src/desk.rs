//! The desk — assignment engine, message exchange, and lifecycle timers
//!
//! One mutex guards all mutable state. Selection, reservation, session
//! creation, and affinity recording happen inside a single critical section;
//! the sweeper and the queue drainer take the same lock, so an append to a
//! session being ended either lands before removal or fails `SessionNotFound`.

use chrono::{DateTime, Utc};
use liveline_core::{
    AgentId, AgentSpec, ChatMessage, DeskConfig, Error, Result, Session, SessionId, UserId,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::affinity::AffinityTracker;
use crate::clock::{Clock, SystemClock};
use crate::queue::{QueuedRequest, WaitQueue};
use crate::replies::{greeting_for, CannedReplies, ReplyGenerator};
use crate::roster::AgentRoster;
use crate::store::SessionStore;

/// Everything a caller needs after a successful admission.
#[derive(Clone, Debug)]
pub struct SessionGrant {
    pub session_id: SessionId,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub greeting: String,
}

/// Outcome of a connect request. Queued is admission control working as
/// intended, not a failure.
#[derive(Debug)]
pub enum ConnectOutcome {
    Connected(SessionGrant),
    Queued {
        /// 1-based position at enqueue time. Advisory: the queue is dynamic.
        position: usize,
        /// Resolved when a later drain admits this request. Dropping the
        /// ticket abandons the spot.
        ticket: oneshot::Receiver<SessionGrant>,
    },
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct HealthSnapshot {
    pub available_agents: usize,
    pub active_sessions: usize,
    pub queue_length: usize,
}

struct DeskState {
    roster: AgentRoster,
    sessions: SessionStore,
    affinity: AffinityTracker,
    queue: WaitQueue,
    /// Process-wide round-robin counter for the affinity-exhausted tie-break.
    /// Monotonically advanced, wrapped modulo the candidate count at use.
    rotation: u64,
}

pub struct Desk {
    state: Mutex<DeskState>,
    clock: Arc<dyn Clock>,
    replies: Arc<dyn ReplyGenerator>,
    config: DeskConfig,
}

impl Desk {
    pub fn new(roster: Vec<AgentSpec>, config: DeskConfig) -> Self {
        Self::with_parts(
            roster,
            config,
            Arc::new(SystemClock),
            Arc::new(CannedReplies::new()),
        )
    }

    /// Construct with an injected clock and reply generator (tests drive a
    /// manual clock through this).
    pub fn with_parts(
        roster: Vec<AgentSpec>,
        config: DeskConfig,
        clock: Arc<dyn Clock>,
        replies: Arc<dyn ReplyGenerator>,
    ) -> Self {
        let roster = AgentRoster::new(roster);
        info!(
            agents = roster.len(),
            capacity = roster.total_capacity(),
            "desk provisioned"
        );
        Self {
            state: Mutex::new(DeskState {
                roster,
                sessions: SessionStore::new(),
                affinity: AffinityTracker::new(),
                queue: WaitQueue::new(),
                rotation: 0,
            }),
            clock,
            replies,
            config,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// The desk's notion of now, for boundary timestamps.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // -----------------------------------------------------------------------
    // Public operations
    // -----------------------------------------------------------------------

    /// Admit immediately or queue. Never blocks beyond the state lock.
    pub async fn connect(&self, user: &UserId, language: &str) -> Result<ConnectOutcome> {
        let mut state = self.state.lock().await;

        if let Some(grant) = self.try_assign(&mut state, user, language)? {
            return Ok(ConnectOutcome::Connected(grant));
        }

        let (grant_tx, ticket) = oneshot::channel();
        let position = state.queue.push(QueuedRequest {
            user_id: user.clone(),
            language: language.to_string(),
            enqueued_at: self.clock.now(),
            grant_tx,
        });
        info!(user = %user, language, position, "no eligible agent, request queued");
        Ok(ConnectOutcome::Queued { position, ticket })
    }

    /// Append a user message and return the agent's reply. The append is the
    /// liveness signal the sweeper consumes.
    pub async fn send_message(&self, session_id: &SessionId, text: &str) -> Result<String> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let session = state
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::session_not_found(session_id.as_str()))?;

        session.append(ChatMessage::user(text, now));
        let reply = self.replies.reply(session);
        session.append(ChatMessage::agent(reply.clone(), now));
        Ok(reply)
    }

    /// End a session, release its agent, and drain the queue with the freed
    /// capacity. Returns false if the session was already gone.
    pub async fn disconnect(&self, session_id: &SessionId) -> bool {
        let mut state = self.state.lock().await;
        let ended = Self::end_session(&mut state, session_id);
        if ended {
            self.drain_locked(&mut state);
        }
        ended
    }

    pub async fn health(&self) -> HealthSnapshot {
        let state = self.state.lock().await;
        debug_assert_eq!(state.roster.total_active(), state.sessions.len());
        HealthSnapshot {
            available_agents: state.roster.available_count(),
            active_sessions: state.sessions.len(),
            queue_length: state.queue.len(),
        }
    }

    /// Current advisory queue position for a waiting user.
    pub async fn queue_position(&self, user: &UserId) -> Option<usize> {
        self.state.lock().await.queue.position_of(user)
    }

    /// One sweep pass: end every session past its age or idle threshold,
    /// then drain the queue with whatever capacity came free.
    pub async fn sweep_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let expired = state.sessions.expired(now, &self.config);

        let mut swept = 0;
        for id in expired {
            if Self::end_session(&mut state, &id) {
                info!(session = %id, "swept stale session");
                swept += 1;
            }
        }
        if swept > 0 {
            self.drain_locked(&mut state);
        }
        swept
    }

    /// One drain pass over the whole queue, strictly in FIFO order.
    pub async fn drain_queue(&self) -> usize {
        let mut state = self.state.lock().await;
        self.drain_locked(&mut state)
    }

    // -----------------------------------------------------------------------
    // Background timers
    // -----------------------------------------------------------------------

    /// Spawn the sweeper and drain timers. They share a cancellation token
    /// owned by the returned handle; `DeskTasks::shutdown` tears both down.
    pub fn start(self: &Arc<Self>) -> DeskTasks {
        let cancel = CancellationToken::new();

        let sweeper = {
            let desk = self.clone();
            let token = cancel.clone();
            tokio::spawn(async move {
                let mut tick = tokio::time::interval(desk.config.sweep_interval());
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tick.tick() => {
                            let swept = desk.sweep_expired().await;
                            if swept > 0 {
                                debug!(swept, "sweeper reclaimed sessions");
                            }
                        }
                    }
                }
            })
        };

        let drainer = {
            let desk = self.clone();
            let token = cancel.clone();
            tokio::spawn(async move {
                let mut tick = tokio::time::interval(desk.config.drain_interval());
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tick.tick() => {
                            let admitted = desk.drain_queue().await;
                            if admitted > 0 {
                                debug!(admitted, "drain timer admitted queued requests");
                            }
                        }
                    }
                }
            })
        };

        DeskTasks {
            cancel,
            handles: vec![sweeper, drainer],
        }
    }

    // -----------------------------------------------------------------------
    // Internals — all run under the state lock
    // -----------------------------------------------------------------------

    /// Select an agent per the affinity policy, reserve it, create the
    /// session, and record the pairing — one atomic step. `None` means no
    /// eligible capacity (a queueing outcome, not an error).
    fn try_assign(
        &self,
        state: &mut DeskState,
        user: &UserId,
        language: &str,
    ) -> Result<Option<SessionGrant>> {
        let eligible = state.roster.list_available(language);
        if eligible.is_empty() {
            return Ok(None);
        }

        // Prefer the least-loaded agent this user has not seen yet. If they
        // have cycled through everyone, reset history and rotate over the
        // least-loaded candidates so repeat users are never starved.
        let chosen = match eligible
            .iter()
            .find(|id| !state.affinity.contains(user, id))
        {
            Some(id) => id.clone(),
            None => {
                state.affinity.reset(user);
                let min_load = state
                    .roster
                    .get(&eligible[0])
                    .map(|a| a.active)
                    .unwrap_or(0);
                let candidates: Vec<&AgentId> = eligible
                    .iter()
                    .filter(|id| {
                        state
                            .roster
                            .get(id)
                            .map(|a| a.active == min_load)
                            .unwrap_or(false)
                    })
                    .collect();
                let idx = (state.rotation % candidates.len() as u64) as usize;
                state.rotation = state.rotation.wrapping_add(1);
                debug!(user = %user, idx, "affinity exhausted, history reset");
                candidates[idx].clone()
            }
        };

        let agent_name = state
            .roster
            .get(&chosen)
            .map(|a| a.name.clone())
            .ok_or_else(|| Error::agent_not_found(chosen.as_str()))?;
        state.roster.reserve(&chosen)?;

        let now = self.clock.now();
        let session_id = SessionId::new(uuid::Uuid::new_v4().to_string());
        let greeting = greeting_for(&agent_name, language);
        let mut session = Session::new(
            session_id.clone(),
            user.clone(),
            chosen.clone(),
            language,
            now,
        );
        session.append(ChatMessage::agent(greeting.clone(), now));
        state.sessions.insert(session);
        state.affinity.record(user, &chosen);

        info!(user = %user, agent = %chosen, session = %session_id, "session created");
        Ok(Some(SessionGrant {
            session_id,
            agent_id: chosen,
            agent_name,
            greeting,
        }))
    }

    fn end_session(state: &mut DeskState, session_id: &SessionId) -> bool {
        match state.sessions.remove(session_id) {
            Some(session) => {
                state.roster.release(&session.agent_id);
                info!(
                    session = %session_id,
                    agent = %session.agent_id,
                    messages = session.messages.len(),
                    "session ended"
                );
                true
            }
            None => false,
        }
    }

    /// Walk the queue front to back, admitting what now fits. Entries that
    /// still cannot be admitted keep their original order. A failure on one
    /// entry never blocks the rest.
    fn drain_locked(&self, state: &mut DeskState) -> usize {
        if state.queue.is_empty() {
            return 0;
        }

        let pending = state.queue.take_all();
        let mut admitted = 0;
        for request in pending {
            match self.try_assign(state, &request.user_id, &request.language) {
                Ok(Some(grant)) => {
                    admitted += 1;
                    let session_id = grant.session_id.clone();
                    if request.grant_tx.send(grant).is_err() {
                        // Waiter abandoned the ticket: roll the admission
                        // back so the slot is not leaked.
                        warn!(
                            user = %request.user_id,
                            session = %session_id,
                            "queued waiter gone, releasing admission"
                        );
                        Self::end_session(state, &session_id);
                        admitted -= 1;
                    }
                }
                Ok(None) => state.queue.push_back(request),
                Err(e) => {
                    error!(user = %request.user_id, "dropping queued request: {e}");
                }
            }
        }
        admitted
    }
}

/// Handle to the desk's background timers.
pub struct DeskTasks {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl DeskTasks {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel both timers and wait for them to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

