//! Liveline Desk - agent assignment, session lifecycle, queuing, sweeping
//!
//! All mutable state (roster, sessions, affinity, queue) lives behind one
//! mutex inside [`Desk`]. Capacity reservation and session creation are a
//! single critical section, so there is no half-state where a reservation
//! succeeded but the session does not exist.

pub mod affinity;
pub mod clock;
pub mod desk;
pub mod queue;
pub mod replies;
pub mod roster;
pub mod store;

pub use affinity::AffinityTracker;
pub use clock::{Clock, ManualClock, SystemClock};
pub use desk::{ConnectOutcome, Desk, DeskTasks, HealthSnapshot, SessionGrant};
pub use queue::{QueuedRequest, WaitQueue};
pub use replies::{greeting_for, CannedReplies, ReplyGenerator};
pub use roster::AgentRoster;
pub use store::SessionStore;

pub use liveline_core::{AgentId, SessionId, UserId};
