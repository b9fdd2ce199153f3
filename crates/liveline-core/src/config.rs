//! Configuration for the desk engine and the gateway

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pre-provisioned agent definition. The roster is fixed for the lifetime of
/// the process; only runtime state (active-session counts) mutates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: String,
    pub name: String,
    pub languages: Vec<String>,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_max_sessions() -> usize {
    1
}

/// The stock roster: eight agents, all trilingual.
pub fn default_roster() -> Vec<AgentSpec> {
    const NAMES: [(&str, &str); 8] = [
        ("agent-1", "Elizabeth Mafi"),
        ("agent-2", "Kim Ted"),
        ("agent-3", "Grace Nyaguthii"),
        ("agent-4", "John Kamau"),
        ("agent-5", "Mary Wanjiku"),
        ("agent-6", "David Omondi"),
        ("agent-7", "Sarah Akinyi"),
        ("agent-8", "Peter Mwangi"),
    ];
    NAMES
        .iter()
        .map(|(id, name)| AgentSpec {
            id: (*id).to_string(),
            name: (*name).to_string(),
            languages: vec!["en".into(), "sw".into(), "sh".into()],
            max_sessions: default_max_sessions(),
        })
        .collect()
}

/// Parse a roster from its JSON form: an array of agent specs.
pub fn roster_from_json(raw: &str) -> Result<Vec<AgentSpec>> {
    let specs: Vec<AgentSpec> = serde_json::from_str(raw)?;
    if specs.is_empty() {
        return Err(Error::Config("roster has no agents".to_string()));
    }
    Ok(specs)
}

/// Load a roster file from disk.
pub fn load_roster(path: &Path) -> Result<Vec<AgentSpec>> {
    let raw = std::fs::read_to_string(path)?;
    roster_from_json(&raw)
}

/// Desk engine tunables. All timers are expressed in seconds so the config
/// round-trips cleanly through JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Hard cap on total session lifetime.
    #[serde(default = "default_max_session_age_secs")]
    pub max_session_age_secs: u64,
    /// A session with no message exchange for this long is reclaimed.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Sweeper tick interval.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Queue drain tick interval. Drain also runs after every release.
    #[serde(default = "default_drain_interval_secs")]
    pub drain_interval_secs: u64,
}

fn default_max_session_age_secs() -> u64 {
    30 * 60
}

fn default_idle_timeout_secs() -> u64 {
    10 * 60
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

fn default_drain_interval_secs() -> u64 {
    5
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            max_session_age_secs: default_max_session_age_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            drain_interval_secs: default_drain_interval_secs(),
        }
    }
}

impl DeskConfig {
    pub fn max_session_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_session_age_secs as i64)
    }

    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.idle_timeout_secs as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_secs(self.drain_interval_secs)
    }
}

/// Gateway listener configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub bind: BindMode,
}

fn default_port() -> u16 {
    5000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: BindMode::default(),
        }
    }
}

/// Bind mode for the gateway
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    Loopback,
    #[default]
    Lan,
}

impl BindMode {
    pub fn to_addr(&self) -> &str {
        match self {
            BindMode::Loopback => "127.0.0.1",
            BindMode::Lan => "0.0.0.0",
        }
    }
}
