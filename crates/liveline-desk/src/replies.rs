//! Reply generation — the agent-side text collaborator
//!
//! The engine only needs `reply(session) -> text`; everything behind that is
//! out of scope. The stock implementation rotates through per-language canned
//! pools with a shared cursor, so replies are deterministic and test-stable.

use liveline_core::Session;
use std::sync::atomic::{AtomicUsize, Ordering};

pub trait ReplyGenerator: Send + Sync {
    fn reply(&self, session: &Session) -> String;
}

const REPLIES_EN: [&str; 4] = [
    "I understand your concern. Let me help you with that.",
    "That's a great question. Here's what you need to know...",
    "I can definitely assist you with this process.",
    "Let me check that information for you right away.",
];

const REPLIES_SW: [&str; 4] = [
    "Ninaelewa wasiwasi wako. Nisaidie kwa hilo.",
    "Hilo ni swali nzuri. Hapa kuna unachohitaji kujua...",
    "Naweza kukusaidia na mchakato huu.",
    "Niangalie taarifa hiyo kwa ajili yako mara moja.",
];

const REPLIES_SH: [&str; 4] = [
    "Sawa msee, nimeelewa shida yako. Nisaidie na hiyo.",
    "Hiyo ni swali poa sana. Hapa kuna chenye unahitaji kujua...",
    "Naweza kukusort na hii process kabisa.",
    "Niangalie hiyo info kwa ajili yako haraka sana.",
];

#[derive(Default)]
pub struct CannedReplies {
    cursor: AtomicUsize,
}

impl CannedReplies {
    pub fn new() -> Self {
        Self::default()
    }

    fn pool(language: &str) -> &'static [&'static str] {
        match language {
            "sw" => &REPLIES_SW,
            "sh" => &REPLIES_SH,
            _ => &REPLIES_EN,
        }
    }
}

impl ReplyGenerator for CannedReplies {
    fn reply(&self, session: &Session) -> String {
        let pool = Self::pool(&session.language);
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % pool.len();
        pool[idx].to_string()
    }
}

/// Localized first message from a freshly assigned agent.
pub fn greeting_for(agent_name: &str, language: &str) -> String {
    match language {
        "sw" | "sh" => format!(
            "Habari! Mimi ni {agent_name}, msaidizi wako. Ninaweza kukusaidia vipi leo?"
        ),
        _ => format!(
            "Hello! I'm {agent_name}, your support agent. How can I assist you today?"
        ),
    }
}
