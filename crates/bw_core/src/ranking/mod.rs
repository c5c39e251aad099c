//! # Team Ranking
//!
//! Turns scored players into an ordered, chat-ready team ranking.
//!
//! - `team` - The eight fixed teams, letters, colors, map neighbors
//! - `aggregate` - Per-team stat/threat aggregation and display ordering
//! - `message` - Entry rendering and budget-bounded message packing

pub mod aggregate;
pub mod message;
pub mod team;

pub use aggregate::{aggregate, first_rushes, DisplayMode, PlayerEntry, RankOptions, TeamSummary};
pub use message::{pack_messages, render_entries, CHAT_BUDGET, ENTRY_SEPARATOR};
pub use team::TeamColor;

/// Per-match once-only latch for ranking output.
///
/// A duplicate roster arrival mid-match must not re-send the ranking; only
/// a new match or an explicit re-rank request reopens the gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingGate {
    sent: bool,
}

impl RankingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        !self.sent
    }

    /// Mark the ranking as sent for this match.
    pub fn close(&mut self) {
        self.sent = true;
    }

    /// Reopen the gate (new match or explicit re-rank).
    pub fn reset(&mut self) {
        self.sent = false;
    }
}
