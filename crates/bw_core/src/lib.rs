//! # bw_core - BedWars Match Intelligence Engine
//!
//! This library extracts typed game events from BedWars server chat,
//! tracks live per-player match statistics, and ranks opposing teams by a
//! normalized threat score.
//!
//! ## Features
//! - Anchor-based chat line classification, resilient to flavor phrasings
//! - Explicit per-match state with a start/stop lifecycle
//! - Sigmoid-normalized threat scoring with persistable tuning overrides
//! - Sandboxed user-defined rank equations (arithmetic only, no eval)
//! - Chat-budget-aware ranking message packing
//!
//! All transport, stats fetching, and message delivery live in external
//! collaborators; see [`session::MatchSession`] for the integration seam.

pub mod error;
pub mod events;
pub mod match_state;
pub mod ranking;
pub mod roster;
pub mod scoring;
pub mod session;

// Re-export the event pipeline
pub use events::{classify, GameEvent, MatchLogWriter};
pub use match_state::{MatchState, PlayerMatchStats};
pub use roster::Roster;

// Re-export scoring types
pub use error::{FetchError, FormulaError, StoreError};
pub use scoring::{
    NormalizedStats, RankEquation, RawPlayerStats, SigmoidOverrides, SigmoidParam, StatKey,
    ThreatScorer,
};

// Re-export ranking and orchestration
pub use ranking::{DisplayMode, RankOptions, RankingGate, TeamColor, TeamSummary};
pub use session::{MatchSession, StatsReply, StatsSource};

/// Library version, from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
