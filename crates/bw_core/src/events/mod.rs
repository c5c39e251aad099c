//! # Game Event Extraction
//!
//! Turns free-text server chat lines into typed match events.
//!
//! - `classifier` - Anchor-based event classification cascade
//! - `log` - Optional append-only per-match log writer

pub mod classifier;
pub mod log;

pub use classifier::{
    classify, GameEvent, BED_DESTRUCTION_PREFIX, DEATH_INDICATORS, FINAL_KILL_SUFFIX,
    MUTUAL_COMBAT_PHRASE,
};
pub use log::MatchLogWriter;
