//! Error taxonomy for the overlay core.
//!
//! None of these conditions is fatal to a host process: every failure path
//! degrades to a documented default (unknown line, fallback stats, default
//! formula, no overrides) and surfaces as a diagnostic at most.

use thiserror::Error;

/// A stats lookup for a roster member could not be completed.
///
/// Produced by [`StatsSource`](crate::session::StatsSource) implementations.
/// The orchestrator substitutes fallback stats for the affected player and
/// keeps ranking the rest of the lobby.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("stats unavailable for {name}: {reason}")]
    Unavailable { name: String, reason: String },

    #[error("stats request for {name} timed out")]
    TimedOut { name: String },
}

/// A user-supplied rank equation could not be evaluated.
#[derive(Error, Debug, PartialEq)]
pub enum FormulaError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("character '{0}' is not allowed in equations")]
    ForbiddenCharacter(char),

    #[error("unexpected character '{found}' at position {at}")]
    UnexpectedChar { found: char, at: usize },

    #[error("equation ended unexpectedly")]
    UnexpectedEnd,

    #[error("unexpected trailing input at position {at}")]
    TrailingInput { at: usize },

    #[error("invalid number at position {at}")]
    BadNumber { at: usize },

    #[error("equation produced a non-finite result")]
    NonFinite,
}

/// The sigmoid-override store could not be read or written.
///
/// A load failure is equivalent to "no overrides"; only explicit saves
/// propagate this error to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
