//! # Threat Scoring
//!
//! Normalizes heterogeneous lifetime statistics into a single comparable
//! threat value per player.
//!
//! - `sigmoid` - The 14 tracked variables and their logistic parameters
//! - `stats` - Raw and normalized stat containers, fallback values
//! - `overrides` - Persisted per-variable sigmoid parameter overrides
//! - `formula` - Bounded arithmetic evaluator for custom rank equations
//! - `scorer` - Default weighted formula and custom-equation scoring

pub mod formula;
pub mod overrides;
pub mod scorer;
pub mod sigmoid;
pub mod stats;

pub use formula::RankEquation;
pub use overrides::SigmoidOverrides;
pub use scorer::{ThreatScorer, DEFAULT_WEIGHT_FKDR, DEFAULT_WEIGHT_STARS, DEFAULT_WEIGHT_WINSTREAK, DEFAULT_WEIGHT_WLR};
pub use sigmoid::{SigmoidParam, StatKey};
pub use stats::{NormalizedStats, RawPlayerStats};
