//! Tracked stat variables and sigmoid normalization.
//!
//! Raw lifetime stats are unbounded (a sweat can have 10,000 final kills).
//! Each variable is squashed into [0, 1] with a logistic curve so that
//! values can be weighted and compared: the midpoint maps to 0.5
//! ("average threat") and the steepness controls how quickly the curve
//! saturates around it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static VAR_NAMES: Lazy<HashMap<&'static str, StatKey>> =
    Lazy::new(|| StatKey::ALL.into_iter().map(|k| (k.var_name(), k)).collect());

/// One tracked stat variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKey {
    Fkdr,
    Wlr,
    Kdr,
    Bblr,
    FinalKills,
    FinalDeaths,
    Kills,
    Deaths,
    BedsBroken,
    BedsLost,
    Wins,
    Losses,
    Stars,
    Winstreak,
}

impl StatKey {
    /// All tracked variables, in canonical order.
    pub const ALL: [StatKey; 14] = [
        StatKey::Fkdr,
        StatKey::Wlr,
        StatKey::Kdr,
        StatKey::Bblr,
        StatKey::FinalKills,
        StatKey::FinalDeaths,
        StatKey::Kills,
        StatKey::Deaths,
        StatKey::BedsBroken,
        StatKey::BedsLost,
        StatKey::Wins,
        StatKey::Losses,
        StatKey::Stars,
        StatKey::Winstreak,
    ];

    /// Index into dense per-variable arrays.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Short name used in rank equations and the override store.
    pub fn var_name(self) -> &'static str {
        match self {
            StatKey::Fkdr => "fkdr",
            StatKey::Wlr => "wlr",
            StatKey::Kdr => "kdr",
            StatKey::Bblr => "bblr",
            StatKey::FinalKills => "fk",
            StatKey::FinalDeaths => "fd",
            StatKey::Kills => "k",
            StatKey::Deaths => "d",
            StatKey::BedsBroken => "bb",
            StatKey::BedsLost => "bl",
            StatKey::Wins => "w",
            StatKey::Losses => "l",
            StatKey::Stars => "stars",
            StatKey::Winstreak => "ws",
        }
    }

    /// Reverse lookup from an equation/store variable name.
    pub fn from_var_name(name: &str) -> Option<StatKey> {
        VAR_NAMES.get(name).copied()
    }

    /// Hardcoded default sigmoid parameters per variable.
    pub fn default_param(self) -> SigmoidParam {
        match self {
            StatKey::Fkdr => SigmoidParam::new(3.0, 0.8),
            StatKey::Wlr => SigmoidParam::new(2.0, 1.0),
            StatKey::Kdr => SigmoidParam::new(2.0, 0.8),
            StatKey::Bblr => SigmoidParam::new(1.5, 1.0),
            StatKey::FinalKills => SigmoidParam::new(500.0, 0.005),
            StatKey::FinalDeaths => SigmoidParam::new(200.0, 0.008),
            StatKey::Kills => SigmoidParam::new(1000.0, 0.003),
            StatKey::Deaths => SigmoidParam::new(500.0, 0.005),
            StatKey::BedsBroken => SigmoidParam::new(200.0, 0.01),
            StatKey::BedsLost => SigmoidParam::new(100.0, 0.015),
            StatKey::Wins => SigmoidParam::new(200.0, 0.008),
            StatKey::Losses => SigmoidParam::new(100.0, 0.015),
            StatKey::Stars => SigmoidParam::new(250.0, 0.01),
            StatKey::Winstreak => SigmoidParam::new(3.0, 0.5),
        }
    }
}

/// Logistic curve parameters for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmoidParam {
    /// Raw value that maps to 0.5.
    pub midpoint: f64,
    /// Curve slope at the midpoint; higher saturates faster.
    pub steepness: f64,
}

impl SigmoidParam {
    pub fn new(midpoint: f64, steepness: f64) -> Self {
        Self { midpoint, steepness }
    }

    /// `1 / (1 + e^(-steepness * (value - midpoint)))`, always in (0, 1).
    pub fn normalize(&self, value: f64) -> f64 {
        1.0 / (1.0 + (-self.steepness * (value - self.midpoint)).exp())
    }

    pub fn is_finite(&self) -> bool {
        self.midpoint.is_finite() && self.steepness.is_finite()
    }
}
