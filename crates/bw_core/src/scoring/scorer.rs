//! Threat scoring: sigmoid normalization plus a weighted reduction.

use crate::error::FormulaError;

use super::formula::RankEquation;
use super::overrides::SigmoidOverrides;
use super::sigmoid::{SigmoidParam, StatKey};
use super::stats::{NormalizedStats, RawPlayerStats};

/// Default formula weights. FKDR dominates because it is the best single
/// predictor of how dangerous a player is in a fight.
pub const DEFAULT_WEIGHT_FKDR: f64 = 0.70;
pub const DEFAULT_WEIGHT_WLR: f64 = 0.10;
pub const DEFAULT_WEIGHT_WINSTREAK: f64 = 0.15;
pub const DEFAULT_WEIGHT_STARS: f64 = 0.05;

/// Normalizes raw stats and reduces them to one threat value per player.
///
/// With no custom equation the default weighted formula is used and the
/// score is inherently within [0, 100]. A custom equation result is scaled
/// by 100 for parity but deliberately not clamped; a pathological formula
/// can leave the range, which is accepted.
#[derive(Debug, Clone)]
pub struct ThreatScorer {
    params: [SigmoidParam; StatKey::ALL.len()],
    equation: Option<RankEquation>,
    // De-duplicates the formula-failure warning: armed again only after a
    // later successful custom evaluation.
    formula_warned: bool,
}

impl Default for ThreatScorer {
    fn default() -> Self {
        Self::new(&SigmoidOverrides::empty(), None)
    }
}

impl ThreatScorer {
    pub fn new(overrides: &SigmoidOverrides, equation: Option<RankEquation>) -> Self {
        let mut params = [SigmoidParam::new(0.0, 0.0); StatKey::ALL.len()];
        for key in StatKey::ALL {
            params[key.index()] = overrides.param_for(key);
        }
        Self {
            params,
            equation,
            formula_warned: false,
        }
    }

    pub fn equation(&self) -> Option<&RankEquation> {
        self.equation.as_ref()
    }

    /// Replace the custom equation. Clears the warning latch.
    pub fn set_equation(&mut self, equation: Option<RankEquation>) {
        self.equation = equation;
        self.formula_warned = false;
    }

    /// Effective sigmoid parameters for one variable.
    pub fn param_for(&self, key: StatKey) -> SigmoidParam {
        self.params[key.index()]
    }

    /// Squash every raw variable into [0, 1].
    pub fn normalize(&self, stats: &RawPlayerStats) -> NormalizedStats {
        let mut values = [0.0; StatKey::ALL.len()];
        for key in StatKey::ALL {
            values[key.index()] = self.params[key.index()].normalize(stats.get(key));
        }
        NormalizedStats::new(values)
    }

    /// Score one player's raw stats.
    ///
    /// A failing custom equation falls back to the default formula and logs
    /// a single warning until a custom evaluation succeeds again.
    pub fn score(&mut self, stats: &RawPlayerStats) -> f64 {
        let norm = self.normalize(stats);

        if let Some(equation) = &self.equation {
            match equation.evaluate(&norm) {
                Ok(value) => {
                    self.formula_warned = false;
                    return value * 100.0;
                }
                Err(err) => self.warn_once(err),
            }
        }

        Self::default_score(&norm)
    }

    /// The built-in weighted formula over normalized values.
    pub fn default_score(norm: &NormalizedStats) -> f64 {
        100.0
            * (DEFAULT_WEIGHT_FKDR * norm.get(StatKey::Fkdr)
                + DEFAULT_WEIGHT_WLR * norm.get(StatKey::Wlr)
                + DEFAULT_WEIGHT_WINSTREAK * norm.get(StatKey::Winstreak)
                + DEFAULT_WEIGHT_STARS * norm.get(StatKey::Stars))
    }

    fn warn_once(&mut self, err: FormulaError) {
        if !self.formula_warned {
            log::warn!("custom rank equation failed ({err}); falling back to default formula");
            self.formula_warned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::sigmoid::SigmoidParam;

    fn midpoint_stats() -> RawPlayerStats {
        RawPlayerStats {
            fkdr: 3.0,
            wlr: 2.0,
            winstreak: 3.0,
            stars: 250.0,
            ..RawPlayerStats::default()
        }
    }

    #[test]
    fn test_default_score_at_midpoints_is_50() {
        let mut scorer = ThreatScorer::default();
        let score = scorer.score(&midpoint_stats());
        assert!((score - 50.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_default_score_bounded() {
        let mut scorer = ThreatScorer::default();
        let god = RawPlayerStats {
            fkdr: 100.0,
            wlr: 50.0,
            winstreak: 200.0,
            stars: 3000.0,
            ..RawPlayerStats::default()
        };
        let score = scorer.score(&god);
        assert!(score <= 100.0 && score > 99.0);

        let fresh = RawPlayerStats::default();
        assert!(scorer.score(&fresh) >= 0.0);
    }

    #[test]
    fn test_fallback_player_scores_above_average() {
        let mut scorer = ThreatScorer::default();
        assert!(scorer.score(&RawPlayerStats::FALLBACK) > 50.0);
    }

    #[test]
    fn test_custom_equation_scales_by_100() {
        let equation = RankEquation::new("fkdr").unwrap();
        let mut scorer = ThreatScorer::new(&SigmoidOverrides::empty(), Some(equation));
        // fkdr at its midpoint normalizes to exactly 0.5.
        let score = scorer.score(&midpoint_stats());
        assert_eq!(score, 50.0);
    }

    #[test]
    fn test_custom_equation_not_clamped() {
        let equation = RankEquation::new("fkdr * 10").unwrap();
        let mut scorer = ThreatScorer::new(&SigmoidOverrides::empty(), Some(equation));
        assert_eq!(scorer.score(&midpoint_stats()), 500.0);
    }

    #[test]
    fn test_invalid_equation_matches_default_result() {
        let equation = RankEquation::new("fkdr; drop everything").unwrap();
        let mut custom = ThreatScorer::new(&SigmoidOverrides::empty(), Some(equation));
        let mut default = ThreatScorer::default();
        let stats = midpoint_stats();
        assert_eq!(custom.score(&stats), default.score(&stats));
    }

    #[test]
    fn test_warning_latch_resets_after_success() {
        let equation = RankEquation::new("1 / 0").unwrap();
        let mut scorer = ThreatScorer::new(&SigmoidOverrides::empty(), Some(equation));
        scorer.score(&midpoint_stats());
        assert!(scorer.formula_warned);

        scorer.set_equation(RankEquation::new("fkdr"));
        scorer.score(&midpoint_stats());
        assert!(!scorer.formula_warned);
    }

    #[test]
    fn test_overrides_change_normalization() {
        let mut overrides = SigmoidOverrides::empty();
        overrides.set(StatKey::Fkdr, SigmoidParam::new(10.0, 0.8));
        let scorer = ThreatScorer::new(&overrides, None);

        let stats = RawPlayerStats {
            fkdr: 10.0,
            ..RawPlayerStats::default()
        };
        assert_eq!(scorer.normalize(&stats).get(StatKey::Fkdr), 0.5);
    }
}
