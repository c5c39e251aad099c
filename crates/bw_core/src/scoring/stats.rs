//! Raw and normalized stat containers.

use serde::{Deserialize, Serialize};

use super::sigmoid::StatKey;

/// Lifetime statistics for one player, as reported by the stats
/// collaborator. All values are raw and unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPlayerStats {
    pub fkdr: f64,
    pub wlr: f64,
    pub kdr: f64,
    pub bblr: f64,
    pub final_kills: f64,
    pub final_deaths: f64,
    pub kills: f64,
    pub deaths: f64,
    pub beds_broken: f64,
    pub beds_lost: f64,
    pub wins: f64,
    pub losses: f64,
    pub stars: f64,
    pub winstreak: f64,
}

impl Default for RawPlayerStats {
    fn default() -> Self {
        Self {
            fkdr: 0.0,
            wlr: 0.0,
            kdr: 0.0,
            bblr: 0.0,
            final_kills: 0.0,
            final_deaths: 0.0,
            kills: 0.0,
            deaths: 0.0,
            beds_broken: 0.0,
            beds_lost: 0.0,
            wins: 0.0,
            losses: 0.0,
            stars: 0.0,
            winstreak: 0.0,
        }
    }
}

impl RawPlayerStats {
    /// Stand-in values for players whose stats could not be fetched or who
    /// are nicked. Deliberately above each variable's midpoint so that an
    /// unknown player is never treated as harmless.
    pub const FALLBACK: RawPlayerStats = RawPlayerStats {
        fkdr: 5.0,
        wlr: 3.0,
        kdr: 3.0,
        bblr: 2.5,
        final_kills: 750.0,
        final_deaths: 250.0,
        kills: 1500.0,
        deaths: 600.0,
        beds_broken: 300.0,
        beds_lost: 120.0,
        wins: 300.0,
        losses: 120.0,
        stars: 500.0,
        winstreak: 5.0,
    };

    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Fkdr => self.fkdr,
            StatKey::Wlr => self.wlr,
            StatKey::Kdr => self.kdr,
            StatKey::Bblr => self.bblr,
            StatKey::FinalKills => self.final_kills,
            StatKey::FinalDeaths => self.final_deaths,
            StatKey::Kills => self.kills,
            StatKey::Deaths => self.deaths,
            StatKey::BedsBroken => self.beds_broken,
            StatKey::BedsLost => self.beds_lost,
            StatKey::Wins => self.wins,
            StatKey::Losses => self.losses,
            StatKey::Stars => self.stars,
            StatKey::Winstreak => self.winstreak,
        }
    }
}

/// Per-variable normalized values, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedStats {
    values: [f64; StatKey::ALL.len()],
}

impl NormalizedStats {
    pub fn new(values: [f64; StatKey::ALL.len()]) -> Self {
        Self { values }
    }

    /// Uniform value for every variable; handy for equation validation.
    pub fn uniform(value: f64) -> Self {
        Self {
            values: [value; StatKey::ALL.len()],
        }
    }

    pub fn get(&self, key: StatKey) -> f64 {
        self.values[key.index()]
    }

    /// Normalized value by equation variable name.
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        StatKey::from_var_name(name).map(|key| self.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_values_are_above_midpoints() {
        for key in StatKey::ALL {
            let fallback = RawPlayerStats::FALLBACK.get(key);
            assert!(
                fallback > key.default_param().midpoint,
                "{} fallback must exceed its midpoint",
                key.var_name()
            );
        }
    }

    #[test]
    fn test_get_by_name() {
        let norm = NormalizedStats::uniform(0.5);
        assert_eq!(norm.get_by_name("fkdr"), Some(0.5));
        assert_eq!(norm.get_by_name("bogus"), None);
    }

    #[test]
    fn test_stats_deserialize_with_missing_fields() {
        // Partial payloads from the collaborator default the rest to zero.
        let stats: RawPlayerStats = serde_json::from_str(r#"{"fkdr": 2.5, "stars": 120}"#).unwrap();
        assert_eq!(stats.fkdr, 2.5);
        assert_eq!(stats.stars, 120.0);
        assert_eq!(stats.kills, 0.0);
    }
}
