//! # Match State
//!
//! Owns the roster and the live per-player counters for one match.
//!
//! State is created empty, armed by [`MatchState::start`] when the roster
//! arrives, mutated in line-arrival order by [`MatchState::apply`], and
//! frozen by [`MatchState::stop`] at match end. A new `start` fully
//! replaces prior state; nothing carries over between matches.
//!
//! Lines are applied exactly as delivered. Deduplication of retransmitted
//! lines is the transport collaborator's responsibility.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::roster::Roster;

/// Live counters for one player in the current match. All monotone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub kills: u32,
    pub deaths: u32,
    pub final_kills: u32,
    pub beds_broken: u32,
}

impl PlayerMatchStats {
    /// Impact weighting used to order the end-of-match summary.
    pub fn impact(&self) -> u32 {
        self.final_kills * 2 + self.beds_broken * 3 + self.kills
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Tracking,
    Frozen,
}

/// Roster plus per-player counters for the active match.
#[derive(Debug, Clone)]
pub struct MatchState {
    roster: Roster,
    stats: HashMap<String, PlayerMatchStats>,
    phase: Phase,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    /// Create an empty, idle state.
    pub fn new() -> Self {
        Self {
            roster: Roster::default(),
            stats: HashMap::new(),
            phase: Phase::Idle,
        }
    }

    /// Arm tracking for a new match. Discards all prior match data and
    /// zeroes a counter row for every roster member.
    pub fn start(&mut self, roster: Roster) {
        self.stats.clear();
        for name in roster.iter() {
            self.stats.insert(name.to_string(), PlayerMatchStats::default());
        }
        log::debug!("tracking started for {} players", roster.len());
        self.roster = roster;
        self.phase = Phase::Tracking;
    }

    /// Freeze the state. Later `apply` calls become no-ops; queries keep
    /// answering from the frozen counters for the final summary.
    pub fn stop(&mut self) {
        if self.phase == Phase::Tracking {
            self.phase = Phase::Frozen;
            log::debug!("tracking stopped");
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == Phase::Tracking
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutate counters according to one event. Names outside the roster are
    /// ignored, never auto-registered.
    pub fn apply(&mut self, event: &GameEvent) {
        if self.phase != Phase::Tracking {
            return;
        }

        match event {
            GameEvent::BedBreak { breaker } => {
                self.bump(breaker, |s| s.beds_broken += 1);
            }
            GameEvent::Kill { victim, killer } => {
                self.bump(killer, |s| s.kills += 1);
                self.bump(victim, |s| s.deaths += 1);
            }
            GameEvent::FinalKill { victim, killer } => {
                self.bump(killer, |s| s.final_kills += 1);
                self.bump(victim, |s| s.deaths += 1);
            }
            GameEvent::EnvironmentDeath { victim } => {
                self.bump(victim, |s| s.deaths += 1);
            }
            GameEvent::MutualDeath { first, second } => {
                self.bump(first, |s| s.deaths += 1);
                self.bump(second, |s| s.deaths += 1);
            }
            GameEvent::Unknown => {}
        }
    }

    fn bump(&mut self, name: &str, f: impl FnOnce(&mut PlayerMatchStats)) {
        if let Some(stats) = self.stats.get_mut(name) {
            f(stats);
        }
    }

    /// Read-only snapshot for one player.
    pub fn query(&self, name: &str) -> Option<&PlayerMatchStats> {
        self.stats.get(name)
    }

    /// Snapshot of every player's counters, sorted by impact descending
    /// (ties broken by name for determinism).
    pub fn query_all(&self) -> Vec<(String, PlayerMatchStats)> {
        let mut all: Vec<(String, PlayerMatchStats)> = self
            .stats
            .iter()
            .map(|(name, stats)| (name.clone(), *stats))
            .collect();
        all.sort_by(|a, b| b.1.impact().cmp(&a.1.impact()).then_with(|| a.0.cmp(&b.0)));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::classify;

    fn started() -> MatchState {
        let mut state = MatchState::new();
        state.start(Roster::new(["Alice", "Bob", "Carol"]));
        state
    }

    #[test]
    fn test_start_zeroes_counters() {
        let state = started();
        assert_eq!(state.query("Alice"), Some(&PlayerMatchStats::default()));
        assert_eq!(state.query("Mallory"), None);
    }

    #[test]
    fn test_kill_updates_both_sides() {
        let mut state = started();
        let roster = state.roster().clone();
        let event = classify("Alice was killed by Bob.", &roster);
        state.apply(&event);
        assert_eq!(state.query("Alice").unwrap().deaths, 1);
        assert_eq!(state.query("Bob").unwrap().kills, 1);
        assert_eq!(state.query("Bob").unwrap().final_kills, 0);
    }

    #[test]
    fn test_final_kill_updates_final_counter_only() {
        let mut state = started();
        let roster = state.roster().clone();
        state.apply(&classify("Alice was killed by Bob. FINAL KILL!", &roster));
        assert_eq!(state.query("Bob").unwrap().final_kills, 1);
        assert_eq!(state.query("Bob").unwrap().kills, 0);
        assert_eq!(state.query("Alice").unwrap().deaths, 1);
    }

    #[test]
    fn test_bed_break_counter() {
        let mut state = started();
        let roster = state.roster().clone();
        state.apply(&classify(
            "BED DESTRUCTION > Aqua Bed was melted after seeing Carol!",
            &roster,
        ));
        assert_eq!(state.query("Carol").unwrap().beds_broken, 1);
    }

    #[test]
    fn test_environment_death_touches_no_kill_counter() {
        let mut state = started();
        let roster = state.roster().clone();
        state.apply(&classify("Carol fell into the void.", &roster));
        assert_eq!(state.query("Carol").unwrap().deaths, 1);
        for (_, stats) in state.query_all() {
            assert_eq!(stats.kills, 0);
            assert_eq!(stats.final_kills, 0);
        }
    }

    #[test]
    fn test_mutual_death_counts_both() {
        let mut state = started();
        let roster = state.roster().clone();
        state.apply(&classify("Alice fought to the edge with Bob.", &roster));
        assert_eq!(state.query("Alice").unwrap().deaths, 1);
        assert_eq!(state.query("Bob").unwrap().deaths, 1);
    }

    #[test]
    fn test_unknown_leaves_state_unchanged() {
        let mut state = started();
        let before = state.query_all();
        let roster = state.roster().clone();
        state.apply(&classify("Alice: anyone rushing mid?", &roster));
        assert_eq!(state.query_all(), before);
    }

    #[test]
    fn test_events_ignored_after_stop() {
        let mut state = started();
        let roster = state.roster().clone();
        state.apply(&classify("Alice was killed by Bob.", &roster));
        state.stop();
        state.apply(&classify("Alice was killed by Bob.", &roster));
        // Frozen state still answers queries.
        assert_eq!(state.query("Bob").unwrap().kills, 1);
        assert!(!state.is_tracking());
    }

    #[test]
    fn test_restart_replaces_prior_match() {
        let mut state = started();
        let roster = state.roster().clone();
        state.apply(&classify("Alice was killed by Bob.", &roster));
        state.stop();

        state.start(Roster::new(["Dave", "Erin"]));
        assert_eq!(state.query("Alice"), None);
        assert_eq!(state.query("Dave"), Some(&PlayerMatchStats::default()));
        assert!(state.is_tracking());
    }

    #[test]
    fn test_impact_ordering() {
        let mut state = started();
        let roster = state.roster().clone();
        // Carol: 1 bed (3) + 1 kill (1) = 4; Bob: 1 final kill (2).
        state.apply(&classify(
            "BED DESTRUCTION > Pink Bed was incinerated after seeing Carol!",
            &roster,
        ));
        state.apply(&classify("Alice was killed by Carol.", &roster));
        state.apply(&classify("Alice was killed by Bob. FINAL KILL!", &roster));

        let all = state.query_all();
        assert_eq!(all[0].0, "Carol");
        assert_eq!(all[1].0, "Bob");
    }
}
