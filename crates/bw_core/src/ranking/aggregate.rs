//! Per-team aggregation of scored players.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scoring::RawPlayerStats;

use super::team::TeamColor;

/// Whether team entries show summed or per-player-averaged stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    Total,
    Avg,
}

/// Knobs for [`aggregate`] and entry rendering.
#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    pub display_mode: DisplayMode,
    /// Cap on displayed enemy teams. The local team never counts toward it.
    pub max_teams: usize,
    pub show_local_team: bool,
    /// Emit per-player stats for the two neighboring teams before the
    /// ranking itself.
    pub first_rushes: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Total,
            max_teams: 4,
            show_local_team: true,
            first_rushes: true,
        }
    }
}

/// One scored player going into aggregation.
#[derive(Debug, Clone)]
pub struct PlayerEntry {
    pub name: String,
    pub team: TeamColor,
    pub stats: RawPlayerStats,
    pub threat: f64,
}

/// Aggregated view of one team, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummary {
    pub team: TeamColor,
    pub members: Vec<String>,
    pub total_fkdr: f64,
    pub total_stars: f64,
    pub total_wlr: f64,
    pub total_winstreak: f64,
    pub total_threat: f64,
    pub player_count: usize,
    pub is_local: bool,
    /// 1-based threat rank. Enemies are ranked among themselves; the local
    /// team carries the rank it would hold among the enemies.
    pub rank: usize,
}

impl TeamSummary {
    fn accumulate(&mut self, entry: &PlayerEntry) {
        self.members.push(entry.name.clone());
        self.total_fkdr += entry.stats.fkdr;
        self.total_stars += entry.stats.stars;
        self.total_wlr += entry.stats.wlr;
        self.total_winstreak += entry.stats.winstreak;
        self.total_threat += entry.threat;
        self.player_count += 1;
    }

    fn empty(team: TeamColor, is_local: bool) -> Self {
        Self {
            team,
            members: Vec::new(),
            total_fkdr: 0.0,
            total_stars: 0.0,
            total_wlr: 0.0,
            total_winstreak: 0.0,
            total_threat: 0.0,
            player_count: 0,
            is_local,
            rank: 0,
        }
    }

    /// Displayed FKDR under the given mode.
    pub fn display_fkdr(&self, mode: DisplayMode) -> f64 {
        match mode {
            DisplayMode::Total => self.total_fkdr,
            DisplayMode::Avg => self.total_fkdr / self.player_count.max(1) as f64,
        }
    }

    /// Displayed star count under the given mode, rounded to a whole level.
    pub fn display_stars(&self, mode: DisplayMode) -> i64 {
        let stars = match mode {
            DisplayMode::Total => self.total_stars,
            DisplayMode::Avg => self.total_stars / self.player_count.max(1) as f64,
        };
        stars.round() as i64
    }
}

/// Group scored players by team and order teams for display.
///
/// Enemy teams come first, sorted by total threat descending and capped at
/// `max_teams`. When `show_local_team` is set and the local team has
/// entries, it is appended last regardless of the cap, tagged with the rank
/// it would hold: one plus the number of enemy teams that out-threat it.
pub fn aggregate(
    entries: &[PlayerEntry],
    local_team: Option<TeamColor>,
    options: &RankOptions,
) -> Vec<TeamSummary> {
    let mut by_team: HashMap<TeamColor, TeamSummary> = HashMap::new();
    for entry in entries {
        by_team
            .entry(entry.team)
            .or_insert_with(|| {
                TeamSummary::empty(entry.team, Some(entry.team) == local_team)
            })
            .accumulate(entry);
    }

    let mut enemies: Vec<TeamSummary> = Vec::new();
    let mut local: Option<TeamSummary> = None;
    for summary in by_team.into_values() {
        if summary.is_local {
            local = Some(summary);
        } else {
            enemies.push(summary);
        }
    }

    // Stable display order: threat descending, letter as tiebreak.
    enemies.sort_by(|a, b| {
        b.total_threat
            .partial_cmp(&a.total_threat)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.team.letter().cmp(&b.team.letter()))
    });

    let local_rank = local.as_ref().map(|mine| {
        1 + enemies
            .iter()
            .filter(|e| e.total_threat > mine.total_threat)
            .count()
    });

    enemies.truncate(options.max_teams);
    for (i, summary) in enemies.iter_mut().enumerate() {
        summary.rank = i + 1;
    }

    if options.show_local_team {
        if let (Some(mut mine), Some(rank)) = (local, local_rank) {
            mine.rank = rank;
            enemies.push(mine);
        }
    }

    enemies
}

/// Per-player lines for the two teams adjacent to the local team, the
/// likeliest first-rush opponents.
///
/// One header per neighbor carrying its threat rank among all enemy teams,
/// followed by an indented stats line per member. Neighbors with no players
/// in the lobby are skipped.
pub fn first_rushes(entries: &[PlayerEntry], local_team: TeamColor) -> Vec<String> {
    let mut threat: HashMap<TeamColor, f64> = HashMap::new();
    let mut members: HashMap<TeamColor, Vec<&PlayerEntry>> = HashMap::new();
    for entry in entries {
        if entry.team == local_team {
            continue;
        }
        *threat.entry(entry.team).or_default() += entry.threat;
        members.entry(entry.team).or_default().push(entry);
    }

    let mut order: Vec<(TeamColor, f64)> = threat.into_iter().collect();
    order.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.letter().cmp(&b.0.letter()))
    });

    let (left, right) = local_team.neighbors();
    let mut lines = Vec::new();
    for team in [left, right] {
        let Some(team_members) = members.get(&team) else {
            continue;
        };
        if let Some(idx) = order.iter().position(|(t, _)| *t == team) {
            lines.push(format!("{} (#{}):", team.display_name(), idx + 1));
        }
        for entry in team_members {
            lines.push(format!(
                "  {} ({}\u{272b} | {:.2} FKDR)",
                entry.name,
                entry.stats.stars.round() as i64,
                entry.stats.fkdr
            ));
        }
    }
    lines
}
