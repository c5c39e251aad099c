//! # Match Session
//!
//! Owns the full per-match pipeline: roster intake, synchronous line
//! classification into [`MatchState`], and the once-per-match asynchronous
//! team ranking.
//!
//! Chat lines are processed inline in arrival order with no suspension.
//! Only stat fetching is asynchronous: one fetch per roster member, fanned
//! out concurrently and joined before aggregation, with per-player fallback
//! on failure so a flaky stats backend can never abort a ranking.

use std::collections::HashMap;
use std::path::PathBuf;

use futures_util::future::{join_all, BoxFuture};

use crate::error::FetchError;
use crate::events::{classify, GameEvent, MatchLogWriter};
use crate::match_state::{MatchState, PlayerMatchStats};
use crate::ranking::{
    aggregate, first_rushes, pack_messages, render_entries, PlayerEntry, RankOptions, RankingGate,
    TeamColor, CHAT_BUDGET, ENTRY_SEPARATOR,
};
use crate::roster::Roster;
use crate::scoring::{RawPlayerStats, ThreatScorer};

/// One answer from the stats collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsReply {
    Stats(RawPlayerStats),
    /// The player is nicked; their real stats are unknowable.
    Nicked,
}

/// Async provider of lifetime stats, owned by an external collaborator
/// (typically an HTTP client with its own cache and TTL).
///
/// Implementations are expected to resolve within bounded latency — apply
/// timeouts internally and report [`FetchError::TimedOut`]. The session
/// applies no timeout of its own but fans fetches out concurrently, so one
/// slow player delays the ranking by at most that player's latency.
pub trait StatsSource: Send + Sync {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<StatsReply, FetchError>>;
}

/// Orchestrator for one ongoing sequence of matches.
pub struct MatchSession {
    state: MatchState,
    scorer: ThreatScorer,
    gate: RankingGate,
    options: RankOptions,
    log_dir: Option<PathBuf>,
    log: Option<MatchLogWriter>,
}

impl MatchSession {
    pub fn new(scorer: ThreatScorer, options: RankOptions) -> Self {
        Self {
            state: MatchState::new(),
            scorer,
            gate: RankingGate::new(),
            options,
            log_dir: None,
            log: None,
        }
    }

    /// Enable the per-match log file, one file per match under `dir`.
    pub fn with_match_logs(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Roster arrival. Starts a new match unless one is already being
    /// tracked; a duplicate roster mid-match is ignored so that a repeated
    /// listing cannot reset counters or re-open the ranking gate.
    ///
    /// Returns whether a new match was started.
    pub fn on_roster<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.state.is_tracking() {
            log::debug!("duplicate roster ignored mid-match");
            return false;
        }

        let roster = Roster::new(names);
        self.log = self
            .log_dir
            .as_ref()
            .map(|dir| MatchLogWriter::open(dir, &roster));
        self.state.start(roster);
        self.gate.reset();
        true
    }

    /// Classify one chat line and fold it into the match counters.
    pub fn on_chat_line(&mut self, line: &str) -> GameEvent {
        if !self.state.is_tracking() {
            return GameEvent::Unknown;
        }
        if let Some(log) = &mut self.log {
            log.record_line(line);
        }

        let event = classify(line, self.state.roster());
        self.state.apply(&event);
        if let Some(log) = &mut self.log {
            log.record_event(&event);
        }
        event
    }

    /// Match end: freeze counters and write the log footer. The frozen
    /// state keeps answering queries until the next roster arrives.
    pub fn on_match_end(&mut self) {
        self.state.stop();
        if let Some(mut log) = self.log.take() {
            log.finish(&self.state.query_all());
        }
    }

    /// Explicit re-rank request: reopen the once-per-match gate.
    pub fn request_rerank(&mut self) {
        self.gate.reset();
    }

    /// Final counters in display order, for the caller's own summary.
    pub fn final_stats(&self) -> Vec<(String, PlayerMatchStats)> {
        self.state.query_all()
    }

    /// Compute the team ranking and return the outgoing chat messages:
    /// neighboring-team stat lines first (when enabled), then the packed
    /// ranking entries.
    ///
    /// `teams` maps roster names to their team; unmapped names are skipped.
    /// Emits at most once per match: a closed gate yields no output, and a
    /// successful ranking closes the gate. Fetch failures and nicked
    /// players score with the fixed fallback stats.
    pub async fn rank_teams(
        &mut self,
        source: &dyn StatsSource,
        teams: &HashMap<String, TeamColor>,
        local_team: Option<TeamColor>,
    ) -> Vec<String> {
        if !self.gate.is_open() {
            log::debug!("ranking already sent for this match");
            return Vec::new();
        }

        let names: Vec<String> = self
            .state
            .roster()
            .iter()
            .filter(|name| teams.contains_key(*name))
            .map(str::to_string)
            .collect();

        let replies = join_all(names.iter().map(|name| async move {
            source.fetch(name).await
        }))
        .await;

        let mut entries = Vec::with_capacity(names.len());
        for (name, reply) in names.into_iter().zip(replies) {
            let stats = match reply {
                Ok(StatsReply::Stats(stats)) => stats,
                Ok(StatsReply::Nicked) => {
                    log::debug!("{name} is nicked, scoring with fallback stats");
                    RawPlayerStats::FALLBACK
                }
                Err(err) => {
                    log::warn!("stats fetch for {name} failed ({err}), using fallback");
                    RawPlayerStats::FALLBACK
                }
            };
            let threat = self.scorer.score(&stats);
            entries.push(PlayerEntry {
                team: teams[&name],
                name,
                stats,
                threat,
            });
        }

        let summaries = aggregate(&entries, local_team, &self.options);
        if summaries.iter().all(|s| s.is_local) {
            log::warn!("no enemy team found, ranking not emitted");
            return Vec::new();
        }

        // Neighboring-team stats go out first, one line per message; the
        // ranking itself is packed into as few messages as fit the budget.
        let mut messages = Vec::new();
        if self.options.first_rushes {
            if let Some(mine) = local_team {
                messages.extend(first_rushes(&entries, mine));
            }
        }

        let rendered = render_entries(&summaries, self.options.display_mode);
        messages.extend(pack_messages(&rendered, CHAT_BUDGET, ENTRY_SEPARATOR));
        self.gate.close();
        messages
    }
}
