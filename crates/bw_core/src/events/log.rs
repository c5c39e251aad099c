//! Append-only per-match log file.
//!
//! One file per match, `game_<timestamp>.log`, holding every raw line as it
//! arrived interleaved with a bracketed marker after each detected event,
//! plus a roster header and a final-stats footer. The log is a diagnostic
//! artifact: every write failure is logged at debug level and swallowed so
//! the match pipeline is never disturbed by a full disk.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::match_state::PlayerMatchStats;
use crate::roster::Roster;

use super::classifier::GameEvent;

const RULE_LINE: &str =
    "================================================================================";

/// Writer for one match's log file.
#[derive(Debug)]
pub struct MatchLogWriter {
    // None when the file could not be created; all writes become no-ops.
    file: Option<File>,
    path: PathBuf,
}

impl MatchLogWriter {
    /// Open a fresh log under `dir` and write the roster header.
    pub fn open(dir: &Path, roster: &Roster) -> Self {
        let stamp = Local::now().format("%Y-%m-%dT%H-%M-%S");
        let path = dir.join(format!("game_{stamp}.log"));

        let file = fs::create_dir_all(dir)
            .and_then(|_| OpenOptions::new().create_new(true).append(true).open(&path))
            .map_err(|err| {
                log::debug!("match log unavailable at {}: {err}", path.display());
                err
            })
            .ok();

        let mut writer = Self { file, path };
        writer.write_line(RULE_LINE);
        writer.write_line(&format!("BEDWARS MATCH LOG - {}", Local::now().to_rfc3339()));
        writer.write_line(RULE_LINE);
        writer.write_line(&format!(
            "Players in game: {}",
            roster.iter().collect::<Vec<_>>().join(", ")
        ));
        writer.write_line(RULE_LINE);
        writer.write_line("");
        writer
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one raw chat line verbatim.
    pub fn record_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            self.write_line(trimmed);
        }
    }

    /// Append a bracketed detection marker for a classified event.
    /// `Unknown` events leave no marker.
    pub fn record_event(&mut self, event: &GameEvent) {
        let marker = match event {
            GameEvent::BedBreak { breaker } => {
                format!("BED_BREAK DETECTED - Breaker: {breaker}")
            }
            GameEvent::Kill { victim, killer } => {
                format!("KILL DETECTED - Victim: {victim}, Killer: {killer}")
            }
            GameEvent::FinalKill { victim, killer } => {
                format!("FINAL_KILL DETECTED - Victim: {victim}, Killer: {killer}")
            }
            GameEvent::EnvironmentDeath { victim } => {
                format!("DEATH DETECTED - Victim: {victim}")
            }
            GameEvent::MutualDeath { first, second } => {
                format!("MUTUAL_DEATH DETECTED - Players: {first}, {second}")
            }
            GameEvent::Unknown => return,
        };
        self.write_line(&format!("[{marker}]"));
    }

    /// Write the end-of-match footer. `stats` is expected in display order;
    /// players with all-zero counters are omitted.
    pub fn finish(&mut self, stats: &[(String, PlayerMatchStats)]) {
        self.write_line("");
        self.write_line(RULE_LINE);
        self.write_line("GAME ENDED - FINAL STATS");
        self.write_line(RULE_LINE);
        for (name, s) in stats {
            if !s.is_empty() {
                self.write_line(&format!(
                    "{name}: Beds={}, FK={}, K={}, D={}",
                    s.beds_broken, s.final_kills, s.kills, s.deaths
                ));
            }
        }
        self.write_line(RULE_LINE);
    }

    fn write_line(&mut self, line: &str) {
        if let Some(file) = &mut self.file {
            if let Err(err) = writeln!(file, "{line}") {
                log::debug!("match log write failed: {err}");
                self.file = None;
            }
        }
    }
}
