//! # Event Classifier
//!
//! Classifies a single pre-stripped chat line into zero or one typed game
//! event, given the current match roster.
//!
//! ## Algorithm
//! The server has dozens of equivalent flavor phrasings per semantic event
//! ("was struck down by", "took the L to", "slipped into void for" all mean
//! *kill*). Instead of enumerating every template, the classifier anchors on
//! a few fixed markers and attributes participants by position: in every
//! observed template the victim's name appears before the killer's.
//!
//! Rules are evaluated in priority order; the first rule whose anchor
//! matches decides the line, even when its extraction yields `Unknown`.
//!
//! 1. Line starts with `BED DESTRUCTION >` - the mentioned player broke a bed.
//! 2. Line ends with `FINAL KILL!` - two mentions are victim then killer;
//!    one mention is an environment final kill (victim only).
//! 3. Line ends with `.` - two mentions are victim then killer; one mention
//!    is an environment death, but only when the line also contains a known
//!    death-indicator phrase (guards against ordinary chat that happens to
//!    contain exactly one roster name).
//!
//! Lines with the fixed mutual-combat phrase kill both participants.

use serde::{Deserialize, Serialize};

use crate::roster::Roster;

/// Sentinel prefix for bed destruction announcements.
pub const BED_DESTRUCTION_PREFIX: &str = "BED DESTRUCTION >";

/// Suffix marking a final kill (victim is eliminated from the match).
pub const FINAL_KILL_SUFFIX: &str = "FINAL KILL!";

/// The one template in which both participants die.
pub const MUTUAL_COMBAT_PHRASE: &str = " fought to the edge with ";

/// Phrases that mark a single-name line as a death rather than chatter.
pub const DEATH_INDICATORS: &[&str] = &[
    "fell into the void",
    "died",
    "disconnected",
    "burned to death",
    "forgot how many blocks",
    "was pushed into the void",
    "fell off the world",
    "had a small brain moment",
];

/// A typed match event extracted from one chat line.
///
/// Exactly one variant per line; `Unknown` carries no attribution and
/// leaves match state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    BedBreak { breaker: String },
    Kill { victim: String, killer: String },
    FinalKill { victim: String, killer: String },
    EnvironmentDeath { victim: String },
    MutualDeath { first: String, second: String },
    Unknown,
}

impl GameEvent {
    /// Does this event carry any attribution?
    pub fn is_known(&self) -> bool {
        !matches!(self, GameEvent::Unknown)
    }
}

/// One entry in the classification cascade: an anchor predicate plus the
/// extractor that runs when the anchor matches.
struct Rule {
    name: &'static str,
    anchor: fn(&str) -> bool,
    extract: fn(&str, &Roster) -> GameEvent,
}

/// Ordered cascade; the first matching anchor wins.
const RULES: &[Rule] = &[
    Rule {
        name: "bed_destruction",
        anchor: |line| line.starts_with(BED_DESTRUCTION_PREFIX),
        extract: extract_bed_break,
    },
    Rule {
        name: "final_kill",
        anchor: |line| line.ends_with(FINAL_KILL_SUFFIX),
        extract: extract_final_kill,
    },
    Rule {
        name: "kill_or_death",
        anchor: |line| line.ends_with('.'),
        extract: extract_kill_or_death,
    },
];

/// Classify a chat line against the roster.
///
/// Deterministic, total and side-effect free. Lines matching no anchor, and
/// anchor-matched lines with an unexpected number of roster mentions, yield
/// [`GameEvent::Unknown`].
pub fn classify(line: &str, roster: &Roster) -> GameEvent {
    let line = line.trim();
    if line.is_empty() || roster.is_empty() {
        return GameEvent::Unknown;
    }

    for rule in RULES {
        if (rule.anchor)(line) {
            let event = (rule.extract)(line, roster);
            log::trace!("rule {} matched: {:?}", rule.name, event);
            return event;
        }
    }

    GameEvent::Unknown
}

fn extract_bed_break(line: &str, roster: &Roster) -> GameEvent {
    match roster.find_first_mention(line) {
        Some(m) => GameEvent::BedBreak {
            breaker: m.name.to_string(),
        },
        None => GameEvent::Unknown,
    }
}

fn extract_final_kill(line: &str, roster: &Roster) -> GameEvent {
    let mentions = roster.find_mentions(line);
    match mentions.as_slice() {
        [victim, killer] => {
            if victim.name == killer.name {
                // Degenerate: both spans resolved to the same player.
                return GameEvent::Unknown;
            }
            if line.contains(MUTUAL_COMBAT_PHRASE) {
                return GameEvent::MutualDeath {
                    first: victim.name.to_string(),
                    second: killer.name.to_string(),
                };
            }
            GameEvent::FinalKill {
                victim: victim.name.to_string(),
                killer: killer.name.to_string(),
            }
        }
        // The suffix marks a final kill, but with a single mention there is
        // no killer to recover; only the victim's death is certain.
        [victim] => GameEvent::EnvironmentDeath {
            victim: victim.name.to_string(),
        },
        _ => GameEvent::Unknown,
    }
}

fn extract_kill_or_death(line: &str, roster: &Roster) -> GameEvent {
    let mentions = roster.find_mentions(line);
    match mentions.as_slice() {
        [victim, killer] => {
            if victim.name == killer.name {
                return GameEvent::Unknown;
            }
            if line.contains(MUTUAL_COMBAT_PHRASE) {
                return GameEvent::MutualDeath {
                    first: victim.name.to_string(),
                    second: killer.name.to_string(),
                };
            }
            GameEvent::Kill {
                victim: victim.name.to_string(),
                killer: killer.name.to_string(),
            }
        }
        [victim] => {
            let lowered = line.to_lowercase();
            if DEATH_INDICATORS.iter().any(|ind| lowered.contains(ind)) {
                GameEvent::EnvironmentDeath {
                    victim: victim.name.to_string(),
                }
            } else {
                GameEvent::Unknown
            }
        }
        _ => GameEvent::Unknown,
    }
}
