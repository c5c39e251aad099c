//! Match roster and in-line player name matching.
//!
//! The roster is the set of usernames reported for the current match. Event
//! attribution never invents players: a chat line can only be credited to
//! names that are already in the roster.

use serde::{Deserialize, Serialize};

/// Set of player names valid for the current match.
///
/// Names are stored deduplicated, longest first. Matching is longest-first
/// and non-overlapping so that a name which is a substring of another
/// roster name (e.g. `Steve` inside `Steve_`) cannot claim the same span of
/// the line twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    names: Vec<String>,
}

/// A roster name found inside a chat line, with the byte offset of its
/// first unclaimed occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention<'a> {
    pub name: &'a str,
    pub offset: usize,
}

impl Roster {
    /// Build a roster from an iterator of names. Duplicates are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !name.is_empty() && !list.contains(&name) {
                list.push(name);
            }
        }
        // Longest-first, ties alphabetical, so matching order is deterministic.
        list.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { names: list }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterate names in matching order (longest first).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Find every roster member mentioned in `line`, ordered by position.
    ///
    /// Each member claims at most one span: its first occurrence that does
    /// not overlap a span already claimed by a longer (earlier-matched)
    /// name. The result is sorted by byte offset, which is the
    /// victim-before-killer order used by the classifier.
    pub fn find_mentions<'a>(&'a self, line: &str) -> Vec<Mention<'a>> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut found: Vec<Mention<'a>> = Vec::new();

        for name in &self.names {
            let mut search_from = 0;
            while let Some(rel) = line[search_from..].find(name.as_str()) {
                let start = search_from + rel;
                let end = start + name.len();
                let overlaps = claimed.iter().any(|&(s, e)| start < e && end > s);
                if overlaps {
                    // Roster names are ASCII, so start + 1 is a char boundary.
                    search_from = start + 1;
                    continue;
                }
                claimed.push((start, end));
                found.push(Mention { name, offset: start });
                break;
            }
        }

        found.sort_by_key(|m| m.offset);
        found
    }

    /// First roster member mentioned in `line`, if any.
    pub fn find_first_mention<'a>(&'a self, line: &str) -> Option<Mention<'a>> {
        self.find_mentions(line).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_dedup() {
        let roster = Roster::new(["Alice", "Bob", "Alice"]);
        assert_eq!(roster.len(), 2);
        assert!(roster.contains("Alice"));
        assert!(roster.contains("Bob"));
    }

    #[test]
    fn test_mentions_ordered_by_position() {
        let roster = Roster::new(["Killer9", "Victim1"]);
        let mentions = roster.find_mentions("Victim1 was struck down by Killer9.");
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].name, "Victim1");
        assert_eq!(mentions[1].name, "Killer9");
    }

    #[test]
    fn test_substring_name_prefers_longest_match() {
        // "Steve" is a prefix of "Steve_", which occurs first in the line.
        let roster = Roster::new(["Steve", "Steve_"]);
        let mentions = roster.find_mentions("Steve_ was killed by Steve.");
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].name, "Steve_");
        assert_eq!(mentions[0].offset, 0);
        assert_eq!(mentions[1].name, "Steve");
        assert_eq!(mentions[1].offset, 21);
    }

    #[test]
    fn test_substring_name_single_occurrence() {
        // Only the longer name occurs; the shorter one must not claim an
        // overlapping span inside it.
        let roster = Roster::new(["Steve", "Steve_"]);
        let mentions = roster.find_mentions("Steve_ fell into the void.");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].name, "Steve_");
    }

    #[test]
    fn test_no_mentions_in_unrelated_chat() {
        let roster = Roster::new(["Alice", "Bob"]);
        assert!(roster.find_mentions("gg everyone, good game").is_empty());
    }
}
