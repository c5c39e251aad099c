//! Rendering team summaries to chat-sized messages.

use super::aggregate::{DisplayMode, TeamSummary};

/// Server-side chat length cap, minus headroom for a channel prefix.
pub const CHAT_BUDGET: usize = 240;

/// Separator between entries packed into one message.
pub const ENTRY_SEPARATOR: &str = " // ";

/// Render one ranking line per summary.
///
/// Enemy teams read `"1. Red (412✫ | 7.61 FKDR)"`; the local team reads
/// `"[YOU] Blue (...)"` with its rank folded into the tag position.
pub fn render_entries(summaries: &[TeamSummary], mode: DisplayMode) -> Vec<String> {
    summaries
        .iter()
        .map(|summary| {
            let stats = format!(
                "{}\u{272b} | {:.2} FKDR",
                summary.display_stars(mode),
                summary.display_fkdr(mode)
            );
            if summary.is_local {
                format!("[YOU] {} ({stats})", summary.team.display_name())
            } else {
                format!("{}. {} ({stats})", summary.rank, summary.team.display_name())
            }
        })
        .collect()
}

/// Greedily pack entries into messages within `budget` characters.
///
/// Entries are never split: a new message starts whenever appending the next
/// entry (plus separator) would exceed the budget. An entry that alone
/// exceeds the budget is emitted as its own oversize message rather than
/// truncated.
pub fn pack_messages(entries: &[String], budget: usize, separator: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();

    for entry in entries {
        if current.is_empty() {
            current = entry.clone();
        } else if current.len() + separator.len() + entry.len() > budget {
            messages.push(std::mem::take(&mut current));
            current = entry.clone();
        } else {
            current.push_str(separator);
            current.push_str(entry);
        }
    }

    if !current.is_empty() {
        messages.push(current);
    }

    messages
}
