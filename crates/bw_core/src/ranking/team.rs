//! BedWars team identities.

use serde::{Deserialize, Serialize};

/// The eight fixed BedWars teams, keyed by scoreboard prefix letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Red,
    Blue,
    Green,
    Yellow,
    Aqua,
    White,
    Pink,
    Gray,
}

/// Map order, used for neighboring-team lookup. Adjacent entries spawn next
/// to each other on standard 8-team maps, wrapping around.
const TEAM_ORDER: [TeamColor; 8] = [
    TeamColor::Red,
    TeamColor::Blue,
    TeamColor::Green,
    TeamColor::Yellow,
    TeamColor::Aqua,
    TeamColor::White,
    TeamColor::Pink,
    TeamColor::Gray,
];

impl TeamColor {
    pub const ALL: [TeamColor; 8] = TEAM_ORDER;

    /// Scoreboard prefix letter.
    pub fn letter(self) -> char {
        match self {
            TeamColor::Red => 'R',
            TeamColor::Blue => 'B',
            TeamColor::Green => 'G',
            TeamColor::Yellow => 'Y',
            TeamColor::Aqua => 'A',
            TeamColor::White => 'W',
            TeamColor::Pink => 'P',
            TeamColor::Gray => 'S',
        }
    }

    pub fn from_letter(letter: char) -> Option<TeamColor> {
        Self::ALL
            .into_iter()
            .find(|t| t.letter() == letter.to_ascii_uppercase())
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TeamColor::Red => "Red",
            TeamColor::Blue => "Blue",
            TeamColor::Green => "Green",
            TeamColor::Yellow => "Yellow",
            TeamColor::Aqua => "Aqua",
            TeamColor::White => "White",
            TeamColor::Pink => "Pink",
            TeamColor::Gray => "Gray",
        }
    }

    /// Minecraft chat color code for this team.
    pub fn color_code(self) -> &'static str {
        match self {
            TeamColor::Red => "§c",
            TeamColor::Blue => "§9",
            TeamColor::Green => "§a",
            TeamColor::Yellow => "§e",
            TeamColor::Aqua => "§b",
            TeamColor::White => "§f",
            TeamColor::Pink => "§d",
            TeamColor::Gray => "§7",
        }
    }

    /// The two teams adjacent to this one in the circular map order,
    /// `(left, right)`. These are the likeliest first-rush opponents.
    pub fn neighbors(self) -> (TeamColor, TeamColor) {
        let idx = TEAM_ORDER
            .iter()
            .position(|t| *t == self)
            .unwrap_or_default();
        let n = TEAM_ORDER.len();
        (TEAM_ORDER[(idx + n - 1) % n], TEAM_ORDER[(idx + 1) % n])
    }
}
