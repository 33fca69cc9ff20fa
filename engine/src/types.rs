// ═══════════════════════════════════════════════════════════════════════
// Core types — colors, identifiers, phases and per-player-count constants
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Enums ──────────────────────────────────────────────────────────────

/// The five student colors. Each color has one professor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum Color {
    Green,
    Red,
    Yellow,
    Pink,
    Blue,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::Green,
        Color::Red,
        Color::Yellow,
        Color::Pink,
        Color::Blue,
    ];

    /// Dense index used for all `[_; 5]` per-color arrays.
    pub fn index(self) -> usize {
        match self {
            Color::Green => 0,
            Color::Red => 1,
            Color::Yellow => 2,
            Color::Pink => 3,
            Color::Blue => 4,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Green => write!(f, "green"),
            Color::Red => write!(f, "red"),
            Color::Yellow => write!(f, "yellow"),
            Color::Pink => write!(f, "pink"),
            Color::Blue => write!(f, "blue"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Planning,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionStep {
    PlaceStudents,
    MoveMarker,
    DrawSupply,
}

// ── Identifiers ────────────────────────────────────────────────────────

/// Externally visible participant identifier, assigned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Dense 0-based internal index into `Game::players`.
pub type PlayerIndex = usize;

/// Per-color student counts.
pub type ColorCounts = [u32; 5];

// ── Constants ──────────────────────────────────────────────────────────

pub const NUM_ISLANDS: usize = 12;
pub const STUDENTS_PER_COLOR: u32 = 26;
pub const HALL_CAPACITY: u32 = 10;
/// Islands left when the match ends by merging.
pub const MIN_ISLAND_GROUPS: usize = 3;
/// Coins in circulation in an optional-rules match (bank + players).
pub const TOTAL_COINS: u32 = 20;
/// Hall positions that pay out a coin.
pub const COIN_POSITIONS: [u32; 3] = [3, 6, 9];

/// Students moved out of the entrance per action turn; also the size of a supply pool.
pub fn students_per_turn(player_count: usize) -> u32 {
    match player_count {
        3 => 4,
        _ => 3,
    }
}

pub fn entrance_size(player_count: usize) -> usize {
    match player_count {
        3 => 9,
        _ => 7,
    }
}

pub fn rook_count(player_count: usize) -> u32 {
    match player_count {
        3 => 6,
        _ => 8,
    }
}

pub fn color_counts_of(students: &[Color]) -> ColorCounts {
    let mut counts = [0; 5];
    for c in students {
        counts[c.index()] += 1;
    }
    counts
}
