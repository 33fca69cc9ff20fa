// ═══════════════════════════════════════════════════════════════════════
// Players and dashboards — entrance, hall rows, professors, rooks, coins
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::cards::{self, Card};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Students waiting to be assigned, in arrival order.
    pub entrance: Vec<Color>,
    pub hall: ColorCounts,
    pub professors: [bool; 5],
    /// Rooks still in hand (not standing on an island).
    pub rooks: u32,
    pub coins: u32,
}

impl Dashboard {
    pub fn new(player_count: usize, coins: u32) -> Self {
        Dashboard {
            entrance: Vec::with_capacity(entrance_size(player_count)),
            hall: [0; 5],
            professors: [false; 5],
            rooks: rook_count(player_count),
            coins,
        }
    }

    pub fn hall_count(&self, color: Color) -> u32 {
        self.hall[color.index()]
    }

    pub fn has_professor(&self, color: Color) -> bool {
        self.professors[color.index()]
    }

    pub fn professor_count(&self) -> usize {
        self.professors.iter().filter(|&&p| p).count()
    }

    pub fn hall_has_room(&self, color: Color) -> bool {
        self.hall_count(color) < HALL_CAPACITY
    }

    /// Put a student in its hall row. Returns true when the new position pays a coin.
    pub fn push_hall(&mut self, color: Color) -> bool {
        self.hall[color.index()] += 1;
        COIN_POSITIONS.contains(&self.hall[color.index()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub index: PlayerIndex,
    pub dashboard: Dashboard,
    pub hand: Vec<Card>,
    pub last_card_played: Option<Card>,
}

impl Player {
    pub fn new(id: PlayerId, index: PlayerIndex, player_count: usize, coins: u32) -> Self {
        Player {
            id,
            index,
            dashboard: Dashboard::new(player_count, coins),
            hand: cards::starting_hand(),
            last_card_played: None,
        }
    }

    /// Rooks standing on islands.
    pub fn rooks_placed(&self, player_count: usize) -> u32 {
        rook_count(player_count) - self.dashboard.rooks
    }
}
