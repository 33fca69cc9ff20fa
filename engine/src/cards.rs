// ═══════════════════════════════════════════════════════════════════════
// Movement cards — the ten cards every player starts with
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

/// A movement card: `order` decides turn order (lower goes first),
/// `movement` caps how far the marker may travel that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub order: u8,
    pub movement: u8,
}

impl Card {
    pub const fn new(order: u8) -> Self {
        Card { order, movement: (order + 1) / 2 }
    }
}

pub const HAND_SIZE: usize = 10;

/// The full hand, ascending by order value.
pub const CARDS: [Card; HAND_SIZE] = [
    Card::new(1),
    Card::new(2),
    Card::new(3),
    Card::new(4),
    Card::new(5),
    Card::new(6),
    Card::new(7),
    Card::new(8),
    Card::new(9),
    Card::new(10),
];

pub fn starting_hand() -> Vec<Card> {
    CARDS.to_vec()
}
