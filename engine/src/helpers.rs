// ═══════════════════════════════════════════════════════════════════════
// Helpers — the twelve costed, once-per-turn rule overrides
//
// Every helper shares one contract: `validate` checks the argument bag
// against the helper's own state and the acting player's dashboard,
// `activate` pays, marks the helper active for the rest of the turn and
// applies the effect. Validation always completes before any write.
//
// Groups:
//   instant     — Herald, Minstrel, Thief (resolved inside `activate`)
//   marker-only — Farmer, Mailman, Centaur, Knight, Fungist (consulted later)
//   stateful    — Monk, Jester, Princess (student pool on the card),
//                 Herbalist (blockade tiles)
// ═══════════════════════════════════════════════════════════════════════

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::Game;
use crate::error::{RuleResult, RuleViolation};
use crate::params::{all_distinct, EffectParams};
use crate::types::*;

/// Helper identifier, `1..=12`. Zero is never a valid helper.
pub type HelperId = u8;

pub const HELPER_COUNT: HelperId = 12;

pub const MONK: HelperId = 1;
pub const FARMER: HelperId = 2;
pub const HERALD: HelperId = 3;
pub const MAILMAN: HelperId = 4;
pub const HERBALIST: HelperId = 5;
pub const CENTAUR: HelperId = 6;
pub const JESTER: HelperId = 7;
pub const KNIGHT: HelperId = 8;
pub const FUNGIST: HelperId = 9;
pub const MINSTREL: HelperId = 10;
pub const PRINCESS: HelperId = 11;
pub const THIEF: HelperId = 12;

/// Extra marker steps granted by the Mailman.
pub const MAILMAN_BONUS_STEPS: usize = 2;
/// Flat influence granted by the Knight.
pub const KNIGHT_BONUS: u32 = 2;
/// Students each player returns to the bag under the Thief.
pub const THIEF_TAKES: u32 = 3;
const HERBALIST_TILES: u32 = 4;
const JESTER_MAX_SWAPS: usize = 3;
const MINSTREL_MAX_SWAPS: usize = 2;

/// Students kept on the card for helpers that own a pool.
pub fn pool_size(id: HelperId) -> usize {
    match id {
        MONK | PRINCESS => 4,
        JESTER => 6,
        _ => 0,
    }
}

fn base_cost(id: HelperId) -> u32 {
    match id {
        MONK | MAILMAN | JESTER | MINSTREL => 1,
        FARMER | HERBALIST | KNIGHT | PRINCESS => 2,
        _ => 3,
    }
}

/// Variant-specific state of a helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Place one card student on an island.
    Monk { students: Vec<Color> },
    /// Win professor ties this turn.
    Farmer,
    /// Resolve a dispute on any island now.
    Herald,
    /// Two extra marker steps this turn.
    Mailman,
    /// One-shot blockades; a tile comes back when consumed.
    Herbalist { tiles: u32 },
    /// Rooks do not count this turn.
    Centaur,
    /// Swap up to three card students with entrance students.
    Jester { students: Vec<Color> },
    /// Two extra influence this turn.
    Knight,
    /// One color adds no influence this turn.
    Fungist { banned: Option<Color> },
    /// Swap up to two entrance students with hall students.
    Minstrel,
    /// Move one card student to the hall.
    Princess { students: Vec<Color> },
    /// Everyone returns up to three students of a color to the bag.
    Thief,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Helper {
    pub effect: Effect,
    cost: u32,
}

impl Helper {
    /// Build helper `id`, filling its pool from the front of `bag`.
    /// Returns None for ids outside `1..=12`.
    pub fn new(id: HelperId, bag: &mut VecDeque<Color>) -> Option<Helper> {
        let mut draw = |n: usize| -> Vec<Color> {
            (0..n).filter_map(|_| bag.pop_front()).collect()
        };
        let effect = match id {
            MONK => Effect::Monk { students: draw(pool_size(id)) },
            FARMER => Effect::Farmer,
            HERALD => Effect::Herald,
            MAILMAN => Effect::Mailman,
            HERBALIST => Effect::Herbalist { tiles: HERBALIST_TILES },
            CENTAUR => Effect::Centaur,
            JESTER => Effect::Jester { students: draw(pool_size(id)) },
            KNIGHT => Effect::Knight,
            FUNGIST => Effect::Fungist { banned: None },
            MINSTREL => Effect::Minstrel,
            PRINCESS => Effect::Princess { students: draw(pool_size(id)) },
            THIEF => Effect::Thief,
            _ => return None,
        };
        Some(Helper { effect, cost: base_cost(id) })
    }

    pub fn id(&self) -> HelperId {
        match self.effect {
            Effect::Monk { .. } => MONK,
            Effect::Farmer => FARMER,
            Effect::Herald => HERALD,
            Effect::Mailman => MAILMAN,
            Effect::Herbalist { .. } => HERBALIST,
            Effect::Centaur => CENTAUR,
            Effect::Jester { .. } => JESTER,
            Effect::Knight => KNIGHT,
            Effect::Fungist { .. } => FUNGIST,
            Effect::Minstrel => MINSTREL,
            Effect::Princess { .. } => PRINCESS,
            Effect::Thief => THIEF,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.effect {
            Effect::Monk { .. } => "Monk",
            Effect::Farmer => "Farmer",
            Effect::Herald => "Herald",
            Effect::Mailman => "Mailman",
            Effect::Herbalist { .. } => "Herbalist",
            Effect::Centaur => "Centaur",
            Effect::Jester { .. } => "Jester",
            Effect::Knight => "Knight",
            Effect::Fungist { .. } => "Fungist",
            Effect::Minstrel => "Minstrel",
            Effect::Princess { .. } => "Princess",
            Effect::Thief => "Thief",
        }
    }

    pub fn current_cost(&self) -> u32 {
        self.cost
    }

    /// One coin stays on the card per activation.
    pub fn coins_on_card(&self) -> u32 {
        self.cost - base_cost(self.id())
    }

    /// Fewest scalar arguments a valid activation supplies.
    pub fn min_arg_count(&self) -> usize {
        match self.effect {
            Effect::Farmer | Effect::Mailman | Effect::Centaur | Effect::Knight => 0,
            Effect::Herald
            | Effect::Herbalist { .. }
            | Effect::Fungist { .. }
            | Effect::Princess { .. }
            | Effect::Thief => 1,
            Effect::Monk { .. } | Effect::Jester { .. } | Effect::Minstrel => 2,
        }
    }

    /// Students sitting on the card (empty for helpers without a pool).
    pub fn students(&self) -> &[Color] {
        match &self.effect {
            Effect::Monk { students }
            | Effect::Jester { students }
            | Effect::Princess { students } => students,
            _ => &[],
        }
    }

    /// Blockade tiles still on the card.
    pub fn tiles(&self) -> Option<u32> {
        match self.effect {
            Effect::Herbalist { tiles } => Some(tiles),
            _ => None,
        }
    }

    /// Color excluded from influence while the Fungist is active.
    pub fn banned_color(&self) -> Option<Color> {
        match self.effect {
            Effect::Fungist { banned } => banned,
            _ => None,
        }
    }

    /// A consumed blockade tile returns to the Herbalist.
    pub(crate) fn return_tile(&mut self) {
        if let Effect::Herbalist { tiles } = &mut self.effect {
            *tiles += 1;
        }
    }

    /// Check `params` against this helper's shape and the current game.
    pub fn validate(&self, game: &Game, acting: PlayerIndex, params: &EffectParams) -> RuleResult<()> {
        if params.arg_count() < self.min_arg_count() {
            return Err(RuleViolation::BadParameters("too few arguments"));
        }
        let dashboard = &game.players[acting].dashboard;
        match &self.effect {
            Effect::Farmer | Effect::Mailman | Effect::Centaur | Effect::Knight => {
                expect_shape(params, Shape::default())
            }
            Effect::Herald => {
                expect_shape(params, Shape { island: true, ..Shape::default() })?;
                check_island(game, params)?;
                Ok(())
            }
            Effect::Herbalist { tiles } => {
                expect_shape(params, Shape { island: true, ..Shape::default() })?;
                let island = check_island(game, params)?;
                if *tiles == 0 {
                    return Err(RuleViolation::BadParameters("no blockade tiles left"));
                }
                if game.islands[island].blockaded {
                    return Err(RuleViolation::BadParameters("island is already blockaded"));
                }
                Ok(())
            }
            Effect::Fungist { .. } | Effect::Thief => {
                expect_shape(params, Shape { color: true, ..Shape::default() })
            }
            Effect::Monk { students } => {
                expect_shape(params, Shape { island: true, card: true, ..Shape::default() })?;
                check_island(game, params)?;
                check_single_card(params, students.len())?;
                Ok(())
            }
            Effect::Princess { students } => {
                expect_shape(params, Shape { card: true, ..Shape::default() })?;
                let card = check_single_card(params, students.len())?;
                if !dashboard.hall_has_room(students[card]) {
                    return Err(RuleViolation::HallFull);
                }
                Ok(())
            }
            Effect::Jester { students } => {
                expect_shape(params, Shape { card: true, entrance: true, ..Shape::default() })?;
                let swaps = params.card_students.len();
                if swaps == 0 || swaps > JESTER_MAX_SWAPS {
                    return Err(RuleViolation::BadParameters("jester swaps 1 to 3 students"));
                }
                if params.entrance_students.len() != swaps {
                    return Err(RuleViolation::BadParameters("swap lists differ in length"));
                }
                check_indices(&params.card_students, students.len(), "card student")?;
                check_indices(&params.entrance_students, dashboard.entrance.len(), "entrance student")
            }
            Effect::Minstrel => {
                expect_shape(params, Shape { entrance: true, hall: true, ..Shape::default() })?;
                let swaps = params.entrance_students.len();
                if swaps == 0 || swaps > MINSTREL_MAX_SWAPS {
                    return Err(RuleViolation::BadParameters("minstrel swaps 1 to 2 students"));
                }
                if params.hall_colors.len() != swaps {
                    return Err(RuleViolation::BadParameters("swap lists differ in length"));
                }
                check_indices(&params.entrance_students, dashboard.entrance.len(), "entrance student")?;
                let mut hall = dashboard.hall;
                for &c in &params.hall_colors {
                    if hall[c.index()] == 0 {
                        return Err(RuleViolation::BadParameters("not enough students in hall row"));
                    }
                    hall[c.index()] -= 1;
                }
                for &e in &params.entrance_students {
                    hall[dashboard.entrance[e].index()] += 1;
                }
                if hall.iter().any(|&n| n > HALL_CAPACITY) {
                    return Err(RuleViolation::HallFull);
                }
                Ok(())
            }
        }
    }

    /// Validate, pay and apply. On error nothing has changed.
    pub(crate) fn activate(&mut self, game: &mut Game, acting: PlayerIndex, params: &EffectParams) -> RuleResult<()> {
        self.validate(game, acting, params)?;

        let cost = self.cost;
        game.players[acting].dashboard.coins -= cost;
        game.bank += cost - 1;
        self.cost += 1;
        game.helper_used = true;
        game.active_helper = Some(self.id());
        info!(player = %game.players[acting].id, helper = self.name(), cost, "helper activated");

        match &mut self.effect {
            Effect::Farmer => game.reassign_professors(),
            Effect::Mailman | Effect::Centaur | Effect::Knight => {}
            Effect::Herald => {
                if let Some(island) = params.island {
                    game.dispute(island);
                }
            }
            Effect::Herbalist { tiles } => {
                if let Some(island) = params.island {
                    *tiles -= 1;
                    game.islands[island].blockaded = true;
                }
            }
            Effect::Fungist { banned } => *banned = params.color,
            Effect::Thief => {
                if let Some(color) = params.color {
                    for player in &mut game.players {
                        let taken = player.dashboard.hall_count(color).min(THIEF_TAKES);
                        player.dashboard.hall[color.index()] -= taken;
                        game.bag.extend(std::iter::repeat(color).take(taken as usize));
                    }
                    game.reassign_professors();
                }
            }
            Effect::Monk { students } => {
                if let (Some(island), Some(&card)) = (params.island, params.card_students.first()) {
                    let color = students.remove(card);
                    game.islands[island].add_student(color);
                    students.extend(game.bag.pop_front());
                }
            }
            Effect::Princess { students } => {
                if let Some(&card) = params.card_students.first() {
                    let color = students.remove(card);
                    game.add_to_hall(acting, color);
                    students.extend(game.bag.pop_front());
                    game.reassign_professors();
                }
            }
            Effect::Jester { students } => {
                let entrance = &mut game.players[acting].dashboard.entrance;
                for (&c, &e) in params.card_students.iter().zip(&params.entrance_students) {
                    std::mem::swap(&mut students[c], &mut entrance[e]);
                }
            }
            Effect::Minstrel => {
                for (&e, &h) in params.entrance_students.iter().zip(&params.hall_colors) {
                    game.players[acting].dashboard.hall[h.index()] -= 1;
                    let incoming = std::mem::replace(&mut game.players[acting].dashboard.entrance[e], h);
                    game.players[acting].dashboard.hall[incoming.index()] += 1;
                    let row = game.players[acting].dashboard.hall_count(incoming);
                    if COIN_POSITIONS.contains(&row) {
                        game.pay_coin(acting);
                    }
                }
                game.reassign_professors();
            }
        }
        Ok(())
    }
}

// ── Argument shape checks ──────────────────────────────────────────────

/// Which fields of the argument bag a helper reads.
#[derive(Debug, Default, Clone, Copy)]
struct Shape {
    island: bool,
    color: bool,
    card: bool,
    entrance: bool,
    hall: bool,
}

fn expect_shape(params: &EffectParams, shape: Shape) -> RuleResult<()> {
    let supplied = Shape {
        island: params.island.is_some(),
        color: params.color.is_some(),
        card: !params.card_students.is_empty(),
        entrance: !params.entrance_students.is_empty(),
        hall: !params.hall_colors.is_empty(),
    };
    let ok = supplied.island == shape.island
        && supplied.color == shape.color
        && supplied.card == shape.card
        && supplied.entrance == shape.entrance
        && supplied.hall == shape.hall;
    if ok {
        Ok(())
    } else {
        Err(RuleViolation::BadParameters("argument shape does not match helper"))
    }
}

fn check_island(game: &Game, params: &EffectParams) -> RuleResult<usize> {
    let island = params.island.unwrap_or(usize::MAX);
    if island >= game.islands.len() {
        return Err(RuleViolation::IndexOutOfRange {
            what: "island",
            index: island,
            len: game.islands.len(),
        });
    }
    Ok(island)
}

fn check_single_card(params: &EffectParams, pool: usize) -> RuleResult<usize> {
    if params.card_students.len() != 1 {
        return Err(RuleViolation::BadParameters("exactly one card student expected"));
    }
    check_indices(&params.card_students, pool, "card student")?;
    Ok(params.card_students[0])
}

fn check_indices(indices: &[usize], len: usize, what: &'static str) -> RuleResult<()> {
    if let Some(&index) = indices.iter().find(|&&i| i >= len) {
        return Err(RuleViolation::IndexOutOfRange { what, index, len });
    }
    if !all_distinct(indices) {
        return Err(RuleViolation::BadParameters("duplicate index"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ids_construct() {
        let mut bag: VecDeque<Color> = std::iter::repeat(Color::Red).take(20).collect();
        for id in 1..=HELPER_COUNT {
            let helper = Helper::new(id, &mut bag).unwrap();
            assert_eq!(helper.id(), id);
            assert_eq!(helper.students().len(), pool_size(id));
        }
        assert_eq!(bag.len(), 20 - 14);
        assert!(Helper::new(0, &mut bag).is_none());
        assert!(Helper::new(13, &mut bag).is_none());
    }

    #[test]
    fn test_base_costs() {
        let mut bag = VecDeque::new();
        let costs: Vec<u32> = (1..=HELPER_COUNT)
            .map(|id| Helper::new(id, &mut bag).unwrap().current_cost())
            .collect();
        assert_eq!(costs, vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_pool_draw_stops_on_empty_bag() {
        let mut bag: VecDeque<Color> = vec![Color::Blue, Color::Green].into();
        let jester = Helper::new(JESTER, &mut bag).unwrap();
        assert_eq!(jester.students(), &[Color::Blue, Color::Green]);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_shape_mismatch() {
        let island_only = Shape { island: true, ..Shape::default() };
        assert!(expect_shape(&EffectParams::new().island(0), island_only).is_ok());
        assert!(expect_shape(&EffectParams::new().island(0).color(Color::Red), island_only).is_err());
        assert!(expect_shape(&EffectParams::new(), Shape::default()).is_ok());
        assert!(expect_shape(&EffectParams::new().color(Color::Red), Shape::default()).is_err());
    }

    #[test]
    fn test_tile_return() {
        let mut bag = VecDeque::new();
        let mut h = Helper::new(HERBALIST, &mut bag).unwrap();
        h.return_tile();
        assert_eq!(h.tiles(), Some(5));
        let mut knight = Helper::new(KNIGHT, &mut bag).unwrap();
        knight.return_tile();
        assert_eq!(knight.tiles(), None);
    }
}
