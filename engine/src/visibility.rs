// ═══════════════════════════════════════════════════════════════════════
// Read-only facade and information model
//
//   PUBLIC  — islands, marker, supply pools, dashboards, helpers, bank,
//             bag size, phase/step/turn, play order, cards already played
//   PRIVATE — a player's own remaining hand
//   HIDDEN  — bag order (only its size is visible)
//
// Rendering, text summaries and agents only ever see `GameView`,
// `StateSummary` or `PlayerView`, never the `Game` internals.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::engine::Game;
use crate::helpers::{Helper, HelperId};
use crate::island::Island;
use crate::player::{Dashboard, Player};
use crate::types::*;

/// Borrowing query surface over a game.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    game: &'a Game,
}

impl<'a> GameView<'a> {
    pub fn new(game: &'a Game) -> Self {
        GameView { game }
    }

    pub fn turn(&self) -> u32 {
        self.game.turn
    }

    pub fn phase(&self) -> Phase {
        self.game.phase
    }

    pub fn step(&self) -> ActionStep {
        self.game.step
    }

    pub fn expert(&self) -> bool {
        self.game.expert
    }

    /// Play order as external ids.
    pub fn order(&self) -> Vec<PlayerId> {
        self.game.order.iter().map(|&p| self.game.players[p].id).collect()
    }

    /// Whose turn it is, or None once the game has ended.
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.game.ended {
            None
        } else {
            Some(self.game.players[self.game.current_player()].id)
        }
    }

    pub fn players(&self) -> &'a [Player] {
        &self.game.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&'a Player> {
        self.game.players.iter().find(|p| p.id == id)
    }

    pub fn dashboard(&self, id: PlayerId) -> Option<&'a Dashboard> {
        self.player(id).map(|p| &p.dashboard)
    }

    pub fn islands(&self) -> &'a [Island] {
        &self.game.islands
    }

    pub fn marker(&self) -> usize {
        self.game.marker
    }

    pub fn supply_pools(&self) -> &'a [Vec<Color>] {
        &self.game.clouds
    }

    pub fn helpers(&self) -> &'a [Helper] {
        &self.game.helpers
    }

    pub fn active_helper(&self) -> Option<HelperId> {
        self.game.active_helper
    }

    pub fn helper_used(&self) -> bool {
        self.game.helper_used
    }

    pub fn bank(&self) -> u32 {
        self.game.bank
    }

    pub fn bag_len(&self) -> usize {
        self.game.bag.len()
    }

    pub fn moved_students(&self) -> u32 {
        self.game.moved_students
    }

    pub fn is_last_turn(&self) -> bool {
        self.game.last_turn
    }

    pub fn is_ended(&self) -> bool {
        self.game.ended
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.game.winner.map(|w| self.game.players[w].id)
    }

    pub fn professor_holder(&self, color: Color) -> Option<PlayerId> {
        self.game.professor_holder(color).map(|p| self.game.players[p].id)
    }

    pub fn unclaimed_professors(&self) -> Vec<Color> {
        self.game.unclaimed_professors()
    }

    pub fn max_marker_steps(&self) -> usize {
        self.game.max_marker_steps()
    }

    pub fn played_this_round(&self) -> Vec<u8> {
        self.game.played_this_round()
    }

    pub fn legal_cards(&self, id: PlayerId) -> Vec<usize> {
        self.game
            .index_of(id)
            .map(|p| self.game.legal_cards(p))
            .unwrap_or_default()
    }

    /// Students of each color anywhere in the game: bag, islands, supply
    /// pools, entrances, halls and helper cards. Constant for a match.
    pub fn color_totals(&self) -> ColorCounts {
        let g = self.game;
        let loose: Vec<Color> = g
            .bag
            .iter()
            .chain(g.clouds.iter().flatten())
            .chain(g.helpers.iter().flat_map(|h| h.students()))
            .chain(g.players.iter().flat_map(|p| &p.dashboard.entrance))
            .copied()
            .collect();
        let mut totals = color_counts_of(&loose);
        for (i, total) in totals.iter_mut().enumerate() {
            *total += g.islands.iter().map(|isle| isle.students[i]).sum::<u32>();
            *total += g.players.iter().map(|p| p.dashboard.hall[i]).sum::<u32>();
        }
        totals
    }

    /// Coins in the bank, in purses and left on helper cards.
    pub fn coins_in_play(&self) -> u32 {
        self.game.bank
            + self.game.players.iter().map(|p| p.dashboard.coins).sum::<u32>()
            + self.game.helpers.iter().map(Helper::coins_on_card).sum::<u32>()
    }
}

// ── Owned projections ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayerInfo {
    pub id: PlayerId,
    pub entrance: Vec<Color>,
    pub hall: ColorCounts,
    pub professors: Vec<Color>,
    pub rooks: u32,
    pub coins: u32,
    /// Cards remaining in hand (count only).
    pub cards_in_hand: usize,
    pub last_card_played: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandView {
    pub students: ColorCounts,
    pub owner: Option<PlayerId>,
    pub merge_count: u32,
    pub blockaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperView {
    pub id: HelperId,
    pub name: String,
    pub cost: u32,
    pub min_args: usize,
    pub students: Vec<Color>,
    pub tiles: Option<u32>,
}

/// Public snapshot of the whole table, for rendering and text output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    pub turn: u32,
    pub phase: Phase,
    pub step: ActionStep,
    pub current_player: Option<PlayerId>,
    pub order: Vec<PlayerId>,
    pub players: Vec<PublicPlayerInfo>,
    pub islands: Vec<IslandView>,
    pub marker: usize,
    pub supply_pools: Vec<Vec<Color>>,
    pub helpers: Vec<HelperView>,
    pub active_helper: Option<HelperId>,
    pub helper_used: bool,
    pub bank: u32,
    pub bag_len: usize,
    pub moved_students: u32,
    pub max_marker_steps: usize,
    pub played_this_round: Vec<u8>,
    pub last_turn: bool,
    pub ended: bool,
    pub winner: Option<PlayerId>,
}

/// What one player may see: the public summary plus their own hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: PlayerId,
    pub table: StateSummary,
    pub my_hand: Vec<Card>,
    pub my_legal_cards: Vec<usize>,
}

impl PlayerView {
    pub fn me(&self) -> Option<&PublicPlayerInfo> {
        self.table.players.iter().find(|p| p.id == self.viewer)
    }

    pub fn is_my_turn(&self) -> bool {
        self.table.current_player == Some(self.viewer)
    }
}

pub fn summary(game: &Game) -> StateSummary {
    let view = GameView::new(game);
    let id_of = |p: PlayerIndex| game.players[p].id;

    let players = game
        .players
        .iter()
        .map(|p| PublicPlayerInfo {
            id: p.id,
            entrance: p.dashboard.entrance.clone(),
            hall: p.dashboard.hall,
            professors: Color::ALL.into_iter().filter(|&c| p.dashboard.has_professor(c)).collect(),
            rooks: p.dashboard.rooks,
            coins: p.dashboard.coins,
            cards_in_hand: p.hand.len(),
            last_card_played: p.last_card_played,
        })
        .collect();

    let islands = game
        .islands
        .iter()
        .map(|isle| IslandView {
            students: isle.students,
            owner: isle.owner.map(id_of),
            merge_count: isle.merge_count,
            blockaded: isle.blockaded,
        })
        .collect();

    let helpers = game
        .helpers
        .iter()
        .map(|h| HelperView {
            id: h.id(),
            name: h.name().to_string(),
            cost: h.current_cost(),
            min_args: h.min_arg_count(),
            students: h.students().to_vec(),
            tiles: h.tiles(),
        })
        .collect();

    StateSummary {
        turn: view.turn(),
        phase: view.phase(),
        step: view.step(),
        current_player: view.current_player(),
        order: view.order(),
        players,
        islands,
        marker: view.marker(),
        supply_pools: game.clouds.clone(),
        helpers,
        active_helper: view.active_helper(),
        helper_used: view.helper_used(),
        bank: view.bank(),
        bag_len: view.bag_len(),
        moved_students: view.moved_students(),
        max_marker_steps: view.max_marker_steps(),
        played_this_round: view.played_this_round(),
        last_turn: view.is_last_turn(),
        ended: view.is_ended(),
        winner: view.winner(),
    }
}

/// Build the view for `viewer`. Unknown viewers get an empty hand.
pub fn player_view(game: &Game, viewer: PlayerId) -> PlayerView {
    let view = GameView::new(game);
    PlayerView {
        viewer,
        table: summary(game),
        my_hand: view.player(viewer).map(|p| p.hand.clone()).unwrap_or_default(),
        my_legal_cards: view.legal_cards(viewer),
    }
}
