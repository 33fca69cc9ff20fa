// ═══════════════════════════════════════════════════════════════════════
// Game Engine — phase/step state machine and every rule resolution
//
// Architecture:
//   `Game` is the single mutable root. Players, islands, supply pools and
//   helpers are plain vectors addressed by index; nothing holds a
//   reference back into the game. The engine never does I/O and never
//   draws randomness after construction.
//
// Flow:
//   Planning: each player in planning order plays one card.
//   Action:   in ascending card order, each player
//             PlaceStudents → MoveMarker → DrawSupply.
//   Then the turn counter advances and empty supply pools are refilled.
//
// Every public mutator validates (turn, phase/step, ended, bounds,
// rule-specific) before the first write, so a rejected call is a no-op.
// ═══════════════════════════════════════════════════════════════════════

use std::cmp::Reverse;
use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::Card;
use crate::error::{RuleResult, RuleViolation};
use crate::helpers::{self, Helper, HelperId};
use crate::island::{self, Island};
use crate::params::EffectParams;
use crate::player::Player;
use crate::setup::{GameConfig, Setup};
use crate::supply;
use crate::types::*;

/// Player-facing moves, dispatched by `Game::apply_action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Play the card at this hand index.
    PlayCard(usize),
    /// Move the entrance student at this index to its hall row.
    PlaceInHall(usize),
    /// Move an entrance student onto an island.
    PlaceOnIsland { student: usize, island: usize },
    /// Move the marker this many islands clockwise.
    MoveMarker(usize),
    /// Take every student from this supply pool.
    DrawSupply(usize),
    /// Activate the helper in this slot.
    ActivateHelper { slot: usize, params: EffectParams },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(crate) expert: bool,
    pub(crate) turn: u32,
    pub(crate) phase: Phase,
    pub(crate) step: ActionStep,
    /// Position in `order` of the player whose turn it is.
    pub(crate) player_turn: usize,
    pub(crate) moved_students: u32,
    /// Planning order during Planning, card order during Action.
    pub(crate) order: Vec<PlayerIndex>,
    pub(crate) players: Vec<Player>,
    pub(crate) bag: VecDeque<Color>,
    pub(crate) islands: Vec<Island>,
    pub(crate) marker: usize,
    pub(crate) clouds: Vec<Vec<Color>>,
    pub(crate) helpers: Vec<Helper>,
    pub(crate) active_helper: Option<HelperId>,
    pub(crate) helper_used: bool,
    pub(crate) bank: u32,
    pub(crate) last_turn: bool,
    pub(crate) ended: bool,
    pub(crate) winner: Option<PlayerIndex>,
    /// Deep copy of the state at the end of the last completed player turn.
    #[serde(skip)]
    pub(crate) snapshot: Option<Box<Game>>,
}

impl Game {
    // ── Construction ───────────────────────────────────────────────────

    /// Random, seed-deterministic setup.
    pub fn new(config: GameConfig, seed: u64) -> RuleResult<Game> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let setup = Setup::random(&config, &mut rng);
        Game::from_setup(config, setup)
    }

    /// Build a game from an explicit layout.
    pub fn from_setup(config: GameConfig, setup: Setup) -> RuleResult<Game> {
        config.validate()?;
        setup.validate(&config)?;

        let n = config.players.len();
        let starting_coins = u32::from(config.expert);
        let bank = if config.expert { TOTAL_COINS - n as u32 * starting_coins } else { 0 };

        let islands = setup
            .island_students
            .iter()
            .enumerate()
            .map(|(i, student)| {
                let mut island = Island::new(i as u32);
                if let Some(&c) = student.as_ref() {
                    island.add_student(c);
                }
                island
            })
            .collect();

        let mut bag: VecDeque<Color> = setup.bag.into();
        let mut players: Vec<Player> = config
            .players
            .iter()
            .enumerate()
            .map(|(i, &id)| Player::new(id, i, n, starting_coins))
            .collect();
        for player in &mut players {
            player.dashboard.entrance = bag.drain(..entrance_size(n)).collect();
        }

        let mut clouds = vec![Vec::new(); n];
        let refilled = supply::refill(&mut clouds, &mut bag, students_per_turn(n) as usize);

        let helpers = setup
            .helpers
            .iter()
            .filter_map(|&id| Helper::new(id, &mut bag))
            .collect();
        let last_turn = !refilled || bag.is_empty();

        info!(players = n, expert = config.expert, marker = setup.marker, "game created");

        Ok(Game {
            expert: config.expert,
            turn: 1,
            phase: Phase::Planning,
            step: ActionStep::PlaceStudents,
            player_turn: 0,
            moved_students: 0,
            order: (0..n).collect(),
            players,
            bag,
            islands,
            marker: setup.marker,
            clouds,
            helpers,
            active_helper: None,
            helper_used: false,
            bank,
            last_turn,
            ended: false,
            winner: None,
            snapshot: None,
        })
    }

    // ── Small accessors ────────────────────────────────────────────────

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Internal index of the player whose turn it is.
    pub fn current_player(&self) -> PlayerIndex {
        self.order[self.player_turn.min(self.order.len() - 1)]
    }

    pub(crate) fn index_of(&self, id: PlayerId) -> RuleResult<PlayerIndex> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(RuleViolation::UnknownPlayer(id))
    }

    pub(crate) fn helper_active(&self, id: HelperId) -> bool {
        self.active_helper == Some(id)
    }

    /// Largest marker move the current player may make.
    pub fn max_marker_steps(&self) -> usize {
        let card = self.players[self.current_player()].last_card_played;
        let base = card.map_or(0, |c| c.movement as usize);
        if self.helper_active(helpers::MAILMAN) {
            base + helpers::MAILMAN_BONUS_STEPS
        } else {
            base
        }
    }

    /// Card order values already played this round by earlier planners.
    pub fn played_this_round(&self) -> Vec<u8> {
        if self.phase != Phase::Planning {
            return Vec::new();
        }
        self.order[..self.player_turn]
            .iter()
            .filter_map(|&p| self.players[p].last_card_played.map(|c| c.order))
            .collect()
    }

    /// Hand indices the player could legally play right now. A card colliding
    /// with an earlier play is legal only when every card in hand collides.
    pub(crate) fn legal_cards(&self, player: PlayerIndex) -> Vec<usize> {
        let played = self.played_this_round();
        let hand = &self.players[player].hand;
        let fresh: Vec<usize> = (0..hand.len())
            .filter(|&i| !played.contains(&hand[i].order))
            .collect();
        if fresh.is_empty() {
            (0..hand.len()).collect()
        } else {
            fresh
        }
    }

    // ── Legality gates ─────────────────────────────────────────────────

    /// Turn, phase/step and ended checks, in that order.
    fn check_turn(&self, id: PlayerId, phase: Phase, step: Option<ActionStep>) -> RuleResult<PlayerIndex> {
        let idx = self.index_of(id)?;
        if self.current_player() != idx {
            return Err(RuleViolation::NotYourTurn(id));
        }
        if self.phase != phase || step.is_some_and(|s| s != self.step) {
            return Err(RuleViolation::WrongPhase);
        }
        if self.ended {
            return Err(RuleViolation::GameEnded);
        }
        Ok(idx)
    }

    fn check_entrance(&self, player: PlayerIndex, index: usize) -> RuleResult<Color> {
        let entrance = &self.players[player].dashboard.entrance;
        entrance.get(index).copied().ok_or(RuleViolation::IndexOutOfRange {
            what: "entrance student",
            index,
            len: entrance.len(),
        })
    }

    // ── Player actions ─────────────────────────────────────────────────

    pub fn apply_action(&mut self, id: PlayerId, action: &Action) -> RuleResult<()> {
        match action {
            Action::PlayCard(card) => self.play_card(id, *card),
            Action::PlaceInHall(student) => self.place_student_in_hall(id, *student),
            Action::PlaceOnIsland { student, island } => self.place_student_on_island(id, *student, *island),
            Action::MoveMarker(steps) => self.move_marker(id, *steps),
            Action::DrawSupply(pool) => self.draw_supply(id, *pool),
            Action::ActivateHelper { slot, params } => self.activate_helper(id, *slot, params),
        }
    }

    pub fn play_card(&mut self, id: PlayerId, card_index: usize) -> RuleResult<()> {
        let idx = self.check_turn(id, Phase::Planning, None)?;
        let hand = &self.players[idx].hand;
        let Some(card) = hand.get(card_index) else {
            return Err(RuleViolation::IndexOutOfRange { what: "card", index: card_index, len: hand.len() });
        };
        if !self.legal_cards(idx).contains(&card_index) {
            return Err(RuleViolation::CardAlreadyPlayed(card.order));
        }
        self.commit_card(idx, card_index);
        Ok(())
    }

    fn commit_card(&mut self, idx: PlayerIndex, card_index: usize) {
        let card = self.players[idx].hand.remove(card_index);
        self.players[idx].last_card_played = Some(card);
        debug!(player = %self.players[idx].id, order = card.order, "card played");

        self.player_turn += 1;
        if self.player_turn == self.player_count() {
            self.finish_planning();
        }
        self.snapshot();
    }

    /// Sort into action order (stable, so forced duplicates keep planning order).
    fn finish_planning(&mut self) {
        let players = &self.players;
        self.order.sort_by_key(|&p| players[p].last_card_played.map_or(u8::MAX, |c: Card| c.order));
        self.phase = Phase::Action;
        self.player_turn = 0;
        self.moved_students = 0;
        self.active_helper = None;
        self.helper_used = false;
        self.begin_action_turn();
        if self.players.iter().any(|p| p.hand.is_empty()) {
            info!(turn = self.turn, "hands exhausted, last turn");
            self.last_turn = true;
        }
        debug!(order = ?self.order, "action phase begins");
    }

    pub fn place_student_in_hall(&mut self, id: PlayerId, student: usize) -> RuleResult<()> {
        let idx = self.check_turn(id, Phase::Action, Some(ActionStep::PlaceStudents))?;
        let color = self.check_entrance(idx, student)?;
        if !self.players[idx].dashboard.hall_has_room(color) {
            return Err(RuleViolation::HallFull);
        }

        self.players[idx].dashboard.entrance.remove(student);
        self.add_to_hall(idx, color);
        self.reassign_professors();
        debug!(player = %id, %color, "student to hall");
        self.count_moved_student(idx);
        Ok(())
    }

    pub fn place_student_on_island(&mut self, id: PlayerId, student: usize, island: usize) -> RuleResult<()> {
        let idx = self.check_turn(id, Phase::Action, Some(ActionStep::PlaceStudents))?;
        let color = self.check_entrance(idx, student)?;
        if island >= self.islands.len() {
            return Err(RuleViolation::IndexOutOfRange { what: "island", index: island, len: self.islands.len() });
        }

        self.players[idx].dashboard.entrance.remove(student);
        self.islands[island].add_student(color);
        debug!(player = %id, %color, island, "student to island");
        self.count_moved_student(idx);
        Ok(())
    }

    /// Placement ends after the per-turn quota or when the entrance runs dry
    /// (possible after skipped supply draws).
    fn count_moved_student(&mut self, player: PlayerIndex) {
        self.moved_students += 1;
        if self.moved_students >= students_per_turn(self.player_count())
            || self.players[player].dashboard.entrance.is_empty()
        {
            self.moved_students = 0;
            self.step = ActionStep::MoveMarker;
        }
    }

    /// An empty entrance has nothing to place, so the turn opens on the marker.
    fn begin_action_turn(&mut self) {
        let empty = self.players[self.current_player()].dashboard.entrance.is_empty();
        self.step = if empty { ActionStep::MoveMarker } else { ActionStep::PlaceStudents };
    }

    pub fn move_marker(&mut self, id: PlayerId, steps: usize) -> RuleResult<()> {
        self.check_turn(id, Phase::Action, Some(ActionStep::MoveMarker))?;
        let max = self.max_marker_steps();
        if steps == 0 || steps > max {
            return Err(RuleViolation::InvalidMove { steps, max });
        }

        self.marker = (self.marker + steps) % self.islands.len();
        debug!(player = %id, steps, marker = self.marker, "marker moved");
        self.dispute(self.marker);
        if self.ended {
            return Ok(());
        }
        if self.last_turn {
            self.end_player_turn();
        } else {
            self.step = ActionStep::DrawSupply;
        }
        Ok(())
    }

    pub fn draw_supply(&mut self, id: PlayerId, pool: usize) -> RuleResult<()> {
        let idx = self.check_turn(id, Phase::Action, Some(ActionStep::DrawSupply))?;
        let Some(cloud) = self.clouds.get(pool) else {
            return Err(RuleViolation::IndexOutOfRange { what: "supply pool", index: pool, len: self.clouds.len() });
        };
        if cloud.is_empty() {
            return Err(RuleViolation::EmptySupply);
        }

        let drawn = std::mem::take(&mut self.clouds[pool]);
        debug!(player = %id, pool, count = drawn.len(), "supply drawn");
        self.players[idx].dashboard.entrance.extend(drawn);
        self.end_player_turn();
        Ok(())
    }

    pub fn activate_helper(&mut self, id: PlayerId, slot: usize, params: &EffectParams) -> RuleResult<()> {
        let idx = self.check_turn(id, Phase::Action, None)?;
        if !self.expert {
            return Err(RuleViolation::OptionalRulesDisabled);
        }
        if slot >= self.helpers.len() {
            return Err(RuleViolation::IndexOutOfRange { what: "helper", index: slot, len: self.helpers.len() });
        }
        if self.helper_used {
            return Err(RuleViolation::HelperAlreadyActivated);
        }
        let need = self.helpers[slot].current_cost();
        let have = self.players[idx].dashboard.coins;
        if have < need {
            return Err(RuleViolation::InsufficientCoins { need, have });
        }

        let mut helper = self.helpers.remove(slot);
        let result = helper.activate(self, idx, params);
        self.helpers.insert(slot, helper);
        result
    }

    // ── Turn progression ───────────────────────────────────────────────

    /// Close the current player's action turn and hand over to the next.
    fn end_player_turn(&mut self) {
        self.active_helper = None;
        self.helper_used = false;
        self.moved_students = 0;
        self.step = ActionStep::PlaceStudents;
        self.player_turn += 1;

        if self.player_turn == self.player_count() {
            if self.last_turn {
                self.finish_by_exhaustion();
            } else {
                self.start_round();
            }
        } else {
            self.begin_action_turn();
        }
        self.snapshot();
    }

    fn start_round(&mut self) {
        self.turn += 1;
        self.phase = Phase::Planning;
        self.player_turn = 0;
        let per_pool = students_per_turn(self.player_count()) as usize;
        if !supply::refill(&mut self.clouds, &mut self.bag, per_pool) {
            info!(turn = self.turn, "bag cannot refill supply pools, last turn");
            self.last_turn = true;
        } else if self.bag.is_empty() {
            info!(turn = self.turn, "bag emptied by refill, last turn");
            self.last_turn = true;
        }
        debug!(turn = self.turn, "planning phase begins");
    }

    /// Disconnect recovery: finish the current player's turn on their behalf.
    /// In Planning the highest legal hand index is played; in Action the
    /// partially moved students stay where they are and the turn passes on.
    pub fn skip_turn(&mut self) -> RuleResult<()> {
        if self.ended {
            return Err(RuleViolation::GameEnded);
        }
        let idx = self.current_player();
        info!(player = %self.players[idx].id, phase = ?self.phase, "turn skipped");
        match self.phase {
            Phase::Planning => {
                let legal = self.legal_cards(idx);
                let Some(&card) = legal.iter().max() else {
                    return Err(RuleViolation::WrongPhase);
                };
                self.commit_card(idx, card);
            }
            Phase::Action => self.end_player_turn(),
        }
        Ok(())
    }

    // ── Dispute resolution ─────────────────────────────────────────────

    /// Influence of every player on `island` under the active helper.
    pub(crate) fn influence(&self, island: usize) -> Vec<u32> {
        let isle = &self.islands[island];
        let mut scores = vec![0; self.player_count()];

        if let Some(owner) = isle.owner {
            if !self.helper_active(helpers::CENTAUR) {
                scores[owner] += isle.merge_count;
            }
        }
        let banned = if self.helper_active(helpers::FUNGIST) {
            self.helpers.iter().find_map(|h| h.banned_color())
        } else {
            None
        };
        for color in Color::ALL {
            if Some(color) == banned {
                continue;
            }
            if let Some(holder) = self.professor_holder(color) {
                scores[holder] += isle.count(color);
            }
        }
        if self.helper_active(helpers::KNIGHT) {
            scores[self.current_player()] += helpers::KNIGHT_BONUS;
        }
        scores
    }

    /// Resolve who controls `island`. Ties never move ownership.
    pub(crate) fn dispute(&mut self, island: usize) {
        if self.islands[island].blockaded {
            self.islands[island].blockaded = false;
            self.on_blockade_consumed();
            debug!(island, "blockade consumed");
            return;
        }

        let scores = self.influence(island);
        let top = scores.iter().copied().max().unwrap_or(0);
        let leaders: Vec<PlayerIndex> = (0..scores.len()).filter(|&p| scores[p] == top).collect();
        let &[winner] = leaders.as_slice() else {
            return;
        };
        let old = self.islands[island].owner;
        if old == Some(winner) {
            return;
        }

        let rooks = self.islands[island].merge_count;
        if let Some(old) = old {
            self.players[old].dashboard.rooks += rooks;
        }
        let dashboard = &mut self.players[winner].dashboard;
        dashboard.rooks = dashboard.rooks.saturating_sub(rooks);
        self.islands[island].owner = Some(winner);
        info!(island, owner = %self.players[winner].id, ?scores, "island changed hands");

        if self.players[winner].dashboard.rooks == 0 {
            self.finish_with_winner(winner);
            return;
        }
        self.merge_sweep();
    }

    fn on_blockade_consumed(&mut self) {
        if let Some(herbalist) = self.helpers.iter_mut().find(|h| h.id() == helpers::HERBALIST) {
            herbalist.return_tile();
        }
    }

    /// Fuse adjacent same-owner islands until none remain or only three
    /// groups are left, which ends the match.
    pub(crate) fn merge_sweep(&mut self) {
        if self.ended {
            return;
        }
        while self.islands.len() > MIN_ISLAND_GROUPS {
            let Some((kept, removed)) = island::find_mergeable_pair(&self.islands) else {
                break;
            };
            let other = self.islands.remove(removed);
            let target = if kept > removed { kept - 1 } else { kept };
            if self.islands[target].absorb(other) {
                self.on_blockade_consumed();
            }
            self.marker = island::marker_after_removal(self.marker, kept, removed);
            info!(groups = self.islands.len(), marker = self.marker, "islands merged");
        }
        if self.islands.len() <= MIN_ISLAND_GROUPS {
            self.finish_by_exhaustion();
        }
    }

    // ── Professors & coins ─────────────────────────────────────────────

    pub fn professor_holder(&self, color: Color) -> Option<PlayerIndex> {
        self.players.iter().position(|p| p.dashboard.has_professor(color))
    }

    pub fn unclaimed_professors(&self) -> Vec<Color> {
        Color::ALL
            .into_iter()
            .filter(|&c| self.professor_holder(c).is_none())
            .collect()
    }

    /// Recompute every professor from hall counts.
    pub(crate) fn reassign_professors(&mut self) {
        let acting = self.current_player();
        let farmer = self.phase == Phase::Action && self.helper_active(helpers::FARMER);
        for color in Color::ALL {
            let counts: Vec<u32> = self.players.iter().map(|p| p.dashboard.hall_count(color)).collect();
            let top = counts.iter().copied().max().unwrap_or(0);
            let current = self.professor_holder(color);
            let holder = if top == 0 {
                None
            } else {
                let leaders: Vec<PlayerIndex> = (0..counts.len()).filter(|&p| counts[p] == top).collect();
                if leaders.len() == 1 {
                    Some(leaders[0])
                } else if farmer && leaders.contains(&acting) {
                    Some(acting)
                } else {
                    current.filter(|c| leaders.contains(c))
                }
            };
            if holder != current {
                for (i, p) in self.players.iter_mut().enumerate() {
                    p.dashboard.professors[color.index()] = Some(i) == holder;
                }
                debug!(%color, ?holder, "professor reassigned");
            }
        }
    }

    /// Place a student in a hall row, paying out a coin on coin positions.
    pub(crate) fn add_to_hall(&mut self, player: PlayerIndex, color: Color) {
        if self.players[player].dashboard.push_hall(color) {
            self.pay_coin(player);
        }
    }

    pub(crate) fn pay_coin(&mut self, player: PlayerIndex) {
        if self.expert && self.bank > 0 {
            self.bank -= 1;
            self.players[player].dashboard.coins += 1;
        }
    }

    // ── Winner computation ─────────────────────────────────────────────

    /// Turn/island exhaustion winner: most rooks placed, then most
    /// professors, then lowest internal index.
    pub fn compute_winner(&self) -> PlayerIndex {
        let n = self.player_count();
        self.players
            .iter()
            .min_by_key(|p| (Reverse(p.rooks_placed(n)), Reverse(p.dashboard.professor_count()), p.index))
            .map_or(0, |p| p.index)
    }

    fn finish_by_exhaustion(&mut self) {
        let winner = self.compute_winner();
        self.finish_with_winner(winner);
    }

    fn finish_with_winner(&mut self, winner: PlayerIndex) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.winner = Some(winner);
        info!(winner = %self.players[winner].id, turn = self.turn, "game over");
    }

    // ── Snapshot / rollback ────────────────────────────────────────────

    /// Capture the current state as the rollback point. The copy never
    /// nests an older snapshot.
    pub fn snapshot(&mut self) {
        self.snapshot = None;
        let copy = self.clone();
        self.snapshot = Some(Box::new(copy));
        debug!(turn = self.turn, player_turn = self.player_turn, "snapshot taken");
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Restore the state captured at the end of the last completed turn.
    /// Without a snapshot this returns an unchanged copy.
    pub fn rollback(&self) -> Game {
        let Some(saved) = &self.snapshot else {
            return self.clone();
        };
        let mut restored = Game::clone(saved);
        restored.snapshot = Some(saved.clone());
        info!(turn = restored.turn, player_turn = restored.player_turn, "rolled back to snapshot");
        restored
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Full aggregate as JSON: players, islands, bag order, helper state,
    /// bank and counters. The rollback point is not included.
    pub fn encode(&self) -> RuleResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> RuleResult<Game> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
