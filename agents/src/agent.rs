// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all automated players implement
//
// Agents receive a `PlayerView`, never the `Game` itself: the public
// table plus their own hand. They never see opponents' hands or the
// order of the bag.
// ═══════════════════════════════════════════════════════════════════════

use isles_engine::types::*;
use isles_engine::visibility::PlayerView;
use isles_engine::{Action, EffectParams};

/// Each method corresponds to one kind of pending decision.
pub trait Agent: Send {
    /// Human-readable name for this agent (e.g. "Random", "Greedy").
    fn name(&self) -> &str;

    /// The seat this agent is playing.
    fn id(&self) -> PlayerId;

    /// Universal entry point: dispatch on phase and step.
    fn decide(&mut self, view: &PlayerView) -> Action {
        let table = &view.table;
        match table.phase {
            Phase::Planning => Action::PlayCard(self.choose_card(view, &view.my_legal_cards)),
            Phase::Action => {
                if !table.helpers.is_empty() && !table.helper_used {
                    if let Some((slot, params)) = self.choose_helper(view) {
                        return Action::ActivateHelper { slot, params };
                    }
                }
                match table.step {
                    ActionStep::PlaceStudents => self.place_student(view),
                    ActionStep::MoveMarker => {
                        Action::MoveMarker(self.move_marker(view, table.max_marker_steps.max(1)))
                    }
                    ActionStep::DrawSupply => {
                        let pools: Vec<usize> = (0..table.supply_pools.len())
                            .filter(|&i| !table.supply_pools[i].is_empty())
                            .collect();
                        Action::DrawSupply(self.choose_pool(view, &pools))
                    }
                }
            }
        }
    }

    // ── Individual decision methods ────────────────────────────────────

    /// Pick a hand index from the legal ones.
    fn choose_card(&mut self, view: &PlayerView, legal: &[usize]) -> usize;

    /// Either `PlaceInHall` or `PlaceOnIsland`.
    fn place_student(&mut self, view: &PlayerView) -> Action;

    /// Marker steps, `1..=max`.
    fn move_marker(&mut self, view: &PlayerView, max: usize) -> usize;

    /// Pick one of the non-empty supply pools.
    fn choose_pool(&mut self, view: &PlayerView, pools: &[usize]) -> usize;

    /// Optionally activate a helper before the next step. Default: never.
    fn choose_helper(&mut self, _view: &PlayerView) -> Option<(usize, EffectParams)> {
        None
    }
}

/// Estimated influence of every seat on island `island`, in table order.
pub(crate) fn influence_on(view: &PlayerView, island: usize) -> Vec<(PlayerId, u32)> {
    let table = &view.table;
    let isle = &table.islands[island];
    table
        .players
        .iter()
        .map(|p| {
            let students: u32 = p.professors.iter().map(|c| isle.students[c.index()]).sum();
            let rooks = if isle.owner == Some(p.id) { isle.merge_count } else { 0 };
            (p.id, students + rooks)
        })
        .collect()
}

/// My influence minus the best opponent's on island `island`.
pub(crate) fn influence_margin(view: &PlayerView, island: usize) -> i64 {
    let scores = influence_on(view, island);
    let mine = scores.iter().find(|(id, _)| *id == view.viewer).map_or(0, |s| s.1);
    let best_other = scores
        .iter()
        .filter(|(id, _)| *id != view.viewer)
        .map(|s| s.1)
        .max()
        .unwrap_or(0);
    i64::from(mine) - i64::from(best_other)
}
