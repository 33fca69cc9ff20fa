// ═══════════════════════════════════════════════════════════════════════
// Heuristic Agent — greedy one-step decisions.
// Noticeably stronger than RandomAgent.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{influence_margin, Agent};
use isles_engine::helpers::{HERALD, KNIGHT, KNIGHT_BONUS};
use isles_engine::types::*;
use isles_engine::visibility::PlayerView;
use isles_engine::{Action, EffectParams};

pub struct HeuristicAgent {
    id: PlayerId,
}

impl HeuristicAgent {
    pub fn new(id: PlayerId) -> Self {
        HeuristicAgent { id }
    }

    fn holds_professor(&self, view: &PlayerView, color: Color) -> bool {
        view.me().is_some_and(|me| me.professors.contains(&color))
    }

    /// Islands reachable this turn, as (steps, island index).
    fn reachable(&self, view: &PlayerView, max: usize) -> Vec<(usize, usize)> {
        let len = view.table.islands.len();
        (1..=max).map(|s| (s, (view.table.marker + s) % len)).collect()
    }

    /// Value of sending `color` to the hall.
    fn hall_value(&self, view: &PlayerView, color: Color) -> i32 {
        let Some(me) = view.me() else { return i32::MIN };
        let mine = me.hall[color.index()];
        if mine >= HALL_CAPACITY {
            return i32::MIN;
        }
        let best_other = view
            .table
            .players
            .iter()
            .filter(|p| p.id != self.id)
            .map(|p| p.hall[color.index()])
            .max()
            .unwrap_or(0);

        let mut value = 1;
        if !self.holds_professor(view, color) && mine + 1 > best_other {
            value += 3;
        }
        if view.table.helpers.is_empty() {
            return value;
        }
        if COIN_POSITIONS.contains(&(mine + 1)) {
            value += 2;
        }
        value
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        "Heuristic"
    }

    fn id(&self) -> PlayerId {
        self.id
    }

    /// Lowest card: act first and draw first.
    fn choose_card(&mut self, view: &PlayerView, legal: &[usize]) -> usize {
        legal
            .iter()
            .copied()
            .min_by_key(|&i| view.my_hand.get(i).map_or(u8::MAX, |c| c.order))
            .unwrap_or(0)
    }

    fn place_student(&mut self, view: &PlayerView) -> Action {
        let Some(me) = view.me() else {
            return Action::PlaceInHall(0);
        };
        let targets = self.reachable(view, view.table.max_marker_steps.max(1));

        let mut best = (i32::MIN, Action::PlaceInHall(0));
        for (student, &color) in me.entrance.iter().enumerate() {
            let hall = self.hall_value(view, color);
            if hall > best.0 {
                best = (hall, Action::PlaceInHall(student));
            }
            if self.holds_professor(view, color) {
                for &(_, island) in &targets {
                    if view.table.islands[island].blockaded {
                        continue;
                    }
                    let value = 2 - influence_margin(view, island).clamp(-2, 2) as i32;
                    if value > best.0 {
                        best = (value, Action::PlaceOnIsland { student, island });
                    }
                }
            }
        }
        if best.0 == i32::MIN {
            let island = targets.first().map_or(0, |t| t.1);
            return Action::PlaceOnIsland { student: 0, island };
        }
        best.1
    }

    fn move_marker(&mut self, view: &PlayerView, max: usize) -> usize {
        self.reachable(view, max)
            .into_iter()
            .filter(|&(_, island)| !view.table.islands[island].blockaded)
            .filter(|&(_, island)| view.table.islands[island].owner != Some(self.id))
            .max_by_key(|&(steps, island)| (influence_margin(view, island), std::cmp::Reverse(steps)))
            .map_or(1, |(steps, _)| steps)
    }

    /// Pool richest in colors whose professor I hold, then the largest.
    fn choose_pool(&mut self, view: &PlayerView, pools: &[usize]) -> usize {
        pools
            .iter()
            .copied()
            .max_by_key(|&i| {
                let pool = &view.table.supply_pools[i];
                let useful = pool.iter().filter(|&&c| self.holds_professor(view, c)).count();
                (useful, pool.len(), std::cmp::Reverse(i))
            })
            .unwrap_or(0)
    }

    /// Herald an island already winnable, or Knight into a close one.
    fn choose_helper(&mut self, view: &PlayerView) -> Option<(usize, EffectParams)> {
        let coins = view.me()?.coins;
        let affordable = |id| {
            view.table
                .helpers
                .iter()
                .position(|h| h.id == id && h.cost <= coins)
        };

        if let Some(slot) = affordable(HERALD) {
            let target = (0..view.table.islands.len())
                .filter(|&i| view.table.islands[i].owner != Some(self.id))
                .filter(|&i| !view.table.islands[i].blockaded)
                .find(|&i| influence_margin(view, i) > 0);
            if let Some(island) = target {
                return Some((slot, EffectParams::new().island(island)));
            }
        }

        if view.table.step == ActionStep::MoveMarker {
            if let Some(slot) = affordable(KNIGHT) {
                let bonus = i64::from(KNIGHT_BONUS);
                let close = self
                    .reachable(view, view.table.max_marker_steps)
                    .into_iter()
                    .any(|(_, i)| {
                        let margin = influence_margin(view, i);
                        margin <= 0 && margin + bonus > 0 && !view.table.islands[i].blockaded
                    });
                if close {
                    return Some((slot, EffectParams::new()));
                }
            }
        }
        None
    }
}
