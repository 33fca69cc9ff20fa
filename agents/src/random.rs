// ═══════════════════════════════════════════════════════════════════════
// Random Agent — makes every decision randomly among legal-looking moves.
// Serves as baseline and for stress-testing the engine.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use isles_engine::helpers::*;
use isles_engine::types::*;
use isles_engine::visibility::{HelperView, PlayerView};
use isles_engine::{Action, EffectParams};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomAgent {
    id: PlayerId,
    rng: ChaCha8Rng,
    /// Chance of trying a helper at each action-phase decision.
    helper_rate: f64,
}

impl RandomAgent {
    pub fn new(id: PlayerId, seed: u64) -> Self {
        RandomAgent {
            id,
            rng: ChaCha8Rng::seed_from_u64(seed),
            helper_rate: 0.2,
        }
    }

    /// Arguments shaped the way `helper` expects them.
    fn helper_params(&mut self, view: &PlayerView, helper: &HelperView) -> Option<EffectParams> {
        let table = &view.table;
        let me = view.me()?;
        let islands = table.islands.len();
        let params = EffectParams::new();
        let params = match helper.id {
            FARMER | MAILMAN | CENTAUR | KNIGHT => params,
            HERALD | HERBALIST => params.island(self.rng.gen_range(0..islands)),
            FUNGIST | THIEF => params.color(*Color::ALL.choose(&mut self.rng)?),
            MONK => {
                if helper.students.is_empty() {
                    return None;
                }
                params
                    .card_students([self.rng.gen_range(0..helper.students.len())])
                    .island(self.rng.gen_range(0..islands))
            }
            PRINCESS => {
                if helper.students.is_empty() {
                    return None;
                }
                params.card_students([self.rng.gen_range(0..helper.students.len())])
            }
            JESTER => {
                let most = helper.students.len().min(me.entrance.len()).min(3);
                if most == 0 {
                    return None;
                }
                let k = self.rng.gen_range(1..=most);
                let card = index::sample(&mut self.rng, helper.students.len(), k).into_vec();
                let entrance = index::sample(&mut self.rng, me.entrance.len(), k).into_vec();
                params.card_students(card).entrance_students(entrance)
            }
            MINSTREL => {
                let rows: Vec<Color> = Color::ALL.into_iter().filter(|c| me.hall[c.index()] > 0).collect();
                let &row = rows.choose(&mut self.rng)?;
                if me.entrance.is_empty() {
                    return None;
                }
                params
                    .entrance_students([self.rng.gen_range(0..me.entrance.len())])
                    .hall_colors([row])
            }
            _ => return None,
        };
        Some(params)
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "Random"
    }

    fn id(&self) -> PlayerId {
        self.id
    }

    fn choose_card(&mut self, _view: &PlayerView, legal: &[usize]) -> usize {
        legal.choose(&mut self.rng).copied().unwrap_or(0)
    }

    fn place_student(&mut self, view: &PlayerView) -> Action {
        let Some(me) = view.me() else {
            return Action::PlaceInHall(0);
        };
        let student = self.rng.gen_range(0..me.entrance.len().max(1));
        let room = me
            .entrance
            .get(student)
            .is_some_and(|c| me.hall[c.index()] < HALL_CAPACITY);
        if room && self.rng.gen_bool(0.5) {
            Action::PlaceInHall(student)
        } else {
            Action::PlaceOnIsland {
                student,
                island: self.rng.gen_range(0..view.table.islands.len()),
            }
        }
    }

    fn move_marker(&mut self, _view: &PlayerView, max: usize) -> usize {
        self.rng.gen_range(1..=max)
    }

    fn choose_pool(&mut self, _view: &PlayerView, pools: &[usize]) -> usize {
        pools.choose(&mut self.rng).copied().unwrap_or(0)
    }

    fn choose_helper(&mut self, view: &PlayerView) -> Option<(usize, EffectParams)> {
        if !self.rng.gen_bool(self.helper_rate) {
            return None;
        }
        let coins = view.me()?.coins;
        let affordable: Vec<usize> = (0..view.table.helpers.len())
            .filter(|&i| view.table.helpers[i].cost <= coins)
            .collect();
        let &slot = affordable.choose(&mut self.rng)?;
        let helper = view.table.helpers[slot].clone();
        self.helper_params(view, &helper).map(|p| (slot, p))
    }
}
