// ═══════════════════════════════════════════════════════════════════════
// Game setup — configuration plus the initial placement of students,
// marker and helpers. Random setups are seed-deterministic.
// ═══════════════════════════════════════════════════════════════════════

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{RuleResult, RuleViolation};
use crate::helpers::{HelperId, HELPER_COUNT};
use crate::types::*;

/// Helpers drawn at the start of an optional-rules match.
pub const HELPERS_PER_GAME: usize = 3;
/// Students per color set aside for the first island placement.
const SEED_STUDENTS_PER_COLOR: u32 = 2;

/// Who plays and which ruleset is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: Vec<PlayerId>,
    /// Optional ruleset: coins and helpers.
    #[serde(default)]
    pub expert: bool,
}

impl GameConfig {
    pub fn new(players: Vec<PlayerId>, expert: bool) -> Self {
        GameConfig { players, expert }
    }

    pub fn validate(&self) -> RuleResult<()> {
        if !(2..=3).contains(&self.players.len()) {
            return Err(RuleViolation::InvalidConfig("player count must be 2 or 3"));
        }
        let mut ids = self.players.clone();
        ids.sort();
        ids.dedup();
        if ids.len() != self.players.len() {
            return Err(RuleViolation::InvalidConfig("duplicate player id"));
        }
        Ok(())
    }
}

/// Fully explicit initial layout. `Game::from_setup` turns this into a game;
/// tests build one by hand to pin down bag order and helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    /// Island the marker starts on.
    pub marker: usize,
    /// One optional starting student per island slot.
    pub island_students: Vec<Option<Color>>,
    /// Bag contents, front is drawn first. Entrances, then supply pools,
    /// then helper pools are filled from it in that order.
    pub bag: Vec<Color>,
    pub helpers: Vec<HelperId>,
}

impl Setup {
    /// Standard random setup: marker on a random island, one student on every
    /// island except the marker's and the opposite one, the rest shuffled
    /// into the bag, and three distinct helpers when the optional rules are on.
    pub fn random(config: &GameConfig, rng: &mut impl Rng) -> Setup {
        let marker = rng.gen_range(0..NUM_ISLANDS);
        let opposite = (marker + NUM_ISLANDS / 2) % NUM_ISLANDS;

        let mut seed_students: Vec<Color> = Color::ALL
            .iter()
            .flat_map(|&c| std::iter::repeat(c).take(SEED_STUDENTS_PER_COLOR as usize))
            .collect();
        seed_students.shuffle(rng);
        let mut seeds = seed_students.into_iter();

        let island_students = (0..NUM_ISLANDS)
            .map(|i| {
                if i == marker || i == opposite {
                    None
                } else {
                    seeds.next()
                }
            })
            .collect();

        let remaining = (STUDENTS_PER_COLOR - SEED_STUDENTS_PER_COLOR) as usize;
        let mut bag: Vec<Color> = Color::ALL
            .iter()
            .flat_map(|&c| std::iter::repeat(c).take(remaining))
            .collect();
        bag.shuffle(rng);

        let helpers = if config.expert {
            let mut ids: Vec<HelperId> = (1..=HELPER_COUNT).collect();
            ids.shuffle(rng);
            ids.truncate(HELPERS_PER_GAME);
            ids
        } else {
            Vec::new()
        };

        Setup { marker, island_students, bag, helpers }
    }

    pub fn validate(&self, config: &GameConfig) -> RuleResult<()> {
        if self.marker >= NUM_ISLANDS {
            return Err(RuleViolation::InvalidConfig("marker outside the island ring"));
        }
        if self.island_students.len() != NUM_ISLANDS {
            return Err(RuleViolation::InvalidConfig("need one entry per island slot"));
        }
        if !config.expert && !self.helpers.is_empty() {
            return Err(RuleViolation::InvalidConfig("helpers need the optional ruleset"));
        }
        if self.helpers.len() > HELPERS_PER_GAME {
            return Err(RuleViolation::InvalidConfig("too many helpers"));
        }
        if self.helpers.iter().any(|h| !(1..=HELPER_COUNT).contains(h)) {
            return Err(RuleViolation::InvalidConfig("unknown helper id"));
        }
        let mut ids = self.helpers.clone();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.helpers.len() {
            return Err(RuleViolation::InvalidConfig("duplicate helper id"));
        }
        let n = config.players.len();
        let needed = n * entrance_size(n)
            + n * students_per_turn(n) as usize
            + self.helpers.iter().map(|&h| crate::helpers::pool_size(h)).sum::<usize>();
        if self.bag.len() < needed {
            return Err(RuleViolation::InvalidConfig("bag too small for setup"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(n: u32, expert: bool) -> GameConfig {
        GameConfig::new((1..=n).map(PlayerId).collect(), expert)
    }

    #[test]
    fn test_random_setup_layout() {
        let cfg = config(2, true);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let setup = Setup::random(&cfg, &mut rng);

        assert_eq!(setup.island_students.len(), NUM_ISLANDS);
        assert!(setup.island_students[setup.marker].is_none());
        assert!(setup.island_students[(setup.marker + 6) % NUM_ISLANDS].is_none());
        assert_eq!(setup.island_students.iter().flatten().count(), 10);
        assert_eq!(setup.bag.len(), 120);
        assert_eq!(setup.helpers.len(), 3);
        assert!(setup.validate(&cfg).is_ok());

        let on_islands: Vec<Color> = setup.island_students.iter().flatten().copied().collect();
        assert_eq!(color_counts_of(&on_islands), [2; 5]);
    }

    #[test]
    fn test_deterministic_seed() {
        let cfg = config(3, true);
        let s1 = Setup::random(&cfg, &mut ChaCha8Rng::seed_from_u64(123));
        let s2 = Setup::random(&cfg, &mut ChaCha8Rng::seed_from_u64(123));
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_base_rules_have_no_helpers() {
        let cfg = config(2, false);
        let setup = Setup::random(&cfg, &mut ChaCha8Rng::seed_from_u64(7));
        assert!(setup.helpers.is_empty());
    }

    #[test]
    fn test_config_validation() {
        assert!(config(1, false).validate().is_err());
        assert!(config(4, false).validate().is_err());
        assert!(config(3, false).validate().is_ok());
        let dup = GameConfig::new(vec![PlayerId(1), PlayerId(1)], false);
        assert_eq!(
            dup.validate(),
            Err(RuleViolation::InvalidConfig("duplicate player id"))
        );
    }

    #[test]
    fn test_setup_rejects_duplicate_helpers() {
        let cfg = config(2, true);
        let mut setup = Setup::random(&cfg, &mut ChaCha8Rng::seed_from_u64(1));
        setup.helpers = vec![5, 5];
        assert!(setup.validate(&cfg).is_err());
    }
}
