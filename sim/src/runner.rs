// ═══════════════════════════════════════════════════════════════════════
// Match Runner — plays one complete headless match with agents
//
// Disconnects are simulated the way a hosting server recovers from them:
// the game is rolled back to the end of the last completed turn and the
// dropped player's turn is skipped.
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{anyhow, bail, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use isles_agents::{Agent, HeuristicAgent, RandomAgent};
use isles_engine::types::*;
use isles_engine::{player_view, Game, GameConfig, GameView};

use crate::audit;
use crate::config::{AgentKind, SimConfig};

/// Rejected decisions in a row before the runner skips the turn.
pub const MAX_REJECTIONS: u32 = 5;
/// Keeps the disconnect stream independent of the agents' seeds.
const DISCONNECT_STREAM: u64 = 0xD15C_0000;

/// Result of a completed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub seed: u64,
    pub winner: PlayerId,
    pub turns: u32,
    pub decisions: usize,
    pub rejected: usize,
    pub skipped_turns: usize,
    pub disconnects: usize,
    pub players: Vec<PlayerResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub id: PlayerId,
    pub agent_name: String,
    pub rooks_placed: u32,
    pub islands_owned: usize,
    pub professors: usize,
    pub coins: u32,
}

/// One agent per seat; seat `i` plays as `PlayerId(i + 1)`.
pub fn make_agents(kind: AgentKind, players: usize, seed: u64) -> Vec<Box<dyn Agent>> {
    (0..players)
        .map(|i| {
            let id = PlayerId(i as u32 + 1);
            let agent_seed = seed.wrapping_add(i as u64);
            let agent: Box<dyn Agent> = match kind {
                AgentKind::Random => Box::new(RandomAgent::new(id, agent_seed)),
                AgentKind::Heuristic => Box::new(HeuristicAgent::new(id)),
                AgentKind::Mixed if i % 2 == 0 => Box::new(HeuristicAgent::new(id)),
                AgentKind::Mixed => Box::new(RandomAgent::new(id, agent_seed)),
            };
            agent
        })
        .collect()
}

/// Run a complete match with the given agents.
pub fn run_match(agents: &mut [Box<dyn Agent>], seed: u64, config: &SimConfig) -> Result<MatchResult> {
    let ids: Vec<PlayerId> = agents.iter().map(|a| a.id()).collect();
    let mut game = Game::new(GameConfig::new(ids, config.expert), seed)?;
    let mut disconnect_rng = ChaCha8Rng::seed_from_u64(seed ^ DISCONNECT_STREAM);

    let mut decisions = 0;
    let mut rejected = 0;
    let mut in_a_row = 0;
    let mut skipped_turns = 0;
    let mut disconnects = 0;

    loop {
        let Some(current) = GameView::new(&game).current_player() else {
            break;
        };
        if decisions >= config.max_steps {
            bail!(
                "match {} exceeded {} decisions without finishing (turn {})",
                seed,
                config.max_steps,
                GameView::new(&game).turn()
            );
        }
        decisions += 1;

        if config.disconnect_rate > 0.0 && disconnect_rng.gen_bool(config.disconnect_rate) {
            info!(player = %current, turn = GameView::new(&game).turn(), "simulated disconnect");
            game = game.rollback();
            game.skip_turn()?;
            disconnects += 1;
            in_a_row = 0;
            continue;
        }

        let agent = agents
            .iter_mut()
            .find(|a| a.id() == current)
            .ok_or_else(|| anyhow!("no agent for {}", current))?;
        let action = agent.decide(&player_view(&game, current));
        match game.apply_action(current, &action) {
            Ok(()) => {
                debug!(player = %current, ?action, "action applied");
                in_a_row = 0;
            }
            Err(e) => {
                warn!(player = %current, ?action, error = %e, "action rejected");
                rejected += 1;
                in_a_row += 1;
                if in_a_row >= MAX_REJECTIONS {
                    game.skip_turn()?;
                    skipped_turns += 1;
                    in_a_row = 0;
                }
            }
        }

        if config.audit {
            audit::check(&GameView::new(&game))?;
        }
    }

    let view = GameView::new(&game);
    let winner = view.winner().ok_or_else(|| anyhow!("match {} ended without a winner", seed))?;
    info!(seed, %winner, turns = view.turn(), decisions, "match finished");

    let n = view.players().len();
    let players = view
        .players()
        .iter()
        .map(|p| PlayerResult {
            id: p.id,
            agent_name: agents
                .iter()
                .find(|a| a.id() == p.id)
                .map_or_else(String::new, |a| a.name().to_string()),
            rooks_placed: p.rooks_placed(n),
            islands_owned: view.islands().iter().filter(|i| i.owner == Some(p.index)).count(),
            professors: p.dashboard.professor_count(),
            coins: p.dashboard.coins,
        })
        .collect();

    Ok(MatchResult {
        seed,
        winner,
        turns: view.turn(),
        decisions,
        rejected,
        skipped_turns,
        disconnects,
        players,
    })
}
