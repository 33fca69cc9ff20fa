// ═══════════════════════════════════════════════════════════════════════
// Batch — many seeded matches in parallel, folded into one summary
// ═══════════════════════════════════════════════════════════════════════

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use isles_engine::types::PlayerId;

use crate::config::SimConfig;
use crate::runner::{make_agents, run_match, MatchResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatStats {
    pub id: PlayerId,
    pub agent_name: String,
    pub wins: u64,
    pub rooks_placed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub matches: u64,
    pub finished: u64,
    pub errors: u64,
    pub seats: Vec<SeatStats>,
    pub total_turns: u64,
    pub total_decisions: u64,
    pub rejected: u64,
    pub skipped_turns: u64,
    pub disconnects: u64,
}

impl BatchSummary {
    fn new(config: &SimConfig) -> Self {
        let seats = make_agents(config.agent, config.players, config.seed)
            .iter()
            .map(|a| SeatStats {
                id: a.id(),
                agent_name: a.name().to_string(),
                wins: 0,
                rooks_placed: 0,
            })
            .collect();
        BatchSummary {
            matches: 0,
            finished: 0,
            errors: 0,
            seats,
            total_turns: 0,
            total_decisions: 0,
            rejected: 0,
            skipped_turns: 0,
            disconnects: 0,
        }
    }

    fn add_result(&mut self, result: &MatchResult) {
        self.matches += 1;
        self.finished += 1;
        self.total_turns += u64::from(result.turns);
        self.total_decisions += result.decisions as u64;
        self.rejected += result.rejected as u64;
        self.skipped_turns += result.skipped_turns as u64;
        self.disconnects += result.disconnects as u64;
        for seat in &mut self.seats {
            if seat.id == result.winner {
                seat.wins += 1;
            }
            if let Some(p) = result.players.iter().find(|p| p.id == seat.id) {
                seat.rooks_placed += u64::from(p.rooks_placed);
            }
        }
    }

    fn add_error(&mut self) {
        self.matches += 1;
        self.errors += 1;
    }

    fn merge(&mut self, other: &BatchSummary) {
        self.matches += other.matches;
        self.finished += other.finished;
        self.errors += other.errors;
        self.total_turns += other.total_turns;
        self.total_decisions += other.total_decisions;
        self.rejected += other.rejected;
        self.skipped_turns += other.skipped_turns;
        self.disconnects += other.disconnects;
        for (mine, theirs) in self.seats.iter_mut().zip(&other.seats) {
            mine.wins += theirs.wins;
            mine.rooks_placed += theirs.rooks_placed;
        }
    }

    pub fn win_rate(&self, seat: usize) -> f64 {
        match self.seats.get(seat) {
            Some(s) if self.finished > 0 => s.wins as f64 / self.finished as f64,
            _ => 0.0,
        }
    }

    pub fn average_turns(&self) -> f64 {
        if self.finished == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.finished as f64
        }
    }
}

/// Run `config.matches` matches across the rayon pool.
pub fn run_batch(config: &SimConfig) -> BatchSummary {
    info!(matches = config.matches, players = config.players, agent = %config.agent, "batch started");
    let summary = (0..config.matches)
        .into_par_iter()
        .fold(
            || BatchSummary::new(config),
            |mut local, m| {
                let seed = config.match_seed(m);
                let mut agents = make_agents(config.agent, config.players, seed);
                match run_match(&mut agents, seed, config) {
                    Ok(result) => local.add_result(&result),
                    Err(e) => {
                        error!(seed, error = %e, "match failed");
                        local.add_error();
                    }
                }
                local
            },
        )
        .reduce(
            || BatchSummary::new(config),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );
    info!(finished = summary.finished, errors = summary.errors, "batch finished");
    summary
}
