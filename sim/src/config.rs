// ═══════════════════════════════════════════════════════════════════════
// Simulation configuration — JSON file, overridden by CLI flags
// ═══════════════════════════════════════════════════════════════════════

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Which agents sit at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Random,
    Heuristic,
    /// Heuristic on even seats, random on odd ones.
    Mixed,
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(AgentKind::Random),
            "heuristic" => Ok(AgentKind::Heuristic),
            "mixed" => Ok(AgentKind::Mixed),
            other => bail!("unknown agent kind {other:?} (expected random, heuristic or mixed)"),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Random => write!(f, "random"),
            AgentKind::Heuristic => write!(f, "heuristic"),
            AgentKind::Mixed => write!(f, "mixed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Matches in a batch.
    pub matches: u64,
    /// Base seed; match `m` of a batch uses `seed + m * SEED_STRIDE`.
    pub seed: u64,
    pub players: usize,
    pub expert: bool,
    pub agent: AgentKind,
    /// Chance per decision that the acting player drops and loses the turn.
    pub disconnect_rate: f64,
    /// Decisions after which a match is abandoned.
    pub max_steps: usize,
    /// Re-check conservation after every decision.
    pub audit: bool,
}

/// Distance between the seeds of consecutive batch matches.
pub const SEED_STRIDE: u64 = 1000;

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            matches: 100,
            seed: 42,
            players: 2,
            expert: true,
            agent: AgentKind::Random,
            disconnect_rate: 0.0,
            max_steps: 50_000,
            audit: false,
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!((2..=3).contains(&self.players), "players must be 2 or 3, got {}", self.players);
        ensure!(
            (0.0..1.0).contains(&self.disconnect_rate),
            "disconnect_rate must be in [0, 1), got {}",
            self.disconnect_rate
        );
        ensure!(self.max_steps > 0, "max_steps must be positive");
        Ok(())
    }

    /// Seed of match `index` in a batch.
    pub fn match_seed(&self, index: u64) -> u64 {
        self.seed.wrapping_add(index.wrapping_mul(SEED_STRIDE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"players": 3, "agent": "mixed"}"#).unwrap();
        assert_eq!(config.players, 3);
        assert_eq!(config.agent, AgentKind::Mixed);
        assert_eq!(config.max_steps, SimConfig::default().max_steps);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let bad_players = SimConfig { players: 4, ..SimConfig::default() };
        assert!(bad_players.validate().is_err());
        let bad_rate = SimConfig { disconnect_rate: 1.5, ..SimConfig::default() };
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn test_agent_kind_parse() {
        assert_eq!("heuristic".parse::<AgentKind>().unwrap(), AgentKind::Heuristic);
        assert!("smart".parse::<AgentKind>().is_err());
        assert_eq!(AgentKind::Mixed.to_string(), "mixed");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("isles-sim-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"matches": 5, "seed": 7, "disconnect_rate": 0.1}"#).unwrap();
        let config = SimConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.matches, 5);
        assert_eq!(config.match_seed(2), 7 + 2 * SEED_STRIDE);
    }
}
