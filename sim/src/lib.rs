pub mod config;
pub mod audit;
pub mod runner;
pub mod batch;

pub use config::{AgentKind, SimConfig};
pub use runner::{make_agents, run_match, MatchResult, PlayerResult};
pub use batch::{run_batch, BatchSummary};
