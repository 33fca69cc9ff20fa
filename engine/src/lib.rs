pub mod types;
pub mod cards;
pub mod error;
pub mod island;
pub mod player;
pub mod params;
pub mod helpers;
pub mod supply;
pub mod setup;
pub mod engine;
pub mod visibility;


pub use types::*;
pub use cards::Card;
pub use error::{RuleResult, RuleViolation};
pub use engine::{Action, Game};
pub use params::EffectParams;
pub use setup::{GameConfig, Setup};
pub use visibility::{player_view, summary, GameView, PlayerView, StateSummary};
