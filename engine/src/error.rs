//! Rule violations returned by every engine operation.
//!
//! A violation is always raised before any state is written, so a rejected
//! call leaves the game exactly as it was.

use thiserror::Error;

use crate::types::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("action not allowed in the current phase or step")]
    WrongPhase,
    #[error("the game has already ended")]
    GameEnded,
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("card with order {0} was already played this round")]
    CardAlreadyPlayed(u8),
    #[error("hall row is full")]
    HallFull,
    #[error("marker cannot move {steps} steps (allowed 1..={max})")]
    InvalidMove { steps: usize, max: usize },
    #[error("supply pool is empty")]
    EmptySupply,
    #[error("optional ruleset is disabled")]
    OptionalRulesDisabled,
    #[error("a helper was already activated this turn")]
    HelperAlreadyActivated,
    #[error("not enough coins: need {need}, have {have}")]
    InsufficientCoins { need: u32, have: u32 },
    #[error("bad parameters: {0}")]
    BadParameters(&'static str),
    #[error("invalid game configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

pub type RuleResult<T> = Result<T, RuleViolation>;

impl From<serde_json::Error> for RuleViolation {
    fn from(e: serde_json::Error) -> Self {
        RuleViolation::Snapshot(e.to_string())
    }
}
