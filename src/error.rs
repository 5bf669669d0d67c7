use thiserror::Error;

use crate::game_state::{Action, Actor};

#[derive(Error, Debug)]
pub enum LeducError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Need at least {need} cards, got {got}")]
    NotEnoughCards { need: usize, got: usize },

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("{action} is not legal for {actor}")]
    InvalidAction { actor: Actor, action: Action },

    #[error("No legal actions to choose from")]
    NoLegalActions,

    #[error("Policy needs foresight but none was supplied")]
    MissingForesight,

    #[error("Hand is already over")]
    TerminalState,

    #[error("Hand is still in progress")]
    NotTerminal,

    #[error("Payoff {0} does not fit in a chip delta")]
    PayoffOverflow(i64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type LeducResult<T> = Result<T, LeducError>;
