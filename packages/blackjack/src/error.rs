use thiserror::Error;

use crate::{Chips, DecisionPhase, HandAction};

/// Contract violations between the engine and its collaborators. None of
/// these are recoverable within a round.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Deck exhausted: no undealt cards remain")]
    DeckExhausted,
    #[error("Invalid bet {bet}: must be between 1 and {max}")]
    InvalidBet { bet: u64, max: u64 },
    #[error("Insufficient chips: needed {needed}, available {available}")]
    InsufficientChips { needed: Chips, available: Chips },
    #[error("Action {action:?} is not allowed during {phase:?}")]
    ActionNotAllowed {
        action: HandAction,
        phase: DecisionPhase,
    },
    #[error("Input error: {0}")]
    Input(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
