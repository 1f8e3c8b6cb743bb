mod bankroll;
mod card;
mod decision;
mod deck;
mod error;
mod hand;
pub mod round;
pub mod rules;
mod session;
pub mod strategy;

pub use bankroll::{Bankroll, ChipDelta, Chips};
pub use card::{Card, Rank, Suit};
pub use decision::{DecisionPhase, GameOption, HandAction, InputProvider, TableView};
pub use deck::{CardSource, Deck, StackedDeck, DECK_SIZE};
pub use error::GameError;
pub use hand::{Hand, HandOutcome};
pub use round::{
    InsuranceResult, RoundEvent, RoundObserver, RoundSummary, Settlement, SubHand, Table,
};
pub use rules::PayoutRatio;
pub use session::{RoundStep, Session, SessionEnd, SessionSummary};
pub use strategy::{optimal_move, BasicStrategyPlayer};
