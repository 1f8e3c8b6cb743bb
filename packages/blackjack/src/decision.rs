use serde::{Deserialize, Serialize};

use crate::{Bankroll, GameError, Hand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOption {
    Deal,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandAction {
    Stay,
    Hit,
    DoubleDown,
    Split,
}

/// Which hand-action prompt is being asked. Each phase has a fixed set of
/// legal answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionPhase {
    /// Starting pair that may still be split.
    SplittablePair,
    /// Two-card hand, split not on offer.
    StartingHand,
    /// Three or more cards.
    Drawing,
}

impl DecisionPhase {
    pub fn for_hand(hand: &Hand) -> Self {
        if hand.is_starting_hand() {
            DecisionPhase::StartingHand
        } else {
            DecisionPhase::Drawing
        }
    }

    pub fn allowed(&self) -> &'static [HandAction] {
        match self {
            DecisionPhase::SplittablePair => &[
                HandAction::Stay,
                HandAction::Hit,
                HandAction::DoubleDown,
                HandAction::Split,
            ],
            DecisionPhase::StartingHand => {
                &[HandAction::Stay, HandAction::Hit, HandAction::DoubleDown]
            }
            DecisionPhase::Drawing => &[HandAction::Stay, HandAction::Hit],
        }
    }

    pub fn permits(&self, action: HandAction) -> bool {
        self.allowed().contains(&action)
    }
}

/// What a decision maker gets to see while choosing. Presentation should
/// only reveal `dealer.show_up_card()`.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub dealer: &'a Hand,
    pub player: &'a Hand,
    pub bet: u64,
    pub bankroll: &'a Bankroll,
}

/// Source of player decisions. Implementations re-ask on unusable input;
/// the engine only ever expects a legal answer back.
pub trait InputProvider {
    fn game_option(&mut self, bankroll: &Bankroll) -> Result<GameOption, GameError>;

    /// A whole-chip bet in `1..=max_bet`.
    fn bet_amount(&mut self, max_bet: u64) -> Result<u64, GameError>;

    fn take_insurance(&mut self, view: &TableView<'_>) -> Result<bool, GameError>;

    /// Must return one of `phase.allowed()`.
    fn hand_action(
        &mut self,
        view: &TableView<'_>,
        phase: DecisionPhase,
    ) -> Result<HandAction, GameError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_only_offered_on_splittable_pair() {
        assert!(DecisionPhase::SplittablePair.permits(HandAction::Split));
        assert!(!DecisionPhase::StartingHand.permits(HandAction::Split));
        assert!(!DecisionPhase::Drawing.permits(HandAction::Split));
    }

    #[test]
    fn test_double_only_on_two_cards() {
        assert!(DecisionPhase::StartingHand.permits(HandAction::DoubleDown));
        assert!(!DecisionPhase::Drawing.permits(HandAction::DoubleDown));
    }

    #[test]
    fn test_phase_for_hand() {
        let mut hand = Hand::new();
        hand.add_card("8h".parse().unwrap());
        hand.add_card("8s".parse().unwrap());
        assert_eq!(DecisionPhase::for_hand(&hand), DecisionPhase::StartingHand);
        hand.add_card("2c".parse().unwrap());
        assert_eq!(DecisionPhase::for_hand(&hand), DecisionPhase::Drawing);
    }
}
