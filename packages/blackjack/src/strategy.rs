use crate::{
    Bankroll, Card, DecisionPhase, GameError, GameOption, Hand, HandAction, InputProvider,
    TableView,
};

/// Basic strategy for a single deck where the dealer stands on soft 17 and
/// surrender is not offered. Only returns actions in `phase.allowed()`.
pub fn optimal_move(player: &Hand, dealer_up_card: Card, phase: DecisionPhase) -> HandAction {
    let player_value = player.soft_value();
    // Ace up counts high for the lookup
    let dealer_value = if dealer_up_card.is_ace() {
        11
    } else {
        dealer_up_card.value()
    };
    let is_soft = player.is_soft();
    let can_double = phase.permits(HandAction::DoubleDown);

    if phase.permits(HandAction::Split) && player.is_pair() {
        if let Some(card) = player.first_card() {
            let pair_value = card.value();
            // Always split Aces and 8s, never 10s, 5s or 4s
            let split = match pair_value {
                1 | 8 => true,
                9 => dealer_value != 7 && dealer_value != 10 && dealer_value != 11,
                7 | 6 | 3 | 2 => (2..=7).contains(&dealer_value),
                _ => false,
            };
            if split {
                return HandAction::Split;
            }
        }
    }

    if can_double {
        let double = if is_soft {
            match player_value {
                19 => dealer_value == 6,
                18 => (2..=6).contains(&dealer_value),
                17 => (3..=6).contains(&dealer_value),
                15 | 16 => (4..=6).contains(&dealer_value),
                13 | 14 => (5..=6).contains(&dealer_value),
                _ => false,
            }
        } else {
            match player_value {
                11 => true,
                10 => dealer_value <= 9,
                9 => (3..=6).contains(&dealer_value),
                _ => false,
            }
        };
        if double {
            return HandAction::DoubleDown;
        }
    }

    if is_soft {
        if player_value >= 19 || (player_value == 18 && dealer_value < 9) {
            HandAction::Stay
        } else {
            HandAction::Hit
        }
    } else if player_value >= 17 {
        HandAction::Stay
    } else if (13..=16).contains(&player_value) {
        if (2..=6).contains(&dealer_value) {
            HandAction::Stay
        } else {
            HandAction::Hit
        }
    } else if player_value == 12 {
        if (4..=6).contains(&dealer_value) {
            HandAction::Stay
        } else {
            HandAction::Hit
        }
    } else {
        HandAction::Hit
    }
}

/// Plays a fixed number of flat-bet rounds by basic strategy. Never takes
/// insurance.
#[derive(Debug, Clone)]
pub struct BasicStrategyPlayer {
    bet: u64,
    rounds_left: u32,
}

impl BasicStrategyPlayer {
    pub fn new(bet: u64, rounds: u32) -> Self {
        Self {
            bet,
            rounds_left: rounds,
        }
    }

    pub fn rounds_left(&self) -> u32 {
        self.rounds_left
    }
}

impl InputProvider for BasicStrategyPlayer {
    fn game_option(&mut self, _bankroll: &Bankroll) -> Result<GameOption, GameError> {
        if self.rounds_left == 0 {
            return Ok(GameOption::Quit);
        }
        self.rounds_left -= 1;
        Ok(GameOption::Deal)
    }

    fn bet_amount(&mut self, max_bet: u64) -> Result<u64, GameError> {
        Ok(self.bet.min(max_bet))
    }

    fn take_insurance(&mut self, _view: &TableView<'_>) -> Result<bool, GameError> {
        Ok(false)
    }

    fn hand_action(
        &mut self,
        view: &TableView<'_>,
        phase: DecisionPhase,
    ) -> Result<HandAction, GameError> {
        let up_card = view
            .dealer
            .up_card()
            .ok_or_else(|| GameError::Input("dealer has no up card".into()))?;
        Ok(optimal_move(view.player, up_card, phase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(cards: &[&str]) -> Hand {
        let mut h = Hand::new();
        for c in cards {
            h.add_card(c.parse().unwrap());
        }
        h
    }

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_always_split_aces_and_eights() {
        let phase = DecisionPhase::SplittablePair;
        assert_eq!(optimal_move(&hand(&["Ah", "As"]), card("Tc"), phase), HandAction::Split);
        assert_eq!(optimal_move(&hand(&["8h", "8s"]), card("Ac"), phase), HandAction::Split);
    }

    #[test]
    fn test_never_split_tens() {
        let action = optimal_move(&hand(&["Kh", "Qs"]), card("6c"), DecisionPhase::SplittablePair);
        assert_eq!(action, HandAction::Stay);
    }

    #[test]
    fn test_double_eleven() {
        let action = optimal_move(&hand(&["6h", "5s"]), card("Tc"), DecisionPhase::StartingHand);
        assert_eq!(action, HandAction::DoubleDown);
    }

    #[test]
    fn test_no_double_after_drawing() {
        let action = optimal_move(&hand(&["3h", "3s", "5d"]), card("6c"), DecisionPhase::Drawing);
        assert_eq!(action, HandAction::Hit);
    }

    #[test]
    fn test_stiff_hands() {
        let phase = DecisionPhase::StartingHand;
        assert_eq!(optimal_move(&hand(&["Th", "6s"]), card("5c"), phase), HandAction::Stay);
        assert_eq!(optimal_move(&hand(&["Th", "6s"]), card("Ac"), phase), HandAction::Hit);
        assert_eq!(optimal_move(&hand(&["Th", "2s"]), card("3c"), phase), HandAction::Hit);
    }

    #[test]
    fn test_soft_eighteen() {
        let phase = DecisionPhase::Drawing;
        assert_eq!(optimal_move(&hand(&["Ah", "5s", "2d"]), card("8c"), phase), HandAction::Stay);
        assert_eq!(optimal_move(&hand(&["Ah", "5s", "2d"]), card("9c"), phase), HandAction::Hit);
    }

    #[test]
    fn test_actions_stay_within_phase() {
        for phase in [
            DecisionPhase::SplittablePair,
            DecisionPhase::StartingHand,
            DecisionPhase::Drawing,
        ] {
            for up in ["2c", "6d", "9h", "Ts", "As"] {
                let action = optimal_move(&hand(&["5h", "5s"]), card(up), phase);
                assert!(phase.permits(action), "{action:?} in {phase:?}");
            }
        }
    }

    #[test]
    fn test_player_quits_after_rounds() {
        let mut player = BasicStrategyPlayer::new(10, 2);
        let bankroll = Bankroll::new(crate::Chips::whole(100));
        assert_eq!(player.game_option(&bankroll).unwrap(), GameOption::Deal);
        assert_eq!(player.game_option(&bankroll).unwrap(), GameOption::Deal);
        assert_eq!(player.game_option(&bankroll).unwrap(), GameOption::Quit);
        assert_eq!(player.bet_amount(4).unwrap(), 4);
    }
}
