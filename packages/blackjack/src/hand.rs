use crate::Card;
use serde::{Deserialize, Serialize};

/// Result of one settled hand, from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    /// Natural blackjack, paid 3:2.
    Blackjack,
    /// Both sides hold a natural.
    BlackjackPush,
    DealerBlackjack,
    PlayerBusted,
    DealerBusted,
    Win,
    Loss,
    Push,
}

impl HandOutcome {
    pub fn is_win(&self) -> bool {
        matches!(
            self,
            HandOutcome::Blackjack | HandOutcome::DealerBusted | HandOutcome::Win
        )
    }

    pub fn is_push(&self) -> bool {
        matches!(self, HandOutcome::BlackjackPush | HandOutcome::Push)
    }
}

/// The cards held by one side. Totals are kept up to date as cards are
/// added; a hand never loses cards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    hard_value: u8,
    has_ace: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        if card.is_ace() {
            self.has_ace = true;
        }
        self.hard_value += card.value();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn first_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// The dealer's face-up card.
    pub fn up_card(&self) -> Option<Card> {
        self.first_card()
    }

    /// Total with every Ace counted as 1.
    pub fn hard_value(&self) -> u8 {
        self.hard_value
    }

    /// Total with one Ace counted as 11 when that stays within 21.
    pub fn soft_value(&self) -> u8 {
        let soft = self.hard_value + 10;
        if self.has_ace && soft <= 21 {
            soft
        } else {
            self.hard_value
        }
    }

    pub fn is_soft(&self) -> bool {
        self.soft_value() != self.hard_value
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.soft_value() == 21
    }

    // Busting is judged on the Ace-low total.
    pub fn is_busted(&self) -> bool {
        self.hard_value > 21
    }

    pub fn is_starting_hand(&self) -> bool {
        self.cards.len() == 2
    }

    /// Two cards of equal point value. Any two ten-valued cards pair up.
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].value() == self.cards[1].value()
    }

    pub fn show_hand(&self) -> String {
        let mut s = String::from("[ ");
        for card in &self.cards {
            s.push_str(&card.to_display());
            s.push(' ');
        }
        s.push(']');
        s
    }

    /// The dealer's starting hand with the hole card concealed.
    pub fn show_up_card(&self) -> String {
        match self.up_card() {
            Some(card) => {
                let mut s = format!("[ {card}");
                for _ in 1..self.cards.len() {
                    s.push_str(" XX");
                }
                s.push_str(" ]");
                s
            }
            None => "[ ]".to_string(),
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.show_hand())
    }
}
