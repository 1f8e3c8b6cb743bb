use rand::seq::SliceRandom;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::{Card, GameError};

pub const DECK_SIZE: usize = 52;

/// Anything the round engine can deal from.
pub trait CardSource {
    /// Start a new cycle. Every card becomes undealt again.
    fn shuffle(&mut self);

    fn deal_next_card(&mut self) -> Result<Card, GameError>;
}

/// A single 52-card deck dealt sequentially from a cursor.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    top_index: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new() -> Self {
        Self::with_rng(ChaCha20Rng::from_entropy())
    }

    /// Reproducible shuffles for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha20Rng) -> Self {
        let cards = (0..DECK_SIZE).filter_map(Card::from_index).collect();
        Self {
            cards,
            top_index: 0,
            rng,
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.top_index
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSource for Deck {
    fn shuffle(&mut self) {
        self.top_index = 0;
        // Fisher-Yates
        self.cards.shuffle(&mut self.rng);
    }

    fn deal_next_card(&mut self) -> Result<Card, GameError> {
        let card = *self
            .cards
            .get(self.top_index)
            .ok_or(GameError::DeckExhausted)?;
        self.top_index += 1;
        Ok(card)
    }
}

/// A deck with a fixed order, used to replay a known sequence of cards.
/// Shuffling only rewinds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedDeck {
    cards: Vec<Card>,
    top_index: usize,
}

impl StackedDeck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            top_index: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.top_index
    }
}

impl CardSource for StackedDeck {
    fn shuffle(&mut self) {
        self.top_index = 0;
    }

    fn deal_next_card(&mut self) -> Result<Card, GameError> {
        let card = *self
            .cards
            .get(self.top_index)
            .ok_or(GameError::DeckExhausted)?;
        self.top_index += 1;
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn draw_all(deck: &mut impl CardSource) -> Vec<Card> {
        let mut cards = Vec::new();
        while let Ok(card) = deck.deal_next_card() {
            cards.push(card);
        }
        cards
    }

    #[test]
    fn test_full_draw_down_is_52_distinct_cards() {
        let mut deck = Deck::seeded(7);
        for _ in 0..5 {
            deck.shuffle();
            let cards = draw_all(&mut deck);
            assert_eq!(cards.len(), DECK_SIZE);
            let distinct: HashSet<_> = cards.iter().collect();
            assert_eq!(distinct.len(), DECK_SIZE);
        }
    }

    #[test]
    fn test_exhausted_deck_errors() {
        let mut deck = Deck::seeded(1);
        deck.shuffle();
        draw_all(&mut deck);
        assert_eq!(deck.remaining(), 0);
        assert!(matches!(deck.deal_next_card(), Err(GameError::DeckExhausted)));
    }

    #[test]
    fn test_shuffle_resets_cursor() {
        let mut deck = Deck::seeded(3);
        deck.shuffle();
        deck.deal_next_card().unwrap();
        deck.deal_next_card().unwrap();
        assert_eq!(deck.remaining(), 50);
        deck.shuffle();
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let mut a = Deck::seeded(42);
        let mut b = Deck::seeded(42);
        a.shuffle();
        b.shuffle();
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn test_shuffle_changes_order() {
        let fresh = Deck::seeded(9);
        let mut shuffled = fresh.clone();
        shuffled.shuffle();
        assert_ne!(fresh.cards(), shuffled.cards());
    }

    #[test]
    fn test_stacked_deck_replays_order() {
        let order: Vec<Card> = ["As", "Kd", "9c"].iter().map(|s| s.parse().unwrap()).collect();
        let mut deck = StackedDeck::new(order.clone());
        deck.shuffle();
        assert_eq!(draw_all(&mut deck), order);
        deck.shuffle();
        assert_eq!(deck.remaining(), 3);
        assert_eq!(deck.deal_next_card().unwrap(), order[0]);
    }
}
