use serde::{Deserialize, Serialize};

use crate::Hand;

/// Smallest bet accepted; a bankroll below this ends the session.
pub const MIN_BET: u64 = 1;

/// Bankroll a new session starts with.
pub const DEFAULT_STARTING_CHIPS: u64 = 100;

/// Dealer stands once the soft total lands in this range.
pub const DEALER_STAND_MIN: u8 = 17;
pub const BLACKJACK_VALUE: u8 = 21;

/// Payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const TWO_TO_ONE: Self = Self {
        numerator: 2,
        denominator: 1,
    };

    pub fn calculate_payout(&self, bet: u64) -> u64 {
        (bet * self.numerator as u64) / self.denominator as u64
    }
}

/// Natural blackjack on an unsplit hand.
pub const BLACKJACK_PAYOUT: PayoutRatio = PayoutRatio::THREE_TO_TWO;
pub const INSURANCE_PAYOUT: PayoutRatio = PayoutRatio::TWO_TO_ONE;

/// The dealer has no choices: draw until the soft total reaches 17..=21
/// or the hand busts.
pub fn dealer_should_hit(hand: &Hand) -> bool {
    let soft = hand.soft_value();
    let standing = (DEALER_STAND_MIN..=BLACKJACK_VALUE).contains(&soft);
    !(standing || hand.is_busted())
}
