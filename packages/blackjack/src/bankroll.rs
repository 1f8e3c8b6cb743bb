use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::rules::{PayoutRatio, MIN_BET};
use crate::GameError;

/// An exact chip amount. Stored in half-chip units because a 3:2 payout
/// or a half-bet insurance stake on an odd bet lands on a half chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
pub struct Chips {
    halves: u64,
}

impl Chips {
    pub const ZERO: Chips = Chips { halves: 0 };

    pub const fn whole(chips: u64) -> Self {
        Self { halves: chips * 2 }
    }

    pub const fn from_halves(halves: u64) -> Self {
        Self { halves }
    }

    pub fn halves(&self) -> u64 {
        self.halves
    }

    /// Whole chips, rounded down.
    pub fn floor(&self) -> u64 {
        self.halves / 2
    }

    pub fn half(&self) -> Self {
        Self {
            halves: self.halves / 2,
        }
    }

    pub fn scale(&self, ratio: PayoutRatio) -> Self {
        Self {
            halves: ratio.calculate_payout(self.halves),
        }
    }

    pub fn checked_sub(self, other: Chips) -> Option<Chips> {
        self.halves.checked_sub(other.halves).map(Chips::from_halves)
    }

    pub fn saturating_sub(self, other: Chips) -> Chips {
        Chips::from_halves(self.halves.saturating_sub(other.halves))
    }
}

impl Add for Chips {
    type Output = Chips;

    fn add(self, rhs: Chips) -> Chips {
        Chips::from_halves(self.halves + rhs.halves)
    }
}

impl fmt::Display for Chips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.halves % 2 == 0 {
            write!(f, "{}", self.halves / 2)
        } else {
            write!(f, "{}.5", self.halves / 2)
        }
    }
}

/// Net bankroll movement of one resolved bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChipDelta {
    Credit(Chips),
    Debit(Chips),
    Even,
}

impl ChipDelta {
    /// Signed value in half chips.
    pub fn signed_halves(&self) -> i64 {
        match self {
            ChipDelta::Credit(c) => c.halves() as i64,
            ChipDelta::Debit(c) => -(c.halves() as i64),
            ChipDelta::Even => 0,
        }
    }
}

impl fmt::Display for ChipDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChipDelta::Credit(c) => write!(f, "+{c}"),
            ChipDelta::Debit(c) => write!(f, "-{c}"),
            ChipDelta::Even => write!(f, "0"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bankroll {
    balance: Chips,
}

impl Bankroll {
    pub fn new(balance: Chips) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> Chips {
        self.balance
    }

    pub fn increase(&mut self, amount: Chips) {
        self.balance = self.balance + amount;
    }

    pub fn decrease(&mut self, amount: Chips) -> Result<(), GameError> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(GameError::InsufficientChips {
                needed: amount,
                available: self.balance,
            })?;
        Ok(())
    }

    pub fn apply(&mut self, delta: ChipDelta) -> Result<(), GameError> {
        match delta {
            ChipDelta::Credit(amount) => self.increase(amount),
            ChipDelta::Debit(amount) => self.decrease(amount)?,
            ChipDelta::Even => {}
        }
        Ok(())
    }

    /// Largest whole-chip bet the balance covers.
    pub fn max_bet(&self) -> u64 {
        self.balance.floor()
    }

    pub fn can_cover(&self, amount: Chips) -> bool {
        amount <= self.balance
    }

    pub fn is_broke(&self) -> bool {
        self.balance < Chips::whole(MIN_BET)
    }
}
