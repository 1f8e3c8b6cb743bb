use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    CardSource, Chips, Deck, GameError, GameOption, InputProvider, RoundObserver, RoundSummary,
    Table,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEnd {
    Quit,
    /// Balance fell below the minimum bet.
    OutOfChips,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub rounds_played: u32,
    pub final_balance: Chips,
    pub end: SessionEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStep {
    Played(RoundSummary),
    Ended(SessionEnd),
}

/// Deal/quit loop around a [`Table`].
#[derive(Debug, Clone)]
pub struct Session<D: CardSource = Deck> {
    table: Table<D>,
    rounds_played: u32,
}

impl<D: CardSource> Session<D> {
    pub fn new(table: Table<D>) -> Self {
        Self {
            table,
            rounds_played: 0,
        }
    }

    pub fn table(&self) -> &Table<D> {
        &self.table
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Asks deal/quit and a bet, then plays one round.
    pub fn play_next<I, O>(
        &mut self,
        input: &mut I,
        observer: &mut O,
    ) -> Result<RoundStep, GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        let bankroll = *self.table.bankroll();
        if bankroll.is_broke() {
            return Ok(RoundStep::Ended(SessionEnd::OutOfChips));
        }
        if input.game_option(&bankroll)? == GameOption::Quit {
            return Ok(RoundStep::Ended(SessionEnd::Quit));
        }

        let bet = input.bet_amount(bankroll.max_bet())?;
        let summary = self.table.play_round(bet, input, observer)?;
        self.rounds_played += 1;
        debug!(
            "Round {} net {} half-chips, balance {}",
            self.rounds_played,
            summary.net_halves(),
            summary.balance_after
        );
        Ok(RoundStep::Played(summary))
    }

    pub fn run<I, O>(
        &mut self,
        input: &mut I,
        observer: &mut O,
    ) -> Result<SessionSummary, GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        info!("Session started with {} chips", self.table.bankroll().balance());
        loop {
            if let RoundStep::Ended(end) = self.play_next(input, observer)? {
                let summary = SessionSummary {
                    rounds_played: self.rounds_played,
                    final_balance: self.table.bankroll().balance(),
                    end,
                };
                info!(
                    "Session ended ({:?}) after {} rounds with {} chips",
                    summary.end, summary.rounds_played, summary.final_balance
                );
                return Ok(summary);
            }
        }
    }
}
