use blackjack::{Chips, HandOutcome, RoundSummary};
use serde::Serialize;

/// Totals gathered over an unattended run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SimulationReport {
    pub rounds: u32,
    pub hands: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub blackjacks: u32,
    pub busts: u32,
    pub splits: u32,
    pub doubles: u32,
    pub total_wagered: u64,
    pub starting_balance: f64,
    pub final_balance: f64,
    /// Net result per chip wagered.
    pub expected_return: f64,
}

fn as_chips(chips: Chips) -> f64 {
    chips.halves() as f64 / 2.0
}

impl SimulationReport {
    pub fn new(starting_balance: Chips) -> Self {
        Self {
            starting_balance: as_chips(starting_balance),
            final_balance: as_chips(starting_balance),
            ..Default::default()
        }
    }

    pub fn record(&mut self, round: &RoundSummary) {
        self.rounds += 1;
        if round.was_split() {
            self.splits += 1;
        }
        for settlement in &round.settlements {
            self.hands += 1;
            self.total_wagered += settlement.bet;
            if settlement.doubled {
                self.doubles += 1;
            }
            match settlement.outcome {
                HandOutcome::Blackjack => {
                    self.blackjacks += 1;
                    self.wins += 1;
                }
                HandOutcome::PlayerBusted => {
                    self.busts += 1;
                    self.losses += 1;
                }
                outcome if outcome.is_win() => self.wins += 1,
                outcome if outcome.is_push() => self.pushes += 1,
                _ => self.losses += 1,
            }
        }
        self.final_balance = as_chips(round.balance_after);
        if self.total_wagered > 0 {
            self.expected_return =
                (self.final_balance - self.starting_balance) / self.total_wagered as f64;
        }
    }
}
