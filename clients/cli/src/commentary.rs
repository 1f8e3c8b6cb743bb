use blackjack::{Chips, GameError, HandOutcome, RoundEvent, RoundObserver, Settlement, SubHand};
use std::io::Write;
use std::time::Duration;

pub const DEALING_PAUSE_MS: u64 = 2000;
pub const RESULT_PAUSE_MS: u64 = 1500;

/// Sleeps for effect between messages and prompts, unless disabled.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    enabled: bool,
}

impl Pacing {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn pause(&self, milliseconds: u64) {
        if self.enabled {
            std::thread::sleep(Duration::from_millis(milliseconds));
        }
    }
}

/// Narrates a session to a terminal.
pub struct Commentary<W: Write> {
    out: W,
    pacing: Pacing,
}

impl<W: Write> Commentary<W> {
    pub fn new(out: W, pacing: Pacing) -> Self {
        Self { out, pacing }
    }

    pub fn welcome(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "Let's play some blackjack...Good luck!")?;
        writeln!(self.out)
    }

    pub fn goodbye(&mut self) -> std::io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Thank you for playing. Goodbye...")?;
        self.pacing.pause(2000);
        Ok(())
    }

    pub fn out_of_chips(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "You're out of chips. Better luck next time...")
    }

    pub fn chip_count(&mut self, balance: Chips) -> std::io::Result<()> {
        writeln!(self.out, "Chips: {balance}")?;
        writeln!(self.out)
    }

    fn line(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "{message}")
    }

    fn narrate(&mut self, message: &str) -> std::io::Result<()> {
        self.line(message)?;
        self.pacing.pause(DEALING_PAUSE_MS);
        Ok(())
    }

    fn result(&mut self, message: &str) -> std::io::Result<()> {
        self.pacing.pause(RESULT_PAUSE_MS);
        self.line(message)?;
        writeln!(self.out)?;
        writeln!(self.out)
    }

    fn settled(&mut self, settlement: &Settlement) -> std::io::Result<()> {
        let dealer = &settlement.dealer;
        let player = &settlement.player;

        // A bust ends the hand before the hole card is turned over
        if settlement.outcome == HandOutcome::PlayerBusted {
            self.line(&format!("Dealer: {}", dealer.show_up_card()))?;
        } else {
            self.line(&format!("Dealer: {}", dealer.show_hand()))?;
        }
        self.line(&format!("Player: {}", player.show_hand()))?;
        writeln!(self.out)?;

        let message = match settlement.outcome {
            HandOutcome::BlackjackPush => {
                "Dealer and player both have blackjack! Push.".to_string()
            }
            HandOutcome::Push => format!("You and dealer both have {}. Push.", dealer.soft_value()),
            HandOutcome::DealerBlackjack => "Dealer has blackjack...Dealer wins.".to_string(),
            HandOutcome::PlayerBusted => "You busted...Dealer wins.".to_string(),
            HandOutcome::DealerBusted => "Dealer busts! You win.".to_string(),
            HandOutcome::Loss => format!("Dealer wins with {}...", dealer.soft_value()),
            HandOutcome::Blackjack => "You have blackjack!!! You win.".to_string(),
            HandOutcome::Win => format!("You win with {}!", player.soft_value()),
        };
        self.result(&message)
    }
}

impl<W: Write> RoundObserver for Commentary<W> {
    fn on_event(&mut self, event: &RoundEvent) -> Result<(), GameError> {
        match event {
            RoundEvent::Dealt { .. } => self.narrate("Dealing...")?,
            RoundEvent::Turn { dealer, player } => {
                self.line(&format!("Dealer: {}", dealer.show_up_card()))?;
                self.line(&format!("Player: {}", player.show_hand()))?;
                writeln!(self.out)?;
            }
            RoundEvent::InsuranceSettled(insurance) => {
                let message = if insurance.dealer_blackjack {
                    format!("Dealer has blackjack. Insurance pays {}.", insurance.delta)
                } else {
                    format!("Dealer does not have blackjack. Insurance lost ({}).", insurance.stake)
                };
                self.result(&message)?;
            }
            RoundEvent::Split { .. } => self.narrate("Splitting...")?,
            RoundEvent::HandStarted(SubHand::First) => self.narrate("Playing first hand...")?,
            RoundEvent::HandStarted(SubHand::Second) => self.narrate("Playing second hand...")?,
            RoundEvent::HandStarted(SubHand::Single) => {}
            RoundEvent::Hit { .. } => self.narrate("Taking a card...")?,
            RoundEvent::Stayed { .. } => self.narrate("Staying pat. Dealing dealer's hand...")?,
            RoundEvent::DoubledDown { bet, .. } => {
                self.narrate(&format!("Doubling down. Bet is now {bet}."))?
            }
            RoundEvent::Settled(settlement) => self.settled(settlement)?,
        }
        self.out.flush()?;
        Ok(())
    }
}
