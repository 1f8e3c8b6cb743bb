//! One betting round: deal, insurance, optional split, player turn, dealer
//! draw-out and settlement against the bankroll.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::rules::{dealer_should_hit, BLACKJACK_PAYOUT, INSURANCE_PAYOUT, MIN_BET};
use crate::{
    Bankroll, CardSource, ChipDelta, Chips, DecisionPhase, Deck, GameError, Hand, HandAction,
    HandOutcome, InputProvider, TableView,
};

/// Which of the player's hands a settlement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubHand {
    Single,
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceResult {
    pub stake: Chips,
    pub dealer_blackjack: bool,
    pub delta: ChipDelta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub hand: SubHand,
    pub outcome: HandOutcome,
    /// Stake after any double-down.
    pub bet: u64,
    /// The player doubled down, even if the bankroll capped the raise.
    pub doubled: bool,
    pub delta: ChipDelta,
    pub dealer: Hand,
    pub player: Hand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub bet: u64,
    pub insurance: Option<InsuranceResult>,
    pub settlements: Vec<Settlement>,
    pub balance_before: Chips,
    pub balance_after: Chips,
}

impl RoundSummary {
    pub fn was_split(&self) -> bool {
        self.settlements.len() > 1
    }

    /// Net result of the round in half chips.
    pub fn net_halves(&self) -> i64 {
        self.balance_after.halves() as i64 - self.balance_before.halves() as i64
    }
}

/// Everything presentation needs to narrate a round, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    Dealt { dealer: Hand, player: Hand },
    /// Emitted before every player prompt (insurance, split, hit/stay).
    Turn { dealer: Hand, player: Hand },
    InsuranceSettled(InsuranceResult),
    Split { first: Hand, second: Hand },
    HandStarted(SubHand),
    Hit { player: Hand },
    Stayed { player: Hand },
    DoubledDown { bet: u64, player: Hand },
    Settled(Settlement),
}

pub trait RoundObserver {
    fn on_event(&mut self, event: &RoundEvent) -> Result<(), GameError>;
}

impl RoundObserver for () {
    fn on_event(&mut self, _event: &RoundEvent) -> Result<(), GameError> {
        Ok(())
    }
}

impl RoundObserver for Vec<RoundEvent> {
    fn on_event(&mut self, event: &RoundEvent) -> Result<(), GameError> {
        self.push(event.clone());
        Ok(())
    }
}

/// One player hand played against its own copy of the dealer's hand.
#[derive(Debug, Clone)]
struct HandInstance {
    label: SubHand,
    dealer: Hand,
    player: Hand,
    bet: u64,
    allow_blackjack: bool,
    split_aces: bool,
    doubled: bool,
    /// Stake still owed by a sibling hand that hasn't been settled.
    reserved: Chips,
}

/// Deck and bankroll for a session, threaded through each round.
#[derive(Debug, Clone)]
pub struct Table<D: CardSource = Deck> {
    deck: D,
    bankroll: Bankroll,
}

impl<D: CardSource> Table<D> {
    pub fn new(deck: D, bankroll: Bankroll) -> Self {
        Self { deck, bankroll }
    }

    pub fn bankroll(&self) -> &Bankroll {
        &self.bankroll
    }

    pub fn play_round<I, O>(
        &mut self,
        bet: u64,
        input: &mut I,
        observer: &mut O,
    ) -> Result<RoundSummary, GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        let max = self.bankroll.max_bet();
        if bet < MIN_BET || bet > max {
            return Err(GameError::InvalidBet { bet, max });
        }
        let balance_before = self.bankroll.balance();

        let (dealer, player) = self.deal_starting_hands()?;
        debug!("Dealt player {player} vs dealer {dealer}, bet {bet}");
        observer.on_event(&RoundEvent::Dealt {
            dealer: dealer.clone(),
            player: player.clone(),
        })?;

        let insurance = self.offer_insurance(&dealer, &player, bet, input, observer)?;

        let settlements = match self.split_decision(&dealer, &player, bet, input, observer)? {
            Some(HandAction::Split) => {
                self.play_split_hands(dealer, player, bet, input, observer)?
            }
            opening => {
                let instance = HandInstance {
                    label: SubHand::Single,
                    dealer,
                    player,
                    bet,
                    allow_blackjack: true,
                    split_aces: false,
                    doubled: false,
                    reserved: Chips::ZERO,
                };
                vec![self.play_hand(instance, opening, input, observer)?]
            }
        };

        let summary = RoundSummary {
            bet,
            insurance,
            settlements,
            balance_before,
            balance_after: self.bankroll.balance(),
        };
        debug!(
            "Round finished: {} -> {}",
            summary.balance_before, summary.balance_after
        );
        Ok(summary)
    }

    fn deal_starting_hands(&mut self) -> Result<(Hand, Hand), GameError> {
        self.deck.shuffle();
        let mut dealer = Hand::new();
        let mut player = Hand::new();
        player.add_card(self.deck.deal_next_card()?);
        dealer.add_card(self.deck.deal_next_card()?);
        player.add_card(self.deck.deal_next_card()?);
        dealer.add_card(self.deck.deal_next_card()?);
        Ok((dealer, player))
    }

    fn offer_insurance<I, O>(
        &mut self,
        dealer: &Hand,
        player: &Hand,
        bet: u64,
        input: &mut I,
        observer: &mut O,
    ) -> Result<Option<InsuranceResult>, GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        if !dealer.up_card().is_some_and(|card| card.is_ace()) {
            return Ok(None);
        }

        let stake = Chips::whole(bet).half();
        let spare = self.bankroll.balance().saturating_sub(Chips::whole(bet));
        if stake > spare {
            trace!("Insurance not offered: stake {stake} exceeds spare {spare}");
            return Ok(None);
        }

        observer.on_event(&RoundEvent::Turn {
            dealer: dealer.clone(),
            player: player.clone(),
        })?;
        let view = TableView {
            dealer,
            player,
            bet,
            bankroll: &self.bankroll,
        };
        if !input.take_insurance(&view)? {
            debug!("Insurance declined");
            return Ok(None);
        }

        let dealer_blackjack = dealer.is_blackjack();
        let delta = if dealer_blackjack {
            ChipDelta::Credit(stake.scale(INSURANCE_PAYOUT))
        } else {
            ChipDelta::Debit(stake)
        };
        self.bankroll.apply(delta)?;

        let result = InsuranceResult {
            stake,
            dealer_blackjack,
            delta,
        };
        debug!("Insurance settled: {delta}");
        observer.on_event(&RoundEvent::InsuranceSettled(result.clone()))?;
        Ok(Some(result))
    }

    fn allow_splitting(&self, dealer: &Hand, player: &Hand, bet: u64) -> bool {
        player.is_pair()
            && !dealer.is_blackjack()
            && self.bankroll.can_cover(Chips::whole(2 * bet))
    }

    /// Asks the split prompt if a split is on offer. A non-split answer is
    /// handed back as the single hand's first action.
    fn split_decision<I, O>(
        &self,
        dealer: &Hand,
        player: &Hand,
        bet: u64,
        input: &mut I,
        observer: &mut O,
    ) -> Result<Option<HandAction>, GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        if !self.allow_splitting(dealer, player, bet) {
            return Ok(None);
        }
        observer.on_event(&RoundEvent::Turn {
            dealer: dealer.clone(),
            player: player.clone(),
        })?;
        let action = self.ask(input, dealer, player, bet, DecisionPhase::SplittablePair)?;
        Ok(Some(action))
    }

    fn play_split_hands<I, O>(
        &mut self,
        dealer: Hand,
        player: Hand,
        bet: u64,
        input: &mut I,
        observer: &mut O,
    ) -> Result<Vec<Settlement>, GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        let &[first_card, second_card] = player.cards() else {
            return Err(GameError::ActionNotAllowed {
                action: HandAction::Split,
                phase: DecisionPhase::for_hand(&player),
            });
        };

        let copy_dealer = dealer.clone();
        let mut first = Hand::new();
        let mut second = Hand::new();
        first.add_card(first_card);
        second.add_card(second_card);
        first.add_card(self.deck.deal_next_card()?);
        second.add_card(self.deck.deal_next_card()?);

        let split_aces = first_card.is_ace();
        debug!("Split into {first} and {second} (aces: {split_aces})");
        observer.on_event(&RoundEvent::Split {
            first: first.clone(),
            second: second.clone(),
        })?;

        observer.on_event(&RoundEvent::HandStarted(SubHand::First))?;
        let first_settlement = self.play_hand(
            HandInstance {
                label: SubHand::First,
                dealer,
                player: first,
                bet,
                allow_blackjack: false,
                split_aces,
                doubled: false,
                reserved: Chips::whole(bet),
            },
            None,
            input,
            observer,
        )?;

        observer.on_event(&RoundEvent::HandStarted(SubHand::Second))?;
        let second_settlement = self.play_hand(
            HandInstance {
                label: SubHand::Second,
                dealer: copy_dealer,
                player: second,
                bet,
                allow_blackjack: false,
                split_aces,
                doubled: false,
                reserved: Chips::ZERO,
            },
            None,
            input,
            observer,
        )?;

        Ok(vec![first_settlement, second_settlement])
    }

    /// Plays one hand to its terminal state and applies its bankroll delta
    /// exactly once.
    fn play_hand<I, O>(
        &mut self,
        mut hand: HandInstance,
        opening: Option<HandAction>,
        input: &mut I,
        observer: &mut O,
    ) -> Result<Settlement, GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        let (outcome, delta) = if hand.dealer.is_blackjack()
            || (hand.allow_blackjack && hand.player.is_blackjack())
        {
            Self::blackjack_outcome(&hand)
        } else {
            if !hand.split_aces {
                self.play_player_hand(&mut hand, opening, input, observer)?;
            }

            if hand.player.is_busted() {
                (
                    HandOutcome::PlayerBusted,
                    ChipDelta::Debit(Chips::whole(hand.bet)),
                )
            } else {
                self.play_dealer_hand(&mut hand.dealer)?;
                Self::evaluate(&hand)
            }
        };

        self.bankroll.apply(delta)?;

        let settlement = Settlement {
            hand: hand.label,
            outcome,
            bet: hand.bet,
            doubled: hand.doubled,
            delta,
            dealer: hand.dealer,
            player: hand.player,
        };
        debug!(
            "{:?} hand settled: {:?} {} (player {}, dealer {})",
            settlement.hand,
            settlement.outcome,
            settlement.delta,
            settlement.player,
            settlement.dealer
        );
        observer.on_event(&RoundEvent::Settled(settlement.clone()))?;
        Ok(settlement)
    }

    fn blackjack_outcome(hand: &HandInstance) -> (HandOutcome, ChipDelta) {
        let stake = Chips::whole(hand.bet);
        let dealer_blackjack = hand.dealer.is_blackjack();
        let player_blackjack = hand.player.is_blackjack();

        if dealer_blackjack && player_blackjack {
            if hand.allow_blackjack {
                (HandOutcome::BlackjackPush, ChipDelta::Even)
            } else {
                (HandOutcome::Push, ChipDelta::Even)
            }
        } else if dealer_blackjack {
            (HandOutcome::DealerBlackjack, ChipDelta::Debit(stake))
        } else {
            (
                HandOutcome::Blackjack,
                ChipDelta::Credit(stake.scale(BLACKJACK_PAYOUT)),
            )
        }
    }

    fn play_player_hand<I, O>(
        &mut self,
        hand: &mut HandInstance,
        opening: Option<HandAction>,
        input: &mut I,
        observer: &mut O,
    ) -> Result<(), GameError>
    where
        I: InputProvider + ?Sized,
        O: RoundObserver + ?Sized,
    {
        let mut pending = opening;
        loop {
            let phase = DecisionPhase::for_hand(&hand.player);
            let action = match pending.take() {
                Some(action) if phase.permits(action) => action,
                Some(action) => return Err(GameError::ActionNotAllowed { action, phase }),
                None => {
                    observer.on_event(&RoundEvent::Turn {
                        dealer: hand.dealer.clone(),
                        player: hand.player.clone(),
                    })?;
                    self.ask(input, &hand.dealer, &hand.player, hand.bet, phase)?
                }
            };

            match action {
                HandAction::Stay => {
                    observer.on_event(&RoundEvent::Stayed {
                        player: hand.player.clone(),
                    })?;
                    return Ok(());
                }
                HandAction::DoubleDown => {
                    let available = self
                        .bankroll
                        .balance()
                        .saturating_sub(hand.reserved)
                        .floor();
                    hand.bet = (2 * hand.bet).min(available);
                    hand.doubled = true;
                    hand.player.add_card(self.deck.deal_next_card()?);
                    debug!("Doubled down to {}: {}", hand.bet, hand.player);
                    observer.on_event(&RoundEvent::DoubledDown {
                        bet: hand.bet,
                        player: hand.player.clone(),
                    })?;
                    return Ok(());
                }
                HandAction::Hit => {
                    hand.player.add_card(self.deck.deal_next_card()?);
                    trace!("Player hit: {}", hand.player);
                    observer.on_event(&RoundEvent::Hit {
                        player: hand.player.clone(),
                    })?;
                    if hand.player.is_busted() {
                        return Ok(());
                    }
                }
                HandAction::Split => {
                    return Err(GameError::ActionNotAllowed { action, phase });
                }
            }
        }
    }

    fn play_dealer_hand(&mut self, dealer: &mut Hand) -> Result<(), GameError> {
        while dealer_should_hit(dealer) {
            dealer.add_card(self.deck.deal_next_card()?);
        }
        trace!("Dealer stands or busts with {dealer}");
        Ok(())
    }

    // Comparing soft totals is enough: soft >= hard, and they are equal
    // when no Ace is flexed.
    fn evaluate(hand: &HandInstance) -> (HandOutcome, ChipDelta) {
        let stake = Chips::whole(hand.bet);
        let dealer_value = hand.dealer.soft_value();
        let player_value = hand.player.soft_value();

        if hand.dealer.is_busted() {
            (HandOutcome::DealerBusted, ChipDelta::Credit(stake))
        } else if player_value > dealer_value {
            (HandOutcome::Win, ChipDelta::Credit(stake))
        } else if dealer_value > player_value {
            (HandOutcome::Loss, ChipDelta::Debit(stake))
        } else {
            (HandOutcome::Push, ChipDelta::Even)
        }
    }

    fn ask<I>(
        &self,
        input: &mut I,
        dealer: &Hand,
        player: &Hand,
        bet: u64,
        phase: DecisionPhase,
    ) -> Result<HandAction, GameError>
    where
        I: InputProvider + ?Sized,
    {
        let view = TableView {
            dealer,
            player,
            bet,
            bankroll: &self.bankroll,
        };
        let action = input.hand_action(&view, phase)?;
        if !phase.permits(action) {
            return Err(GameError::ActionNotAllowed { action, phase });
        }
        Ok(action)
    }
}
