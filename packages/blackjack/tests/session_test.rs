use blackjack::{
    Bankroll, BasicStrategyPlayer, Card, Chips, DecisionPhase, Deck, GameError, GameOption,
    HandAction, HandOutcome, InputProvider, RoundEvent, RoundStep, Session, SessionEnd,
    StackedDeck, Table, TableView,
};
use std::collections::VecDeque;

/// Deals every round at a fixed bet and plays back hand actions.
struct FlatBettor {
    rounds: u32,
    bet: u64,
    actions: VecDeque<HandAction>,
}

impl InputProvider for FlatBettor {
    fn game_option(&mut self, _bankroll: &Bankroll) -> Result<GameOption, GameError> {
        if self.rounds == 0 {
            return Ok(GameOption::Quit);
        }
        self.rounds -= 1;
        Ok(GameOption::Deal)
    }

    fn bet_amount(&mut self, _max_bet: u64) -> Result<u64, GameError> {
        Ok(self.bet)
    }

    fn take_insurance(&mut self, _view: &TableView<'_>) -> Result<bool, GameError> {
        Ok(false)
    }

    fn hand_action(
        &mut self,
        _view: &TableView<'_>,
        _phase: DecisionPhase,
    ) -> Result<HandAction, GameError> {
        Ok(self.actions.pop_front().unwrap_or(HandAction::Stay))
    }
}

fn stacked(s: &str) -> StackedDeck {
    StackedDeck::new(s.split_whitespace().map(|c| c.parse::<Card>().unwrap()).collect())
}

#[test]
fn test_quit_before_first_round() {
    let table = Table::new(Deck::seeded(1), Bankroll::new(Chips::whole(100)));
    let mut session = Session::new(table);
    let mut input = FlatBettor {
        rounds: 0,
        bet: 10,
        actions: VecDeque::new(),
    };

    let summary = session.run(&mut input, &mut ()).unwrap();

    assert_eq!(summary.end, SessionEnd::Quit);
    assert_eq!(summary.rounds_played, 0);
    assert_eq!(summary.final_balance, Chips::whole(100));
}

#[test]
fn test_session_ends_when_out_of_chips() {
    // player 12 hits a king every round
    let table = Table::new(stacked("Th 9s 2c 8h Kd"), Bankroll::new(Chips::whole(10)));
    let mut session = Session::new(table);
    let mut input = FlatBettor {
        rounds: 5,
        bet: 10,
        actions: VecDeque::from(vec![HandAction::Hit]),
    };
    let mut events = Vec::new();

    let summary = session.run(&mut input, &mut events).unwrap();

    assert_eq!(summary.end, SessionEnd::OutOfChips);
    assert_eq!(summary.rounds_played, 1);
    assert_eq!(summary.final_balance, Chips::ZERO);
    assert!(events.iter().any(|e| matches!(
        e,
        RoundEvent::Settled(s) if s.outcome == HandOutcome::PlayerBusted
    )));
}

#[test]
fn test_play_next_reports_each_round() {
    let table = Table::new(stacked("As 9c Kd 7h"), Bankroll::new(Chips::whole(100)));
    let mut session = Session::new(table);
    let mut input = FlatBettor {
        rounds: 2,
        bet: 10,
        actions: VecDeque::new(),
    };

    for expected in [115, 130] {
        match session.play_next(&mut input, &mut ()).unwrap() {
            RoundStep::Played(summary) => {
                assert_eq!(summary.balance_after, Chips::whole(expected));
            }
            RoundStep::Ended(end) => panic!("session ended early: {end:?}"),
        }
    }
    assert_eq!(
        session.play_next(&mut input, &mut ()).unwrap(),
        RoundStep::Ended(SessionEnd::Quit)
    );
    assert_eq!(session.rounds_played(), 2);
}

#[test]
fn test_bet_above_bankroll_is_rejected() {
    let table = Table::new(Deck::seeded(5), Bankroll::new(Chips::whole(20)));
    let mut session = Session::new(table);
    let mut input = FlatBettor {
        rounds: 1,
        bet: 25,
        actions: VecDeque::new(),
    };

    let err = session.run(&mut input, &mut ()).unwrap_err();
    assert!(matches!(err, GameError::InvalidBet { bet: 25, max: 20 }));
}

#[test]
fn test_basic_strategy_session_keeps_bankroll_consistent() {
    let table = Table::new(Deck::seeded(31337), Bankroll::new(Chips::whole(1_000)));
    let mut session = Session::new(table);
    let mut player = BasicStrategyPlayer::new(5, 300);
    let mut net = 0i64;

    while let RoundStep::Played(summary) = session.play_next(&mut player, &mut ()).unwrap() {
        let settled: i64 = summary
            .settlements
            .iter()
            .map(|s| s.delta.signed_halves())
            .sum();
        assert_eq!(summary.net_halves(), settled);
        net += summary.net_halves();
    }

    assert_eq!(session.rounds_played(), 300);
    let final_balance = session.table().bankroll().balance();
    assert_eq!(final_balance.halves() as i64, 2_000 + net);
}

#[test]
fn test_session_summary_serializes() {
    let table = Table::new(Deck::seeded(1), Bankroll::new(Chips::whole(100)));
    let mut session = Session::new(table);
    let mut input = FlatBettor {
        rounds: 0,
        bet: 1,
        actions: VecDeque::new(),
    };
    let summary = session.run(&mut input, &mut ()).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"end\":\"Quit\""));
}
