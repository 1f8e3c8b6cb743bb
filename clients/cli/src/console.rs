use blackjack::{
    Bankroll, Chips, DecisionPhase, GameError, GameOption, HandAction, InputProvider, TableView,
};
use std::io::{BufRead, Write};

use crate::commentary::Pacing;

/// Reads player decisions from a line-oriented terminal, asking again until
/// the answer is usable.
pub struct ConsoleInput<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    pacing: Pacing,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W, pacing: Pacing) -> Self {
        Self {
            reader,
            writer,
            pacing,
        }
    }

    fn prompt(&mut self, text: &str) -> Result<String, GameError> {
        write!(self.writer, "{text}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(GameError::Input("input closed".into()));
        }
        Ok(line.trim().to_lowercase())
    }
}

fn action_prompt(phase: DecisionPhase) -> &'static str {
    match phase {
        DecisionPhase::SplittablePair => "[s-stay  h-hit  d-double  p-split]: ",
        DecisionPhase::StartingHand => "[s-stay  h-hit  d-double]: ",
        DecisionPhase::Drawing => "[s-stay  h-hit]: ",
    }
}

fn parse_action(answer: &str) -> Option<HandAction> {
    match answer {
        "s" => Some(HandAction::Stay),
        "h" => Some(HandAction::Hit),
        "d" => Some(HandAction::DoubleDown),
        "p" => Some(HandAction::Split),
        _ => None,
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsoleInput<R, W> {
    fn game_option(&mut self, _bankroll: &Bankroll) -> Result<GameOption, GameError> {
        self.pacing.pause(2000);
        loop {
            match self.prompt("[d-deal  q-quit]: ")?.as_str() {
                "d" => return Ok(GameOption::Deal),
                "q" => return Ok(GameOption::Quit),
                _ => continue,
            }
        }
    }

    fn bet_amount(&mut self, max_bet: u64) -> Result<u64, GameError> {
        self.pacing.pause(1000);
        let text = format!("[Enter bet amount (1-{max_bet})]: ");
        loop {
            if let Ok(bet) = self.prompt(&text)?.parse::<u64>() {
                if (1..=max_bet).contains(&bet) {
                    return Ok(bet);
                }
            }
        }
    }

    fn take_insurance(&mut self, view: &TableView<'_>) -> Result<bool, GameError> {
        let text = format!(
            "[Insurance for {}? y-yes  n-no]: ",
            Chips::whole(view.bet).half()
        );
        loop {
            match self.prompt(&text)?.as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => continue,
            }
        }
    }

    fn hand_action(
        &mut self,
        _view: &TableView<'_>,
        phase: DecisionPhase,
    ) -> Result<HandAction, GameError> {
        self.pacing.pause(2000);
        loop {
            let answer = self.prompt(action_prompt(phase))?;
            match parse_action(&answer) {
                Some(action) if phase.permits(action) => return Ok(action),
                _ => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack::Hand;
    use std::io::Cursor;

    fn console(script: &str) -> ConsoleInput<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleInput::new(
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            Pacing::new(false),
        )
    }

    fn written(input: &ConsoleInput<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(input.writer.clone()).unwrap()
    }

    #[test]
    fn test_game_option_reprompts_on_unknown_answer() {
        let mut input = console("x\nQ\n");
        let bankroll = Bankroll::new(Chips::whole(100));
        assert_eq!(input.game_option(&bankroll).unwrap(), GameOption::Quit);
        assert_eq!(written(&input).matches("[d-deal  q-quit]: ").count(), 2);
    }

    #[test]
    fn test_bet_must_be_in_range() {
        let mut input = console("0\nabc\n101\n25\n");
        assert_eq!(input.bet_amount(100).unwrap(), 25);
        assert_eq!(
            written(&input).matches("[Enter bet amount (1-100)]: ").count(),
            4
        );
    }

    #[test]
    fn test_split_refused_when_not_offered() {
        let mut input = console("p\nd\nh\n");
        let dealer = Hand::new();
        let player = Hand::new();
        let bankroll = Bankroll::new(Chips::whole(100));
        let view = TableView {
            dealer: &dealer,
            player: &player,
            bet: 10,
            bankroll: &bankroll,
        };

        let action = input.hand_action(&view, DecisionPhase::Drawing).unwrap();
        assert_eq!(action, HandAction::Hit);
        assert_eq!(written(&input).matches("[s-stay  h-hit]: ").count(), 3);
    }

    #[test]
    fn test_insurance_prompt_shows_half_bet() {
        let mut input = console("y\n");
        let dealer = Hand::new();
        let player = Hand::new();
        let bankroll = Bankroll::new(Chips::whole(100));
        let view = TableView {
            dealer: &dealer,
            player: &player,
            bet: 5,
            bankroll: &bankroll,
        };

        assert!(input.take_insurance(&view).unwrap());
        assert_eq!(written(&input), "[Insurance for 2.5? y-yes  n-no]: ");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut input = console("");
        let err = input.bet_amount(10).unwrap_err();
        assert!(matches!(err, GameError::Input(_)));
    }
}
