mod commentary;
mod console;
mod simulate;

use blackjack::rules::DEFAULT_STARTING_CHIPS;
use blackjack::{
    Bankroll, BasicStrategyPlayer, Card, CardSource, Chips, Deck, RoundStep, Session, SessionEnd,
    StackedDeck, Table,
};
use clap::{Parser, Subcommand};
use std::io;

use commentary::{Commentary, Pacing};
use console::ConsoleInput;
use simulate::SimulationReport;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

/// Keeps half-chip arithmetic on the bankroll well inside `u64`.
const MAX_STARTING_CHIPS: u64 = u32::MAX as u64;

#[derive(Parser)]
#[command(name = "blackjack", about = "Single-player blackjack against the house")]
struct Cli {
    /// Starting bankroll in chips
    #[arg(
        long,
        env = "BLACKJACK_CHIPS",
        default_value_t = DEFAULT_STARTING_CHIPS,
        value_parser = clap::value_parser!(u64).range(1..=MAX_STARTING_CHIPS),
        global = true
    )]
    chips: u64,

    /// Seed the shuffle for a reproducible game
    #[arg(long, env = "BLACKJACK_SEED", global = true)]
    seed: Option<u64>,

    /// Print everything at once instead of pausing between messages
    #[arg(long, env = "BLACKJACK_NO_PAUSE", global = true)]
    no_pause: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play at the console (default)
    Play {
        /// Deal from a fixed card order, e.g. "As 9c Kd 7h". Replayed every round.
        #[arg(long)]
        stack: Option<String>,
    },
    /// Play unattended rounds by basic strategy and report the totals
    Simulate {
        #[arg(long, default_value = "1000")]
        rounds: u32,

        /// Flat bet per round
        #[arg(long, default_value = "1")]
        bet: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Some(Command::Simulate { .. }) => "info",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let bankroll = Bankroll::new(Chips::whole(cli.chips));
    let pacing = Pacing::new(!cli.no_pause);

    let result = match cli.command.unwrap_or(Command::Play { stack: None }) {
        Command::Play { stack: Some(stack) } => parse_stack(&stack)
            .and_then(|cards| play(Table::new(StackedDeck::new(cards), bankroll), pacing)),
        Command::Play { stack: None } => play(Table::new(new_deck(cli.seed), bankroll), pacing),
        Command::Simulate { rounds, bet, json } => {
            simulate(Table::new(new_deck(cli.seed), bankroll), rounds, bet, json)
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn new_deck(seed: Option<u64>) -> Deck {
    match seed {
        Some(seed) => {
            log::info!("Using shuffle seed {seed}");
            Deck::seeded(seed)
        }
        None => Deck::new(),
    }
}

fn parse_stack(stack: &str) -> Result<Vec<Card>, BoxErr> {
    let cards = stack
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Card>().map_err(|e| format!("Bad card in --stack: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    if cards.is_empty() {
        return Err("--stack needs at least one card".into());
    }
    log::info!("Dealing from a stacked deck of {} cards", cards.len());
    Ok(cards)
}

fn play<D: CardSource>(table: Table<D>, pacing: Pacing) -> Result<(), BoxErr> {
    let stdin = io::stdin();
    let mut input = ConsoleInput::new(stdin.lock(), io::stdout(), pacing);
    let mut commentary = Commentary::new(io::stdout(), pacing);
    let mut session = Session::new(table);

    commentary.welcome()?;
    loop {
        match session.play_next(&mut input, &mut commentary)? {
            RoundStep::Played(summary) => commentary.chip_count(summary.balance_after)?,
            RoundStep::Ended(SessionEnd::Quit) => {
                commentary.goodbye()?;
                break;
            }
            RoundStep::Ended(SessionEnd::OutOfChips) => {
                commentary.out_of_chips()?;
                break;
            }
        }
    }
    log::info!("Played {} rounds", session.rounds_played());
    Ok(())
}

fn simulate<D: CardSource>(
    table: Table<D>,
    rounds: u32,
    bet: u64,
    json: bool,
) -> Result<(), BoxErr> {
    let mut report = SimulationReport::new(table.bankroll().balance());
    let mut player = BasicStrategyPlayer::new(bet, rounds);
    let mut session = Session::new(table);

    log::info!("Simulating {rounds} rounds at {bet} chips per round...");
    while let RoundStep::Played(summary) = session.play_next(&mut player, &mut ())? {
        report.record(&summary);
    }
    if player.rounds_left() > 0 {
        log::warn!("Bankroll ran out after {} rounds", report.rounds);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Rounds:        {}", report.rounds);
        println!("Hands:         {}", report.hands);
        println!("Won/Lost/Push: {}/{}/{}", report.wins, report.losses, report.pushes);
        println!("Blackjacks:    {}", report.blackjacks);
        println!("Busts:         {}", report.busts);
        println!("Splits:        {}", report.splits);
        println!("Doubles:       {}", report.doubles);
        println!("Balance:       {} -> {}", report.starting_balance, report.final_balance);
        println!("Return:        {:+.4}%", report.expected_return * 100.0);
    }
    Ok(())
}
