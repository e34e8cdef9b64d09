//! Headless traffic simulator.
//!
//! Drives a [`Casino`] with a population of random players to sanity-check
//! the accounting: across any number of rounds, the sum of final balances
//! must equal starting chips minus wagers plus returns. Also useful for
//! eyeballing the realized house edge per game.

use anyhow::Result;
use clap::Parser;
use pitboss_engine::{Casino, Ledger, SqliteLedger};
use pitboss_types::{Action, Difficulty, GameError, GameView, RouletteColor, SessionKey, UserId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "pitboss-simulator", about = "Random-play traffic generator")]
struct Args {
    /// Number of simulated players.
    #[arg(long, default_value_t = 4)]
    players: u64,

    /// Rounds each player plays.
    #[arg(long, default_value_t = 100)]
    rounds: u64,

    /// Seed for the traffic pattern and the game boards. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Ledger database path. Uses a throwaway in-memory ledger when omitted.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Bet placed each round.
    #[arg(long, default_value_t = 50)]
    bet: u64,
}

#[derive(Debug, Default)]
struct Summary {
    rounds: u64,
    skipped_broke: u64,
    wagered: u64,
    returned: u64,
}

impl Summary {
    fn record(&mut self, bet: u64, winnings: u64) {
        self.rounds += 1;
        self.wagered += bet;
        self.returned += winnings;
    }

    fn house_edge(&self) -> f64 {
        if self.wagered == 0 {
            return 0.0;
        }
        1.0 - self.returned as f64 / self.wagered as f64
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let ledger = match &args.db {
        Some(path) => SqliteLedger::open(path)?,
        None => SqliteLedger::open_in_memory()?,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let casino = Casino::with_seed(ledger, seed);
    info!(players = args.players, rounds = args.rounds, seed, "simulation starting");

    for user in 1..=args.players {
        casino.register_player(user, &format!("player{user}"), &format!("Player {user}"))?;
    }

    let summary = run(&casino, &args, seed)?;
    info!(
        rounds = summary.rounds,
        skipped_broke = summary.skipped_broke,
        wagered = summary.wagered,
        returned = summary.returned,
        house_edge = %format!("{:.4}", summary.house_edge()),
        "simulation finished"
    );
    for (rank, entry) in casino.leaderboard()?.iter().enumerate() {
        info!(rank = rank + 1, name = %entry.name, balance = entry.balance, "leaderboard");
    }
    Ok(())
}

fn run<L: Ledger>(casino: &Casino<L>, args: &Args, seed: u64) -> Result<Summary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut summary = Summary::default();
    let mut next_message: u64 = 1;

    for round in 0..args.rounds {
        for user in 1..=args.players {
            let message = next_message;
            next_message += 1;
            let outcome = play_round(casino, user, message, args.bet, &mut rng)?;
            match outcome {
                Some((wagered, returned)) => summary.record(wagered, returned),
                None => summary.skipped_broke += 1,
            }
        }
        if round % 50 == 0 {
            info!(round, rounds = summary.rounds, "progress");
        }
    }
    Ok(summary)
}

/// Play one randomly chosen game to completion. Returns `(wagered, returned)`
/// or `None` when the player could not afford the bet.
fn play_round<L: Ledger>(
    casino: &Casino<L>,
    user: UserId,
    message: u64,
    bet: u64,
    rng: &mut StdRng,
) -> Result<Option<(u64, u64)>> {
    match rng.gen_range(0..3) {
        0 => play_mines(casino, SessionKey::new(user, message), bet, rng),
        1 => play_towers(casino, SessionKey::new(user, message), bet, rng),
        _ => play_roulette(casino, user, bet, rng),
    }
}

fn play_mines<L: Ledger>(
    casino: &Casino<L>,
    key: SessionKey,
    bet: u64,
    rng: &mut StdRng,
) -> Result<Option<(u64, u64)>> {
    let mine_count = rng.gen_range(1..=10);
    let mut wagered = bet;
    match casino.start_mines(key, bet, mine_count)? {
        Ok(_) => {}
        Err(GameError::InsufficientBalance) => return Ok(None),
        Err(err) => {
            warn!(%key, %err, "unexpected mines rejection");
            return Ok(None);
        }
    }

    // Occasionally abandon the fresh board to exercise the restart path.
    if rng.gen_bool(0.1) {
        match casino.apply(key, Action::NewGame)? {
            Ok(_) => wagered += bet,
            Err(GameError::InsufficientBalance) => {}
            Err(err) => warn!(%key, %err, "unexpected restart rejection"),
        }
    }

    let mut tiles: Vec<u8> = (0..25).collect();
    tiles.shuffle(rng);
    let target = rng.gen_range(1..=5);
    let mut last: Option<GameView> = None;
    for tile in tiles.into_iter().take(target) {
        let view = casino
            .apply(key, Action::Reveal(tile))?
            .map_err(|err| anyhow::anyhow!("mines reveal failed: {err}"))?;
        let done = view.status.game_over;
        last = Some(view);
        if done {
            break;
        }
    }
    let view = match last {
        Some(view) if view.status.game_over => view,
        _ => casino
            .apply(key, Action::CashOut)?
            .map_err(|err| anyhow::anyhow!("mines cash-out failed: {err}"))?,
    };
    Ok(Some((wagered, view.status.winnings)))
}

fn play_towers<L: Ledger>(
    casino: &Casino<L>,
    key: SessionKey,
    bet: u64,
    rng: &mut StdRng,
) -> Result<Option<(u64, u64)>> {
    let difficulty = *[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .choose(rng)
        .expect("non-empty");
    match casino.start_towers(key, bet, difficulty)? {
        Ok(_) => {}
        Err(GameError::InsufficientBalance) => return Ok(None),
        Err(err) => {
            warn!(%key, %err, "unexpected towers rejection");
            return Ok(None);
        }
    }

    let columns = difficulty.params().columns;
    let stop_after = rng.gen_range(0..=5u8);
    let mut game_over = false;
    let mut winnings = 0;
    for (climbed, floor) in (0..5u8).rev().enumerate() {
        if climbed as u8 >= stop_after {
            break;
        }
        let tile = floor * columns + rng.gen_range(0..columns);
        let view = casino
            .apply(key, Action::Reveal(tile))?
            .map_err(|err| anyhow::anyhow!("towers reveal failed: {err}"))?;
        if view.status.game_over {
            game_over = true;
            winnings = view.status.winnings;
            break;
        }
    }
    if !game_over {
        let view = casino
            .apply(key, Action::CashOut)?
            .map_err(|err| anyhow::anyhow!("towers cash-out failed: {err}"))?;
        winnings = view.status.winnings;
    }
    Ok(Some((bet, winnings)))
}

fn play_roulette<L: Ledger>(
    casino: &Casino<L>,
    user: UserId,
    bet: u64,
    rng: &mut StdRng,
) -> Result<Option<(u64, u64)>> {
    let chosen = *[RouletteColor::Red, RouletteColor::Black, RouletteColor::Yellow]
        .choose(rng)
        .expect("non-empty");
    match casino.spin_roulette(user, bet, chosen)? {
        Ok(view) => Ok(Some((bet, view.payout))),
        Err(GameError::InsufficientBalance) => Ok(None),
        Err(err) => {
            warn!(user, %err, "unexpected roulette rejection");
            Ok(None)
        }
    }
}
