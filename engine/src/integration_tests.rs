//! End-to-end flows across the service, registry, games, and ledger.

use crate::ledger::SqliteLedger;
use crate::mocks::MemoryLedger;
use crate::service::Casino;
use pitboss_types::{Action, Difficulty, GameError, RouletteColor, SessionKey};
use std::sync::Arc;
use tempfile::TempDir;

fn casino(seed: u64) -> Casino<MemoryLedger> {
    let casino = Casino::with_seed(MemoryLedger::new(), seed);
    casino.register_player(1, "alice", "Alice").expect("register");
    casino
}

fn key(message: u64) -> SessionKey {
    SessionKey::new(1, message)
}

/// Whatever the board turns out to be, a finished session must satisfy
/// `balance == start - bet + winnings`.
#[test]
fn mines_settlement_matches_the_ledger() {
    let casino = casino(17);
    casino
        .start_mines(key(1), 100, 1)
        .expect("infra")
        .expect("started");

    // With a single mine, tiles 0 and 1 cannot both be hazards.
    let first = casino
        .apply(key(1), Action::Reveal(0))
        .expect("infra")
        .expect("reveal");
    let view = if first.status.game_over {
        first
    } else {
        casino
            .apply(key(1), Action::CashOut)
            .expect("infra")
            .expect("cash out")
    };

    assert!(view.status.game_over);
    assert_eq!(
        casino.balance(1).expect("balance"),
        1_000 - 100 + view.status.winnings
    );
}

#[test]
fn mines_loss_forfeits_exactly_the_bet() {
    let casino = casino(23);
    casino
        .start_mines(key(1), 100, 24)
        .expect("infra")
        .expect("started");

    // 24 mines leave one safe tile; two reveals always end the game.
    let mut terminal = false;
    for tile in 0..2 {
        let view = casino
            .apply(key(1), Action::Reveal(tile))
            .expect("infra")
            .expect("reveal");
        if view.status.game_over {
            terminal = view.status.winnings == 0;
            break;
        }
    }
    assert!(terminal, "expected a losing reveal");
    assert_eq!(casino.balance(1).expect("balance"), 900);
}

#[test]
fn towers_settlement_matches_the_ledger() {
    let casino = casino(31);
    casino
        .start_towers(key(1), 200, Difficulty::Easy)
        .expect("infra")
        .expect("started");

    // Walk each floor bottom-up until the game ends or the tower clears.
    let columns = 3u8;
    let mut lost = false;
    'floors: for floor in (0..5u8).rev() {
        for column in 0..columns {
            let tile = floor * columns + column;
            match casino.apply(key(1), Action::Reveal(tile)).expect("infra") {
                Ok(view) if view.status.game_over => {
                    lost = true;
                    break 'floors;
                }
                Ok(_) => continue 'floors,
                Err(GameError::WrongFloor) => unreachable!("floor {floor} already cleared"),
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    let winnings = if lost {
        0
    } else {
        // Fully cleared: cashing out is still required.
        let view = casino
            .apply(key(1), Action::CashOut)
            .expect("infra")
            .expect("cash out");
        assert_eq!(view.status.winnings, (200.0 * 1.4f64.powi(5)).floor() as u64);
        view.status.winnings
    };
    assert_eq!(casino.balance(1).expect("balance"), 1_000 - 200 + winnings);
}

#[test]
fn terminal_session_rejects_moves_but_allows_restart() {
    let casino = casino(41);
    casino
        .start_mines(key(1), 100, 24)
        .expect("infra")
        .expect("started");

    for tile in 0..2 {
        let view = casino
            .apply(key(1), Action::Reveal(tile))
            .expect("infra")
            .expect("reveal");
        if view.status.game_over {
            break;
        }
    }

    assert!(matches!(
        casino.apply(key(1), Action::Reveal(5)).expect("infra"),
        Err(GameError::GameAlreadyOver)
    ));
    assert!(matches!(
        casino.apply(key(1), Action::CashOut).expect("infra"),
        Err(GameError::GameAlreadyOver)
    ));

    // Same slot, same parameters, fresh board, fresh debit.
    let view = casino
        .apply(key(1), Action::NewGame)
        .expect("infra")
        .expect("restarted");
    assert!(!view.status.game_over);
    assert_eq!(casino.balance(1).expect("balance"), 800);
}

#[test]
fn concurrent_reveals_of_one_tile_resolve_once() {
    let casino = Arc::new(casino(53));
    casino
        .start_mines(key(1), 100, 5)
        .expect("infra")
        .expect("started");

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let casino = casino.clone();
            std::thread::spawn(move || casino.apply(key(1), Action::Reveal(7)).expect("infra"))
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 1, "exactly one reveal may land");
    let failure = results
        .iter()
        .find_map(|result| result.as_ref().err())
        .expect("one rejection");
    assert!(matches!(
        *failure,
        GameError::AlreadyRevealed | GameError::GameAlreadyOver
    ));
}

#[test]
fn session_keys_are_scoped_per_message_and_user() {
    let casino = casino(61);
    casino.register_player(2, "bob", "Bob").expect("register");

    casino
        .start_mines(key(1), 100, 5)
        .expect("infra")
        .expect("started");
    // Same user, another message slot.
    casino
        .start_towers(key(2), 100, Difficulty::Hard)
        .expect("infra")
        .expect("started");
    // Another user, same message id.
    casino
        .start_mines(SessionKey::new(2, 1), 100, 5)
        .expect("infra")
        .expect("started");

    assert_eq!(casino.balance(1).expect("balance"), 800);
    assert_eq!(casino.balance(2).expect("balance"), 900);
}

#[test]
fn sqlite_backed_casino_keeps_books_straight() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = SqliteLedger::open(dir.path().join("casino.db")).expect("open");
    let casino = Casino::with_seed(ledger, 71);
    casino.register_player(1, "alice", "Alice").expect("register");
    casino.register_player(2, "bob", "Bob").expect("register");

    let mut expected = 1_000i64;
    for spin in 0..20 {
        let view = casino
            .spin_roulette(1, 50, RouletteColor::Red)
            .expect("infra")
            .expect("spun");
        expected += view.payout as i64 - 50;
        assert_eq!(
            casino.balance(1).expect("balance") as i64,
            expected,
            "after spin {spin}"
        );
    }

    let entries = casino.leaderboard().expect("leaderboard");
    assert_eq!(entries.len(), 2);
    assert!(entries[0].balance >= entries[1].balance);
    let total: u64 = entries.iter().map(|entry| entry.balance).sum();
    assert_eq!(
        total,
        casino.balance(1).expect("balance") + casino.balance(2).expect("balance")
    );
}

#[test]
fn broke_player_cannot_spin() {
    let casino = Casino::with_seed(MemoryLedger::funded(&[(1, 5)]), 83);
    let result = casino
        .spin_roulette(1, 10, RouletteColor::Yellow)
        .expect("infra");
    assert!(matches!(result, Err(GameError::InsufficientBalance)));
    assert_eq!(casino.balance(1).expect("balance"), 5);
}
