//! Per-user chip ledger.
//!
//! The ledger is the single source of truth for balances. Games never touch
//! it directly; [`crate::service::Casino`] debits before a session exists
//! and credits when one settles. Debits are guarded at the storage layer so
//! a balance can never go negative, whatever the interleaving above.

use pitboss_types::casino::STARTING_BALANCE;
use pitboss_types::{LeaderboardEntry, Profile, UserId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("user is not registered")]
    NotFound,
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },
    #[error("ledger storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Balance store interface. `register` is idempotent; debits fail atomically
/// when the balance is short.
pub trait Ledger: Send + Sync {
    /// Create the account if missing, granting the starting balance, and
    /// refresh the handle and display name. Returns the current balance.
    fn register(&self, user: UserId, username: &str, name: &str) -> Result<u64, LedgerError>;

    fn profile(&self, user: UserId) -> Result<Profile, LedgerError>;

    fn balance(&self, user: UserId) -> Result<u64, LedgerError>;

    /// Withdraw `amount` and return the new balance. Never leaves a partial
    /// withdrawal behind.
    fn debit(&self, user: UserId, amount: u64) -> Result<u64, LedgerError>;

    /// Deposit `amount` and return the new balance.
    fn credit(&self, user: UserId, amount: u64) -> Result<u64, LedgerError>;

    /// Top accounts by balance, descending.
    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LedgerError>;
}

/// SQLite-backed ledger. A single connection behind a mutex is plenty for
/// chat-bot traffic and keeps every statement serialized.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Throwaway in-memory ledger for tools and tests.
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, LedgerError> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::Storage("ledger connection poisoned".into()))
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    name TEXT NOT NULL,
    balance INTEGER NOT NULL
);";

impl Ledger for SqliteLedger {
    fn register(&self, user: UserId, username: &str, name: &str) -> Result<u64, LedgerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (id, username, name, balance) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET username = excluded.username, name = excluded.name",
            params![user, username, name, STARTING_BALANCE],
        )?;
        let balance: u64 = conn.query_row(
            "SELECT balance FROM users WHERE id = ?1",
            params![user],
            |row| row.get(0),
        )?;
        Ok(balance)
    }

    fn profile(&self, user: UserId) -> Result<Profile, LedgerError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT username, name, balance FROM users WHERE id = ?1",
            params![user],
            |row| {
                Ok(Profile {
                    username: row.get(0)?,
                    name: row.get(1)?,
                    balance: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or(LedgerError::NotFound)
    }

    fn balance(&self, user: UserId) -> Result<u64, LedgerError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT balance FROM users WHERE id = ?1",
            params![user],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(LedgerError::NotFound)
    }

    fn debit(&self, user: UserId, amount: u64) -> Result<u64, LedgerError> {
        let conn = self.conn()?;
        // Guarded single statement: the balance check and the withdrawal
        // are one atomic write.
        let updated = conn.execute(
            "UPDATE users SET balance = balance - ?1 WHERE id = ?2 AND balance >= ?1",
            params![amount, user],
        )?;
        if updated == 0 {
            let have: Option<u64> = conn
                .query_row(
                    "SELECT balance FROM users WHERE id = ?1",
                    params![user],
                    |row| row.get(0),
                )
                .optional()?;
            return match have {
                Some(have) => Err(LedgerError::InsufficientBalance { have, need: amount }),
                None => Err(LedgerError::NotFound),
            };
        }
        let balance: u64 = conn.query_row(
            "SELECT balance FROM users WHERE id = ?1",
            params![user],
            |row| row.get(0),
        )?;
        Ok(balance)
    }

    fn credit(&self, user: UserId, amount: u64) -> Result<u64, LedgerError> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET balance = balance + ?1 WHERE id = ?2",
            params![amount, user],
        )?;
        if updated == 0 {
            return Err(LedgerError::NotFound);
        }
        let balance: u64 = conn.query_row(
            "SELECT balance FROM users WHERE id = ?1",
            params![user],
            |row| row.get(0),
        )?;
        Ok(balance)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LedgerError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, balance FROM users ORDER BY balance DESC, id ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(LeaderboardEntry {
                name: row.get(0)?,
                balance: row.get(1)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger() -> (TempDir, SqliteLedger) {
        let dir = TempDir::new().expect("temp dir");
        let ledger = SqliteLedger::open(dir.path().join("ledger.db")).expect("open");
        (dir, ledger)
    }

    #[test]
    fn register_grants_starting_balance_once() {
        let (_dir, ledger) = ledger();
        assert_eq!(ledger.register(1, "alice", "Alice").expect("register"), 1_000);

        // Re-registering must not re-grant.
        ledger.debit(1, 400).expect("debit");
        assert_eq!(ledger.register(1, "alice", "Alice").expect("register"), 600);
    }

    #[test]
    fn register_refreshes_handle_and_name() {
        let (_dir, ledger) = ledger();
        ledger.register(1, "alice", "Alice").expect("register");
        ledger.register(1, "alice2", "Alice B").expect("register");

        let profile = ledger.profile(1).expect("profile");
        assert_eq!(profile.username, "alice2");
        assert_eq!(profile.name, "Alice B");
        assert_eq!(profile.balance, 1_000);
    }

    #[test]
    fn debit_and_credit_move_the_balance() {
        let (_dir, ledger) = ledger();
        ledger.register(1, "alice", "Alice").expect("register");
        assert_eq!(ledger.debit(1, 250).expect("debit"), 750);
        assert_eq!(ledger.credit(1, 100).expect("credit"), 850);
        assert_eq!(ledger.balance(1).expect("balance"), 850);
    }

    #[test]
    fn debit_fails_atomically_when_short() {
        let (_dir, ledger) = ledger();
        ledger.register(1, "alice", "Alice").expect("register");
        match ledger.debit(1, 1_001) {
            Err(LedgerError::InsufficientBalance { have, need }) => {
                assert_eq!(have, 1_000);
                assert_eq!(need, 1_001);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
        assert_eq!(ledger.balance(1).expect("balance"), 1_000);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let (_dir, ledger) = ledger();
        assert!(matches!(ledger.balance(9), Err(LedgerError::NotFound)));
        assert!(matches!(ledger.profile(9), Err(LedgerError::NotFound)));
        assert!(matches!(ledger.debit(9, 1), Err(LedgerError::NotFound)));
        assert!(matches!(ledger.credit(9, 1), Err(LedgerError::NotFound)));
    }

    #[test]
    fn leaderboard_orders_by_balance_descending() {
        let (_dir, ledger) = ledger();
        ledger.register(1, "alice", "Alice").expect("register");
        ledger.register(2, "bob", "Bob").expect("register");
        ledger.register(3, "carol", "Carol").expect("register");
        ledger.credit(2, 500).expect("credit");
        ledger.debit(3, 500).expect("debit");

        let entries = ledger.leaderboard(2).expect("leaderboard");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "bob");
        assert_eq!(entries[0].balance, 1_500);
        assert_eq!(entries[1].name, "alice");
    }

    #[test]
    fn balances_survive_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("ledger.db");
        {
            let ledger = SqliteLedger::open(&path).expect("open");
            ledger.register(1, "alice", "Alice").expect("register");
            ledger.debit(1, 300).expect("debit");
        }
        let ledger = SqliteLedger::open(&path).expect("reopen");
        assert_eq!(ledger.balance(1).expect("balance"), 700);
    }
}
