//! Test doubles.

use crate::ledger::{Ledger, LedgerError};
use pitboss_types::casino::STARTING_BALANCE;
use pitboss_types::{LeaderboardEntry, Profile, UserId};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug)]
struct Account {
    username: String,
    name: String,
    balance: u64,
}

/// In-memory [`Ledger`] with the same guarded-debit semantics as the SQLite
/// implementation.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: Mutex<HashMap<UserId, Account>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with `users` pre-registered at the given balance.
    pub fn funded(users: &[(UserId, u64)]) -> Self {
        let ledger = Self::new();
        {
            let mut accounts = ledger.accounts.lock().expect("fresh ledger");
            for (user, balance) in users {
                accounts.insert(
                    *user,
                    Account {
                        username: format!("player{user}"),
                        name: format!("Player {user}"),
                        balance: *balance,
                    },
                );
            }
        }
        ledger
    }

    fn with_accounts<T>(
        &self,
        f: impl FnOnce(&mut HashMap<UserId, Account>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| LedgerError::Storage("mock ledger poisoned".into()))?;
        f(&mut accounts)
    }
}

impl Ledger for MemoryLedger {
    fn register(&self, user: UserId, username: &str, name: &str) -> Result<u64, LedgerError> {
        self.with_accounts(|accounts| {
            let account = accounts.entry(user).or_insert_with(|| Account {
                username: username.to_owned(),
                name: name.to_owned(),
                balance: STARTING_BALANCE,
            });
            account.username = username.to_owned();
            account.name = name.to_owned();
            Ok(account.balance)
        })
    }

    fn profile(&self, user: UserId) -> Result<Profile, LedgerError> {
        self.with_accounts(|accounts| {
            accounts
                .get(&user)
                .map(|account| Profile {
                    username: account.username.clone(),
                    name: account.name.clone(),
                    balance: account.balance,
                })
                .ok_or(LedgerError::NotFound)
        })
    }

    fn balance(&self, user: UserId) -> Result<u64, LedgerError> {
        self.with_accounts(|accounts| {
            accounts
                .get(&user)
                .map(|account| account.balance)
                .ok_or(LedgerError::NotFound)
        })
    }

    fn debit(&self, user: UserId, amount: u64) -> Result<u64, LedgerError> {
        self.with_accounts(|accounts| {
            let account = accounts.get_mut(&user).ok_or(LedgerError::NotFound)?;
            if account.balance < amount {
                return Err(LedgerError::InsufficientBalance {
                    have: account.balance,
                    need: amount,
                });
            }
            account.balance -= amount;
            Ok(account.balance)
        })
    }

    fn credit(&self, user: UserId, amount: u64) -> Result<u64, LedgerError> {
        self.with_accounts(|accounts| {
            let account = accounts.get_mut(&user).ok_or(LedgerError::NotFound)?;
            account.balance += amount;
            Ok(account.balance)
        })
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LedgerError> {
        self.with_accounts(|accounts| {
            let mut entries: Vec<LeaderboardEntry> = accounts
                .values()
                .map(|account| LeaderboardEntry {
                    name: account.name.clone(),
                    balance: account.balance,
                })
                .collect();
            entries.sort_by(|a, b| b.balance.cmp(&a.balance).then(a.name.cmp(&b.name)));
            entries.truncate(limit);
            Ok(entries)
        })
    }
}
