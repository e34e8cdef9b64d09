//! Pitboss game-state engine.
//!
//! This crate contains the finite-state game models (Mines, Towers,
//! Roulette), the session registry that maps a [`pitboss_types::SessionKey`]
//! to exactly one in-flight game, and the balance ledger they settle against.
//!
//! ## Invariants
//! - A session never holds a bet that was not already deducted from the
//!   ledger: creation is validate -> debit -> construct, and a failed debit
//!   aborts construction.
//! - Actions addressed to one session key are serialized; two concurrent
//!   reveals against the same pre-reveal state cannot both succeed.
//! - Terminal transitions (`game_over`) happen exactly once and never revert.
//!
//! The primary entrypoint is [`Casino`].

pub mod catalog;
pub mod games;
pub mod ledger;
pub mod registry;
pub mod service;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

#[cfg(test)]
mod integration_tests;

pub use catalog::{GameCatalog, GameConfig, GameInfo, MinesConfig, RouletteConfig, TowersConfig};
pub use games::{GameRng, GameSession, RevealOutcome};
pub use ledger::{Ledger, LedgerError, SqliteLedger};
pub use registry::SessionRegistry;
pub use service::Casino;
