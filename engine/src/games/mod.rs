//! Game models.
//!
//! Each game is a pure state machine over its own board: no transport, no
//! ledger access. Debits and credits are orchestrated by
//! [`crate::service::Casino`], which owns the ordering guarantees.

pub mod mines;
pub mod roulette;
pub mod towers;

use pitboss_types::{BoardView, GameError, GameStatus, GameType, GameView, SessionKey};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

pub use mines::MinesGame;
pub use roulette::RouletteSpin;
pub use towers::TowersGame;

/// Random source for board generation and weighted draws.
///
/// Wraps a ChaCha stream cipher so tests can pin a seed and replay exact
/// boards; production callers seed from OS entropy.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha12Rng,
}

impl GameRng {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha12Rng::from_entropy(),
        }
    }

    /// Deterministic stream for tests and replayable simulations.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Uniform integer in `[0, max)`. `max` must be nonzero.
    pub fn next_bounded(&mut self, max: usize) -> usize {
        self.inner.gen_range(0..max)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_bounded(i + 1);
            slice.swap(i, j);
        }
    }

    /// Draw an index with probability proportional to its weight.
    ///
    /// Weights must be non-negative with a positive sum; the last index
    /// absorbs any floating-point remainder.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        debug_assert!(!weights.is_empty());
        let total: f64 = weights.iter().sum();
        let mut point = self.uniform() * total;
        for (index, weight) in weights.iter().enumerate() {
            if point < *weight {
                return index;
            }
            point -= weight;
        }
        weights.len() - 1
    }
}

/// Outcome of a single reveal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealOutcome {
    /// Safe tile: the session stays active with updated winnings.
    Safe { multiplier: f64, winnings: u64 },
    /// Hazard tile: the session is terminal, the bet (debited at creation)
    /// is forfeit.
    Hazard,
}

/// One in-flight game held by the session registry.
///
/// Roulette resolves in a single step and never becomes a session.
#[derive(Clone, Debug)]
pub enum GameSession {
    Mines(MinesGame),
    Towers(TowersGame),
}

impl GameSession {
    pub fn game_type(&self) -> GameType {
        match self {
            Self::Mines(_) => GameType::Mines,
            Self::Towers(_) => GameType::Towers,
        }
    }

    pub fn bet(&self) -> u64 {
        match self {
            Self::Mines(game) => game.bet(),
            Self::Towers(game) => game.bet(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Mines(game) => game.is_terminal(),
            Self::Towers(game) => game.is_terminal(),
        }
    }

    /// Disclose a tile. Fails without mutating state when the move is
    /// illegal for the current position.
    pub fn reveal(&mut self, tile: u8) -> Result<RevealOutcome, GameError> {
        match self {
            Self::Mines(game) => game.reveal(tile),
            Self::Towers(game) => game.reveal(tile),
        }
    }

    /// End the session and return the amount to credit.
    pub fn cash_out(&mut self) -> Result<u64, GameError> {
        match self {
            Self::Mines(game) => game.cash_out(),
            Self::Towers(game) => game.cash_out(),
        }
    }

    pub fn render(&self) -> BoardView {
        match self {
            Self::Mines(game) => game.render(),
            Self::Towers(game) => game.render(),
        }
    }

    pub fn status(&self) -> GameStatus {
        match self {
            Self::Mines(game) => game.status(),
            Self::Towers(game) => game.status(),
        }
    }

    /// Snapshot for the presentation adapter.
    pub fn view(&self, key: SessionKey) -> GameView {
        GameView {
            key,
            game_type: self.game_type(),
            bet: self.bet(),
            board: self.render(),
            status: self.status(),
        }
    }
}
