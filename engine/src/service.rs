//! Casino orchestrator.
//!
//! Ties the game models, the session registry, and the ledger together and
//! owns the ordering guarantees: every session creation is validate ->
//! debit -> insert, and settlement credits only after the session has gone
//! terminal. Domain failures travel in the inner `Result` so callers can
//! tell a losing move from a broken ledger.

use crate::catalog::GameCatalog;
use crate::games::{GameRng, GameSession, MinesGame, RouletteSpin, TowersGame};
use crate::ledger::{Ledger, LedgerError};
use crate::registry::SessionRegistry;
use anyhow::{anyhow, Context, Result};
use pitboss_types::casino::LEADERBOARD_LIMIT;
use pitboss_types::{
    Action, Difficulty, GameError, GameView, LeaderboardEntry, Profile, RouletteColor,
    RouletteView, SessionKey, UserId,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub struct Casino<L: Ledger> {
    ledger: L,
    registry: SessionRegistry,
    catalog: GameCatalog,
    /// When set, each game draws from `seed + n` for the n-th creation, so
    /// a whole run replays deterministically.
    seed: Option<u64>,
    games_created: AtomicU64,
}

impl<L: Ledger> Casino<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            registry: SessionRegistry::new(),
            catalog: GameCatalog::new(),
            seed: None,
            games_created: AtomicU64::new(0),
        }
    }

    /// Deterministic variant for tests and simulations.
    pub fn with_seed(ledger: L, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(ledger)
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    fn rng(&self) -> GameRng {
        let n = self.games_created.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => GameRng::from_seed(seed.wrapping_add(n)),
            None => GameRng::from_entropy(),
        }
    }

    /// Withdraw a bet, sorting ledger failures into the domain taxonomy.
    fn debit_bet(&self, user: UserId, bet: u64) -> Result<Result<(), GameError>> {
        match self.ledger.debit(user, bet) {
            Ok(_) => Ok(Ok(())),
            Err(LedgerError::InsufficientBalance { have, need }) => {
                debug!(user, have, need, "bet rejected, balance short");
                Ok(Err(GameError::InsufficientBalance))
            }
            Err(LedgerError::NotFound) => {
                Ok(Err(GameError::InvalidParameter("player is not registered")))
            }
            Err(err @ LedgerError::Storage(_)) => {
                Err(anyhow::Error::new(err).context("debit bet"))
            }
        }
    }

    // ---- player accounts ------------------------------------------------

    /// Idempotent account creation; first call grants the starting balance.
    pub fn register_player(&self, user: UserId, username: &str, name: &str) -> Result<u64> {
        let balance = self
            .ledger
            .register(user, username, name)
            .context("register player")?;
        debug!(user, username, balance, "player registered");
        Ok(balance)
    }

    pub fn profile(&self, user: UserId) -> Result<Profile> {
        self.ledger.profile(user).context("read profile")
    }

    pub fn balance(&self, user: UserId) -> Result<u64> {
        self.ledger.balance(user).context("read balance")
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.ledger
            .leaderboard(LEADERBOARD_LIMIT)
            .context("read leaderboard")
    }

    // ---- game creation ---------------------------------------------------

    pub fn start_mines(
        &self,
        key: SessionKey,
        bet: u64,
        mine_count: u8,
    ) -> Result<Result<GameView, GameError>> {
        // Parameters are checked before any chips move.
        if let Err(err) = MinesGame::validate(bet, mine_count) {
            return Ok(Err(err));
        }
        let slot = self.registry.create_with(key, || {
            if let Err(err) = self.debit_bet(key.user, bet)? {
                return Ok(Err(err));
            }
            let mut rng = self.rng();
            match MinesGame::new(bet, mine_count, &mut rng) {
                Ok(game) => Ok(Ok(GameSession::Mines(game))),
                Err(err) => {
                    self.ledger.credit(key.user, bet).context("refund bet")?;
                    Ok(Err(err))
                }
            }
        })?;
        match slot {
            Ok(slot) => {
                info!(%key, bet, mine_count, "mines game started");
                self.snapshot(key, &slot)
            }
            Err(err) => {
                warn!(%key, bet, %err, "mines game rejected");
                Ok(Err(err))
            }
        }
    }

    pub fn start_towers(
        &self,
        key: SessionKey,
        bet: u64,
        difficulty: Difficulty,
    ) -> Result<Result<GameView, GameError>> {
        if let Err(err) = TowersGame::validate(bet) {
            return Ok(Err(err));
        }
        let slot = self.registry.create_with(key, || {
            if let Err(err) = self.debit_bet(key.user, bet)? {
                return Ok(Err(err));
            }
            let mut rng = self.rng();
            match TowersGame::new(bet, difficulty, &mut rng) {
                Ok(game) => Ok(Ok(GameSession::Towers(game))),
                Err(err) => {
                    self.ledger.credit(key.user, bet).context("refund bet")?;
                    Ok(Err(err))
                }
            }
        })?;
        match slot {
            Ok(slot) => {
                info!(%key, bet, difficulty = difficulty.as_str(), "towers game started");
                self.snapshot(key, &slot)
            }
            Err(err) => {
                warn!(%key, bet, %err, "towers game rejected");
                Ok(Err(err))
            }
        }
    }

    /// Resolve a roulette spin in one step. No session is created; the bet
    /// is debited, the wheel spun, and any payout credited immediately.
    pub fn spin_roulette(
        &self,
        user: UserId,
        bet: u64,
        chosen: RouletteColor,
    ) -> Result<Result<RouletteView, GameError>> {
        if let Err(err) = RouletteSpin::validate(bet) {
            return Ok(Err(err));
        }
        if let Err(err) = self.debit_bet(user, bet)? {
            return Ok(Err(err));
        }
        let mut rng = self.rng();
        let spin = match RouletteSpin::new(bet, chosen, &mut rng) {
            Ok(spin) => spin,
            Err(err) => {
                self.ledger.credit(user, bet).context("refund bet")?;
                return Ok(Err(err));
            }
        };
        let payout = spin.payout();
        if payout > 0 {
            self.ledger.credit(user, payout).context("credit payout")?;
        }
        info!(
            user,
            bet,
            chosen = chosen.as_str(),
            result = spin.result().as_str(),
            payout,
            "roulette spin resolved"
        );
        Ok(Ok(spin.view()))
    }

    // ---- session actions -------------------------------------------------

    /// Apply a player action to the session behind `key`.
    ///
    /// Actions on the same key serialize on the session lock, so two
    /// concurrent reveals of the same tile resolve as one success and one
    /// `AlreadyRevealed`.
    pub fn apply(&self, key: SessionKey, action: Action) -> Result<Result<GameView, GameError>> {
        let Some(slot) = self.registry.get(key)? else {
            return Ok(Err(GameError::SessionNotFound));
        };
        match action {
            Action::Reveal(tile) => {
                let mut session = lock_session(&slot)?;
                match session.reveal(tile) {
                    Ok(outcome) => {
                        debug!(%key, tile, ?outcome, "tile revealed");
                        Ok(Ok(session.view(key)))
                    }
                    Err(err) => {
                        debug!(%key, tile, %err, "reveal rejected");
                        Ok(Err(err))
                    }
                }
            }
            Action::CashOut => {
                let mut session = lock_session(&slot)?;
                match session.cash_out() {
                    Ok(winnings) => {
                        // The session is terminal first; a crash between the
                        // two steps loses the payout, never duplicates it.
                        self.ledger
                            .credit(key.user, winnings)
                            .context("credit winnings")?;
                        info!(%key, winnings, "cashed out");
                        Ok(Ok(session.view(key)))
                    }
                    Err(err) => Ok(Err(err)),
                }
            }
            Action::NewGame => self.restart(key, &slot),
        }
    }

    /// Read-only snapshot of a live session.
    pub fn view(&self, key: SessionKey) -> Result<Result<GameView, GameError>> {
        let Some(slot) = self.registry.get(key)? else {
            return Ok(Err(GameError::SessionNotFound));
        };
        self.snapshot(key, &slot)
    }

    /// Abandon the current game and start a fresh one with the same
    /// parameters in the same slot. The old bet stays forfeit; the new bet
    /// is debited like any other creation.
    fn restart(
        &self,
        key: SessionKey,
        slot: &Arc<Mutex<GameSession>>,
    ) -> Result<Result<GameView, GameError>> {
        // Read the parameters, then release the session lock before taking
        // the map lock in replace_with.
        #[derive(Clone, Copy)]
        enum Params {
            Mines { bet: u64, mine_count: u8 },
            Towers { bet: u64, difficulty: Difficulty },
        }
        let params = {
            let session = lock_session(slot)?;
            match &*session {
                GameSession::Mines(game) => Params::Mines {
                    bet: game.bet(),
                    mine_count: game.mine_count(),
                },
                GameSession::Towers(game) => Params::Towers {
                    bet: game.bet(),
                    difficulty: game.difficulty(),
                },
            }
        };
        let replaced = self.registry.replace_with(key, || {
            let bet = match params {
                Params::Mines { bet, .. } | Params::Towers { bet, .. } => bet,
            };
            if let Err(err) = self.debit_bet(key.user, bet)? {
                return Ok(Err(err));
            }
            let mut rng = self.rng();
            let session = match params {
                Params::Mines { bet, mine_count } => {
                    MinesGame::new(bet, mine_count, &mut rng).map(GameSession::Mines)
                }
                Params::Towers { bet, difficulty } => {
                    TowersGame::new(bet, difficulty, &mut rng).map(GameSession::Towers)
                }
            };
            match session {
                Ok(session) => Ok(Ok(session)),
                Err(err) => {
                    self.ledger.credit(key.user, bet).context("refund bet")?;
                    Ok(Err(err))
                }
            }
        })?;
        match replaced {
            Ok(slot) => {
                info!(%key, "game restarted");
                self.snapshot(key, &slot)
            }
            Err(err) => {
                warn!(%key, %err, "restart rejected");
                Ok(Err(err))
            }
        }
    }

    fn snapshot(
        &self,
        key: SessionKey,
        slot: &Arc<Mutex<GameSession>>,
    ) -> Result<Result<GameView, GameError>> {
        let session = lock_session(slot)?;
        Ok(Ok(session.view(key)))
    }
}

fn lock_session(
    slot: &Arc<Mutex<GameSession>>,
) -> Result<std::sync::MutexGuard<'_, GameSession>> {
    slot.lock().map_err(|_| anyhow!("session poisoned"))
}
