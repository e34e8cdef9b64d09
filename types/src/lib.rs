//! Shared types for the pitboss minigame engine.
//!
//! Everything the engine and its adapters need to agree on lives here:
//! session keys, game identifiers, player actions, rendered views, the
//! recoverable game error taxonomy, and the tunable constants.

pub mod casino;

pub use casino::{
    Action, BoardView, Difficulty, DifficultyParams, GameError, GameStatus, GameType, GameView,
    LeaderboardEntry, MessageId, Profile, RouletteColor, RouletteView, SessionKey, TileView,
    UserId,
};
