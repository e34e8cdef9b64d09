use super::{GameType, RouletteColor, SessionKey};
use serde::{Deserialize, Serialize};

/// Display state of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Safe,
    Hazard,
}

/// Renderable board: a flat tile list plus the column count the adapter
/// should wrap at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub columns: u8,
    pub tiles: Vec<TileView>,
}

impl BoardView {
    /// Iterate the board row by row.
    pub fn rows(&self) -> impl Iterator<Item = &[TileView]> {
        self.tiles.chunks(self.columns as usize)
    }
}

/// Session status exposed to the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    /// Terminal sessions accept no further reveals or cash-outs.
    pub game_over: bool,
    /// Current cash-out value while active; amount paid after a cash-out;
    /// zero after a loss.
    pub winnings: u64,
    /// Payout factor backing `winnings`.
    pub multiplier: f64,
}

/// Rendered snapshot of one session, returned from every accepted action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub key: SessionKey,
    pub game_type: GameType,
    pub bet: u64,
    pub board: BoardView,
    pub status: GameStatus,
}

/// Rendered result of a roulette spin. Ephemeral: spins never enter the
/// session registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteView {
    pub bet: u64,
    pub chosen: RouletteColor,
    pub result: RouletteColor,
    /// Full animation strip; the symbol at the authoritative offset equals
    /// `result` by construction.
    pub strip: Vec<RouletteColor>,
    pub won: bool,
    /// Amount credited on a win (`bet x coefficient`), zero otherwise.
    pub payout: u64,
}

/// Player profile snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub name: String,
    pub balance: u64,
}

/// One leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub balance: u64,
}
