use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat user identifier.
pub type UserId = u64;

/// Identifier of the chat message hosting a game board.
pub type MessageId = u64;

/// Handle of one in-flight game: (user, game message).
///
/// Unique per live game and reused as the lookup key for every subsequent
/// action on that game instance. Not persisted; lost on process restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user: UserId,
    pub message: MessageId,
}

impl SessionKey {
    pub fn new(user: UserId, message: MessageId) -> Self {
        Self { user, message }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.user, self.message)
    }
}

/// Supported minigames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameType {
    Mines = 0,
    Towers = 1,
    Roulette = 2,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mines => "Mines",
            Self::Towers => "Towers",
            Self::Roulette => "Roulette",
        }
    }
}

/// A player action addressed to a live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Disclose a tile by its board index.
    Reveal(u8),
    /// Take the current winnings and end the game.
    CashOut,
    /// Abandon the current game and start a fresh one with the same
    /// parameters in the same message slot (re-debits the bet).
    NewGame,
}

/// Towers difficulty presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Per-floor parameters of a Towers difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyParams {
    pub columns: u8,
    pub bombs: u8,
    pub multiplier_per_floor: f64,
}

impl Difficulty {
    pub fn params(self) -> DifficultyParams {
        match self {
            Self::Easy => DifficultyParams {
                columns: 3,
                bombs: 1,
                multiplier_per_floor: 1.4,
            },
            Self::Medium => DifficultyParams {
                columns: 2,
                bombs: 1,
                multiplier_per_floor: 1.9,
            },
            Self::Hard => DifficultyParams {
                columns: 3,
                bombs: 2,
                multiplier_per_floor: 2.8,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Roulette colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RouletteColor {
    Red = 0,
    Black = 1,
    Yellow = 2,
}

impl RouletteColor {
    /// Index into the weight/coefficient tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Red => "\u{1F7E5}",
            Self::Black => "\u{2B1B}",
            Self::Yellow => "\u{1F7E8}",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
            Self::Yellow => "yellow",
        }
    }
}
