use thiserror::Error;

/// Recoverable game errors, surfaced to the presentation adapter.
///
/// Every variant maps to a message shown to the player; none is fatal to the
/// process. Creation is all-or-nothing: validation errors are raised before
/// any ledger mutation, and a failed debit aborts session construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Bad bet, difficulty, mine count, or tile index. Rejected before any
    /// ledger mutation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The bet exceeds the player's balance (or the player has no account).
    /// Checked before debit; no partial state is created.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// No live session under this key (stale or expired game message).
    #[error("game not found or expired")]
    SessionNotFound,

    /// The tile was already revealed.
    #[error("tile already revealed")]
    AlreadyRevealed,

    /// The tile is not on the currently playable floor.
    #[error("you can only reveal the current floor")]
    WrongFloor,

    /// The session already reached a terminal state.
    #[error("game is already over")]
    GameAlreadyOver,

    /// A session already exists under this key. Message identifiers are
    /// unique per chat, so hitting this indicates a transport-level bug.
    #[error("a game already exists for this message")]
    DuplicateSession,
}
