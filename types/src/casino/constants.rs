/// Number of tiles on a Mines board (5x5 grid).
pub const MINES_BOARD_TILES: usize = 25;

/// Columns in the Mines grid (display only; the board itself is flat).
pub const MINES_BOARD_COLUMNS: u8 = 5;

/// Minimum number of mines on a board.
pub const MINES_MIN_COUNT: u8 = 1;

/// Maximum number of mines on a board (at least one tile must be safe).
pub const MINES_MAX_COUNT: u8 = 24;

/// House edge applied to the Mines multiplier, per mine.
/// A board with `m` mines scales the fair odds by `1 - 0.03 * m`.
pub const MINES_HOUSE_EDGE_PER_MINE: f64 = 0.03;

/// Number of floors in a Towers game.
pub const TOWER_FLOORS: u8 = 5;

/// Length of the roulette animation strip.
pub const ROULETTE_STRIP_LEN: usize = 24;

/// Index into the strip of the payout-determining symbol.
pub const ROULETTE_RESULT_INDEX: usize = 19;

/// Symbols visible in one animation frame.
pub const ROULETTE_WINDOW: usize = 9;

/// Offset of the pointer within a frame. The final frame starts at
/// `ROULETTE_RESULT_INDEX - ROULETTE_POINTER_OFFSET`, so the authoritative
/// symbol always lands under the pointer.
pub const ROULETTE_POINTER_OFFSET: usize = 4;

/// Roulette bet limits.
pub const ROULETTE_MIN_BET: u64 = 10;
pub const ROULETTE_MAX_BET: u64 = 1_000;

/// Roulette color weights (red, black, yellow). Must sum to 1.
pub const ROULETTE_WEIGHTS: [f64; 3] = [0.45, 0.45, 0.10];

/// Roulette payout coefficients (red, black, yellow), applied to the bet.
pub const ROULETTE_COEFFICIENTS: [u64; 3] = [2, 2, 14];

/// Chips granted when a player account is first registered.
pub const STARTING_BALANCE: u64 = 1_000;

/// Default number of rows on the leaderboard.
pub const LEADERBOARD_LIMIT: usize = 10;
