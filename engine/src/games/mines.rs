//! Mines: a 5x5 board with a configurable number of hidden mines.
//!
//! Every safe reveal multiplies the payout by the running hypergeometric
//! odds of the reveal sequence so far, scaled by a per-mine house edge:
//!
//! ```text
//! multiplier(k) = prod_{i=0}^{k-1} (25 - i) / (25 - mines - i) * (1 - 0.03 * mines)
//! ```
//!
//! The formula is the game's economics; do not approximate it.

use super::{GameRng, RevealOutcome};
use pitboss_types::casino::{
    MINES_BOARD_COLUMNS, MINES_BOARD_TILES, MINES_HOUSE_EDGE_PER_MINE, MINES_MAX_COUNT,
    MINES_MIN_COUNT,
};
use pitboss_types::{BoardView, GameError, GameStatus, TileView};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
pub struct MinesGame {
    bet: u64,
    mine_count: u8,
    /// Hazard flags, fixed at creation.
    board: [bool; MINES_BOARD_TILES],
    /// Indices the player disclosed, including a terminal mine hit.
    revealed: BTreeSet<u8>,
    game_over: bool,
    /// Amount credited by a successful cash-out.
    paid: Option<u64>,
}

impl MinesGame {
    /// Build a fresh board. Validation only; the caller debits the bet
    /// before constructing.
    pub fn new(bet: u64, mine_count: u8, rng: &mut GameRng) -> Result<Self, GameError> {
        Self::validate(bet, mine_count)?;

        let mut board = [false; MINES_BOARD_TILES];
        for flag in board.iter_mut().take(mine_count as usize) {
            *flag = true;
        }
        rng.shuffle(&mut board);

        Ok(Self {
            bet,
            mine_count,
            board,
            revealed: BTreeSet::new(),
            game_over: false,
            paid: None,
        })
    }

    /// Parameter checks shared with the service layer, run before any
    /// ledger mutation.
    pub fn validate(bet: u64, mine_count: u8) -> Result<(), GameError> {
        if bet == 0 {
            return Err(GameError::InvalidParameter("bet must be positive"));
        }
        if !(MINES_MIN_COUNT..=MINES_MAX_COUNT).contains(&mine_count) {
            return Err(GameError::InvalidParameter("mine count must be 1..=24"));
        }
        Ok(())
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn mine_count(&self) -> u8 {
        self.mine_count
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over
    }

    fn safe_reveals(&self) -> usize {
        self.revealed
            .iter()
            .filter(|tile| !self.board[**tile as usize])
            .count()
    }

    /// Current payout factor for the safe reveals made so far.
    pub fn multiplier(&self) -> f64 {
        let mines = self.mine_count as usize;
        let mut multiplier = 1.0 - MINES_HOUSE_EDGE_PER_MINE * self.mine_count as f64;
        for i in 0..self.safe_reveals() {
            multiplier *= (MINES_BOARD_TILES - i) as f64 / (MINES_BOARD_TILES - mines - i) as f64;
        }
        multiplier
    }

    /// Cash-out value at the current position.
    pub fn winnings(&self) -> u64 {
        (self.bet as f64 * self.multiplier()).floor() as u64
    }

    pub fn reveal(&mut self, tile: u8) -> Result<RevealOutcome, GameError> {
        if tile as usize >= MINES_BOARD_TILES {
            return Err(GameError::InvalidParameter("tile index out of range"));
        }
        if self.game_over {
            return Err(GameError::GameAlreadyOver);
        }
        if self.revealed.contains(&tile) {
            return Err(GameError::AlreadyRevealed);
        }

        self.revealed.insert(tile);
        if self.board[tile as usize] {
            // Bet was debited at creation; a mine forfeits it outright.
            self.game_over = true;
            return Ok(RevealOutcome::Hazard);
        }

        Ok(RevealOutcome::Safe {
            multiplier: self.multiplier(),
            winnings: self.winnings(),
        })
    }

    /// End the game and return the amount the service must credit.
    /// Requires at least one safe reveal; an untouched board cannot be
    /// cashed out.
    pub fn cash_out(&mut self) -> Result<u64, GameError> {
        if self.game_over {
            return Err(GameError::GameAlreadyOver);
        }
        if self.safe_reveals() == 0 {
            return Err(GameError::InvalidParameter(
                "reveal at least one tile before cashing out",
            ));
        }
        let winnings = self.winnings();
        self.paid = Some(winnings);
        self.game_over = true;
        Ok(winnings)
    }

    /// Terminal boards disclose everything; active boards show only what
    /// the player has revealed.
    pub fn render(&self) -> BoardView {
        let tiles = (0..MINES_BOARD_TILES)
            .map(|index| {
                let disclosed = self.game_over || self.revealed.contains(&(index as u8));
                match (disclosed, self.board[index]) {
                    (false, _) => TileView::Hidden,
                    (true, true) => TileView::Hazard,
                    (true, false) => TileView::Safe,
                }
            })
            .collect();
        BoardView {
            columns: MINES_BOARD_COLUMNS,
            tiles,
        }
    }

    pub fn status(&self) -> GameStatus {
        let winnings = match self.paid {
            Some(paid) => paid,
            None if self.game_over => 0,
            None => self.winnings(),
        };
        GameStatus {
            game_over: self.game_over,
            winnings,
            multiplier: self.multiplier(),
        }
    }

    pub(crate) fn hazard_tiles(&self) -> Vec<u8> {
        (0..MINES_BOARD_TILES as u8)
            .filter(|tile| self.board[*tile as usize])
            .collect()
    }

    pub(crate) fn safe_tiles(&self) -> Vec<u8> {
        (0..MINES_BOARD_TILES as u8)
            .filter(|tile| !self.board[*tile as usize])
            .collect()
    }
}
