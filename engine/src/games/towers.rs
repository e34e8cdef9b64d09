//! Towers: climb a 5-floor tower from the bottom row up.
//!
//! Each floor holds `columns` tiles with exactly `bombs` hazards shuffled
//! independently per row. Only the current floor accepts reveals; a safe
//! pick multiplies the payout by the difficulty's per-floor factor and moves
//! play one floor up. Clearing the top floor leaves the game active: the
//! player still has to cash out, and any further reveal fails with
//! `WrongFloor`.

use super::{GameRng, RevealOutcome};
use pitboss_types::casino::TOWER_FLOORS;
use pitboss_types::{BoardView, Difficulty, GameError, GameStatus, TileView};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
pub struct TowersGame {
    bet: u64,
    difficulty: Difficulty,
    /// Row-major hazard flags, `TOWER_FLOORS * columns` entries. Row index
    /// `TOWER_FLOORS - 1` is the bottom floor where play starts.
    board: Vec<bool>,
    /// Currently playable row; `None` once the tower is fully cleared.
    floor: Option<u8>,
    revealed: BTreeSet<u8>,
    multiplier: f64,
    game_over: bool,
    paid: Option<u64>,
}

impl TowersGame {
    pub fn new(bet: u64, difficulty: Difficulty, rng: &mut GameRng) -> Result<Self, GameError> {
        Self::validate(bet)?;

        let params = difficulty.params();
        let columns = params.columns as usize;
        let mut board = Vec::with_capacity(TOWER_FLOORS as usize * columns);
        for _ in 0..TOWER_FLOORS {
            let mut row = vec![false; columns];
            for flag in row.iter_mut().take(params.bombs as usize) {
                *flag = true;
            }
            rng.shuffle(&mut row);
            board.extend(row);
        }

        Ok(Self {
            bet,
            difficulty,
            board,
            floor: Some(TOWER_FLOORS - 1),
            revealed: BTreeSet::new(),
            multiplier: 1.0,
            game_over: false,
            paid: None,
        })
    }

    pub fn validate(bet: u64) -> Result<(), GameError> {
        if bet == 0 {
            return Err(GameError::InvalidParameter("bet must be positive"));
        }
        Ok(())
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over
    }

    fn columns(&self) -> u8 {
        self.difficulty.params().columns
    }

    /// Cash-out value at the current position.
    pub fn winnings(&self) -> u64 {
        (self.bet as f64 * self.multiplier).floor() as u64
    }

    pub fn reveal(&mut self, tile: u8) -> Result<RevealOutcome, GameError> {
        if tile as usize >= self.board.len() {
            return Err(GameError::InvalidParameter("tile index out of range"));
        }
        if self.game_over {
            return Err(GameError::GameAlreadyOver);
        }
        // Bottom-up traversal: only the current floor is playable. A fully
        // cleared tower has no playable floor left.
        let row = tile / self.columns();
        if self.floor != Some(row) {
            return Err(GameError::WrongFloor);
        }

        self.revealed.insert(tile);
        if self.board[tile as usize] {
            self.game_over = true;
            return Ok(RevealOutcome::Hazard);
        }

        self.multiplier *= self.difficulty.params().multiplier_per_floor;
        self.floor = row.checked_sub(1);
        Ok(RevealOutcome::Safe {
            multiplier: self.multiplier,
            winnings: self.winnings(),
        })
    }

    /// End the game and return the amount the service must credit. Unlike
    /// Mines, an untouched tower can cash out (returns the bet at x1.0).
    pub fn cash_out(&mut self) -> Result<u64, GameError> {
        if self.game_over {
            return Err(GameError::GameAlreadyOver);
        }
        let winnings = self.winnings();
        self.paid = Some(winnings);
        self.game_over = true;
        Ok(winnings)
    }

    /// Floors below the current one are resolved and fully disclosed, as is
    /// the whole board once the game ends.
    pub fn render(&self) -> BoardView {
        let columns = self.columns();
        let tiles = (0..self.board.len())
            .map(|index| {
                let row = index as u8 / columns;
                let resolved = match self.floor {
                    _ if self.game_over => true,
                    Some(floor) => row > floor,
                    None => true,
                };
                let disclosed = resolved || self.revealed.contains(&(index as u8));
                match (disclosed, self.board[index]) {
                    (false, _) => TileView::Hidden,
                    (true, true) => TileView::Hazard,
                    (true, false) => TileView::Safe,
                }
            })
            .collect();
        BoardView { columns, tiles }
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
            multiplier: self.multiplier,
        }
    }

    pub(crate) fn current_floor(&self) -> Option<u8> {
        self.floor
    }

    /// Tiles of `row` split into (safe, bombs).
    pub(crate) fn row_tiles(&self, row: u8) -> (Vec<u8>, Vec<u8>) {
        let columns = self.columns();
        let start = row * columns;
        let (mut safe, mut bombs) = (Vec::new(), Vec::new());
        for tile in start..start + columns {
            if self.board[tile as usize] {
                bombs.push(tile);
            } else {
                safe.push(tile);
            }
        }
        (safe, bombs)
    }
}
