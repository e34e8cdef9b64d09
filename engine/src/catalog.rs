//! Static catalog of the games the engine offers.
//!
//! The catalog is metadata only: display names, bet limits, and per-game
//! tuning constants. Game state lives in [`crate::games`]; the presentation
//! layer reads the catalog to build menus and validate bets before touching
//! the ledger.

use pitboss_types::casino::{
    MINES_HOUSE_EDGE_PER_MINE, MINES_MAX_COUNT, MINES_MIN_COUNT, ROULETTE_COEFFICIENTS,
    ROULETTE_MAX_BET, ROULETTE_MIN_BET, ROULETTE_WEIGHTS, TOWER_FLOORS,
};
use pitboss_types::{Difficulty, GameType};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinesConfig {
    pub min_mines: u8,
    pub max_mines: u8,
    pub house_edge_per_mine: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowersConfig {
    pub floors: u8,
    pub difficulties: [Difficulty; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouletteConfig {
    pub min_bet: u64,
    pub max_bet: u64,
    pub weights: [f64; 3],
    pub coefficients: [u64; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameConfig {
    Mines(MinesConfig),
    Towers(TowersConfig),
    Roulette(RouletteConfig),
}

/// Catalog entry for one game.
#[derive(Clone, Debug)]
pub struct GameInfo {
    pub game_type: GameType,
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the game holds a live session between actions. Roulette
    /// resolves in a single step and does not.
    pub session_based: bool,
    pub min_bet: u64,
    /// `None` means the player's balance is the only ceiling.
    pub max_bet: Option<u64>,
    pub config: GameConfig,
}

#[derive(Clone, Debug)]
pub struct GameCatalog {
    games: HashMap<GameType, GameInfo>,
}

impl GameCatalog {
    pub fn new() -> Self {
        let mut games = HashMap::new();

        games.insert(
            GameType::Mines,
            GameInfo {
                game_type: GameType::Mines,
                name: "Mines",
                description: "Reveal safe tiles on a 5x5 board and cash out before hitting a mine",
                session_based: true,
                min_bet: 1,
                max_bet: None,
                config: GameConfig::Mines(MinesConfig {
                    min_mines: MINES_MIN_COUNT,
                    max_mines: MINES_MAX_COUNT,
                    house_edge_per_mine: MINES_HOUSE_EDGE_PER_MINE,
                }),
            },
        );

        games.insert(
            GameType::Towers,
            GameInfo {
                game_type: GameType::Towers,
                name: "Towers",
                description: "Climb five floors, one safe tile per floor, cash out any time",
                session_based: true,
                min_bet: 1,
                max_bet: None,
                config: GameConfig::Towers(TowersConfig {
                    floors: TOWER_FLOORS,
                    difficulties: [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
                }),
            },
        );

        games.insert(
            GameType::Roulette,
            GameInfo {
                game_type: GameType::Roulette,
                name: "Roulette",
                description: "Bet on red, black, or yellow and watch the wheel spin",
                session_based: false,
                min_bet: ROULETTE_MIN_BET,
                max_bet: Some(ROULETTE_MAX_BET),
                config: GameConfig::Roulette(RouletteConfig {
                    min_bet: ROULETTE_MIN_BET,
                    max_bet: ROULETTE_MAX_BET,
                    weights: ROULETTE_WEIGHTS,
                    coefficients: ROULETTE_COEFFICIENTS,
                }),
            },
        );

        Self { games }
    }

    pub fn get(&self, game_type: GameType) -> Option<&GameInfo> {
        self.games.get(&game_type)
    }

    /// All entries, ordered by game type for stable menu rendering.
    pub fn list(&self) -> Vec<&GameInfo> {
        let mut infos: Vec<&GameInfo> = self.games.values().collect();
        infos.sort_by_key(|info| info.game_type as u8);
        infos
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_registers_all_games() {
        let catalog = GameCatalog::new();
        assert_eq!(catalog.len(), 3);
        for game_type in [GameType::Mines, GameType::Towers, GameType::Roulette] {
            let info = catalog.get(game_type).expect("registered");
            assert_eq!(info.game_type, game_type);
        }
    }

    #[test]
    fn list_is_ordered_by_game_type() {
        let catalog = GameCatalog::new();
        let types: Vec<GameType> = catalog.list().iter().map(|info| info.game_type).collect();
        assert_eq!(
            types,
            vec![GameType::Mines, GameType::Towers, GameType::Roulette]
        );
    }

    #[test]
    fn only_roulette_is_single_step() {
        let catalog = GameCatalog::new();
        for info in catalog.list() {
            let expected = info.game_type != GameType::Roulette;
            assert_eq!(info.session_based, expected, "{:?}", info.game_type);
        }
    }

    #[test]
    fn roulette_config_carries_table_limits() {
        let catalog = GameCatalog::new();
        let info = catalog.get(GameType::Roulette).expect("registered");
        assert_eq!(info.min_bet, ROULETTE_MIN_BET);
        assert_eq!(info.max_bet, Some(ROULETTE_MAX_BET));
        match info.config {
            GameConfig::Roulette(config) => {
                assert_eq!(config.min_bet, ROULETTE_MIN_BET);
                assert_eq!(config.max_bet, ROULETTE_MAX_BET);
                assert!((config.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            }
            _ => panic!("wrong config variant"),
        }
    }
}
