//! Three-color roulette: red, black, yellow.
//!
//! A spin is resolved in one step and never becomes a registry session. The
//! wheel is presented as a 24-symbol strip scrolled under a fixed pointer;
//! the symbol that ends up under the pointer is the result. Every slot of
//! the strip is drawn independently from the color weights, so the strip
//! itself is an honest sample of the wheel.

use super::GameRng;
use pitboss_types::casino::{
    ROULETTE_COEFFICIENTS, ROULETTE_MAX_BET, ROULETTE_MIN_BET, ROULETTE_POINTER_OFFSET,
    ROULETTE_RESULT_INDEX, ROULETTE_STRIP_LEN, ROULETTE_WEIGHTS, ROULETTE_WINDOW,
};
use pitboss_types::{GameError, RouletteColor, RouletteView};

const COLORS: [RouletteColor; 3] = [
    RouletteColor::Red,
    RouletteColor::Black,
    RouletteColor::Yellow,
];

/// A fully resolved spin.
#[derive(Clone, Debug)]
pub struct RouletteSpin {
    bet: u64,
    chosen: RouletteColor,
    strip: Vec<RouletteColor>,
}

impl RouletteSpin {
    pub fn new(bet: u64, chosen: RouletteColor, rng: &mut GameRng) -> Result<Self, GameError> {
        Self::validate(bet)?;

        let strip = (0..ROULETTE_STRIP_LEN)
            .map(|_| COLORS[rng.weighted_choice(&ROULETTE_WEIGHTS)])
            .collect();

        Ok(Self { bet, chosen, strip })
    }

    pub fn validate(bet: u64) -> Result<(), GameError> {
        if !(ROULETTE_MIN_BET..=ROULETTE_MAX_BET).contains(&bet) {
            return Err(GameError::InvalidParameter("bet must be 10..=1000"));
        }
        Ok(())
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn chosen(&self) -> RouletteColor {
        self.chosen
    }

    /// The symbol that ends under the pointer after the scroll.
    pub fn result(&self) -> RouletteColor {
        self.strip[ROULETTE_RESULT_INDEX]
    }

    pub fn won(&self) -> bool {
        self.result() == self.chosen
    }

    /// Total amount to credit on a win: bet times the color coefficient.
    /// Zero on a loss.
    pub fn payout(&self) -> u64 {
        if self.won() {
            self.bet * ROULETTE_COEFFICIENTS[self.chosen.index()]
        } else {
            0
        }
    }

    pub fn strip(&self) -> &[RouletteColor] {
        &self.strip
    }

    /// Animation frames: every window of [`ROULETTE_WINDOW`] symbols as the
    /// strip scrolls left. The last frame leaves the result under the
    /// pointer at [`ROULETTE_POINTER_OFFSET`].
    pub fn frames(&self) -> impl Iterator<Item = &[RouletteColor]> {
        self.strip.windows(ROULETTE_WINDOW)
    }

    pub fn final_frame(&self) -> &[RouletteColor] {
        &self.strip[ROULETTE_STRIP_LEN - ROULETTE_WINDOW..]
    }

    pub fn view(&self) -> RouletteView {
        RouletteView {
            bet: self.bet,
            chosen: self.chosen,
            result: self.result(),
            strip: self.strip.clone(),
            won: self.won(),
            payout: self.payout(),
        }
    }
}
