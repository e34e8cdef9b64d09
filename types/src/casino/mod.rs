//! Casino domain types.
//!
//! Defines session/game/action/view types and constants used by the engine
//! and presentation adapters.

mod constants;
mod error;
mod session;
mod view;

pub use constants::*;
pub use error::*;
pub use session::*;
pub use view::*;
