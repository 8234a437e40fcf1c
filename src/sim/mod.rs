//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per frame, driven by an external timestamp
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or network dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CatchResult, check_catch};
pub use rect::Rect;
pub use state::{FallingObject, GameEvent, GamePhase, GameState, Paddle};
pub use tick::tick;
