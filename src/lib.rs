//! Falling Catch - catch the falling objects with a paddle
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spawn, fall, catch, game over)
//! - `game_loop`: Frame-driven session driver with cancellable scheduling
//! - `highscores`: Local best score kept in a key-value store
//! - `submission`: Client side of the score-saving API
//! - `server`: Score store HTTP API (native only)
//! - `platform`: Browser/native platform abstraction

pub mod api;
pub mod game_loop;
pub mod highscores;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod settings;
pub mod sim;
pub mod submission;

pub use api::{PlayerName, ValidationError};
pub use game_loop::{FrameOutcome, FrameTicket, GameLoop, SessionSummary};
pub use highscores::HighScore;
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (world units)
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Paddle defaults - paddle sits on the bottom edge of the field
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;

    /// Falling objects are squares of this size
    pub const OBJECT_SIZE: f32 = 30.0;
    /// World units per tick (assumes ~60 fps)
    pub const OBJECT_FALL_SPEED: f32 = 4.0;
    /// Milliseconds between spawns
    pub const OBJECT_SPAWN_INTERVAL_MS: f64 = 500.0;

    /// Longest accepted player name (characters)
    pub const MAX_PLAYER_NAME_LEN: usize = 50;

    /// Score-saving endpoint path
    pub const SAVE_SCORE_PATH: &str = "/api/save-score";
}
