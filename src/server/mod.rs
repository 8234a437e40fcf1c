//! Score store HTTP API
//!
//! `POST /api/save-score` validates a submission and inserts it into the
//! `player_score` table through a pooled PostgreSQL connection.

pub mod config;
pub mod routes;
pub mod store;

pub use config::{ServerConfig, ServerConfigError};
pub use routes::configure;
pub use store::{PgScoreStore, ScoreStore, StoreError};
