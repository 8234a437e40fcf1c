//! Game tuning
//!
//! Defaults come from `consts`; an optional JSON override is read from the
//! local key-value store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::platform::KeyValueStore;

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} ({value}) does not fit in the field width ({width})")]
    WiderThanField {
        name: &'static str,
        value: f32,
        width: f32,
    },
    #[error("paddle height ({paddle}) must be less than field height ({field})")]
    PaddleTooTall { paddle: f32, field: f32 },
}

/// Play field, paddle and object tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub object_size: f32,
    /// World units per tick
    pub fall_speed: f32,
    pub spawn_interval_ms: f64,
    /// Send the final score to the score API on game over
    pub submit_scores: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            object_size: OBJECT_SIZE,
            fall_speed: OBJECT_FALL_SPEED,
            spawn_interval_ms: OBJECT_SPAWN_INTERVAL_MS,
            submit_scores: true,
        }
    }
}

impl GameConfig {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "fallingObjectsConfig";

    /// Y coordinate of the paddle's top edge
    pub fn paddle_top(&self) -> f32 {
        self.height - self.paddle_height
    }

    /// Largest x a paddle may take
    pub fn max_paddle_x(&self) -> f32 {
        self.width - self.paddle_width
    }

    /// Paddle x centred in the field
    pub fn centered_paddle_x(&self) -> f32 {
        self.width / 2.0 - self.paddle_width / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("width", self.width as f64),
            ("height", self.height as f64),
            ("paddle_width", self.paddle_width as f64),
            ("paddle_height", self.paddle_height as f64),
            ("object_size", self.object_size as f64),
            ("fall_speed", self.fall_speed as f64),
            ("spawn_interval_ms", self.spawn_interval_ms),
        ];
        for (name, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("paddle_width", self.paddle_width),
            ("object_size", self.object_size),
        ] {
            if value > self.width {
                return Err(ConfigError::WiderThanField {
                    name,
                    value,
                    width: self.width,
                });
            }
        }
        if self.paddle_height >= self.height {
            return Err(ConfigError::PaddleTooTall {
                paddle: self.paddle_height,
                field: self.height,
            });
        }
        Ok(())
    }

    /// Load tuning from the store, falling back to defaults on missing,
    /// unparsable or invalid data
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("Using default game config");
            return Self::default();
        };

        match serde_json::from_str::<GameConfig>(&json) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    log::info!("Loaded game config from storage");
                    config
                }
                Err(e) => {
                    log::warn!("Stored game config rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Stored game config unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }
}
