//! Score API wire types and validation shared by the client and the server

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_PLAYER_NAME_LEN;

/// Malformed submission input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Player name and score are required.")]
    MissingField,
    #[error("Player name cannot be empty.")]
    EmptyName,
    #[error("Player name cannot be longer than {max} characters.")]
    NameTooLong { max: usize },
    #[error("Score must be a non-negative whole number.")]
    InvalidScore,
    #[error("Score is too large to store.")]
    ScoreOutOfRange,
}

/// A trimmed, non-empty player name of bounded length
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if trimmed.chars().count() > MAX_PLAYER_NAME_LEN {
            return Err(ValidationError::NameTooLong {
                max: MAX_PLAYER_NAME_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a score fits the store's integer column
pub fn validate_score(score: i64) -> Result<i32, ValidationError> {
    if score < 0 {
        return Err(ValidationError::InvalidScore);
    }
    i32::try_from(score).map_err(|_| ValidationError::ScoreOutOfRange)
}

/// Body of `POST /api/save-score`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: PlayerName,
    pub score: i32,
}

impl ScoreSubmission {
    pub fn new(player_name: &str, score: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            player_name: PlayerName::parse(player_name)?,
            score: validate_score(i64::from(score))?,
        })
    }
}

/// A persisted `player_score` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i32,
    pub player_name: String,
    pub score: i32,
}

/// `201` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveScoreResponse {
    pub message: String,
    pub data: StoredRecord,
}

/// `4xx`/`5xx` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
