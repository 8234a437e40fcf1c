//! Client side of the score-saving API
//!
//! Validates locally, then posts `{playerName, score}` to the score store.
//! Uses `fetch` in the browser and a native HTTP stack elsewhere.

use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::api::{ErrorResponse, SaveScoreResponse, ScoreSubmission, StoredRecord, ValidationError};
use crate::consts::SAVE_SCORE_PATH;

/// Successful save, echoing the stored row
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub message: String,
    pub record: StoredRecord,
}

/// Why a score was not saved
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid score API base URL `{url}`: {reason}")]
    BadBaseUrl { url: String, reason: String },
    #[error("could not reach the score API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected response from the score API (HTTP {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },
    #[error("score API rejected the score (HTTP {status}): {error}")]
    Rejected {
        status: u16,
        error: String,
        details: Option<String>,
    },
}

/// How a feedback message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Failure,
}

/// A user-visible status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

impl Feedback {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Failure,
            text: text.into(),
        }
    }

    /// Message shown once a submission settles
    pub fn from_result(result: &Result<Confirmation, SubmissionError>) -> Self {
        match result {
            Ok(_) => Self::success("Score saved to database!"),
            Err(SubmissionError::Rejected { error, details, .. }) => Self::failure(format!(
                "Error saving score: {}",
                details.as_deref().unwrap_or(error)
            )),
            Err(SubmissionError::Validation(e)) => {
                Self::failure(format!("Error saving score: {}", e))
            }
            Err(_) => Self::failure("Network error. Could not save score."),
        }
    }
}

/// HTTP client for `POST /api/save-score`
#[derive(Debug, Clone)]
pub struct ScoreClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ScoreClient {
    /// Create a client for the API served at `base_url` (scheme and host)
    pub fn new(base_url: &str) -> Result<Self, SubmissionError> {
        let bad = |reason: String| SubmissionError::BadBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base = Url::parse(base_url).map_err(|e| bad(e.to_string()))?;
        let endpoint = base.join(SAVE_SCORE_PATH).map_err(|e| bad(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validate and send a final score
    pub async fn submit(
        &self,
        player_name: &str,
        score: u32,
    ) -> Result<Confirmation, SubmissionError> {
        let submission = ScoreSubmission::new(player_name, score)?;
        self.send(&submission).await
    }

    /// Send an already validated submission
    pub async fn send(&self, submission: &ScoreSubmission) -> Result<Confirmation, SubmissionError> {
        log::info!(
            "Submitting score {} for {}",
            submission.score,
            submission.player_name
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await
            .map_err(SubmissionError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(SubmissionError::Transport)?;
        let result = parse_response(status, &body);

        match &result {
            Ok(confirmation) => log::info!("Score saved: {}", confirmation.message),
            Err(e) => log::error!("Failed to save score: {}", e),
        }
        result
    }
}

/// Interpret a score API response body
fn parse_response(status: StatusCode, body: &str) -> Result<Confirmation, SubmissionError> {
    let malformed = |reason: String| SubmissionError::MalformedResponse {
        status: status.as_u16(),
        reason,
    };

    if status.is_success() {
        let saved: SaveScoreResponse =
            serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
        return Ok(Confirmation {
            message: saved.message,
            record: saved.data,
        });
    }

    let failure: ErrorResponse = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    Err(SubmissionError::Rejected {
        status: status.as_u16(),
        error: failure.error,
        details: failure.details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joined_to_base() {
        let client = ScoreClient::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:8080/api/save-score"
        );
        assert!(matches!(
            ScoreClient::new("not a url"),
            Err(SubmissionError::BadBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_name_rejected_before_network() {
        // Nothing listens on the discard port; any request would fail as Transport
        let client = ScoreClient::new("http://127.0.0.1:9").unwrap();
        let result = client.submit("  ", 5).await;
        assert!(matches!(
            result,
            Err(SubmissionError::Validation(ValidationError::EmptyName))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_score_rejected_before_network() {
        let client = ScoreClient::new("http://127.0.0.1:9").unwrap();
        let result = client.submit("Ada", u32::MAX).await;
        assert!(matches!(
            result,
            Err(SubmissionError::Validation(ValidationError::ScoreOutOfRange))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() {
        let client = ScoreClient::new("http://127.0.0.1:9").unwrap();
        let result = client.submit("Ada", 7).await;
        assert!(matches!(result, Err(SubmissionError::Transport(_))));
        assert_eq!(
            Feedback::from_result(&result).text,
            "Network error. Could not save score."
        );
    }

    #[test]
    fn test_parse_created() {
        let body = r#"{"message":"Score saved successfully!","data":{"id":3,"player_name":"Ada","score":7}}"#;
        let confirmation = parse_response(StatusCode::CREATED, body).unwrap();
        assert_eq!(confirmation.record.player_name, "Ada");
        assert_eq!(confirmation.record.score, 7);
        assert_eq!(
            Feedback::from_result(&Ok(confirmation)),
            Feedback::success("Score saved to database!")
        );
    }

    #[test]
    fn test_parse_store_failure() {
        let body = r#"{"error":"Failed to save score.","details":"connection refused"}"#;
        let result = parse_response(StatusCode::INTERNAL_SERVER_ERROR, body);
        match &result {
            Err(SubmissionError::Rejected { status, error, details }) => {
                assert_eq!(*status, 500);
                assert_eq!(error, "Failed to save score.");
                assert_eq!(details.as_deref(), Some("connection refused"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        let feedback = Feedback::from_result(&result);
        assert_eq!(feedback.kind, FeedbackKind::Failure);
        assert_eq!(feedback.text, "Error saving score: connection refused");
    }

    #[test]
    fn test_parse_validation_failure_uses_error() {
        let body = r#"{"error":"Player name cannot be empty."}"#;
        let result = parse_response(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            Feedback::from_result(&result).text,
            "Error saving score: Player name cannot be empty."
        );
    }

    #[test]
    fn test_parse_garbage() {
        let result = parse_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(
            result,
            Err(SubmissionError::MalformedResponse { status: 502, .. })
        ));
        assert_eq!(
            Feedback::from_result(&result).text,
            "Network error. Could not save score."
        );
    }
}
