//! HTTP handlers for the score API

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::Value;

use super::store::ScoreStore;
use crate::api::{
    ErrorResponse, PlayerName, SaveScoreResponse, ValidationError, validate_score,
};
use crate::consts::SAVE_SCORE_PATH;

/// Largest accepted request body
const JSON_LIMIT_BYTES: usize = 4 * 1024;

// Request types

/// Loosely typed body so missing or mistyped fields map to 400s we control
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveScoreRequest {
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    score: Option<Value>,
}

impl SaveScoreRequest {
    fn validate(self) -> Result<(PlayerName, i32), ValidationError> {
        let (Some(raw_name), Some(Value::Number(number))) = (self.player_name, self.score) else {
            return Err(ValidationError::MissingField);
        };
        if raw_name.is_empty() {
            return Err(ValidationError::MissingField);
        }
        let name = PlayerName::parse(&raw_name)?;

        let score = if let Some(n) = number.as_i64() {
            validate_score(n)?
        } else if number.is_u64() {
            return Err(ValidationError::ScoreOutOfRange);
        } else {
            // Whole-valued floats such as 7.0 are accepted
            match number.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => {
                    if f < 0.0 {
                        return Err(ValidationError::InvalidScore);
                    }
                    if f > i32::MAX as f64 {
                        return Err(ValidationError::ScoreOutOfRange);
                    }
                    f as i32
                }
                _ => return Err(ValidationError::InvalidScore),
            }
        };

        Ok((name, score))
    }
}

/// Register the score API on an app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(json_error),
    )
    .route("/health", web::get().to(health))
    .route(SAVE_SCORE_PATH, web::post().to(save_score));
}

/// Unparsable bodies get the same `{error}` shape as validation failures
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected malformed score request: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: format!("Invalid request body: {}", err),
        details: None,
    });
    InternalError::from_response(err, response).into()
}

// API Handlers

/// POST /api/save-score
async fn save_score(
    store: web::Data<dyn ScoreStore>,
    body: web::Json<SaveScoreRequest>,
) -> HttpResponse {
    let (name, score) = match body.into_inner().validate() {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("Rejected score submission: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
                details: None,
            });
        }
    };

    match store.insert_score(name.as_str(), score).await {
        Ok(record) => {
            log::info!(
                "Saved score {} for {} (id {})",
                record.score,
                record.player_name,
                record.id
            );
            HttpResponse::Created().json(SaveScoreResponse {
                message: "Score saved successfully!".to_string(),
                data: record,
            })
        }
        Err(e) => {
            log::error!("Error saving score: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to save score.".to_string(),
                details: Some(e.to_string()),
            })
        }
    }
}

/// GET /health
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "falling-catch-score-api"
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use deadpool_postgres::PoolError;
    use serde_json::json;

    use super::*;
    use crate::api::StoredRecord;
    use crate::server::store::StoreError;

    /// Store that keeps rows in memory
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<StoredRecord>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ScoreStore for MemoryStore {
        async fn insert_score(
            &self,
            player_name: &str,
            score: i32,
        ) -> Result<StoredRecord, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let record = StoredRecord {
                id: rows.len() as i32 + 1,
                player_name: player_name.to_string(),
                score,
            };
            rows.push(record.clone());
            Ok(record)
        }
    }

    /// Store whose pool is gone
    struct ClosedStore;

    #[async_trait]
    impl ScoreStore for ClosedStore {
        async fn insert_score(&self, _: &str, _: i32) -> Result<StoredRecord, StoreError> {
            Err(StoreError::Pool(PoolError::Closed))
        }
    }

    async fn post(
        store: Arc<dyn ScoreStore>,
        body: Value,
    ) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/save-score")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_save_score_created() {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = post(store.clone(), json!({"playerName": "Ada", "score": 7})).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Score saved successfully!");
        assert_eq!(
            body["data"],
            json!({"id": 1, "player_name": "Ada", "score": 7})
        );
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_name_is_trimmed_before_insert() {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = post(store, json!({"playerName": "  Ada ", "score": 7.0})).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["player_name"], "Ada");
        assert_eq!(body["data"]["score"], 7);
    }

    #[actix_web::test]
    async fn test_invalid_submissions_never_reach_store() {
        let cases = [
            (json!({"score": 5}), "Player name and score are required."),
            (json!({"playerName": "", "score": 5}), "Player name and score are required."),
            (json!({"playerName": "Ada"}), "Player name and score are required."),
            (json!({"playerName": "Ada", "score": "5"}), "Player name and score are required."),
            (json!({"playerName": "   ", "score": 5}), "Player name cannot be empty."),
            (json!({"playerName": "Ada", "score": -1}), "Score must be a non-negative whole number."),
            (json!({"playerName": "Ada", "score": 1.5}), "Score must be a non-negative whole number."),
            (json!({"playerName": "Ada", "score": 3_000_000_000u64}), "Score is too large to store."),
        ];

        for (request, expected) in cases {
            let store = Arc::new(MemoryStore::default());
            let (status, body) = post(store.clone(), request.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "request {}", request);
            assert_eq!(body["error"], expected, "request {}", request);
            assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(
                    Arc::new(MemoryStore::default()) as Arc<dyn ScoreStore>
                ))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/save-score")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_store_failure_is_server_error() {
        let (status, body) =
            post(Arc::new(ClosedStore), json!({"playerName": "Ada", "score": 7})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save score.");
        assert!(body["details"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
