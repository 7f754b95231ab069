//! REST API endpoints for the thermolog-service.
//!
//! Every endpoint is a `GET` answered from the read-only store through
//! [`QueryService`](crate::query::QueryService).
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`], shaped as
//! `{"error": message, "code": CODE}`:
//!
//! | Failure | Status | Code |
//! |---|---|---|
//! | Missing or malformed parameter, unparseable query string | 400 | `VALIDATION_ERROR` |
//! | No data to answer from | 500 | `NOT_FOUND` |
//! | Store failure | 500 | `STORE_ERROR` |
//!
//! Store failures are logged in full and reported to the client with a
//! generic message.
//!
//! # Example
//!
//! ```ignore
//! use thermolog_service::api;
//!
//! let app = api::router().with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use thermolog_types::{
    AllData, ChartPayload, CurrentTemperature, TemperatureStats, ValidationError,
};
use time::OffsetDateTime;
use tracing::{debug, error};

use crate::query::QueryError;
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/getAllData", get(get_all_data))
        .route("/getCurrentTemperature", get(get_current_temperature))
        .route("/getTemperatureData", get(get_temperature_data))
        .route("/getPeriodTemperatureData", get(get_period_temperature_data))
        .route("/getStats", get(get_stats))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Full contents of the raw, hourly and daily series.
async fn get_all_data(State(state): State<Arc<AppState>>) -> Result<Json<AllData>, AppError> {
    Ok(Json(state.queries.all_data().await?))
}

/// Temperature of the newest reading.
async fn get_current_temperature(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CurrentTemperature>, AppError> {
    Ok(Json(state.queries.current_temperature().await?))
}

/// Query parameters for a single-day request.
///
/// Fields are optional so a missing parameter reaches validation and is
/// reported in the JSON error shape.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayQuery {
    /// Calendar day, `YYYY-MM-DD`.
    pub selected_date: Option<String>,
}

/// Readings of one calendar day.
///
/// # Errors
///
/// - Returns [`AppError::Validation`] if `selectedDate` is missing or malformed
/// - Returns [`AppError::Store`] if the database query fails
async fn get_temperature_data(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DayQuery>, QueryRejection>,
) -> Result<Json<ChartPayload>, AppError> {
    let Query(params) = params?;
    let payload = state
        .queries
        .temperature_data(params.selected_date.as_deref())
        .await?;
    Ok(Json(payload))
}

/// Query parameters for a period request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    /// Exclusive lower bound, `YYYY-MM-DDTHH:MM`.
    pub selected_start_date: Option<String>,
    /// Exclusive upper bound, `YYYY-MM-DDTHH:MM`.
    pub selected_end_date: Option<String>,
}

/// Readings strictly between two minutes.
///
/// An inverted period is answered with an empty payload.
async fn get_period_temperature_data(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<ChartPayload>, AppError> {
    let Query(params) = params?;
    let payload = state
        .queries
        .period_temperature_data(
            params.selected_start_date.as_deref(),
            params.selected_end_date.as_deref(),
        )
        .await?;
    Ok(Json(payload))
}

/// Summary of the last day of readings.
async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TemperatureStats>, AppError> {
    Ok(Json(state.queries.stats().await?))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    /// The query string could not be decoded (duplicate keys, bad encoding).
    InvalidQuery(QueryRejection),
    NotFound(String),
    Store(thermolog_store::Error),
}

impl AppError {
    /// Machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidQuery(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Validation(e) => AppError::Validation(e),
            QueryError::NotFound(msg) => AppError::NotFound(msg),
            QueryError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidQuery(rejection)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let code = self.code();
        let (status, message) = match self {
            AppError::Validation(e) => {
                debug!(field = e.field(), "rejected request: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::InvalidQuery(rejection) => {
                debug!("rejected query string: {}", rejection.body_text());
                (
                    StatusCode::BAD_REQUEST,
                    "query string could not be parsed".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Store(e) => {
                error!("store query failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to read temperature data".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use thermolog_store::Store;
    use thermolog_types::{DayBoundary, Series};
    use tower::ServiceExt;

    use crate::config::Config;

    fn create_test_state() -> Arc<AppState> {
        let store = Store::open_in_memory().unwrap();
        let config = Config::default();
        AppState::new(store, config)
    }

    fn create_seeded_state(day_boundary: DayBoundary) -> Arc<AppState> {
        let store = Store::open_in_memory().unwrap();
        store.insert(Series::All, "2024/01/04 23:59:59", 9.0).unwrap();
        store.insert(Series::All, "2024/01/05 00:00:00", 10.0).unwrap();
        store.insert(Series::All, "2024/01/05 12:00:00", 15.5).unwrap();
        store.insert(Series::All, "2024/01/06 00:00:00", 8.0).unwrap();
        store.insert(Series::Hourly, "2024/01/05 12:00:00", 15.5).unwrap();
        store.insert(Series::Daily, "2024/01/05 00:00:00", 12.75).unwrap();

        let mut config = Config::default();
        config.query.day_boundary = day_boundary;
        AppState::new(store, config)
    }

    async fn response_body(response: axum::response::Response) -> String {
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router().with_state(state);

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response_body(response).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, json) = get(create_test_state(), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_get_all_data() {
        let (status, json) = get(create_seeded_state(DayBoundary::FullDay), "/getAllData").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["temperature_all"].as_array().unwrap().len(), 4);
        assert_eq!(json["temperature_hour"].as_array().unwrap().len(), 1);
        assert_eq!(json["temperature_day"].as_array().unwrap().len(), 1);

        let first = &json["temperature_all"][0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["timestamp"], "2024/01/04 23:59:59");
        assert_eq!(first["temperature"], 9.0);
    }

    #[tokio::test]
    async fn test_get_all_data_empty() {
        let (status, json) = get(create_test_state(), "/getAllData").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["temperature_all"].as_array().unwrap().is_empty());
        assert!(json["temperature_hour"].as_array().unwrap().is_empty());
        assert!(json["temperature_day"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_current_temperature() {
        let (status, json) = get(
            create_seeded_state(DayBoundary::FullDay),
            "/getCurrentTemperature",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["currentTemperature"], 8.0);
    }

    #[tokio::test]
    async fn test_get_current_temperature_empty_store() {
        let (status, json) = get(create_test_state(), "/getCurrentTemperature").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_get_temperature_data_full_day() {
        let (status, json) = get(
            create_seeded_state(DayBoundary::FullDay),
            "/getTemperatureData?selectedDate=2024-01-05",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["temperatureData"].as_array().unwrap().len(), 2);
        assert_eq!(
            json["chartLabels"],
            serde_json::json!(["2024/01/05 00:00:00", "2024/01/05 12:00:00"])
        );
        assert_eq!(json["chartData"], serde_json::json!([10.0, 15.5]));
    }

    #[tokio::test]
    async fn test_get_temperature_data_reference_boundary() {
        let (status, json) = get(
            create_seeded_state(DayBoundary::Reference),
            "/getTemperatureData?selectedDate=2024-01-05",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["chartLabels"],
            serde_json::json!(["2024/01/05 12:00:00"])
        );
    }

    #[tokio::test]
    async fn test_get_temperature_data_missing_param() {
        let (status, json) = get(create_test_state(), "/getTemperatureData").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["error"].as_str().unwrap().contains("selectedDate"));
    }

    #[tokio::test]
    async fn test_get_temperature_data_malformed_param() {
        let (status, json) = get(
            create_seeded_state(DayBoundary::FullDay),
            "/getTemperatureData?selectedDate=2024-01-05%27%20OR%20%271%27%3D%271",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");

        let message = json["error"].as_str().unwrap();
        assert!(message.contains("YYYY-MM-DD"));
        assert!(!message.contains("OR"));
    }

    #[tokio::test]
    async fn test_get_temperature_data_duplicate_param() {
        let app = router().with_state(create_seeded_state(DayBoundary::FullDay));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/getTemperatureData?selectedDate=2024-01-05&selectedDate=2024-01-06")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(!json["error"].as_str().unwrap().contains("2024-01-06"));
    }

    #[tokio::test]
    async fn test_get_period_temperature_data_duplicate_param() {
        let (status, json) = get(
            create_test_state(),
            "/getPeriodTemperatureData?selectedStartDate=2024-01-05T00:00&selectedEndDate=2024-01-06T00:00&selectedEndDate=2024-01-07T00:00",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_period_temperature_data() {
        let (status, json) = get(
            create_seeded_state(DayBoundary::FullDay),
            "/getPeriodTemperatureData?selectedStartDate=2024-01-05T00:00&selectedEndDate=2024-01-06T00:00",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["chartData"], serde_json::json!([15.5]));
        assert_eq!(
            json["temperatureData"][0]["timestamp"],
            json["chartLabels"][0]
        );
    }

    #[tokio::test]
    async fn test_get_period_temperature_data_inverted() {
        let (status, json) = get(
            create_seeded_state(DayBoundary::FullDay),
            "/getPeriodTemperatureData?selectedStartDate=2024-01-06T00:00&selectedEndDate=2024-01-04T00:00",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["temperatureData"].as_array().unwrap().is_empty());
        assert!(json["chartLabels"].as_array().unwrap().is_empty());
        assert!(json["chartData"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_period_temperature_data_missing_end() {
        let (status, json) = get(
            create_test_state(),
            "/getPeriodTemperatureData?selectedStartDate=2024-01-05T00:00",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["error"].as_str().unwrap().contains("selectedEndDate"));
    }

    #[tokio::test]
    async fn test_get_period_temperature_data_wrong_shape() {
        let (status, json) = get(
            create_test_state(),
            "/getPeriodTemperatureData?selectedStartDate=2024-01-05&selectedEndDate=2024-01-06",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_stats() {
        let (status, json) = get(create_seeded_state(DayBoundary::FullDay), "/getStats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["since"], "2024/01/05 00:00:00");
        assert_eq!(json["count"], 2);
        assert_eq!(json["minTemperature"], 8.0);
        assert_eq!(json["maxTemperature"], 15.5);
    }

    #[tokio::test]
    async fn test_get_stats_empty_store() {
        let (status, json) = get(create_test_state(), "/getStats").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_store_error_is_generic() {
        let error = AppError::Store(thermolog_store::Error::MissingTable("temperature_all"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "STORE_ERROR");
        assert!(!json["error"].as_str().unwrap().contains("temperature_all"));
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok",
            version: "0.1.0",
            timestamp: time::OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
        assert!(json.contains("0.1.0"));
    }

    #[test]
    fn test_app_error_codes() {
        let validation = AppError::Validation(ValidationError::Missing {
            field: "selectedDate",
        });
        assert_eq!(validation.code(), "VALIDATION_ERROR");
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let not_found = AppError::NotFound("test".to_string());
        assert_eq!(not_found.code(), "NOT_FOUND");
        assert_eq!(
            not_found.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_from_query_error() {
        let error: AppError = QueryError::NotFound("nothing".into()).into();
        assert!(matches!(error, AppError::NotFound(ref m) if m == "nothing"));

        let error: AppError =
            QueryError::Store(thermolog_store::Error::MissingTable("temperature_hour")).into();
        assert!(matches!(error, AppError::Store(_)));
    }

    #[test]
    fn test_app_error_debug() {
        let error = AppError::NotFound("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("NotFound"));
        assert!(debug.contains("test"));
    }
}
