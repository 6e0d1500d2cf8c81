// Route exports
pub mod catalog;
pub mod matches;
pub mod messages;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{MatchingSettings, Settings};
use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{CacheManager, Catalog, CatalogError, RateLimiter};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cache: Arc<CacheManager>,
    pub limiter: Arc<RateLimiter>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

impl AppState {
    pub fn new(settings: &Settings, catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cache: Arc::new(CacheManager::new(
                settings.matching.cache_size,
                settings.matching.cache_ttl_secs,
            )),
            limiter: Arc::new(RateLimiter::new(
                settings.messages.rate_limit,
                Duration::from_secs(settings.messages.rate_window_secs),
            )),
            matcher: Matcher::new(settings.weights),
            matching: settings.matching.clone(),
        }
    }

    /// Requested match limit, defaulted and capped
    pub fn match_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.matching.default_limit)
            .min(self.matching.max_limit)
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(catalog::configure)
            .configure(messages::configure),
    );
}

/// JSON body for every non-2xx response
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string())
}

pub(crate) fn catalog_error(err: CatalogError) -> HttpResponse {
    match err {
        CatalogError::NotFound(what) => {
            error_response(StatusCode::NOT_FOUND, "Not found", format!("{} not found", what))
        }
        CatalogError::InvalidInput(message) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        other => {
            tracing::error!("Catalog failure: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", other.to_string())
        }
    }
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle malformed path parameters such as a non-UUID id
pub fn handle_path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Path error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    }
    .into()
}
