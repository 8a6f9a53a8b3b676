mod accounts;
mod aggregate;
mod locations;
mod reviews;
mod search;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use profilehub_gbp::{
    AccountsPage, AggregationResult, Aggregator, CacheKey, Credential, EndpointClass, GbpError,
    ResponseCache,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_credential, RequestId, CREDENTIAL_EXPIRES_AT};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub accounts_cache: Arc<ResponseCache<AccountsPage>>,
    pub aggregate_cache: Arc<ResponseCache<AggregationResult>>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, cache_ttl: Duration) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            accounts_cache: Arc::new(ResponseCache::new(cache_ttl)),
            aggregate_cache: Arc::new(ResponseCache::new(cache_ttl)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let code = code.into();
        let status = match code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            "timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            error: ErrorBody {
                code,
                message: message.into(),
                details: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Maps a fatal core error onto the error envelope. Upstream failures keep
/// their HTTP status and carry the upstream body in `details`.
pub(super) fn map_gbp_error(request_id: String, error: &GbpError) -> ApiError {
    match error {
        GbpError::Auth(message) => ApiError::new(request_id, "unauthorized", message.clone()),
        GbpError::NotFound(message) => ApiError::new(request_id, "not_found", message.clone()),
        GbpError::Upstream { status, body } => {
            tracing::warn!(status, "upstream rejected request");
            let api_error = ApiError::new(request_id, "upstream_error", error.to_string())
                .with_status(StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY));
            if body.is_null() {
                api_error
            } else {
                api_error.with_details(body.clone())
            }
        }
        GbpError::Transport(_) | GbpError::Decode { .. } => {
            tracing::error!(error = %error, "upstream call failed");
            ApiError::new(request_id, "bad_gateway", error.to_string())
        }
        GbpError::Cancelled { .. } => ApiError::new(request_id, "timeout", error.to_string()),
        GbpError::InvalidBaseUrl { .. } => {
            tracing::error!(error = %error, "upstream client misconfigured");
            ApiError::new(request_id, "internal_error", "upstream client misconfigured")
        }
    }
}

/// Cache scope for one caller: the credential fingerprint plus whatever
/// request parameters shape the response.
pub(super) fn cache_key(
    class: EndpointClass,
    credential: &Credential,
    params: &[Option<&str>],
) -> CacheKey {
    let mut scope = credential.fingerprint();
    for param in params {
        scope.push('|');
        scope.push_str(param.filter(|p| !p.trim().is_empty()).unwrap_or_default());
    }
    CacheKey::new(class, scope)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static(CREDENTIAL_EXPIRES_AT),
        ])
}

fn business_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/business/single-location-data",
            get(aggregate::single_location_data),
        )
        .route("/api/v1/business/accounts", get(accounts::list_accounts))
        .route("/api/v1/business/locations", get(locations::list_locations))
        .route("/api/v1/business/reviews", get(reviews::list_reviews))
        .route(
            "/api/v1/business/search-location",
            post(search::search_location),
        )
        .layer(axum::middleware::from_fn(require_credential))
}

pub fn build_app(state: AppState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(business_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests;
