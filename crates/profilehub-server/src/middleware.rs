use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use profilehub_gbp::Credential;
use serde::Serialize;
use uuid::Uuid;

/// Header the auth collaborator uses to pass the token's expiry (RFC 3339).
pub const CREDENTIAL_EXPIRES_AT: &str = "x-credential-expires-at";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

fn unauthorized(message: &'static str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(MiddlewareErrorBody {
            error: MiddlewareError {
                code: "unauthorized",
                message,
            },
        }),
    )
        .into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware that turns the caller's bearer token into a [`Credential`]
/// request extension.
///
/// Rejects with 401 before any handler runs when the token is missing or
/// empty, the expiry header is malformed, or the expiry has passed.
pub async fn require_credential(mut req: Request, next: Next) -> Response {
    let Some(token) = extract_bearer_token(req.headers().get(AUTHORIZATION)) else {
        return unauthorized("missing or invalid bearer token");
    };

    let credential = match parse_expiry(req.headers().get(CREDENTIAL_EXPIRES_AT)) {
        Ok(Some(expires_at)) => Credential::new(token).with_expiry(expires_at),
        Ok(None) => Credential::new(token),
        Err(()) => return unauthorized("malformed credential expiry"),
    };

    if let Err(e) = credential.validate(Utc::now()) {
        tracing::debug!(error = %e, "rejecting request credential");
        return unauthorized("credential expired");
    }

    req.extensions_mut().insert(credential);
    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_expiry(value: Option<&HeaderValue>) -> Result<Option<DateTime<Utc>>, ()> {
    let Some(value) = value else {
        return Ok(None);
    };
    let raw = value.to_str().map_err(|_| ())?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| ())
}
