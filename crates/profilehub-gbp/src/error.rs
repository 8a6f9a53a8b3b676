use serde::Serialize;
use thiserror::Error;

/// Errors returned by the business-profile client, resolver and aggregator.
#[derive(Debug, Error)]
pub enum GbpError {
    /// No credential, an empty token, or an expired one. Raised before any
    /// upstream call is attempted.
    #[error("unauthorized: {0}")]
    Auth(String),

    /// A list endpoint returned no entry to resolve an identifier from.
    #[error("not found: {0}")]
    NotFound(String),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },

    /// Network, DNS, TLS or transport-timeout failure from `reqwest`.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request deadline expired while `stage` was still pending.
    #[error("deadline exceeded during {stage}")]
    Cancelled { stage: &'static str },

    /// A 2xx response whose body does not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GbpError {
    /// Short machine-readable class used in error maps and API envelopes.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GbpError::Auth(_) => "auth",
            GbpError::NotFound(_) => "not_found",
            GbpError::Upstream { .. } => "upstream",
            GbpError::Transport(e) if e.is_timeout() => "timeout",
            GbpError::Transport(_) => "transport",
            GbpError::Cancelled { .. } => "timeout",
            GbpError::Decode { .. } => "decode",
            GbpError::InvalidBaseUrl { .. } => "config",
        }
    }

    /// Upstream HTTP status, when the failure carried one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GbpError::Upstream { status, .. } => Some(*status),
            GbpError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Serializable description of one failed fan-out source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl From<&GbpError> for ErrorDetail {
    fn from(err: &GbpError) -> Self {
        let body = match err {
            GbpError::Upstream { body, .. } if !body.is_null() => Some(body.clone()),
            _ => None,
        };
        Self {
            kind: err.kind().to_string(),
            status: err.status(),
            message: err.to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_detail_keeps_status_and_body() {
        let err = GbpError::Upstream {
            status: 500,
            body: serde_json::json!({"error": {"message": "backend"}}),
        };
        let detail = ErrorDetail::from(&err);
        assert_eq!(detail.kind, "upstream");
        assert_eq!(detail.status, Some(500));
        assert_eq!(detail.body.unwrap()["error"]["message"], "backend");
    }

    #[test]
    fn cancelled_is_timeout_class() {
        let err = GbpError::Cancelled { stage: "photos" };
        let detail = ErrorDetail::from(&err);
        assert_eq!(detail.kind, "timeout");
        assert_eq!(detail.status, None);
        assert!(detail.message.contains("photos"));
    }

    #[test]
    fn null_upstream_body_is_omitted() {
        let err = GbpError::Upstream {
            status: 404,
            body: serde_json::Value::Null,
        };
        let json = serde_json::to_value(ErrorDetail::from(&err)).expect("serialize");
        assert!(json.get("body").is_none());
        assert_eq!(json["status"], 404);
    }
}
