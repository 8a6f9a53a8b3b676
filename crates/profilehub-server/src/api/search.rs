use axum::{extract::State, Extension, Json};
use profilehub_gbp::{summarize_search, Credential, SearchMatch};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_gbp_error, ApiError, AppState, ResponseMeta};

const SEARCH_SOURCE: &str = "Google My Business Information API";

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchResults {
    pub success: bool,
    pub count: usize,
    pub google_locations: Vec<SearchMatch>,
    pub source: &'static str,
    pub meta: ResponseMeta,
}

pub(super) async fn search_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(credential): Extension<Credential>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResults>, ApiError> {
    let Some(query) = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
    else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "missing required field: query",
        ));
    };

    let response = state
        .aggregator
        .client()
        .search_google_locations(&credential, query)
        .await
        .map_err(|e| map_gbp_error(req_id.0.clone(), &e))?;

    let matches = summarize_search(response);
    if matches.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no locations found for this query",
        ));
    }

    tracing::debug!(query, count = matches.len(), "location search matched");
    Ok(Json(SearchResults {
        success: true,
        count: matches.len(),
        google_locations: matches,
        source: SEARCH_SOURCE,
        meta: ResponseMeta::new(req_id.0),
    }))
}
