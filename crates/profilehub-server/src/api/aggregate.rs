use axum::{
    extract::{Query, State},
    Extension, Json,
};
use profilehub_gbp::{AggregationResult, Credential, EndpointClass, Hints};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{cache_key, map_gbp_error, ApiError, AppState, ResponseMeta};

pub(super) const DYNAMIC_SOURCE: &str = "Dynamic Aggregated Data (v1 + v4)";
pub(super) const CACHED_SOURCE: &str = "Cached Aggregated Data";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocationQuery {
    pub account_id: Option<String>,
    pub location_id: Option<String>,
}

impl LocationQuery {
    pub(super) fn hints(&self) -> Hints {
        Hints {
            account_id: self.account_id.clone(),
            location_id: self.location_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SingleLocationData {
    pub success: bool,
    pub source: &'static str,
    #[serde(flatten)]
    pub result: AggregationResult,
    pub meta: ResponseMeta,
}

/// Resolves the account and location (unless given), fans out to every
/// source and returns the merged view. Partial failures stay a 200 with the
/// failed sources listed under `errors`.
pub(super) async fn single_location_data(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(credential): Extension<Credential>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<SingleLocationData>, ApiError> {
    let key = cache_key(
        EndpointClass::Aggregate,
        &credential,
        &[query.account_id.as_deref(), query.location_id.as_deref()],
    );

    if let Some(result) = state.aggregate_cache.get(&key) {
        tracing::debug!(location = %result.location.name, "aggregate cache hit");
        return Ok(Json(SingleLocationData {
            success: true,
            source: CACHED_SOURCE,
            result,
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let result = state
        .aggregator
        .run(&credential, &query.hints())
        .await
        .map_err(|e| map_gbp_error(req_id.0.clone(), &e))?;

    if result.is_complete() {
        state.aggregate_cache.insert(key, result.clone());
    } else {
        tracing::info!(
            location = %result.location.name,
            failed_sources = result.errors.len(),
            "partial aggregation, not cached"
        );
    }

    Ok(Json(SingleLocationData {
        success: true,
        source: DYNAMIC_SOURCE,
        result,
        meta: ResponseMeta::new(req_id.0),
    }))
}
