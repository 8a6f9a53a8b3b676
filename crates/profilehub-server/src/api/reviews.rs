use axum::{
    extract::{Query, State},
    Extension, Json,
};
use profilehub_gbp::{
    normalize_reviews, types::ReviewsPage, Credential, Endpoint, GbpError, Review,
};
use serde::Serialize;
use tokio::time::Instant;

use crate::middleware::RequestId;

use super::{aggregate::LocationQuery, map_gbp_error, ApiError, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReviewList {
    pub success: bool,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    pub reviews: Vec<Review>,
    pub meta: ResponseMeta,
}

/// Reviews of one location, resolved the same way the aggregate route does.
/// Unlike the aggregate route a failing reviews call is fatal here.
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(credential): Extension<Credential>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ReviewList>, ApiError> {
    let aggregator = &state.aggregator;
    let deadline = Instant::now() + aggregator.settings().deadline;

    let ids = aggregator
        .resolve(&credential, &query.hints(), deadline)
        .await
        .map_err(|e| map_gbp_error(req_id.0.clone(), &e))?;
    let location = ids.location_name();
    let endpoint = Endpoint::Reviews {
        location: &location,
        page_size: aggregator.settings().reviews_page_size,
    };

    let page = tokio::time::timeout_at(
        deadline,
        aggregator
            .client()
            .fetch::<ReviewsPage>(&endpoint, &credential),
    )
    .await
    .unwrap_or_else(|_| Err(GbpError::Cancelled { stage: "reviews" }))
    .map_err(|e| map_gbp_error(req_id.0.clone(), &e))?;

    let average_rating = page.average_rating;
    let reviews = normalize_reviews(page);

    Ok(Json(ReviewList {
        success: true,
        total: reviews.len(),
        average_rating,
        reviews,
        meta: ResponseMeta::new(req_id.0),
    }))
}
