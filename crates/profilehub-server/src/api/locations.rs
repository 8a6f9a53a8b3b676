use axum::{
    extract::{Query, State},
    Extension, Json,
};
use profilehub_gbp::{types::Location, AccountRef, Credential};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_gbp_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AccountQuery {
    pub account_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocationList {
    pub account: AccountRef,
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

pub(super) async fn list_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(credential): Extension<Credential>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<ApiResponse<LocationList>>, ApiError> {
    let client = state.aggregator.client();

    let account = profilehub_gbp::resolve_account(client, &credential, query.account_id.as_deref())
        .await
        .map_err(|e| map_gbp_error(req_id.0.clone(), &e))?;
    let page = client
        .list_locations(&credential, &account)
        .await
        .map_err(|e| map_gbp_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: LocationList {
            account,
            locations: page.locations,
            next_page_token: page.next_page_token,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
