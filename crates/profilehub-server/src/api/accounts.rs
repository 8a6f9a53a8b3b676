use axum::{extract::State, Extension, Json};
use profilehub_gbp::{AccountsPage, Credential, EndpointClass};

use crate::middleware::RequestId;

use super::{cache_key, map_gbp_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_accounts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(credential): Extension<Credential>,
) -> Result<Json<ApiResponse<AccountsPage>>, ApiError> {
    let key = cache_key(EndpointClass::Accounts, &credential, &[]);

    let page = if let Some(page) = state.accounts_cache.get(&key) {
        tracing::debug!(accounts = page.accounts.len(), "accounts cache hit");
        page
    } else {
        let page = state
            .aggregator
            .client()
            .list_accounts(&credential)
            .await
            .map_err(|e| map_gbp_error(req_id.0.clone(), &e))?;
        state.accounts_cache.insert(key, page.clone());
        page
    };

    Ok(Json(ApiResponse {
        data: page,
        meta: ResponseMeta::new(req_id.0),
    }))
}
