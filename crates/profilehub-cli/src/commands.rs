//! Command handlers. Each returns the JSON document `main` prints.

use std::time::Duration;

use profilehub_core::AppConfig;
use profilehub_gbp::{
    resolve_account, summarize_search, Aggregator, AggregatorSettings, BaseUrls, Credential,
    GbpClient, GbpError, Hints,
};
use serde_json::{json, Value};

/// Builds the aggregation core from the same settings the server uses.
pub(crate) fn build_aggregator(config: &AppConfig) -> Result<Aggregator, GbpError> {
    let base_urls = BaseUrls {
        accounts: config.accounts_base_url.clone(),
        business_info: config.business_info_base_url.clone(),
        v4: config.v4_base_url.clone(),
    };
    let client = GbpClient::with_base_urls(
        config.upstream_timeout_secs,
        &config.user_agent,
        &base_urls,
    )?;
    Ok(Aggregator::new(
        client,
        AggregatorSettings {
            region_code: config.region_code.clone(),
            language_code: config.language_code.clone(),
            category_name: config.category_name.clone(),
            reviews_page_size: config.reviews_page_size,
            deadline: Duration::from_millis(config.request_deadline_ms),
        },
    ))
}

pub(crate) async fn accounts(
    aggregator: &Aggregator,
    credential: &Credential,
) -> anyhow::Result<Value> {
    let page = aggregator.client().list_accounts(credential).await?;
    Ok(serde_json::to_value(page)?)
}

pub(crate) async fn locations(
    aggregator: &Aggregator,
    credential: &Credential,
    account_id: Option<&str>,
) -> anyhow::Result<Value> {
    let client = aggregator.client();
    let account = resolve_account(client, credential, account_id).await?;
    let page = client.list_locations(credential, &account).await?;
    Ok(json!({
        "account": account,
        "locations": page.locations,
    }))
}

pub(crate) async fn aggregate(
    aggregator: &Aggregator,
    credential: &Credential,
    hints: Hints,
) -> anyhow::Result<Value> {
    let result = aggregator.run(credential, &hints).await?;
    if !result.is_complete() {
        let failed: Vec<&str> = result.errors.keys().map(String::as_str).collect();
        tracing::warn!(?failed, "some sources failed; output is partial");
    }
    Ok(serde_json::to_value(result)?)
}

pub(crate) async fn search(
    aggregator: &Aggregator,
    credential: &Credential,
    query: &str,
) -> anyhow::Result<Value> {
    let query = query.trim();
    anyhow::ensure!(!query.is_empty(), "search query must not be empty");

    let response = aggregator
        .client()
        .search_google_locations(credential, query)
        .await?;
    let matches = summarize_search(response);
    Ok(json!({
        "count": matches.len(),
        "googleLocations": matches,
    }))
}
