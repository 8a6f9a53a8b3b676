//! HTTP client for the business-profile API family.
//!
//! Wraps `reqwest` with bearer authentication, typed failures and JSON
//! decoding. Requests are never retried here; retry policy belongs to the
//! caller.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::credential::Credential;
use crate::endpoint::{BaseUrls, Endpoint, EndpointSpec};
use crate::error::GbpError;
use crate::resolver::AccountRef;
use crate::types::{AccountsPage, LocationsPage, SearchResponse};

/// Client for the account-management, business-information and v4 APIs.
///
/// Use [`GbpClient::new`] for production or [`GbpClient::with_base_urls`] to
/// point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct GbpClient {
    client: Client,
    base_urls: BaseUrls,
}

impl GbpClient {
    /// Creates a client pointed at the production APIs.
    ///
    /// # Errors
    ///
    /// Returns [`GbpError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GbpError> {
        Self::with_base_urls(timeout_secs, user_agent, &BaseUrls::production())
    }

    /// Creates a client with custom API roots.
    ///
    /// # Errors
    ///
    /// Returns [`GbpError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GbpError::InvalidBaseUrl`] if any root is
    /// not a valid URL.
    pub fn with_base_urls(
        timeout_secs: u64,
        user_agent: &str,
        base_urls: &BaseUrls,
    ) -> Result<Self, GbpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_urls: base_urls.normalised()?,
        })
    }

    /// Renders `endpoint` against this client's API roots.
    ///
    /// # Errors
    ///
    /// Returns [`GbpError::InvalidBaseUrl`] if the rendered URL is invalid.
    pub fn spec(&self, endpoint: &Endpoint<'_>) -> Result<EndpointSpec, GbpError> {
        endpoint.render(&self.base_urls)
    }

    /// Issues one authenticated request and returns the parsed JSON body.
    ///
    /// An empty 2xx body is returned as `{}`.
    ///
    /// # Errors
    ///
    /// - [`GbpError::Auth`] if the credential is empty or expired; no request
    ///   is sent.
    /// - [`GbpError::Upstream`] on a non-2xx status, carrying the upstream
    ///   body (JSON when it parses, otherwise the raw text).
    /// - [`GbpError::Transport`] on network, DNS, TLS or timeout failure.
    /// - [`GbpError::Decode`] if a 2xx body is not valid JSON.
    pub async fn call(
        &self,
        spec: &EndpointSpec,
        credential: &Credential,
    ) -> Result<serde_json::Value, GbpError> {
        credential.validate(Utc::now())?;

        let mut request = self
            .client
            .request(spec.method.clone(), spec.url.clone())
            .bearer_auth(credential.token());
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        tracing::debug!(endpoint = spec.label, method = %spec.method, url = %spec.url, "calling upstream");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                endpoint = spec.label,
                status = status.as_u16(),
                "upstream returned non-success status"
            );
            return Err(GbpError::Upstream {
                status: status.as_u16(),
                body: error_body(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }

        serde_json::from_str(&text).map_err(|e| GbpError::Decode {
            context: spec.url.to_string(),
            source: e,
        })
    }

    /// Renders, calls and deserializes `endpoint` into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`GbpClient::call`] returns, plus [`GbpError::Decode`] if the
    /// JSON does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint<'_>,
        credential: &Credential,
    ) -> Result<T, GbpError> {
        let spec = self.spec(endpoint)?;
        let value = self.call(&spec, credential).await?;
        serde_json::from_value(value).map_err(|e| GbpError::Decode {
            context: spec.label.to_string(),
            source: e,
        })
    }

    /// Lists the accounts visible to `credential`, in upstream order.
    ///
    /// # Errors
    ///
    /// See [`GbpClient::fetch`].
    pub async fn list_accounts(&self, credential: &Credential) -> Result<AccountsPage, GbpError> {
        self.fetch(&Endpoint::ListAccounts, credential).await
    }

    /// Lists the locations of `account`, in upstream order.
    ///
    /// # Errors
    ///
    /// See [`GbpClient::fetch`].
    pub async fn list_locations(
        &self,
        credential: &Credential,
        account: &AccountRef,
    ) -> Result<LocationsPage, GbpError> {
        self.fetch(&Endpoint::ListLocations { account }, credential)
            .await
    }

    /// Searches the public location index by free-text `query`.
    ///
    /// # Errors
    ///
    /// See [`GbpClient::fetch`].
    pub async fn search_google_locations(
        &self,
        credential: &Credential,
        query: &str,
    ) -> Result<SearchResponse, GbpError> {
        self.fetch(&Endpoint::SearchGoogleLocations { query }, credential)
            .await
    }
}

/// Upstream error bodies are JSON in practice; anything else is kept as text.
fn error_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
