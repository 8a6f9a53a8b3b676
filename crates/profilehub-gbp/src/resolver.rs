//! Account and location identifier resolution.
//!
//! A non-empty hint is trusted and returned unchanged. Without a hint the
//! matching list endpoint is called and its first entry wins, in upstream
//! order. There is no ranking: a verified account listed second still loses
//! to whatever the upstream lists first.

use serde::Serialize;

use crate::client::GbpClient;
use crate::credential::Credential;
use crate::error::GbpError;

/// Account resource name, `accounts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountRef(String);

impl AccountRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location identifier: either `accounts/{id}/locations/{id}` or just the
/// trailing location id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LocationRef(String);

impl LocationRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing path segment, i.e. the bare location id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Full resource name under `account`, `{account}/locations/{id}`.
    ///
    /// Only the id is kept from a full resource name. An account prefix that
    /// differs from `account` is dropped.
    #[must_use]
    pub fn resource_name(&self, account: &AccountRef) -> String {
        if let Some((prefix, _)) = self.0.trim_end_matches('/').rsplit_once("/locations/") {
            if prefix != account.as_str() {
                tracing::debug!(
                    hint = %self.0,
                    %account,
                    "location hint names another account; using the resolved one"
                );
            }
        }
        format!("{}/locations/{}", account.as_str(), self.id())
    }
}

impl std::fmt::Display for LocationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiers fixed for the lifetime of one aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIds {
    pub account: AccountRef,
    pub location: LocationRef,
}

impl ResolvedIds {
    /// `accounts/{id}/locations/{id}`, the name every fan-out call uses.
    #[must_use]
    pub fn location_name(&self) -> String {
        self.location.resource_name(&self.account)
    }
}

/// A hint with any non-whitespace content is used as given.
fn non_empty(hint: Option<&str>) -> Option<&str> {
    hint.filter(|h| !h.trim().is_empty())
}

/// Returns `hint` when present, otherwise the first account the credential
/// can see.
///
/// # Errors
///
/// - [`GbpError::NotFound`] if the account list is empty or its first entry
///   has no name.
/// - Any client error from the list call.
pub async fn resolve_account(
    client: &GbpClient,
    credential: &Credential,
    hint: Option<&str>,
) -> Result<AccountRef, GbpError> {
    if let Some(hint) = non_empty(hint) {
        return Ok(AccountRef::new(hint));
    }

    let page = client.list_accounts(credential).await?;
    let first = page
        .accounts
        .into_iter()
        .next()
        .map(|a| a.name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GbpError::NotFound("no account available".to_string()))?;

    tracing::debug!(account = %first, "resolved default account");
    Ok(AccountRef::new(first))
}

/// Returns `hint` when present, otherwise the first location listed under
/// `account`.
///
/// # Errors
///
/// - [`GbpError::NotFound`] if the location list is empty or its first
///   entry has no name.
/// - Any client error from the list call.
pub async fn resolve_location(
    client: &GbpClient,
    credential: &Credential,
    account: &AccountRef,
    hint: Option<&str>,
) -> Result<LocationRef, GbpError> {
    if let Some(hint) = non_empty(hint) {
        return Ok(LocationRef::new(hint));
    }

    let page = client.list_locations(credential, account).await?;
    let first = page
        .locations
        .into_iter()
        .next()
        .map(|l| l.name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GbpError::NotFound("no location available".to_string()))?;

    tracing::debug!(%account, location = %first, "resolved default location");
    Ok(LocationRef::new(first))
}

/// Resolves the account, then the location under it. The two steps are
/// sequential because the location list is scoped to the account.
///
/// # Errors
///
/// Propagates the first failure of either step.
pub async fn resolve_ids(
    client: &GbpClient,
    credential: &Credential,
    account_hint: Option<&str>,
    location_hint: Option<&str>,
) -> Result<ResolvedIds, GbpError> {
    let account = resolve_account(client, credential, account_hint).await?;
    let location = resolve_location(client, credential, &account, location_hint).await?;
    Ok(ResolvedIds { account, location })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_id_takes_trailing_segment() {
        assert_eq!(LocationRef::new("accounts/42/locations/99").id(), "99");
        assert_eq!(LocationRef::new("99").id(), "99");
        assert_eq!(LocationRef::new("accounts/42/locations/99/").id(), "99");
    }

    #[test]
    fn resource_name_accepts_full_and_bare_forms() {
        let account = AccountRef::new("accounts/42");
        assert_eq!(
            LocationRef::new("accounts/42/locations/99").resource_name(&account),
            "accounts/42/locations/99"
        );
        assert_eq!(
            LocationRef::new("99").resource_name(&account),
            "accounts/42/locations/99"
        );
    }

    #[test]
    fn blank_hint_counts_as_absent() {
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn hint_with_content_is_returned_unchanged() {
        assert_eq!(non_empty(Some("accounts/1")), Some("accounts/1"));
        assert_eq!(non_empty(Some(" accounts/1 ")), Some(" accounts/1 "));
    }

    #[test]
    fn foreign_account_prefix_is_replaced_by_resolved_account() {
        let account = AccountRef::new("accounts/42");
        assert_eq!(
            LocationRef::new("accounts/7/locations/99").resource_name(&account),
            "accounts/42/locations/99"
        );
    }
}
