//! Named upstream resources and the concrete requests they render to.

use reqwest::{Method, Url};

use crate::error::GbpError;
use crate::resolver::AccountRef;

const ACCOUNTS_BASE_URL: &str = "https://mybusinessaccountmanagement.googleapis.com/v1";
const BUSINESS_INFO_BASE_URL: &str = "https://mybusinessbusinessinformation.googleapis.com/v1";
const V4_BASE_URL: &str = "https://mybusiness.googleapis.com/v4";

const LIST_LOCATIONS_READ_MASK: &str = "name,title,storefrontAddress,latlng";
const LOCATION_DETAILS_READ_MASK: &str =
    "name,title,storefrontAddress,latlng,regularHours,primaryPhone";

/// Roots of the three upstream API families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrls {
    pub accounts: String,
    pub business_info: String,
    pub v4: String,
}

impl BaseUrls {
    #[must_use]
    pub fn production() -> Self {
        Self {
            accounts: ACCOUNTS_BASE_URL.to_string(),
            business_info: BUSINESS_INFO_BASE_URL.to_string(),
            v4: V4_BASE_URL.to_string(),
        }
    }

    /// Points every API family at the same root (for wiremock).
    #[must_use]
    pub fn single(base_url: &str) -> Self {
        Self {
            accounts: base_url.to_string(),
            business_info: base_url.to_string(),
            v4: base_url.to_string(),
        }
    }

    /// Trims trailing slashes and checks that each root parses as a URL.
    pub(crate) fn normalised(&self) -> Result<Self, GbpError> {
        let check = |raw: &str| -> Result<String, GbpError> {
            let trimmed = raw.trim_end_matches('/').to_string();
            Url::parse(&trimmed).map_err(|e| GbpError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
            Ok(trimmed)
        };
        Ok(Self {
            accounts: check(&self.accounts)?,
            business_info: check(&self.business_info)?,
            v4: check(&self.v4)?,
        })
    }
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self::production()
    }
}

/// Upstream resources the core knows how to call.
///
/// `location` fields hold a full resource name,
/// `accounts/{id}/locations/{id}`.
#[derive(Debug, Clone)]
pub enum Endpoint<'a> {
    ListAccounts,
    ListLocations {
        account: &'a AccountRef,
    },
    Reviews {
        location: &'a str,
        page_size: u32,
    },
    Media {
        location: &'a str,
    },
    GeneralAttributes {
        region_code: &'a str,
        language_code: &'a str,
    },
    CategoryAttributes {
        category: &'a str,
        region_code: &'a str,
        language_code: &'a str,
    },
    LocationDetails {
        location: &'a str,
    },
    SearchGoogleLocations {
        query: &'a str,
    },
}

impl Endpoint<'_> {
    /// Stable label used in logs and decode-error contexts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::ListAccounts => "list_accounts",
            Endpoint::ListLocations { .. } => "list_locations",
            Endpoint::Reviews { .. } => "reviews",
            Endpoint::Media { .. } => "media",
            Endpoint::GeneralAttributes { .. } => "general_attributes",
            Endpoint::CategoryAttributes { .. } => "category_attributes",
            Endpoint::LocationDetails { .. } => "location_details",
            Endpoint::SearchGoogleLocations { .. } => "search_google_locations",
        }
    }

    /// Renders the method, URL and optional JSON body for this resource.
    ///
    /// Identifiers are appended one path segment at a time, so reserved
    /// characters in a caller-supplied id (`?`, `#`, `%`) are percent-encoded
    /// instead of reshaping the request.
    ///
    /// # Errors
    ///
    /// Returns [`GbpError::InvalidBaseUrl`] if the API root cannot carry a
    /// path.
    pub fn render(&self, bases: &BaseUrls) -> Result<EndpointSpec, GbpError> {
        let (method, base, segments, query, body): (_, &str, Vec<&str>, Vec<(&str, &str)>, _) =
            match self {
                Endpoint::ListAccounts => (
                    Method::GET,
                    bases.accounts.as_str(),
                    vec!["accounts"],
                    vec![],
                    None,
                ),
                Endpoint::ListLocations { account } => (
                    Method::GET,
                    bases.business_info.as_str(),
                    resource_segments(account.as_str(), Some("locations")),
                    vec![("read_mask", LIST_LOCATIONS_READ_MASK)],
                    None,
                ),
                Endpoint::Reviews { location, .. } => (
                    Method::GET,
                    bases.v4.as_str(),
                    resource_segments(location, Some("reviews")),
                    vec![],
                    None,
                ),
                Endpoint::Media { location } => (
                    Method::GET,
                    bases.v4.as_str(),
                    resource_segments(location, Some("media")),
                    vec![],
                    None,
                ),
                Endpoint::GeneralAttributes {
                    region_code,
                    language_code,
                } => (
                    Method::GET,
                    bases.business_info.as_str(),
                    vec!["attributes"],
                    vec![("region_code", *region_code), ("language_code", *language_code)],
                    None,
                ),
                Endpoint::CategoryAttributes {
                    category,
                    region_code,
                    language_code,
                } => (
                    Method::GET,
                    bases.business_info.as_str(),
                    vec!["attributes"],
                    vec![
                        ("category_name", *category),
                        ("region_code", *region_code),
                        ("language_code", *language_code),
                    ],
                    None,
                ),
                Endpoint::LocationDetails { location } => (
                    Method::GET,
                    bases.business_info.as_str(),
                    resource_segments(location, None),
                    vec![("read_mask", LOCATION_DETAILS_READ_MASK)],
                    None,
                ),
                Endpoint::SearchGoogleLocations { query } => (
                    Method::POST,
                    bases.business_info.as_str(),
                    vec!["googleLocations:search"],
                    vec![],
                    Some(serde_json::json!({ "query": query })),
                ),
            };

        let invalid = |reason: String| GbpError::InvalidBaseUrl {
            url: base.to_string(),
            reason,
        };
        let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);

        // Built separately so the page size string outlives the borrow.
        let page_size;
        let mut query = query;
        if let Endpoint::Reviews { page_size: n, .. } = self {
            page_size = n.to_string();
            query.push(("pageSize", &page_size));
        }

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &query {
                pairs.append_pair(k, v);
            }
        }

        Ok(EndpointSpec {
            label: self.label(),
            method,
            url,
            body,
        })
    }
}

/// Splits a resource name such as `accounts/42/locations/99` into path
/// segments, optionally followed by a trailing collection name.
fn resource_segments<'a>(name: &'a str, tail: Option<&'a str>) -> Vec<&'a str> {
    name.split('/')
        .filter(|segment| !segment.is_empty())
        .chain(tail)
        .collect()
}

/// A fully rendered upstream request.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub label: &'static str,
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
}
