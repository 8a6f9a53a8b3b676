//! Upstream response types.
//!
//! These model the JSON returned by the account-management, business
//! information and v4 APIs. Upstream payloads are frequently partial, so every
//! field that is not needed to make progress is optional or defaulted.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// `GET /accounts` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsPage {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Resource name, `accounts/{id}`.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vetted_state: Option<String>,
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// `GET /{account}/locations` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsPage {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u32>,
}

/// A location as returned by the list and detail endpoints.
///
/// `location_name` is the legacy v4 spelling of `title`; `primary_phone` is
/// read both at the top level and under `phone_numbers`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storefront_address: Option<PostalAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latlng: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_hours: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<PhoneNumbers>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(default)]
    pub region_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default)]
    pub address_lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumbers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_phones: Vec<String>,
}

// ---------------------------------------------------------------------------
// Reviews (v4)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsPage {
    #[serde(default)]
    pub reviews: Vec<RawReview>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub total_review_count: Option<u32>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub reviewer: Option<Reviewer>,
    /// Enum string: `ONE` .. `FIVE` or `STAR_RATING_UNSPECIFIED`.
    #[serde(default)]
    pub star_rating: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
}

// ---------------------------------------------------------------------------
// Media (v4)
// ---------------------------------------------------------------------------

/// Media items are passed through untouched, so they stay as raw JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPage {
    #[serde(default)]
    pub media_items: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_media_item_count: Option<u32>,
    #[serde(default)]
    pub location_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Attribute metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributesPage {
    #[serde(default)]
    pub attribute_metadata: Vec<AttributeMetadata>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Definition of one attribute a location may carry.
///
/// The business-information API names the identifier `parent`; older
/// payloads use `name`. When both are present `parent` wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", from = "WireAttributeMetadata")]
pub struct AttributeMetadata {
    pub name: String,
    pub display_name: String,
    pub value_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeatable: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value_metadata: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAttributeMetadata {
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    value_type: String,
    #[serde(default)]
    group_display_name: Option<String>,
    #[serde(default)]
    deprecated: Option<bool>,
    #[serde(default)]
    repeatable: Option<bool>,
    #[serde(default)]
    value_metadata: Vec<serde_json::Value>,
}

impl From<WireAttributeMetadata> for AttributeMetadata {
    fn from(wire: WireAttributeMetadata) -> Self {
        Self {
            name: wire.parent.or(wire.name).unwrap_or_default(),
            display_name: wire.display_name,
            value_type: wire.value_type,
            group_display_name: wire.group_display_name,
            deprecated: wire.deprecated,
            repeatable: wire.repeatable,
            value_metadata: wire.value_metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// googleLocations:search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub google_locations: Vec<GoogleLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLocation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<SearchedLocation>,
    #[serde(default)]
    pub request_admin_rights_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchedLocation {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub phone_numbers: Option<serde_json::Value>,
    #[serde(default)]
    pub storefront_address: Option<serde_json::Value>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub latlng: Option<LatLng>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
