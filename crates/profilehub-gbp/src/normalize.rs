//! Normalization of upstream payloads into the unified aggregation result.
//!
//! Merging never fails: a source that errored contributes its default value
//! and one entry in [`AggregationResult::errors`]. Field fallbacks are
//! expressed as ordered accessor chains so each field's precedence lives in
//! exactly one place.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ErrorDetail, GbpError};
use crate::types::{
    AttributeMetadata, AttributesPage, LatLng, Location, MediaPage, PostalAddress, RawReview,
    ReviewsPage, SearchResponse,
};

pub const UNKNOWN_LOCATION_TITLE: &str = "Unknown Location";
pub const UNKNOWN_PHONE: &str = "N/A";
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";
pub const PLACEHOLDER_ADDRESS_LINE: &str = "Address not available";
pub const PLACEHOLDER_REGION_CODE: &str = "IN";

/// The fixed set of fan-out sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Reviews,
    Photos,
    GeneralAttributes,
    CategoryAttributes,
    LocationDetails,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Reviews,
        Source::Photos,
        Source::GeneralAttributes,
        Source::CategoryAttributes,
        Source::LocationDetails,
    ];

    /// Key used in [`AggregationResult::errors`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Reviews => "reviews",
            Source::Photos => "photos",
            Source::GeneralAttributes => "generalAttributes",
            Source::CategoryAttributes => "categoryAttributes",
            Source::LocationDetails => "location",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One settled outcome per fan-out source, each in its own slot.
#[derive(Debug)]
pub struct RawResults {
    pub reviews: Result<ReviewsPage, GbpError>,
    pub photos: Result<MediaPage, GbpError>,
    pub general_attributes: Result<AttributesPage, GbpError>,
    pub category_attributes: Result<AttributesPage, GbpError>,
    pub location: Result<Location, GbpError>,
}

/// Unified view of one location. All four collections are always present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub location: LocationSummary,
    pub reviews: Vec<Review>,
    pub photos: Vec<serde_json::Value>,
    pub attributes: Vec<AttributeMetadata>,
    pub errors: BTreeMap<String, ErrorDetail>,
}

impl AggregationResult {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub name: String,
    pub title: String,
    pub primary_phone: String,
    pub address: PostalAddress,
    pub regular_hours: Option<serde_json::Value>,
    pub latlng: Option<LatLng>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub reviewer_name: String,
    /// 1..=5, `None` when upstream left the rating unspecified.
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub create_time: Option<String>,
}

/// One `googleLocations:search` match flattened for the front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub name: Option<String>,
    pub title: String,
    pub phone_numbers: serde_json::Value,
    pub address: serde_json::Value,
    pub website_uri: Option<String>,
    pub latlng: Option<LatLng>,
    pub metadata: serde_json::Value,
    pub request_admin_rights_uri: Option<String>,
}

// ---------------------------------------------------------------------------
// Fallback chains
// ---------------------------------------------------------------------------

/// Payloads the location-summary chains may read from.
struct LocationSources<'a> {
    details: Option<&'a Location>,
    media: Option<&'a MediaPage>,
}

type TextAccessor = for<'a, 'b> fn(&'b LocationSources<'a>) -> Option<&'a str>;

fn details_title<'a>(s: &LocationSources<'a>) -> Option<&'a str> {
    s.details.and_then(|l| l.title.as_deref())
}

fn details_location_name<'a>(s: &LocationSources<'a>) -> Option<&'a str> {
    s.details.and_then(|l| l.location_name.as_deref())
}

fn media_location_name<'a>(s: &LocationSources<'a>) -> Option<&'a str> {
    s.media.and_then(|m| m.location_name.as_deref())
}

fn details_primary_phone<'a>(s: &LocationSources<'a>) -> Option<&'a str> {
    s.details.and_then(|l| l.primary_phone.as_deref())
}

fn details_phone_numbers_primary<'a>(s: &LocationSources<'a>) -> Option<&'a str> {
    s.details
        .and_then(|l| l.phone_numbers.as_ref())
        .and_then(|p| p.primary_phone.as_deref())
}

/// `title`: details `title`, details `locationName`, media `locationName`,
/// then [`UNKNOWN_LOCATION_TITLE`].
const TITLE_CHAIN: &[TextAccessor] = &[details_title, details_location_name, media_location_name];

/// `primaryPhone`: details `primaryPhone`, details `phoneNumbers.primaryPhone`,
/// then [`UNKNOWN_PHONE`].
const PHONE_CHAIN: &[TextAccessor] = &[details_primary_phone, details_phone_numbers_primary];

/// First accessor yielding a non-empty string wins.
fn first_present<'a>(chain: &[TextAccessor], sources: &LocationSources<'a>) -> Option<&'a str> {
    chain
        .iter()
        .find_map(|accessor| accessor(sources).filter(|v| !v.trim().is_empty()))
}

/// `address`: details `storefrontAddress`, then a placeholder with
/// `addressLines: ["Address not available"]` and `regionCode: "IN"`.
fn address_or_placeholder(details: Option<&Location>) -> PostalAddress {
    details
        .and_then(|l| l.storefront_address.clone())
        .unwrap_or_else(|| PostalAddress {
            region_code: PLACEHOLDER_REGION_CODE.to_string(),
            address_lines: vec![PLACEHOLDER_ADDRESS_LINE.to_string()],
            ..PostalAddress::default()
        })
}

fn summarize_location(
    location_name: &str,
    details: Option<&Location>,
    media: Option<&MediaPage>,
) -> LocationSummary {
    let sources = LocationSources { details, media };
    LocationSummary {
        name: location_name.to_string(),
        title: first_present(TITLE_CHAIN, &sources)
            .unwrap_or(UNKNOWN_LOCATION_TITLE)
            .to_string(),
        primary_phone: first_present(PHONE_CHAIN, &sources)
            .unwrap_or(UNKNOWN_PHONE)
            .to_string(),
        address: address_or_placeholder(details),
        regular_hours: details.and_then(|l| l.regular_hours.clone()),
        latlng: details.and_then(|l| l.latlng),
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Maps the upstream star-rating enum to an ordinal.
#[must_use]
pub fn map_star_rating(raw: &str) -> Option<u8> {
    match raw {
        "ONE" => Some(1),
        "TWO" => Some(2),
        "THREE" => Some(3),
        "FOUR" => Some(4),
        "FIVE" => Some(5),
        _ => None,
    }
}

/// Converts one upstream review; `reviewerName` falls back to
/// [`ANONYMOUS_REVIEWER`].
#[must_use]
pub fn normalize_review(raw: RawReview) -> Review {
    let reviewer_name = raw
        .reviewer
        .and_then(|r| r.display_name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS_REVIEWER.to_string());

    Review {
        name: raw.name,
        reviewer_name,
        rating: raw.star_rating.as_deref().and_then(map_star_rating),
        comment: raw.comment,
        create_time: raw.create_time,
    }
}

/// Converts every review in upstream order. No deduplication.
#[must_use]
pub fn normalize_reviews(page: ReviewsPage) -> Vec<Review> {
    page.reviews.into_iter().map(normalize_review).collect()
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// General attributes followed by category attributes, as-is.
///
/// Entries sharing a `name` across the two lists are kept twice; nothing
/// guarantees the upstream lists are disjoint.
#[must_use]
pub fn concat_attributes(
    general: Vec<AttributeMetadata>,
    category: Vec<AttributeMetadata>,
) -> Vec<AttributeMetadata> {
    let mut merged = general;
    merged.extend(category);
    merged
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Flattens search matches; missing titles become `"Unknown"` and missing
/// object fields become `{}`.
#[must_use]
pub fn summarize_search(response: SearchResponse) -> Vec<SearchMatch> {
    let empty = || serde_json::Value::Object(serde_json::Map::new());
    response
        .google_locations
        .into_iter()
        .map(|found| {
            let location = found.location.unwrap_or_default();
            SearchMatch {
                name: found.name,
                title: location
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                phone_numbers: location.phone_numbers.unwrap_or_else(empty),
                address: location.storefront_address.unwrap_or_else(empty),
                website_uri: location.website_uri,
                latlng: location.latlng,
                metadata: location.metadata.unwrap_or_else(empty),
                request_admin_rights_uri: found.request_admin_rights_uri,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Unwraps a source outcome, recording a failure under the source's key.
fn settle<T>(
    source: Source,
    outcome: Result<T, GbpError>,
    errors: &mut BTreeMap<String, ErrorDetail>,
) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(source = source.as_str(), kind = e.kind(), error = %e, "fan-out source failed");
            errors.insert(source.as_str().to_string(), ErrorDetail::from(&e));
            None
        }
    }
}

/// Builds the unified result for `location_name` from the settled sources.
#[must_use]
pub fn merge(location_name: &str, raw: RawResults) -> AggregationResult {
    let mut errors = BTreeMap::new();

    let reviews = settle(Source::Reviews, raw.reviews, &mut errors);
    let photos = settle(Source::Photos, raw.photos, &mut errors);
    let general = settle(Source::GeneralAttributes, raw.general_attributes, &mut errors);
    let category = settle(Source::CategoryAttributes, raw.category_attributes, &mut errors);
    let details = settle(Source::LocationDetails, raw.location, &mut errors);

    let location = summarize_location(location_name, details.as_ref(), photos.as_ref());

    AggregationResult {
        location,
        reviews: reviews.map(normalize_reviews).unwrap_or_default(),
        photos: photos.map(|p| p.media_items).unwrap_or_default(),
        attributes: concat_attributes(
            general.map(|g| g.attribute_metadata).unwrap_or_default(),
            category.map(|c| c.attribute_metadata).unwrap_or_default(),
        ),
        errors,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
