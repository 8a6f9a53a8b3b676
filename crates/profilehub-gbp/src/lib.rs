//! Business-profile aggregation core.
//!
//! Resolves an implicit account/location when the caller supplies none, fans
//! out to the reviews, media, attribute and location-detail endpoints
//! concurrently, tolerates individual source failures, and merges everything
//! into one [`AggregationResult`].

pub mod aggregate;
pub mod cache;
pub mod client;
pub mod credential;
pub mod endpoint;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod types;

pub use aggregate::{Aggregator, AggregatorSettings, Hints};
pub use cache::{CacheKey, Clock, EndpointClass, ResponseCache, SystemClock};
pub use client::GbpClient;
pub use credential::Credential;
pub use endpoint::{BaseUrls, Endpoint, EndpointSpec};
pub use error::{ErrorDetail, GbpError};
pub use normalize::{
    merge, normalize_reviews, summarize_search, AggregationResult, LocationSummary, RawResults,
    Review, SearchMatch, Source,
};
pub use resolver::{
    resolve_account, resolve_ids, resolve_location, AccountRef, LocationRef, ResolvedIds,
};
pub use types::{AccountsPage, AttributeMetadata, LocationsPage};
