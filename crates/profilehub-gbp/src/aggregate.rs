//! Resolution plus concurrent fan-out over the fixed source set.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::client::GbpClient;
use crate::credential::Credential;
use crate::endpoint::Endpoint;
use crate::error::GbpError;
use crate::normalize::{merge, AggregationResult, RawResults, Source};
use crate::resolver::{resolve_ids, ResolvedIds};
use crate::types::{AttributesPage, Location, MediaPage, ReviewsPage};

/// Query parameters that drive fan-out for one location.
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub region_code: String,
    pub language_code: String,
    pub category_name: String,
    pub reviews_page_size: u32,
    /// Budget for one whole request: resolution and fan-out share it.
    pub deadline: Duration,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            region_code: "IN".to_string(),
            language_code: "en".to_string(),
            category_name: "gcid:corporate_office".to_string(),
            reviews_page_size: 20,
            deadline: Duration::from_secs(10),
        }
    }
}

/// Optional caller-supplied identifiers.
#[derive(Debug, Clone, Default)]
pub struct Hints {
    pub account_id: Option<String>,
    pub location_id: Option<String>,
}

pub struct Aggregator {
    client: GbpClient,
    settings: AggregatorSettings,
}

impl Aggregator {
    #[must_use]
    pub fn new(client: GbpClient, settings: AggregatorSettings) -> Self {
        Self { client, settings }
    }

    #[must_use]
    pub fn client(&self) -> &GbpClient {
        &self.client
    }

    #[must_use]
    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    /// Resolves identifiers under the request deadline.
    ///
    /// # Errors
    ///
    /// - [`GbpError::Auth`] if the credential is empty or expired (no call made).
    /// - [`GbpError::Cancelled`] with stage `"resolution"` if the deadline
    ///   passes before both identifiers are known.
    /// - Any resolver error.
    pub async fn resolve(
        &self,
        credential: &Credential,
        hints: &Hints,
        deadline: Instant,
    ) -> Result<ResolvedIds, GbpError> {
        credential.validate(Utc::now())?;
        tokio::time::timeout_at(
            deadline,
            resolve_ids(
                &self.client,
                credential,
                hints.account_id.as_deref(),
                hints.location_id.as_deref(),
            ),
        )
        .await
        .map_err(|_| GbpError::Cancelled {
            stage: "resolution",
        })?
    }

    /// Resolves identifiers, then fans out. Only resolution failures are
    /// returned as errors; per-source failures land in the result.
    ///
    /// # Errors
    ///
    /// See [`Aggregator::resolve`].
    pub async fn run(
        &self,
        credential: &Credential,
        hints: &Hints,
    ) -> Result<AggregationResult, GbpError> {
        let deadline = Instant::now() + self.settings.deadline;
        let ids = self.resolve(credential, hints, deadline).await.inspect_err(|e| {
            tracing::warn!(kind = e.kind(), error = %e, "identifier resolution failed");
        })?;
        tracing::info!(
            account = %ids.account,
            location = %ids.location,
            "aggregating location data"
        );
        Ok(self.aggregate(credential, &ids, deadline).await)
    }

    /// Issues every source call concurrently and merges what settles before
    /// `deadline`. Never fails: a source that errors or is still pending at
    /// the deadline is recorded in `errors`.
    pub async fn aggregate(
        &self,
        credential: &Credential,
        ids: &ResolvedIds,
        deadline: Instant,
    ) -> AggregationResult {
        let location_name = ids.location_name();
        let location = location_name.as_str();
        let s = &self.settings;

        let reviews_endpoint = Endpoint::Reviews {
            location,
            page_size: s.reviews_page_size,
        };
        let media_endpoint = Endpoint::Media { location };
        let general_endpoint = Endpoint::GeneralAttributes {
            region_code: &s.region_code,
            language_code: &s.language_code,
        };
        let category_endpoint = Endpoint::CategoryAttributes {
            category: &s.category_name,
            region_code: &s.region_code,
            language_code: &s.language_code,
        };
        let details_endpoint = Endpoint::LocationDetails { location };
        let client = &self.client;

        let (reviews, photos, general_attributes, category_attributes, location_details) = tokio::join!(
            within(
                deadline,
                Source::Reviews,
                client.fetch::<ReviewsPage>(&reviews_endpoint, credential)
            ),
            within(
                deadline,
                Source::Photos,
                client.fetch::<MediaPage>(&media_endpoint, credential)
            ),
            within(
                deadline,
                Source::GeneralAttributes,
                client.fetch::<AttributesPage>(&general_endpoint, credential)
            ),
            within(
                deadline,
                Source::CategoryAttributes,
                client.fetch::<AttributesPage>(&category_endpoint, credential)
            ),
            within(
                deadline,
                Source::LocationDetails,
                client.fetch::<Location>(&details_endpoint, credential)
            ),
        );

        merge(
            location,
            RawResults {
                reviews,
                photos,
                general_attributes,
                category_attributes,
                location: location_details,
            },
        )
    }
}

/// Bounds one source call by the shared deadline; a call still pending when
/// it passes is dropped and reported as [`GbpError::Cancelled`].
async fn within<T, F>(deadline: Instant, source: Source, call: F) -> Result<T, GbpError>
where
    F: Future<Output = Result<T, GbpError>>,
{
    tokio::time::timeout_at(deadline, call)
        .await
        .unwrap_or_else(|_| {
            Err(GbpError::Cancelled {
                stage: source.as_str(),
            })
        })
}
