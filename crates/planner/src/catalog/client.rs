//! HTTP access to the read-only lecture catalog sources.

use crate::config::CatalogConfig;
use crate::error::PlannerError;
use crate::types::Lecture;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use std::fmt;
use tracing::{debug, info};
use url::Url;

/// The two catalog sources a planner loads lectures from.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum SourceId {
    Majors,
    LiberalArts,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::Majors, SourceId::LiberalArts];
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Majors => f.write_str("majors"),
            SourceId::LiberalArts => f.write_str("liberal-arts"),
        }
    }
}

/// Something that can produce the lecture list of a catalog source.
///
/// The returned future must be `'static` so the fetch cache can share one in-flight
/// request between several callers.
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch(&self, source: SourceId) -> BoxFuture<'static, Result<Vec<Lecture>, PlannerError>>;
}

/// Catalog source backed by JSON files served over HTTP.
pub struct HttpCatalogSource {
    client: Client,
    majors_url: Url,
    liberal_arts_url: Url,
}

impl HttpCatalogSource {
    /// Creates a client for the configured base URL and source paths.
    pub fn new(config: &CatalogConfig) -> Result<Self, PlannerError> {
        let base = Url::parse(&config.base_url)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PlannerError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            majors_url: base.join(&config.majors_path)?,
            liberal_arts_url: base.join(&config.liberal_arts_path)?,
        })
    }

    /// Returns the URL a source is fetched from.
    pub fn url_for(&self, source: SourceId) -> &Url {
        match source {
            SourceId::Majors => &self.majors_url,
            SourceId::LiberalArts => &self.liberal_arts_url,
        }
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch(&self, source: SourceId) -> BoxFuture<'static, Result<Vec<Lecture>, PlannerError>> {
        let client = self.client.clone();
        let url = self.url_for(source).clone();

        async move {
            info!(source = %source, url = %url, "Requesting catalog");

            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(PlannerError::UnexpectedResponse {
                    status: status.as_u16(),
                    message,
                });
            }

            let lectures: Vec<Lecture> = response.json().await?;
            debug!(source = %source, count = lectures.len(), "Decoded catalog");
            Ok(lectures)
        }
        .boxed()
    }
}
