//! Image search: turn a subject name into candidate image URLs.
//!
//! The search backend sits behind the [`ImageSearch`] trait so the rest of
//! the pipeline (and every test) is independent of the concrete API. The
//! shipped implementation is the Google Custom Search JSON API, which is
//! what the original editions used; the query carries a "transparent"
//! suffix because transparent-background hits keep the subject's silhouette
//! legible once halftoned.

use crate::error::SubjectError;
use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

/// A backend that produces candidate image URLs for a subject.
///
/// Implementations must be `Send + Sync`; subjects are searched
/// concurrently. Returned URLs are in the backend's relevance order — the
/// sourcer shuffles them before fetching.
pub trait ImageSearch: Send + Sync {
    /// Candidate image URLs for `subject`, most relevant first.
    ///
    /// An empty list is a valid result; the sourcer reports it as a search
    /// failure for that subject.
    fn candidates<'a>(&'a self, subject: &'a str)
        -> BoxFuture<'a, Result<Vec<String>, SubjectError>>;
}

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Custom Search JSON API backend.
///
/// Requires an API key and a Custom Search Engine ID (see
/// <https://cse.google.com>); both usually arrive via the `GOOGLE_API_KEY`
/// and `GOOGLE_CSE_ID` environment variables.
pub struct GoogleImageSearch {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
    page_size: usize,
    query_suffix: String,
}

impl GoogleImageSearch {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        cse_id: impl Into<String>,
        page_size: usize,
        query_suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            cse_id: cse_id.into(),
            page_size: page_size.clamp(1, 10),
            query_suffix: query_suffix.into(),
        }
    }

    fn query_for(&self, subject: &str) -> String {
        if self.query_suffix.is_empty() {
            subject.to_string()
        } else {
            format!("{subject} {}", self.query_suffix)
        }
    }
}

impl ImageSearch for GoogleImageSearch {
    fn candidates<'a>(
        &'a self,
        subject: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, SubjectError>> {
        Box::pin(async move {
            let query = self.query_for(subject);
            debug!("Searching images: {query:?}");

            let response = self
                .client
                .get(SEARCH_ENDPOINT)
                .query(&[
                    ("key", self.api_key.as_str()),
                    ("cx", self.cse_id.as_str()),
                    ("q", query.as_str()),
                    ("searchType", "image"),
                    ("num", &self.page_size.to_string()),
                    ("imgSize", "medium"),
                ])
                .send()
                .await
                .map_err(|e| SubjectError::SearchFailed {
                    subject: subject.to_string(),
                    detail: e.to_string(),
                })?;

            if !response.status().is_success() {
                return Err(SubjectError::SearchFailed {
                    subject: subject.to_string(),
                    detail: format!("HTTP {}", response.status()),
                });
            }

            let body: SearchResponse =
                response
                    .json()
                    .await
                    .map_err(|e| SubjectError::SearchFailed {
                        subject: subject.to_string(),
                        detail: format!("malformed response: {e}"),
                    })?;

            let links: Vec<String> = body.items.into_iter().map(|i| i.link).collect();
            debug!("{subject}: {} candidate images", links.len());
            Ok(links)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}
