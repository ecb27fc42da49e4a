//! Image sourcing: fetch candidates in order until one renders.
//!
//! ## Why retry-by-advancing instead of retry-in-place?
//!
//! Search results are full of dead links, HTML pages masquerading as images,
//! and pictures that decode but render badly (zero-sized, perfectly flat).
//! Retrying the same URL cannot fix any of those, so every failure — HTTP,
//! decode, or a deterministic [`crate::error::RenderError`] from the core —
//! is a signal to move on to the next candidate. The subject fails only when
//! the shuffled candidate list is exhausted.

use crate::error::SubjectError;
use crate::pipeline::search::ImageSearch;
use crate::render::{render_glyph_block, GlyphBlock, RenderOptions};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

/// A successfully sourced poem: the block plus its provenance.
#[derive(Debug, Clone)]
pub struct SourcedPoem {
    pub block: GlyphBlock,
    /// Candidate URL that decoded and rendered.
    pub url: String,
    /// Candidates tried, winner included.
    pub attempts: usize,
}

/// Search, shuffle, and try candidate images until one renders.
///
/// The shuffle reduces predictability across editions (the API's top hit is
/// usually the same stock photo); `rng` is derived from the run seed plus
/// the subject index, so a seeded run is fully reproducible.
pub async fn source_poem(
    client: &reqwest::Client,
    searcher: &dyn ImageSearch,
    subject: &str,
    opts: &RenderOptions,
    rng: &mut SmallRng,
) -> Result<SourcedPoem, SubjectError> {
    let mut urls = searcher.candidates(subject).await?;
    if urls.is_empty() {
        return Err(SubjectError::SearchFailed {
            subject: subject.to_string(),
            detail: "search returned no candidates".to_string(),
        });
    }
    urls.shuffle(rng);

    let mut last_error = String::new();
    for (attempt, url) in urls.iter().enumerate() {
        match render_candidate(client, url, subject, opts).await {
            Ok(block) => {
                debug!("{subject}: rendered from {url} (attempt {})", attempt + 1);
                return Ok(SourcedPoem {
                    block,
                    url: url.clone(),
                    attempts: attempt + 1,
                });
            }
            Err(e) => {
                warn!("{subject}: candidate {url} rejected: {e}");
                last_error = e;
            }
        }
    }

    Err(SubjectError::CandidatesExhausted {
        subject: subject.to_string(),
        attempted: urls.len(),
        last_error,
    })
}

/// Download, decode, and render one candidate. Every failure collapses to a
/// string: the caller only needs it for the log and the exhaustion report.
async fn render_candidate(
    client: &reqwest::Client,
    url: &str,
    subject: &str,
    opts: &RenderOptions,
) -> Result<GlyphBlock, String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("download failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("body read failed: {e}"))?;

    let image = image::load_from_memory(&bytes).map_err(|e| format!("decode failed: {e}"))?;

    render_glyph_block(subject, &image, opts).map_err(|e| e.to_string())
}
