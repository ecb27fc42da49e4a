//! Eager (full-edition) generation entry points.
//!
//! The per-subject pipelines are independent, so they run concurrently up to
//! `config.concurrency`; completion order is whatever the network gives us,
//! but the edition order is fixed at sampling time — results are re-sorted
//! by subject index before assembly, so the index list and the poem pages
//! always match the drawn order.

use crate::config::GeneratorConfig;
use crate::error::ConcreteError;
use crate::output::{GenerationOutput, GenerationStats, SubjectResult};
use crate::pipeline::search::{GoogleImageSearch, ImageSearch};
use crate::pipeline::{assemble, corpus, fetch, pdf};
use crate::render::RenderOptions;
use futures::stream::{self, StreamExt};
use rand::rngs::{SmallRng, StdRng};
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Title printed at the head of every edition.
const EDITION_TITLE: &str = "concrete animals";

/// Generate an edition of poems.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(GenerationOutput)` on success, even if some subjects failed
/// (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(ConcreteError)` only for fatal errors:
/// - corpus unreadable or smaller than the requested count
/// - image search not configured
/// - every subject failed
pub async fn generate(config: &GeneratorConfig) -> Result<GenerationOutput, ConcreteError> {
    let total_start = Instant::now();
    info!("Starting generation: {} poems", config.count);

    // ── Step 1: Draw subjects ────────────────────────────────────────────
    let names = corpus::load_corpus(config.corpus_path.as_deref())?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(base_seed);
    let subjects = corpus::select_subjects(&names, config.count, &mut rng)?;
    debug!("Drew subjects: {subjects:?} (seed {base_seed})");

    if let Some(ref cb) = config.progress {
        cb.on_start(subjects.len());
    }

    // ── Step 2: Resolve the search backend and HTTP client ───────────────
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .user_agent(concat!("concrete-poetry/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ConcreteError::Internal(format!("http client: {e}")))?;
    let searcher = resolve_searcher(config, &client)?;

    let opts = RenderOptions {
        max_side: config.max_side,
        skew: config.skew,
    };

    // ── Step 3: Run per-subject pipelines concurrently ───────────────────
    let mut results: Vec<SubjectResult> =
        stream::iter(subjects.into_iter().enumerate().map(|(index, subject)| {
            let searcher = Arc::clone(&searcher);
            let client = client.clone();
            let progress = config.progress.clone();
            async move {
                let start = Instant::now();
                if let Some(ref cb) = progress {
                    cb.on_subject_start(index, &subject);
                }

                // Per-subject RNG derived from the run seed, so shuffles are
                // reproducible regardless of task interleaving.
                let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(index as u64));
                let outcome =
                    fetch::source_poem(&client, searcher.as_ref(), &subject, &opts, &mut rng)
                        .await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match outcome {
                    Ok(poem) => {
                        info!("Rendered {subject} ({} attempts)", poem.attempts);
                        if let Some(ref cb) = progress {
                            cb.on_subject_complete(index, &subject, poem.attempts);
                        }
                        SubjectResult {
                            index,
                            subject,
                            block: Some(poem.block),
                            source_url: Some(poem.url),
                            attempts: poem.attempts,
                            duration_ms,
                            error: None,
                        }
                    }
                    Err(e) => {
                        warn!("Subject failed: {e}");
                        if let Some(ref cb) = progress {
                            cb.on_subject_error(index, &subject, &e.to_string());
                        }
                        let attempts = match &e {
                            crate::error::SubjectError::CandidatesExhausted {
                                attempted, ..
                            } => *attempted,
                            _ => 0,
                        };
                        SubjectResult {
                            index,
                            subject,
                            block: None,
                            source_url: None,
                            attempts,
                            duration_ms,
                            error: Some(e),
                        }
                    }
                }
            }
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    // Edition order is sampling order, not completion order.
    results.sort_by_key(|r| r.index);

    // ── Step 4: Stats, all-or-nothing check ──────────────────────────────
    let rendered = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - rendered;

    if rendered == 0 {
        let first_error = results
            .iter()
            .find_map(|r| r.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(ConcreteError::AllSubjectsFailed {
            total: results.len(),
            first_error,
        });
    }

    let stats = GenerationStats {
        requested: config.count,
        rendered,
        failed,
        total_attempts: results.iter().map(|r| r.attempts).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    // ── Step 5: Assemble the edition ─────────────────────────────────────
    let poems: Vec<(&str, &crate::render::GlyphBlock)> = results
        .iter()
        .filter_map(|r| r.block.as_ref().map(|b| (r.subject.as_str(), b)))
        .collect();
    let html = assemble::assemble_edition(EDITION_TITLE, &poems, chrono::Local::now());

    info!(
        "Generation complete: {}/{} poems, {}ms total",
        rendered, stats.requested, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress {
        cb.on_complete(results.len(), rendered);
    }

    Ok(GenerationOutput {
        html,
        subjects: results,
        stats,
    })
}

/// Generate an edition and write it to `output_path`.
///
/// A `.html`/`.htm` extension writes the assembled HTML directly (atomic
/// temp-file-then-rename); anything else goes through wkhtmltopdf.
pub async fn generate_to_file(
    output_path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<GenerationStats, ConcreteError> {
    let output = generate(config).await?;
    let path = output_path.as_ref();

    let wants_html = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("html") | Some("htm")
    );
    if wants_html {
        pdf::write_html(&output.html, path).await?;
        info!("Wrote {}", path.display());
    } else {
        pdf::render_pdf(&output.html, path).await?;
    }

    Ok(output.stats)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(config: &GeneratorConfig) -> Result<GenerationOutput, ConcreteError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConcreteError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the search backend, from most-specific to least-specific:
/// a pre-built [`ImageSearch`] on the config (the test seam), then explicit
/// credentials, then the `GOOGLE_API_KEY` / `GOOGLE_CSE_ID` environment.
fn resolve_searcher(
    config: &GeneratorConfig,
    client: &reqwest::Client,
) -> Result<Arc<dyn ImageSearch>, ConcreteError> {
    if let Some(ref searcher) = config.searcher {
        return Ok(Arc::clone(searcher));
    }

    let api_key = config
        .api_key
        .clone()
        .or_else(|| nonempty_env("GOOGLE_API_KEY"));
    let cse_id = config
        .cse_id
        .clone()
        .or_else(|| nonempty_env("GOOGLE_CSE_ID"));

    match (api_key, cse_id) {
        (Some(key), Some(cx)) => Ok(Arc::new(GoogleImageSearch::new(
            client.clone(),
            key,
            cx,
            config.candidates,
            config.query_suffix.clone(),
        ))),
        (key, _) => Err(ConcreteError::SearchNotConfigured {
            hint: format!(
                "Set GOOGLE_API_KEY and GOOGLE_CSE_ID (missing: {}).\n\
                 Create a key at https://developers.google.com/custom-search \
                 and an engine ID at https://cse.google.com.",
                if key.is_none() { "API key" } else { "engine ID" }
            ),
        }),
    }
}

fn nonempty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
