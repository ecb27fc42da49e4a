//! Output types: per-subject results, edition-level stats, and the
//! assembled document.

use crate::error::SubjectError;
use crate::render::GlyphBlock;
use serde::{Deserialize, Serialize};

/// The outcome of one subject's pipeline.
///
/// `block` is present exactly when `error` is absent: a subject either
/// renders completely or contributes nothing to the edition (all-or-nothing
/// per subject).
#[derive(Debug, Clone)]
pub struct SubjectResult {
    /// Position in the edition (0-indexed); ordering is by this field.
    pub index: usize,
    /// The subject name as drawn from the corpus.
    pub subject: String,
    /// The rendered poem body.
    pub block: Option<GlyphBlock>,
    /// URL of the candidate image that rendered successfully.
    pub source_url: Option<String>,
    /// Candidate images tried before one succeeded (or the list ran out).
    pub attempts: usize,
    /// Wall-clock time spent on this subject.
    pub duration_ms: u64,
    /// Why the subject failed, when it did.
    pub error: Option<SubjectError>,
}

/// Aggregate statistics for a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Poems requested.
    pub requested: usize,
    /// Subjects that rendered successfully.
    pub rendered: usize,
    /// Subjects that failed (search or every candidate rejected).
    pub failed: usize,
    /// Candidate downloads attempted across all subjects.
    pub total_attempts: usize,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// Everything produced by a generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The assembled HTML edition, ready for the PDF renderer.
    pub html: String,
    /// Per-subject results in edition order, failures included.
    pub subjects: Vec<SubjectResult>,
    /// Aggregate statistics.
    pub stats: GenerationStats,
}

impl GenerationOutput {
    /// The successfully rendered `(subject, block)` pairs in edition order.
    pub fn poems(&self) -> impl Iterator<Item = (&str, &GlyphBlock)> {
        self.subjects
            .iter()
            .filter_map(|s| s.block.as_ref().map(|b| (s.subject.as_str(), b)))
    }
}
