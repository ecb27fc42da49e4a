//! Error types for the concrete-poetry library.
//!
//! Three distinct error types reflect three distinct failure modes:
//!
//! * [`RenderError`] — **Deterministic**: the core glyph renderer rejected
//!   its input (bad subject characters, zero-sized image, flat image).
//!   These are pure functions of the input and are raised synchronously.
//!   The image sourcer treats them as a signal to advance to the next
//!   candidate image rather than as failures of the run.
//!
//! * [`SubjectError`] — **Non-fatal**: a single subject failed (search came
//!   back empty, every candidate image was rejected) but the other poems in
//!   the edition are fine. Stored inside [`crate::output::SubjectResult`] so
//!   callers can inspect partial success rather than losing the whole
//!   edition to one bad subject.
//!
//! * [`ConcreteError`] — **Fatal**: the generation cannot proceed at all
//!   (corpus too small, search API not configured, every subject failed,
//!   PDF renderer missing). Returned as `Err(ConcreteError)` from the
//!   top-level `generate*` functions.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the concrete-poetry library.
///
/// Subject-level failures use [`SubjectError`] and are stored in
/// [`crate::output::SubjectResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ConcreteError {
    // ── Corpus errors ─────────────────────────────────────────────────────
    /// Caller asked for more poems than the corpus has distinct names.
    #[error("Corpus has only {available} names but {requested} poems were requested")]
    CorpusTooSmall { requested: usize, available: usize },

    /// A user-supplied corpus file could not be read or parsed.
    #[error("Failed to read corpus '{path}': {detail}\nExpected a JSON array of strings.")]
    CorpusUnreadable { path: PathBuf, detail: String },

    // ── Search errors ─────────────────────────────────────────────────────
    /// No image search backend could be constructed (missing credentials).
    #[error("Image search is not configured.\n{hint}")]
    SearchNotConfigured { hint: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// Every subject failed; the edition would be empty.
    #[error("All {total} subjects failed.\nFirst error: {first_error}")]
    AllSubjectsFailed { total: usize, first_error: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external HTML-to-PDF renderer is not installed.
    #[error(
        "wkhtmltopdf was not found on PATH.\n\
Install it from https://wkhtmltopdf.org/downloads.html or your package\n\
manager (e.g. `apt install wkhtmltopdf`), or use an .html output path to skip\n\
the PDF step."
    )]
    PdfRendererMissing,

    /// wkhtmltopdf ran but exited non-zero.
    #[error("wkhtmltopdf failed (exit {code:?}): {stderr}")]
    PdfRenderFailed { code: Option<i32>, stderr: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single subject.
///
/// Stored alongside [`crate::output::SubjectResult`] when a subject fails.
/// The overall generation continues unless ALL subjects fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum SubjectError {
    /// The image search request failed or returned no candidates.
    #[error("'{subject}': image search failed: {detail}")]
    SearchFailed { subject: String, detail: String },

    /// Every candidate image was rejected (download, decode, or render).
    #[error("'{subject}': all {attempted} candidate images failed; last error: {last_error}")]
    CandidatesExhausted {
        subject: String,
        attempted: usize,
        last_error: String,
    },
}

/// Deterministic errors raised by the core glyph renderer.
///
/// These are pure functions of `(subject, image)`: the same inputs always
/// produce the same error, synchronously and without side effects. Recovery
/// is meaningless inside the renderer — the sourcer catches them and moves
/// on to the next candidate image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The subject name contains a character outside the density ordering.
    #[error("Subject '{subject}' contains {character:?}, which has no density rank")]
    InvalidSubject { subject: String, character: char },

    /// The source image has a zero width or height.
    #[error("Image has degenerate dimensions {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    /// The source image has uniform intensity everywhere, so normalisation
    /// is undefined (the naive formula would divide by zero).
    #[error("Image has zero dynamic range (uniform intensity)")]
    EmptyRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_subject_display() {
        let e = RenderError::InvalidSubject {
            subject: "cat5".into(),
            character: '5',
        };
        let msg = e.to_string();
        assert!(msg.contains("cat5"), "got: {msg}");
        assert!(msg.contains("'5'"), "got: {msg}");
    }

    #[test]
    fn degenerate_image_display() {
        let e = RenderError::DegenerateImage {
            width: 0,
            height: 12,
        };
        assert!(e.to_string().contains("0x12"));
    }

    #[test]
    fn candidates_exhausted_display() {
        let e = SubjectError::CandidatesExhausted {
            subject: "sea lion".into(),
            attempted: 10,
            last_error: "decode failed".into(),
        };
        assert!(e.to_string().contains("sea lion"));
        assert!(e.to_string().contains("10"));
    }

    #[test]
    fn corpus_too_small_display() {
        let e = ConcreteError::CorpusTooSmall {
            requested: 50,
            available: 12,
        };
        assert!(e.to_string().contains("12"));
        assert!(e.to_string().contains("50"));
    }
}
