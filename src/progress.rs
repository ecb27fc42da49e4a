//! Progress-callback trait for per-subject generation events.
//!
//! Inject an `Arc<dyn GenerationProgress>` via
//! [`crate::config::GeneratorConfigBuilder::progress`] to receive real-time
//! events as the pipeline processes each subject. Callbacks were chosen over
//! channels as the least-invasive integration point: callers can forward
//! events to a terminal progress bar, a log, or a channel of their own
//! without the library knowing how the host application communicates.

/// Called by the generation pipeline as it processes each subject.
///
/// Implementations must be `Send + Sync`: subjects are processed
/// concurrently, so `on_subject_*` methods may be called from different
/// tasks at once. All methods have default no-op implementations so callers
/// only override what they care about.
pub trait GenerationProgress: Send + Sync {
    /// Called once after subjects are drawn, before any network work.
    fn on_start(&self, total_subjects: usize) {
        let _ = total_subjects;
    }

    /// Called when a subject's search begins.
    fn on_subject_start(&self, index: usize, subject: &str) {
        let _ = (index, subject);
    }

    /// Called when a subject's poem has rendered.
    ///
    /// `attempts` counts candidate images tried, including the winner.
    fn on_subject_complete(&self, index: usize, subject: &str, attempts: usize) {
        let _ = (index, subject, attempts);
    }

    /// Called when a subject fails (search error or candidates exhausted).
    fn on_subject_error(&self, index: usize, subject: &str, error: &str) {
        let _ = (index, subject, error);
    }

    /// Called once after the last subject settles.
    fn on_complete(&self, total_subjects: usize, rendered: usize) {
        let _ = (total_subjects, rendered);
    }
}
