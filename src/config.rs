//! Configuration for a poetry generation run.
//!
//! All behaviour is controlled through [`GeneratorConfig`], built via its
//! [`GeneratorConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks, log them, and diff two runs to
//! understand why their editions differ.

use crate::error::ConcreteError;
use crate::pipeline::search::ImageSearch;
use crate::progress::GenerationProgress;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one edition of poems.
///
/// Built via [`GeneratorConfig::builder()`] or [`GeneratorConfig::default()`].
///
/// # Example
/// ```rust
/// use concrete_poetry::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .count(5)
///     .max_side(40)
///     .concurrency(4)
///     .seed(17)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Number of poems in the edition. Default: 1.
    pub count: usize,

    /// Largest allowed pre-skew grid dimension. Range 4–200. Default: 40.
    ///
    /// 40 keeps a poem inside one US-letter page at a readable monospace
    /// size; the transform's cost grows with `max_side²`.
    pub max_side: u32,

    /// Width correction for tall character cells. Default: 1.75 (7/4).
    pub skew: f64,

    /// Number of subjects processed concurrently. Default: 4.
    ///
    /// The per-subject pipeline is network-bound (search + downloads); the
    /// render itself is microseconds. Edition order is preserved regardless
    /// of completion order.
    pub concurrency: usize,

    /// Candidate image URLs requested per subject. Range 1–10 (the search
    /// API's page size). Default: 10.
    pub candidates: usize,

    /// Extra term appended to every search query. Default: "transparent".
    ///
    /// Transparent-background hits make the subject's silhouette survive the
    /// halftone; photographs with busy backgrounds render as noise.
    pub query_suffix: String,

    /// Per-candidate download timeout in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// RNG seed for subject sampling and candidate shuffling.
    /// `None` (default) draws fresh entropy; set it to reproduce an edition.
    pub seed: Option<u64>,

    /// JSON array of subject names to sample from instead of the embedded
    /// animal corpus.
    pub corpus_path: Option<PathBuf>,

    /// Google Custom Search API key. Falls back to `GOOGLE_API_KEY`.
    pub api_key: Option<String>,

    /// Google Custom Search engine ID. Falls back to `GOOGLE_CSE_ID`.
    pub cse_id: Option<String>,

    /// Pre-constructed search backend. Takes precedence over credentials;
    /// the seam tests use to stub the network out.
    pub searcher: Option<Arc<dyn ImageSearch>>,

    /// Progress callback fired as subjects complete.
    pub progress: Option<Arc<dyn GenerationProgress>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 1,
            max_side: 40,
            skew: 1.75,
            concurrency: 4,
            candidates: 10,
            query_suffix: "transparent".to_string(),
            download_timeout_secs: 30,
            seed: None,
            corpus_path: None,
            api_key: None,
            cse_id: None,
            searcher: None,
            progress: None,
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("count", &self.count)
            .field("max_side", &self.max_side)
            .field("skew", &self.skew)
            .field("concurrency", &self.concurrency)
            .field("candidates", &self.candidates)
            .field("query_suffix", &self.query_suffix)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("seed", &self.seed)
            .field("corpus_path", &self.corpus_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("cse_id", &self.cse_id.as_ref().map(|_| "<redacted>"))
            .field("searcher", &self.searcher.as_ref().map(|_| "<dyn ImageSearch>"))
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn count(mut self, n: usize) -> Self {
        self.config.count = n;
        self
    }

    pub fn max_side(mut self, side: u32) -> Self {
        self.config.max_side = side.clamp(4, 200);
        self
    }

    pub fn skew(mut self, skew: f64) -> Self {
        self.config.skew = skew;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn candidates(mut self, n: usize) -> Self {
        self.config.candidates = n.clamp(1, 10);
        self
    }

    pub fn query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.query_suffix = suffix.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.corpus_path = Some(path.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn cse_id(mut self, id: impl Into<String>) -> Self {
        self.config.cse_id = Some(id.into());
        self
    }

    pub fn searcher(mut self, searcher: Arc<dyn ImageSearch>) -> Self {
        self.config.searcher = Some(searcher);
        self
    }

    pub fn progress(mut self, progress: Arc<dyn GenerationProgress>) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GeneratorConfig, ConcreteError> {
        let c = &self.config;
        if c.count == 0 {
            return Err(ConcreteError::InvalidConfig(
                "Poem count must be ≥ 1".into(),
            ));
        }
        if !c.skew.is_finite() || c.skew <= 0.0 {
            return Err(ConcreteError::InvalidConfig(format!(
                "Skew must be a positive finite number, got {}",
                c.skew
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_edition() {
        let c = GeneratorConfig::default();
        assert_eq!(c.max_side, 40);
        assert_eq!(c.skew, 1.75);
        assert_eq!(c.candidates, 10);
        assert_eq!(c.query_suffix, "transparent");
    }

    #[test]
    fn builder_clamps_out_of_range_knobs() {
        let c = GeneratorConfig::builder()
            .max_side(1000)
            .candidates(50)
            .concurrency(0)
            .build()
            .unwrap();
        assert_eq!(c.max_side, 200);
        assert_eq!(c.candidates, 10);
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = GeneratorConfig::builder().count(0).build().unwrap_err();
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn nonsense_skew_is_rejected() {
        assert!(GeneratorConfig::builder().skew(0.0).build().is_err());
        assert!(GeneratorConfig::builder().skew(f64::NAN).build().is_err());
    }
}
