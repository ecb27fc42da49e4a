//! Subject selection: draw N distinct names from a corpus.
//!
//! The embedded corpus is the Corpora-project list of common animals, the
//! same list the original editions drew from. A user corpus (any JSON array
//! of strings) can be substituted via
//! [`crate::config::GeneratorConfig::corpus_path`] — menagerie not required.

use crate::error::ConcreteError;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;

static EMBEDDED_CORPUS: &str = include_str!("../../assets/animals.json");

static ANIMALS: Lazy<Vec<String>> = Lazy::new(|| {
    serde_json::from_str(EMBEDDED_CORPUS).expect("embedded animals.json is valid JSON")
});

/// Load the subject corpus: the user's file when given, the embedded animal
/// list otherwise.
pub fn load_corpus(path: Option<&Path>) -> Result<Vec<String>, ConcreteError> {
    match path {
        None => Ok(ANIMALS.clone()),
        Some(p) => {
            let raw = std::fs::read_to_string(p).map_err(|e| ConcreteError::CorpusUnreadable {
                path: p.to_path_buf(),
                detail: e.to_string(),
            })?;
            let names: Vec<String> =
                serde_json::from_str(&raw).map_err(|e| ConcreteError::CorpusUnreadable {
                    path: p.to_path_buf(),
                    detail: e.to_string(),
                })?;
            Ok(names)
        }
    }
}

/// Sample `n` distinct subjects from `corpus` without replacement.
///
/// Duplicate corpus entries are collapsed first so an edition never features
/// the same subject twice.
///
/// # Errors
/// [`ConcreteError::CorpusTooSmall`] when the corpus has fewer than `n`
/// distinct names.
pub fn select_subjects<R: Rng + ?Sized>(
    corpus: &[String],
    n: usize,
    rng: &mut R,
) -> Result<Vec<String>, ConcreteError> {
    let mut seen = HashSet::new();
    let distinct: Vec<&String> = corpus.iter().filter(|s| seen.insert(s.as_str())).collect();

    if distinct.len() < n {
        return Err(ConcreteError::CorpusTooSmall {
            requested: n,
            available: distinct.len(),
        });
    }

    Ok(distinct
        .choose_multiple(rng, n)
        .map(|s| (*s).clone())
        .collect())
}
