//! Glyph palette construction: a subject's own letters, ordered by visual weight.
//!
//! ## Why sort the letters?
//!
//! The poem is typeset using only the letters of the subject's name. For the
//! halftone mapping to work, the palette must run from lightest glyph to
//! heaviest so that ascending intensity indexes into ascending ink coverage.
//! The ordering is a fixed permutation of the lowercase alphabet measured
//! once by rendered pixel coverage in a monospace face; it is passed in as a
//! parameter rather than read from a global so tests (and future editions)
//! can substitute alternate weight tables.

use crate::error::RenderError;

/// Letters of the lowercase alphabet ordered lightest to heaviest by the
/// pixel coverage of their rendered monospace glyphs.
pub const DENSITY_ORDERING: &str = "czrsivtlxfeajonuykpwhqbdmg";

/// An ordered character lookup table from intensity rank to printable glyph.
///
/// The first two entries are always blanks, reserved for the lightest
/// intensities; the rest are the subject's letters (duplicates and case
/// preserved) sorted ascending by density rank. Built fresh per subject and
/// read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPalette {
    glyphs: Vec<char>,
}

impl GlyphPalette {
    /// Build the palette for `subject` against a density `ordering`.
    ///
    /// Whitespace is stripped (multi-word subjects like "sea lion" keep both
    /// words' letters). The sort key of each letter is the index of its
    /// lowercase fold in `ordering`; the emitted glyph keeps its original
    /// case. The sort is stable, so repeated letters keep their relative
    /// order from the name.
    ///
    /// # Errors
    /// [`RenderError::InvalidSubject`] if any non-whitespace character's
    /// lowercase fold is absent from `ordering`.
    pub fn build(subject: &str, ordering: &str) -> Result<Self, RenderError> {
        let mut ranked: Vec<(usize, char)> = Vec::with_capacity(subject.len());
        for ch in subject.chars().filter(|c| !c.is_whitespace()) {
            let key = ch
                .to_lowercase()
                .find_map(|folded| ordering.chars().position(|o| o == folded))
                .ok_or_else(|| RenderError::InvalidSubject {
                    subject: subject.to_string(),
                    character: ch,
                })?;
            ranked.push((key, ch));
        }
        ranked.sort_by_key(|&(key, _)| key);

        let mut glyphs = Vec::with_capacity(2 + ranked.len());
        glyphs.push(' ');
        glyphs.push(' ');
        glyphs.extend(ranked.into_iter().map(|(_, ch)| ch));
        Ok(Self { glyphs })
    }

    /// Number of glyphs, blanks included. Always ≥ 2.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True when the subject contributed no letters at all.
    pub fn is_empty(&self) -> bool {
        self.glyphs.len() <= 2
    }

    /// Glyph at `index`, clamped into range.
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// The ordered glyph sequence, blanks first.
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }
}
