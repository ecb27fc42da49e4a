//! Glyph mapping: intensity grid → line-broken character block.

use crate::render::intensity::IntensityGrid;
use crate::render::palette::GlyphPalette;
use std::fmt;

/// The finished poem body: one string per grid row, every character drawn
/// from the subject's [`GlyphPalette`]. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBlock {
    lines: Vec<String>,
}

impl GlyphBlock {
    /// Replace each cell with the palette glyph at
    /// `floor(intensity * (len - 1))`, clamped into the palette.
    ///
    /// Intensity 0.0 (lightest) lands on the leading blanks; 1.0 (darkest)
    /// lands on the heaviest letter.
    pub fn map(grid: &IntensityGrid, palette: &GlyphPalette) -> Self {
        let size = grid.size();
        let span = (palette.len() - 1) as f64;

        let lines = (0..size.rows)
            .map(|row| {
                (0..size.cols)
                    .map(|col| palette.glyph((grid.value(col, row) * span) as usize))
                    .collect()
            })
            .collect();

        Self { lines }
    }

    /// The block's lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Join the lines with a caller-chosen line-break marker
    /// (`"<br>"` for the HTML assembler, `"\n"` for terminals).
    pub fn join(&self, marker: &str) -> String {
        self.lines.join(marker)
    }
}

impl fmt::Display for GlyphBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
