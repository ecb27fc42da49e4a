//! The core glyph renderer: decoded image + subject name → text halftone.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap one (e.g. a
//! different resampling filter) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! palette ──┐
//! (letters) │
//! geometry ─┼──▶ intensity ──▶ glyphs
//! (grid)    │   (normalise)   (map + line-break)
//! image ────┘
//! ```
//!
//! 1. [`palette`]   — order the subject's letters by visual density
//! 2. [`geometry`]  — fit the image to a character grid with aspect skew
//! 3. [`intensity`] — downsample, sum colour channels, normalise, invert
//! 4. [`glyphs`]    — map intensities to palette glyphs and break lines
//!
//! The whole transform is pure and CPU-bound: no I/O, no shared state, cost
//! bounded by `max_side²`. Identical inputs produce byte-identical blocks.

pub mod geometry;
pub mod glyphs;
pub mod intensity;
pub mod palette;

pub use geometry::GridSize;
pub use glyphs::GlyphBlock;
pub use intensity::IntensityGrid;
pub use palette::{GlyphPalette, DENSITY_ORDERING};

use crate::error::RenderError;
use image::DynamicImage;

/// Knobs for the core transform. Both defaults reproduce the original
/// edition's typesetting.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Largest allowed pre-skew grid dimension.
    pub max_side: u32,
    /// Width correction for tall character cells (7/4).
    pub skew: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_side: 40,
            skew: 1.75,
        }
    }
}

/// Render one subject's poem from an already-decoded image.
///
/// This is the single operation the core exposes: build the palette from the
/// subject's letters, compute the grid, aggregate intensities, and map them
/// to glyphs.
///
/// # Errors
/// * [`RenderError::InvalidSubject`] — subject has a letter with no density rank
/// * [`RenderError::DegenerateImage`] — image has a zero dimension
/// * [`RenderError::EmptyRange`] — image is perfectly flat
pub fn render_glyph_block(
    subject: &str,
    image: &DynamicImage,
    opts: &RenderOptions,
) -> Result<GlyphBlock, RenderError> {
    let palette = GlyphPalette::build(subject, DENSITY_ORDERING)?;
    let size = GridSize::compute(image.width(), image.height(), opts.max_side, opts.skew)?;
    let grid = IntensityGrid::from_image(image, size)?;
    Ok(GlyphBlock::map(&grid, &palette))
}
