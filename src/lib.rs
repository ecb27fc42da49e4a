//! # concrete-poetry
//!
//! Procedurally generated concrete poetry: each poem is an image rendered as
//! a halftone whose "ink" is the letters of the subject's own name.
//!
//! ## How a poem happens
//!
//! A subject — say *heron* — is drawn from a corpus. An image search finds
//! candidate pictures; the first candidate that downloads and decodes is
//! resized to a character grid, its per-cell brightness is normalised and
//! inverted, and every cell is replaced with one of the subject's letters,
//! ordered lightest to heaviest by glyph density (blanks for highlights, the
//! densest letters for shadows). The result reads as the picture from across
//! the room and as the word up close.
//!
//! ## Pipeline Overview
//!
//! ```text
//! corpus
//!  │
//!  ├─ 1. Select   draw N distinct subjects (seedable)
//!  ├─ 2. Search   candidate image URLs per subject (Google CSE)
//!  ├─ 3. Fetch    download candidates until one decodes and renders
//!  ├─ 4. Render   palette → grid → intensity → glyph block  (pure core)
//!  ├─ 5. Assemble HTML edition: title, index, one poem per page
//!  └─ 6. Output   wkhtmltopdf → paginated PDF (or raw HTML)
//! ```
//!
//! Subjects are processed concurrently; edition order is always sampling
//! order. A subject whose candidates all fail is dropped from the edition
//! and reported in [`GenerationStats`]; the run fails only when every
//! subject fails.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use concrete_poetry::{generate, GeneratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials auto-detected from GOOGLE_API_KEY / GOOGLE_CSE_ID
//!     let config = GeneratorConfig::builder().count(5).build()?;
//!     let output = generate(&config).await?;
//!     for (subject, block) in output.poems() {
//!         println!("{subject}\n{block}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The core transform is also usable on its own, no network involved:
//!
//! ```rust,no_run
//! use concrete_poetry::render::{render_glyph_block, RenderOptions};
//!
//! let image = image::open("heron.png").unwrap();
//! let block = render_glyph_block("heron", &image, &RenderOptions::default()).unwrap();
//! print!("{block}");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `concrete` binary (clap + anyhow + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! concrete-poetry = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use error::{ConcreteError, RenderError, SubjectError};
pub use generate::{generate, generate_sync, generate_to_file};
pub use output::{GenerationOutput, GenerationStats, SubjectResult};
pub use pipeline::search::{GoogleImageSearch, ImageSearch};
pub use progress::GenerationProgress;
pub use render::{render_glyph_block, GlyphBlock, GlyphPalette, RenderOptions, DENSITY_ORDERING};
