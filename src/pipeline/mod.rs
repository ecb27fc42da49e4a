//! Pipeline stages around the core renderer.
//!
//! Each submodule implements exactly one collaborator from the system
//! design. Keeping stages separate makes each independently testable and
//! lets us swap implementations (e.g. a different search backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! corpus ──▶ search ──▶ fetch ──▶ (core render) ──▶ assemble ──▶ pdf
//! (names)   (URLs)    (bytes,      per subject      (HTML)    (wkhtmltopdf)
//!                      advance
//!                      on error)
//! ```
//!
//! 1. [`corpus`]   — draw N distinct subject names
//! 2. [`search`]   — candidate image URLs per subject, behind a trait
//! 3. [`fetch`]    — download/decode/render candidates until one sticks;
//!    the only stateful iteration around the pure core
//! 4. [`assemble`] — ordered blocks + index → one HTML edition
//! 5. [`pdf`]      — external wkhtmltopdf invocation

pub mod assemble;
pub mod corpus;
pub mod fetch;
pub mod pdf;
pub mod search;
