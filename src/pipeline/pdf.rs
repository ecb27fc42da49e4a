//! PDF conversion: hand the assembled HTML to wkhtmltopdf.
//!
//! ## Why shell out?
//!
//! Paginated HTML-to-PDF layout is an entire browser engine's worth of work;
//! wkhtmltopdf bundles one and is what the original editions used (via
//! pdfkit). The HTML is written to a managed temp file because wkhtmltopdf
//! wants a path, and the file is cleaned up automatically when the handle
//! drops, even on error.

use crate::error::ConcreteError;
use std::io::Write;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// The original edition's page setup: one-inch margins, UTF-8, no outline.
const WKHTMLTOPDF_ARGS: &[&str] = &[
    "--margin-top",
    "1in",
    "--margin-bottom",
    "1in",
    "--margin-left",
    "1in",
    "--margin-right",
    "1in",
    "--encoding",
    "utf-8",
    "--no-outline",
    "--quiet",
];

/// Convert `html` to a paginated PDF at `output_path`.
///
/// # Errors
/// * [`ConcreteError::PdfRendererMissing`] — wkhtmltopdf is not on PATH
/// * [`ConcreteError::PdfRenderFailed`] — wkhtmltopdf exited non-zero
/// * [`ConcreteError::OutputWriteFailed`] — the output location is unwritable
pub async fn render_pdf(html: &str, output_path: &Path) -> Result<(), ConcreteError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ConcreteError::OutputWriteFailed {
                    path: output_path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    // wkhtmltopdf resolves relative resources against the file's directory,
    // and misparses extension-less paths, so keep the .html suffix.
    let mut html_file = tempfile::Builder::new()
        .prefix("concrete-")
        .suffix(".html")
        .tempfile()
        .map_err(|e| ConcreteError::Internal(format!("tempfile: {e}")))?;
    html_file
        .write_all(html.as_bytes())
        .map_err(|e| ConcreteError::Internal(format!("tempfile write: {e}")))?;
    html_file
        .flush()
        .map_err(|e| ConcreteError::Internal(format!("tempfile flush: {e}")))?;

    debug!("Invoking wkhtmltopdf → {}", output_path.display());

    let result = Command::new("wkhtmltopdf")
        .args(WKHTMLTOPDF_ARGS)
        .arg(html_file.path())
        .arg(output_path)
        .output()
        .await;

    let output = match result {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConcreteError::PdfRendererMissing);
        }
        Err(e) => return Err(ConcreteError::Internal(format!("wkhtmltopdf spawn: {e}"))),
    };

    if !output.status.success() {
        return Err(ConcreteError::PdfRenderFailed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    info!("Wrote {}", output_path.display());
    Ok(())
}

/// Write `html` itself to `output_path` (the `.html` output escape hatch).
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_html(html: &str, output_path: &Path) -> Result<(), ConcreteError> {
    let write_err = |e: std::io::Error| ConcreteError::OutputWriteFailed {
        path: output_path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
    }

    let tmp_path = output_path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, html).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, output_path)
        .await
        .map_err(write_err)?;
    Ok(())
}
