//! Document assembly: rendered blocks → one HTML edition.
//!
//! ## Whitespace preservation
//!
//! HTML collapses runs of spaces, which would destroy the halftone — the
//! blanks carry as much of the picture as the letters do. Every literal
//! space in *text content* is therefore replaced with `&nbsp;` before the
//! content is embedded in markup. Tags and the style block are never
//! touched: a blanket replace over finished markup would mangle any tag
//! with an attribute (`<p class="poem">` → `<p&nbsp;class="poem">`).

use crate::render::GlyphBlock;
use chrono::{DateTime, Local};

/// Monospace, tight leading, one poem per page.
const EDITION_STYLE: &str = "\
body { font-family: 'Courier New', Courier, monospace; }
h1, h2 { font-weight: normal; }
h2 { page-break-before: always; }
p.poem { font-size: 10px; line-height: 1.1; letter-spacing: 0; }";

/// Assemble the full HTML edition from ordered `(subject, block)` pairs.
///
/// The input order is the edition order: the index list and the poem pages
/// both follow it. Failed subjects simply don't appear in `poems`.
pub fn assemble_edition(
    title: &str,
    poems: &[(&str, &GlyphBlock)],
    generated_at: DateTime<Local>,
) -> String {
    let mut body = String::new();

    body.push_str(&format!("<h1>{}</h1>", text(title)));
    body.push_str("<p>https://github.com/nmifsud/concrete</p>");
    body.push_str(&format!(
        "<p>{}</p>",
        text(&format!(
            "generated on {}",
            generated_at.format("%d %b %Y at %-H:%M:%S")
        ))
    ));

    body.push_str(&format!("<br><p>{}</p><ul>", text("featured in this edition:")));
    for (subject, _) in poems {
        body.push_str(&format!("<li>{}</li>", text(subject)));
    }
    body.push_str("</ul>");

    for (subject, block) in poems {
        // Block lines contain only palette glyphs, so no markup escaping is
        // needed; the blanks still have to be hardened.
        body.push_str(&format!(
            "<h2>{}</h2><p class=\"poem\">{}</p>",
            text(subject),
            block.join("<br>").replace(' ', "&nbsp;")
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <style>{EDITION_STYLE}</style></head>\n<body>{body}</body></html>\n"
    )
}

/// Escape markup characters, then harden every blank against whitespace
/// collapsing. For text content only, never for finished markup.
fn text(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace(' ', "&nbsp;")
}
