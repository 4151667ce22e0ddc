//! HTML exporter
//!
//! Writes one self-contained page. Every inner entry is a `<details>` element,
//! closed by default except the root, so the page opens in the same state as the
//! interactive view.

use crate::core::error::Result;
use crate::core::export::{ExportContext, Exporter};
use crate::core::models::CweRecord;
use std::fmt::Write;

/// Embedded HTML page template
const HTML_TEMPLATE: &str = include_str!("templates/tree.html");

/// Escape text for element content and attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML exporter
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExporter;

impl HtmlExporter {
    /// Create a new HTML exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_entry(out: &mut String, ctx: &ExportContext, record: &CweRecord, depth: usize) {
        let indent = "  ".repeat(depth);
        let link = format!(
            "<a href=\"{}\" target=\"_blank\" title=\"{}\">{}</a>",
            escape_html(&ctx.url(record)),
            escape_html(&ctx.tooltip(record)),
            escape_html(&ctx.label(record)),
        );

        if record.children.is_empty() {
            let _ = writeln!(out, "{indent}<div class=\"leaf\">{link}</div>");
            return;
        }

        let open = if depth == 0 { " open" } else { "" };
        let _ = writeln!(out, "{indent}<details{open}>");
        let _ = writeln!(out, "{indent}  <summary>{link}</summary>");
        for child in &record.children {
            Self::write_entry(out, ctx, child, depth + 1);
        }
        let _ = writeln!(out, "{indent}</details>");
    }
}

impl Exporter for HtmlExporter {
    fn render(&self, ctx: &ExportContext) -> Result<String> {
        let mut tree = String::new();
        Self::write_entry(&mut tree, ctx, ctx.record, 0);

        Ok(HTML_TEMPLATE
            .replace("{{title}}", &escape_html(&ctx.title()))
            .replace("{{count}}", &ctx.record.count().to_string())
            .replace("{{version}}", crate::get_version())
            .replace("{{tree}}", tree.trim_end()))
    }
}
