//! Markdown exporter
//!
//! Renders the tree as a nested bullet list. Each entry links to its reference
//! page and carries the CWE id.

use crate::core::error::Result;
use crate::core::export::{ExportContext, Exporter};
use crate::core::models::CweRecord;
use std::fmt::Write;

/// Embedded Markdown template
const MARKDOWN_TEMPLATE: &str = include_str!("templates/tree.md");

fn escape_brackets(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Markdown exporter
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Create a new Markdown exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_entry(out: &mut String, ctx: &ExportContext, record: &CweRecord, depth: usize) {
        let _ = writeln!(
            out,
            "{}- [{}]({}) `CWE-{}`",
            "  ".repeat(depth),
            escape_brackets(&ctx.label(record)),
            ctx.url(record),
            record.cid
        );
        for child in &record.children {
            Self::write_entry(out, ctx, child, depth + 1);
        }
    }
}

impl Exporter for MarkdownExporter {
    fn render(&self, ctx: &ExportContext) -> Result<String> {
        let mut list = String::new();
        for child in &ctx.record.children {
            Self::write_entry(&mut list, ctx, child, 0);
        }

        Ok(MARKDOWN_TEMPLATE
            .replace("{{title}}", &ctx.title())
            .replace("{{count}}", &ctx.record.count().to_string())
            .replace("{{version}}", crate::get_version())
            .replace("{{tree}}", list.trim_end()))
    }
}
