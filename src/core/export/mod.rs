//! Static exports of a view's tree
//!
//! The interactive view lives in the terminal; these exporters write the same
//! tree as an HTML page, a Markdown outline, or dataset JSON.

pub mod html;
pub mod json;
pub mod markdown;

pub use html::HtmlExporter;
pub use json::JsonExporter;
pub use markdown::MarkdownExporter;

use crate::core::controller::ViewSettings;
use crate::core::error::{CweTreeError, Result};
use crate::core::label::{tooltip, truncate_label};
use crate::core::models::{CweRecord, ViewId};
use crate::core::reference::reference_url;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Self-contained page of nested `<details>` elements
    Html,
    /// Nested list with reference links
    Markdown,
    /// Dataset JSON
    Json,
}

impl ExportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }

    /// Exporter writing this format
    #[must_use]
    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Self::Html => Box::new(HtmlExporter::new()),
            Self::Markdown => Box::new(MarkdownExporter::new()),
            Self::Json => Box::new(JsonExporter::new()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CweTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(CweTreeError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Everything an exporter needs
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    /// View being exported
    pub view: ViewId,
    /// Tree contents
    pub record: &'a CweRecord,
    /// Label length and reference URL base
    pub settings: &'a ViewSettings,
}

impl<'a> ExportContext<'a> {
    /// Create a new export context
    #[must_use]
    pub const fn new(view: ViewId, record: &'a CweRecord, settings: &'a ViewSettings) -> Self {
        Self {
            view,
            record,
            settings,
        }
    }

    /// Label as shown on screen
    #[must_use]
    pub fn label(&self, record: &CweRecord) -> String {
        truncate_label(&record.name, self.settings.label_length)
    }

    /// Hover text
    #[must_use]
    pub fn tooltip(&self, record: &CweRecord) -> String {
        tooltip(&record.name, &record.cid)
    }

    /// Reference page of an entry
    #[must_use]
    pub fn url(&self, record: &CweRecord) -> String {
        reference_url(&self.settings.reference_url, &record.cid)
    }

    /// Page title
    #[must_use]
    pub fn title(&self) -> String {
        format!("CWE-{} {}", self.view.id(), self.record.name)
    }
}

/// Trait for tree exporters
pub trait Exporter {
    /// Export content as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &ExportContext) -> Result<String>;

    /// Export to a file, creating parent directories as needed
    ///
    /// # Errors
    /// Returns an error if rendering or writing fails
    fn generate(&self, ctx: &ExportContext, output_path: &Path) -> Result<()> {
        let content = self.render(ctx)?;
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CweTreeError::io(parent, e))?;
        }
        fs::write(output_path, content).map_err(|e| CweTreeError::io(output_path, e))
    }
}

/// Default export file name for a view
#[must_use]
pub fn export_file_name(view: ViewId, format: ExportFormat) -> String {
    format!("cwe-{}.{}", view.id(), format.extension())
}
