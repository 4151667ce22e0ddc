//! JSON exporter, writing the dataset format back

use crate::core::dataset::to_dataset_json;
use crate::core::error::Result;
use crate::core::export::{ExportContext, Exporter};

/// Dataset JSON exporter
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl JsonExporter {
    /// Create a new JSON exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Exporter for JsonExporter {
    fn render(&self, ctx: &ExportContext) -> Result<String> {
        to_dataset_json(ctx.record, true)
    }
}
