//! Export command handler
//!
//! Writes a view as a static HTML page, a Markdown outline, or dataset JSON.

use super::resolve_view;
use cwetree::config::Config;
use cwetree::core::dataset::{DatasetSource, DirectorySource};
use cwetree::core::export::{export_file_name, ExportContext, ExportFormat};
use cwetree::{error, info, Result};
use std::path::{Path, PathBuf};

/// Run the export command
pub fn run(view: Option<&str>, format: &str, output: Option<&Path>, config: &Config) {
    match export(view, format, output, config) {
        Ok(path) => println!("✓ Exported to {}", path.display()),
        Err(e) => {
            error!("Export failed: {e}");
            eprintln!("✗ Export failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Export a view, returning the written path
pub fn export(
    view: Option<&str>,
    format: &str,
    output: Option<&Path>,
    config: &Config,
) -> Result<PathBuf> {
    let view = resolve_view(view, config)?;
    let format: ExportFormat = format.parse()?;

    let record = DirectorySource::new(&config.paths.data_dir).load(view)?;
    let settings = config.view_settings();
    let ctx = ExportContext::new(view, &record, &settings);

    let path = output.map_or_else(
        || Path::new(&config.paths.exports_dir).join(export_file_name(view, format)),
        Path::to_path_buf,
    );
    format.exporter().generate(&ctx, &path)?;
    info!(
        "Exported view {view} as {format} ({} entries) to {}",
        record.count(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwetree::core::models::{CweRecord, ViewId};
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.paths.data_dir = dir.join("data").to_string_lossy().to_string();
        config.paths.exports_dir = dir.join("exports").to_string_lossy().to_string();
        config.view.default_view = "1000".to_string();
        config
    }

    #[test]
    fn exports_into_the_exports_dir_by_default() {
        let temp = TempDir::new().expect("temp dir");
        let config = config_in(temp.path());
        DirectorySource::new(&config.paths.data_dir)
            .store(ViewId::Research, &CweRecord::leaf("1000", "Research Concepts"))
            .expect("store dataset");

        let path = export(None, "md", None, &config).expect("export");
        assert_eq!(path, temp.path().join("exports").join("cwe-1000.md"));
        let text = std::fs::read_to_string(path).expect("read export");
        assert!(text.starts_with("# CWE-1000 Research Concepts"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let config = config_in(temp.path());
        assert!(export(Some("1000"), "pdf", None, &config).is_err());
    }
}
