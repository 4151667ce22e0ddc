//! Integration tests for exporting views to files

use cwetree::core::controller::ViewSettings;
use cwetree::core::dataset::parse_dataset;
use cwetree::core::export::{export_file_name, ExportContext, ExportFormat};
use cwetree::core::models::{CweRecord, ViewId};
use std::fs;
use tempfile::TempDir;

fn research() -> CweRecord {
    CweRecord::with_children(
        "1000",
        "Research Concepts",
        vec![
            CweRecord::with_children(
                "707",
                "Improper Neutralization",
                vec![CweRecord::leaf("89", "SQL [classic] Injection")],
            ),
            CweRecord::leaf("664", "Improper Control of a Resource Through its Lifetime"),
        ],
    )
}

#[test]
fn every_format_writes_a_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let record = research();
    let settings = ViewSettings::default();
    let ctx = ExportContext::new(ViewId::Research, &record, &settings);

    for format in [ExportFormat::Html, ExportFormat::Markdown, ExportFormat::Json] {
        let path = dir
            .path()
            .join("nested")
            .join(export_file_name(ViewId::Research, format));
        format
            .exporter()
            .generate(&ctx, &path)
            .expect("Failed to export");
        let content = fs::read_to_string(&path).expect("Failed to read export");
        assert!(content.contains("664"), "{format} export lacks an entry");
    }

    assert!(dir.path().join("nested/cwe-1000.html").is_file());
    assert!(dir.path().join("nested/cwe-1000.md").is_file());
    assert!(dir.path().join("nested/cwe-1000.json").is_file());
}

#[test]
fn json_export_reloads_as_a_dataset() {
    let record = research();
    let settings = ViewSettings::default();
    let ctx = ExportContext::new(ViewId::Research, &record, &settings);
    let json = ExportFormat::Json
        .exporter()
        .render(&ctx)
        .expect("Failed to render");
    assert_eq!(parse_dataset(&json).expect("Failed to parse"), record);
}

#[test]
fn html_and_markdown_use_display_settings() {
    let record = research();
    let settings = ViewSettings {
        label_length: 15,
        reference_url: "https://mirror.example/defs/".to_string(),
        ..ViewSettings::default()
    };
    let ctx = ExportContext::new(ViewId::Research, &record, &settings);

    let html = ExportFormat::Html.exporter().render(&ctx).expect("html");
    assert!(html.contains("<title>CWE-1000 Research Concepts</title>"));
    assert!(html.contains("href=\"https://mirror.example/defs/664.html\""));
    assert!(html.contains(">Improper Con...</a>"));
    assert!(html.contains("title=\"Improper Control of a Resource Through its Lifetime [664]\""));

    let md = ExportFormat::Markdown.exporter().render(&ctx).expect("md");
    assert!(md.contains("- [Improper Neu...](https://mirror.example/defs/707.html) `CWE-707`"));
    assert!(md.contains("  - [SQL \\[classic...](https://mirror.example/defs/89.html) `CWE-89`"));
    assert!(md.contains("4 entries"));
}

#[test]
fn unknown_format_is_an_error() {
    assert!("pdf".parse::<ExportFormat>().is_err());
    assert_eq!("Markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
}
