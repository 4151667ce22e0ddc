//! Integration tests for dataset storage on disk

use cwetree::core::controller::{TreeViewController, ViewSettings};
use cwetree::core::dataset::{DatasetSource, DirectorySource};
use cwetree::core::models::{CweRecord, ViewId};
use cwetree::CweTreeError;
use std::fs;
use tempfile::TempDir;

fn architectural() -> CweRecord {
    CweRecord::with_children(
        "1008",
        "Architectural Concepts",
        vec![
            CweRecord::with_children(
                "1010",
                "Authenticate Actors",
                vec![CweRecord::leaf("287", "Improper Authentication")],
            ),
            CweRecord::leaf("1011", "Authorize Actors"),
        ],
    )
}

#[test]
fn store_then_load_returns_the_same_record() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let source = DirectorySource::new(dir.path().join("data"));

    let path = source
        .store(ViewId::Architectural, &architectural())
        .expect("Failed to store dataset");
    assert!(path.ends_with("1008.json"));
    assert_eq!(source.available(), [ViewId::Architectural]);

    let loaded = source
        .load(ViewId::Architectural)
        .expect("Failed to load dataset");
    assert_eq!(loaded, architectural());
}

#[test]
fn leaves_are_stored_without_children() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let source = DirectorySource::new(dir.path());
    let path = source
        .store(ViewId::Architectural, &architectural())
        .expect("Failed to store dataset");

    let text = fs::read_to_string(path).expect("Failed to read dataset");
    assert!(text.contains(r#"{"cid":"1011","name":"Authorize Actors"}"#));
}

#[test]
fn generated_script_files_are_accepted() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("699.js"),
        "var view_699 = {\"cid\":\"699\",\"name\":\"Development Concepts\",\"children\":[{\"cid\":\"1228\",\"name\":\"API / Function Errors\"}]};\n",
    )
    .expect("Failed to write dataset");

    let source = DirectorySource::new(dir.path());
    assert_eq!(source.available(), [ViewId::Development]);

    let mut controller = TreeViewController::new(ViewSettings::default());
    assert!(controller.initialize("699", &source));
    assert_eq!(controller.visible_ids().len(), 2);
}

#[test]
fn json_wins_over_script_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let source = DirectorySource::new(dir.path());
    source
        .store(ViewId::Development, &CweRecord::leaf("699", "From JSON"))
        .expect("Failed to store dataset");
    fs::write(
        dir.path().join("699.js"),
        "var view_699 = {\"cid\":\"699\",\"name\":\"From script\"};",
    )
    .expect("Failed to write dataset");

    let record = source.load(ViewId::Development).expect("Failed to load");
    assert_eq!(record.name, "From JSON");
}

#[test]
fn missing_and_malformed_datasets_are_errors() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let source = DirectorySource::new(dir.path());

    assert!(matches!(
        source.load(ViewId::Research),
        Err(CweTreeError::Io { .. })
    ));

    fs::write(dir.path().join("1000.json"), "{ not json").expect("Failed to write");
    assert!(matches!(
        source.load(ViewId::Research),
        Err(CweTreeError::Json(_))
    ));

    let mut controller = TreeViewController::new(ViewSettings::default());
    assert!(!controller.initialize("1000", &source));
    assert!(controller.tree().is_none());
}
