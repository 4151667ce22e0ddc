//! Integration tests for importing catalog XML into a viewable dataset

use cwetree::core::catalog::Catalog;
use cwetree::core::controller::{TreeViewController, ViewSettings};
use cwetree::core::dataset::{DatasetSource, DirectorySource};
use cwetree::core::models::ViewId;
use cwetree::CweTreeError;
use std::fs;
use tempfile::TempDir;

const RESEARCH_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Weakness_Catalog Name="VIEW LIST: CWE-1000: Research Concepts" Version="4.14">
  <Weaknesses>
    <Weakness ID="707" Name="Improper Neutralization" Abstraction="Pillar"/>
    <Weakness ID="74" Name="Injection" Abstraction="Class">
      <Related_Weaknesses>
        <Related_Weakness Nature="ChildOf" CWE_ID="707" View_ID="1000" Ordinal="Primary"/>
      </Related_Weaknesses>
    </Weakness>
    <Weakness ID="89" Name="SQL Injection" Abstraction="Base">
      <Related_Weaknesses>
        <Related_Weakness Nature="ChildOf" CWE_ID="943" View_ID="1000" Ordinal="Primary"/>
        <Related_Weakness Nature="ChildOf" CWE_ID="74" View_ID="1000"/>
      </Related_Weaknesses>
    </Weakness>
    <Weakness ID="943" Name="Improper Neutralization of Special Elements in Data Query Logic">
      <Related_Weaknesses>
        <Related_Weakness Nature="ChildOf" CWE_ID="74" View_ID="1000"/>
      </Related_Weaknesses>
    </Weakness>
    <Weakness ID="664" Name="Improper Control of a Resource Through its Lifetime"/>
  </Weaknesses>
</Weakness_Catalog>"#;

#[test]
fn imported_file_loads_in_the_viewer() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let xml_path = dir.path().join("1000.xml");
    fs::write(&xml_path, RESEARCH_XML).expect("Failed to write XML");

    let catalog = Catalog::from_file(&xml_path).expect("Failed to parse catalog");
    assert_eq!(catalog.len(), 5);

    let record = catalog
        .build_tree(ViewId::Research)
        .expect("Failed to build tree");
    let source = DirectorySource::new(dir.path().join("data"));
    source
        .store(ViewId::Research, &record)
        .expect("Failed to store dataset");
    assert_eq!(source.load(ViewId::Research).expect("load"), record);

    let mut controller = TreeViewController::new(ViewSettings::default());
    assert!(controller.initialize("1000", &source));
    let tree = controller.tree().expect("tree loaded");
    let top: Vec<&str> = tree
        .node(tree.root())
        .children()
        .iter()
        .map(|&id| tree.node(id).cid.as_str())
        .collect();
    assert_eq!(top, ["707", "664"]);
}

#[test]
fn weakness_with_two_parents_appears_under_both() {
    let catalog = Catalog::parse(RESEARCH_XML).expect("parse");
    let record = catalog.build_tree(ViewId::Research).expect("build");

    // 707 > 74 > {89, 943 > 89}
    let injection = &record.children[0].children[0];
    assert_eq!(injection.cid, "74");
    let under_injection: Vec<&str> = injection.children.iter().map(|c| c.cid.as_str()).collect();
    assert_eq!(under_injection, ["89", "943"]);
    assert_eq!(injection.children[1].children[0].cid, "89");
    assert_eq!(record.count(), 7);
}

#[test]
fn malformed_and_empty_catalogs_are_rejected() {
    assert!(matches!(
        Catalog::parse("<Weakness ID=\"1\"><oops></Weakness>"),
        Err(CweTreeError::Xml(_))
    ));

    let empty = Catalog::parse("<Weakness_Catalog/>").expect("parse");
    assert!(empty.is_empty());
    assert!(matches!(
        empty.build_tree(ViewId::Development),
        Err(CweTreeError::EmptyCatalog)
    ));
}
