//! Import command handler
//!
//! Turns a MITRE CWE view XML file into the dataset the viewer loads.

use cwetree::config::Config;
use cwetree::core::catalog::Catalog;
use cwetree::core::dataset::DirectorySource;
use cwetree::core::models::ViewId;
use cwetree::{error, info, verbose, Result};
use std::path::{Path, PathBuf};

/// Run the import command
pub fn run(input_file: &Path, view: &str, config: &Config) {
    match import(input_file, view, Path::new(&config.paths.data_dir)) {
        Ok((path, entries)) => println!("✓ Imported {entries} entries into {}", path.display()),
        Err(e) => {
            error!("Import of {} failed: {e}", input_file.display());
            eprintln!("✗ Failed to import {}: {e}", input_file.display());
            std::process::exit(1);
        }
    }
}

/// Import `input_file` as `view` into `data_dir`, returning the dataset path and
/// the number of tree entries written
pub fn import(input_file: &Path, view: &str, data_dir: &Path) -> Result<(PathBuf, usize)> {
    let view: ViewId = view.parse()?;
    let catalog = Catalog::from_file(input_file)?;
    verbose!(
        "Read {} weaknesses from {}",
        catalog.len(),
        input_file.display()
    );

    let record = catalog.build_tree(view)?;
    let path = DirectorySource::new(data_dir).store(view, &record)?;
    info!("Wrote view {view} dataset to {}", path.display());
    Ok((path, record.count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwetree::core::dataset::DatasetSource;
    use tempfile::TempDir;

    #[test]
    fn writes_a_loadable_dataset() {
        let temp = TempDir::new().expect("temp dir");
        let xml = temp.path().join("699.xml");
        std::fs::write(
            &xml,
            r#"<Weakness_Catalog xmlns="http://cwe.mitre.org/cwe-6">
  <Weaknesses>
    <Weakness ID="1" Name="Parent"/>
    <Weakness ID="2" Name="Child">
      <Related_Weaknesses>
        <Related_Weakness Nature="ChildOf" CWE_ID="1" View_ID="699"/>
      </Related_Weaknesses>
    </Weakness>
  </Weaknesses>
</Weakness_Catalog>"#,
        )
        .expect("write xml");

        let data = temp.path().join("data");
        let (path, entries) = import(&xml, "699", &data).expect("import");
        assert_eq!(path, data.join("699.json"));
        assert_eq!(entries, 3);

        let record = DirectorySource::new(&data)
            .load(ViewId::Development)
            .expect("load");
        assert_eq!(record.name, "Development Concepts");
        assert_eq!(record.children[0].children[0].cid, "2");
    }

    #[test]
    fn unknown_view_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        assert!(import(&temp.path().join("x.xml"), "42", temp.path()).is_err());
    }
}
