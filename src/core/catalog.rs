//! CWE catalog import
//!
//! Reads a MITRE CWE view XML file (`<Weakness ID=".." Name="..">` entries with
//! `<Related_Weakness Nature="ChildOf" CWE_ID=".."/>` links) and turns it into the
//! nested record the viewer loads. The root is the view itself; weaknesses
//! that declare no parent hang directly below it, and a weakness with several
//! parents appears under each of them. `ChildOf` links count whatever view they
//! name, so a weakness whose only parents are absent from the file is left out.

use crate::core::error::{CweTreeError, Result};
use crate::core::models::{CweRecord, ViewId};
use crate::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// One weakness entry and the ids it declares itself a child of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weakness {
    /// CWE identifier
    pub id: String,
    /// Weakness name
    pub name: String,
    /// `ChildOf` targets in document order
    pub parents: Vec<String>,
}

/// Weaknesses of one catalog file, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    weaknesses: Vec<Weakness>,
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| CweTreeError::Xml(e.to_string()))?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

impl Catalog {
    /// Parse catalog XML.
    ///
    /// # Errors
    /// Returns an error if the XML is malformed
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut weaknesses = Vec::new();
        let mut current: Option<Weakness> = None;

        loop {
            let (element, self_closing) = match reader.read_event()? {
                Event::Start(element) => (element, false),
                Event::Empty(element) => (element, true),
                Event::End(element) if element.local_name().as_ref() == b"Weakness" => {
                    if let Some(open) = current.take() {
                        weaknesses.push(open);
                    }
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            match element.local_name().as_ref() {
                b"Weakness" => {
                    if let Some(open) = current.take() {
                        weaknesses.push(open);
                    }
                    let weakness = Weakness {
                        id: attribute(&element, b"ID")?.unwrap_or_default(),
                        name: attribute(&element, b"Name")?.unwrap_or_default(),
                        parents: Vec::new(),
                    };
                    if self_closing {
                        weaknesses.push(weakness);
                    } else {
                        current = Some(weakness);
                    }
                }
                b"Related_Weakness" => {
                    let Some(open) = current.as_mut() else {
                        continue;
                    };
                    if attribute(&element, b"Nature")?.as_deref() != Some("ChildOf") {
                        continue;
                    }
                    if let Some(parent) = attribute(&element, b"CWE_ID")? {
                        if !open.parents.contains(&parent) {
                            open.parents.push(parent);
                        }
                    }
                }
                _ => {}
            }
        }
        if let Some(open) = current.take() {
            weaknesses.push(open);
        }

        weaknesses.retain(|w: &Weakness| !w.id.is_empty());
        debug!("Parsed {} weaknesses", weaknesses.len());
        Ok(Self { weaknesses })
    }

    /// Read and parse a catalog file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|e| CweTreeError::io(path, e))?;
        Self::parse(&xml)
    }

    /// Build a catalog from already known weaknesses
    #[must_use]
    pub const fn from_weaknesses(weaknesses: Vec<Weakness>) -> Self {
        Self { weaknesses }
    }

    /// Weaknesses in document order
    #[must_use]
    pub fn weaknesses(&self) -> &[Weakness] {
        &self.weaknesses
    }

    /// Number of weaknesses
    #[must_use]
    pub fn len(&self) -> usize {
        self.weaknesses.len()
    }

    /// True when the catalog has no weaknesses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weaknesses.is_empty()
    }

    /// Nest the weaknesses under a root record named after `view`.
    ///
    /// # Errors
    /// Returns [`CweTreeError::EmptyCatalog`] when there is nothing to nest
    pub fn build_tree(&self, view: ViewId) -> Result<CweRecord> {
        if self.weaknesses.is_empty() {
            return Err(CweTreeError::EmptyCatalog);
        }

        let known: HashSet<&str> = self.weaknesses.iter().map(|w| w.id.as_str()).collect();
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut top_level = Vec::new();
        let mut unplaced = 0usize;
        for (index, weakness) in self.weaknesses.iter().enumerate() {
            if weakness.parents.is_empty() {
                top_level.push(index);
                continue;
            }
            let mut placed = false;
            for parent in weakness.parents.iter().filter(|p| known.contains(p.as_str())) {
                children.entry(parent.as_str()).or_default().push(index);
                placed = true;
            }
            if !placed {
                unplaced += 1;
            }
        }
        if unplaced > 0 {
            debug!("{unplaced} weaknesses have no parent in this catalog and are left out");
        }

        let mut path = Vec::new();
        let root_children = top_level
            .into_iter()
            .map(|index| self.nest(index, &children, &mut path))
            .collect();
        Ok(CweRecord::with_children(view.id(), view.title(), root_children))
    }

    fn nest<'a>(
        &'a self,
        index: usize,
        children: &HashMap<&'a str, Vec<usize>>,
        path: &mut Vec<&'a str>,
    ) -> CweRecord {
        let weakness = &self.weaknesses[index];
        path.push(weakness.id.as_str());
        let kids: Vec<usize> = children
            .get(weakness.id.as_str())
            .map(|kids| {
                kids.iter()
                    .copied()
                    .filter(|&kid| {
                        let cyclic = path.contains(&self.weaknesses[kid].id.as_str());
                        if cyclic {
                            warn!(
                                "Skipping cyclic ChildOf link {} -> {}",
                                self.weaknesses[kid].id, weakness.id
                            );
                        }
                        !cyclic
                    })
                    .collect()
            })
            .unwrap_or_default();
        let nested = kids
            .into_iter()
            .map(|kid| self.nest(kid, children, path))
            .collect();
        path.pop();
        CweRecord::with_children(weakness.id.clone(), weakness.name.clone(), nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Weakness_Catalog xmlns="http://cwe.mitre.org/cwe-6" Name="VIEW LIST: CWE-1000" Version="4.0">
  <Weaknesses>
    <Weakness ID="20" Name="Improper Input Validation" Abstraction="Class">
      <Related_Weaknesses>
        <Related_Weakness Nature="ChildOf" CWE_ID="707" View_ID="1000" Ordinal="Primary"/>
      </Related_Weaknesses>
    </Weakness>
    <Weakness ID="707" Name="Improper Neutralization" Abstraction="Pillar"/>
    <Weakness ID="89" Name="SQL Injection &amp; friends">
      <Related_Weaknesses>
        <Related_Weakness Nature="ChildOf" CWE_ID="707" View_ID="1000"/>
        <Related_Weakness Nature="ChildOf" CWE_ID="20" View_ID="699"/>
        <Related_Weakness Nature="CanPrecede" CWE_ID="20" View_ID="1000"/>
      </Related_Weaknesses>
    </Weakness>
  </Weaknesses>
</Weakness_Catalog>"#;

    #[test]
    fn collects_weaknesses_in_document_order() {
        let catalog = Catalog::parse(XML).unwrap();
        let ids: Vec<&str> = catalog.weaknesses().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["20", "707", "89"]);
        assert_eq!(catalog.weaknesses()[2].name, "SQL Injection & friends");
        assert_eq!(catalog.weaknesses()[2].parents, ["707", "20"]);
    }

    #[test]
    fn links_count_whatever_view_they_name() {
        let catalog = Catalog::parse(
            r#"<Weaknesses>
  <Weakness ID="1" Name="one"/>
  <Weakness ID="2" Name="two">
    <Related_Weaknesses><Related_Weakness Nature="ChildOf" CWE_ID="999" View_ID="699"/></Related_Weaknesses>
  </Weakness>
  <Weakness ID="3" Name="three">
    <Related_Weaknesses><Related_Weakness Nature="ChildOf" CWE_ID="1" View_ID="1000"/></Related_Weaknesses>
  </Weakness>
</Weaknesses>"#,
        )
        .unwrap();
        let tree = catalog.build_tree(ViewId::Development).unwrap();

        let top: Vec<&str> = tree.children.iter().map(|c| c.cid.as_str()).collect();
        assert_eq!(top, ["1"]);
        assert_eq!(tree.children[0].children[0].cid, "3");
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn builds_nested_tree_under_view_root() {
        let catalog = Catalog::parse(XML).unwrap();
        let tree = catalog.build_tree(ViewId::Research).unwrap();
        assert_eq!(tree.cid, "1000");
        assert_eq!(tree.name, "Research Concepts");
        assert_eq!(tree.children.len(), 1);
        let pillar = &tree.children[0];
        assert_eq!(pillar.cid, "707");
        let kids: Vec<&str> = pillar.children.iter().map(|c| c.cid.as_str()).collect();
        assert_eq!(kids, ["20", "89"]);
    }

    #[test]
    fn multi_parent_weaknesses_appear_under_each_parent() {
        let catalog = Catalog::parse(XML).unwrap();
        let tree = catalog.build_tree(ViewId::Research).unwrap();
        // 707 > {20 > 89, 89}
        assert_eq!(tree.count(), 1 + 4);
    }

    #[test]
    fn cycles_are_broken() {
        let catalog = Catalog::from_weaknesses(vec![
            Weakness {
                id: "1".into(),
                name: "one".into(),
                parents: vec![],
            },
            Weakness {
                id: "2".into(),
                name: "two".into(),
                parents: vec!["1".into(), "3".into()],
            },
            Weakness {
                id: "3".into(),
                name: "three".into(),
                parents: vec!["2".into()],
            },
        ]);
        let tree = catalog.build_tree(ViewId::Development).unwrap();
        assert_eq!(tree.count(), 4);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let catalog = Catalog::parse("<Weakness_Catalog/>").unwrap();
        assert!(matches!(
            catalog.build_tree(ViewId::Research),
            Err(CweTreeError::EmptyCatalog)
        ));
    }
}
