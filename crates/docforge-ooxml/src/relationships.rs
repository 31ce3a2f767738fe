//! Relationships for the main document part
//!
//! OOXML maps relationship IDs to part targets through `_rels/*.rels` files.
//! The writer uses this for the styles, numbering, header, and footer parts,
//! whose presence varies per document.

/// Common relationship type URIs
impl Relationships {
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    /// Numbering relationship type
    pub const TYPE_NUMBERING: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    /// Header relationship type
    pub const TYPE_HEADER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    /// Footer relationship type
    pub const TYPE_FOOTER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
}

/// An ordered set of document relationships.
///
/// Maintains insertion order for deterministic XML serialization.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<(String, String, String)>, // (id, type, target)
}

impl Relationships {
    /// Create an empty relationship set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its generated ID (`rId1`, `rId2`, ...)
    pub fn add(&mut self, target: impl Into<String>, rel_type: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), rel_type.into(), target.into()));
        id
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no relationships have been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to `word/_rels/document.xml.rels` content
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target) in &self.entries {
            xml.push_str(&format!(
                "\n<Relationship Id=\"{id}\" Type=\"{rel_type}\" Target=\"{target}\"/>"
            ));
        }
        xml.push_str("\n</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add("styles.xml", Relationships::TYPE_STYLES), "rId1");
        assert_eq!(
            rels.add("numbering.xml", Relationships::TYPE_NUMBERING),
            "rId2"
        );
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut rels = Relationships::new();
        rels.add("styles.xml", Relationships::TYPE_STYLES);
        rels.add("header1.xml", Relationships::TYPE_HEADER);
        let xml = rels.to_xml();
        let styles_pos = xml.find("styles.xml").unwrap();
        let header_pos = xml.find("header1.xml").unwrap();
        assert!(styles_pos < header_pos);
    }
}
