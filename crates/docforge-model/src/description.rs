//! Document description root.

use serde::Serialize;

use crate::section::Section;

/// The root of the declarative document format.
///
/// Constructed from request input, consumed once by the renderer, then
/// discarded; it is never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DocumentDescription {
    /// Document title, rendered centered at the top of the body.
    pub title: Option<String>,
    /// Subtitle, rendered under the title.
    pub subtitle: Option<String>,
    /// Page header text (page-layout region, not body flow).
    pub header: Option<String>,
    /// Page footer text.
    pub footer: Option<String>,
    /// Ordered sections; rendering order equals this order.
    pub sections: Vec<Section>,
}

impl DocumentDescription {
    /// Create an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a description with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Append a section.
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Number of `table` / `key_value_table` sections.
    pub fn table_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s, Section::Table(_) | Section::KeyValueTable(_)))
            .count()
    }

    /// True when the description has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{KeyValueSection, TableSection};

    #[test]
    fn table_count_covers_both_table_kinds() {
        let mut desc = DocumentDescription::with_title("t");
        desc.push(Section::PageBreak);
        desc.push(Section::Table(TableSection::default()));
        desc.push(Section::KeyValueTable(KeyValueSection::default()));
        assert_eq!(desc.table_count(), 2);
    }
}
