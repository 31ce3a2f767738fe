//! Paragraph-level editing of existing documents
//!
//! The editor loads a package, locates the top body-level paragraphs in
//! `word/document.xml`, and applies ordered operations against them. Tables
//! are opaque to the editor: their inner paragraphs are never addressed.
//! Saving goes through the archive's atomic write.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::archive::OoxmlArchive;
use crate::error::{OoxmlError, Result};
use crate::writer::{escape_xml, heading_paragraph_xml, paragraph_xml};

/// One edit operation, in the order it should be applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditOperation {
    /// Append a plain paragraph at the end of the body.
    AddParagraph { text: String },
    /// Append a heading at the end of the body.
    AddHeading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    /// Replace the text of the paragraph at `index` (0-based, body order).
    EditParagraph { index: usize, text: String },
    /// Remove the paragraph at `index`.
    DeleteParagraph { index: usize },
}

fn default_heading_level() -> u8 {
    1
}

/// Editor over a document on disk.
pub struct DocxEditor {
    archive: OoxmlArchive,
    body: String,
    path: PathBuf,
}

impl DocxEditor {
    /// Open a document for editing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let archive = OoxmlArchive::open(&path)?;
        let body = archive
            .get_string("word/document.xml")
            .ok_or_else(|| OoxmlError::MissingFile("word/document.xml".to_string()))?;
        Ok(Self {
            archive,
            body,
            path,
        })
    }

    /// Number of top body-level paragraphs.
    pub fn paragraph_count(&self) -> usize {
        paragraph_ranges(&self.body).len()
    }

    /// Apply a sequence of operations in order.
    pub fn apply_all(&mut self, operations: &[EditOperation]) -> Result<()> {
        for op in operations {
            self.apply(op)?;
        }
        Ok(())
    }

    /// Apply one operation.
    pub fn apply(&mut self, operation: &EditOperation) -> Result<()> {
        match operation {
            EditOperation::AddParagraph { text } => {
                self.append(&paragraph_xml(text));
                Ok(())
            }
            EditOperation::AddHeading { text, level } => {
                self.append(&heading_paragraph_xml(*level, text));
                Ok(())
            }
            EditOperation::EditParagraph { index, text } => {
                let (start, end) = self.paragraph_range(*index)?;
                self.body.replace_range(
                    start..end,
                    &format!(
                        "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                        escape_xml(text)
                    ),
                );
                Ok(())
            }
            EditOperation::DeleteParagraph { index } => {
                let (start, end) = self.paragraph_range(*index)?;
                self.body.replace_range(start..end, "");
                Ok(())
            }
        }
    }

    /// Save the edited document back to its path atomically.
    pub fn save(mut self) -> Result<()> {
        self.archive.set_string("word/document.xml", self.body);
        self.archive.save(&self.path)?;
        log::info!("saved edited document to {}", self.path.display());
        Ok(())
    }

    fn paragraph_range(&self, index: usize) -> Result<(usize, usize)> {
        let ranges = paragraph_ranges(&self.body);
        ranges
            .get(index)
            .copied()
            .ok_or(OoxmlError::ParagraphOutOfRange {
                index,
                count: ranges.len(),
            })
    }

    /// Insert markup at the end of the body, before the section properties.
    fn append(&mut self, markup: &str) {
        let insert_at = find_tag(&self.body, "<w:sectPr", 0)
            .or_else(|| self.body.find("</w:body>"))
            .unwrap_or(self.body.len());
        self.body.insert_str(insert_at, markup);
    }
}

/// Byte ranges of the top body-level `w:p` elements, skipping tables.
fn paragraph_ranges(xml: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut pos = 0;

    loop {
        let next_p = find_tag(xml, "<w:p", pos);
        let next_tbl = find_tag(xml, "<w:tbl", pos);

        match (next_p, next_tbl) {
            (Some(p), Some(t)) if t < p => pos = skip_table(xml, t),
            (Some(p), _) => {
                let end = paragraph_end(xml, p);
                ranges.push((p, end));
                pos = end;
            }
            (None, Some(t)) => pos = skip_table(xml, t),
            (None, None) => break,
        }
    }

    ranges
}

/// Find a tag occurrence where the name is not a prefix of a longer name
/// (`<w:p` must not match `<w:pPr`).
fn find_tag(xml: &str, tag: &str, from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(offset) = xml[search..].find(tag) {
        let at = search + offset;
        match xml.as_bytes().get(at + tag.len()) {
            Some(b'>') | Some(b' ') | Some(b'/') => return Some(at),
            _ => search = at + tag.len(),
        }
    }
    None
}

/// End offset (exclusive) of the paragraph starting at `start`.
fn paragraph_end(xml: &str, start: usize) -> usize {
    // Self-closing form first
    if xml[start..].starts_with("<w:p/>") {
        return start + "<w:p/>".len();
    }
    match xml[start..].find("</w:p>") {
        Some(offset) => start + offset + "</w:p>".len(),
        None => xml.len(),
    }
}

/// Offset just past the matching `</w:tbl>`, handling nested tables.
fn skip_table(xml: &str, start: usize) -> usize {
    let mut depth = 1;
    let mut pos = start + "<w:tbl".len();
    while depth > 0 {
        let open = find_tag(xml, "<w:tbl", pos);
        let close = xml[pos..].find("</w:tbl>").map(|o| pos + o);
        match (open, close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                pos = o + "<w:tbl".len();
            }
            (_, Some(c)) => {
                depth -= 1;
                pos = c + "</w:tbl>".len();
            }
            _ => return xml.len(),
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<w:document><w:body>
<w:p><w:r><w:t>one</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>in table</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p/>
<w:p><w:r><w:t>three</w:t></w:r></w:p>
<w:sectPr></w:sectPr>
</w:body></w:document>"#;

    #[test]
    fn ranges_skip_table_paragraphs() {
        let ranges = paragraph_ranges(BODY);
        assert_eq!(ranges.len(), 3);
        assert!(BODY[ranges[0].0..ranges[0].1].contains("one"));
        assert_eq!(&BODY[ranges[1].0..ranges[1].1], "<w:p/>");
        assert!(BODY[ranges[2].0..ranges[2].1].contains("three"));
    }

    #[test]
    fn find_tag_requires_name_boundary() {
        let xml = "<w:pPr/><w:p>";
        assert_eq!(find_tag(xml, "<w:p", 0), Some(8));
    }

    #[test]
    fn nested_tables_are_skipped_whole() {
        let xml = "<w:tbl><w:tbl></w:tbl><w:p/></w:tbl><w:p/>";
        let ranges = paragraph_ranges(xml);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].0, 36);
    }
}
