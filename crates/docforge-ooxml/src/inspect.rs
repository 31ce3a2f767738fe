//! Structural inspection (docx → fingerprint)
//!
//! Reads a document package and extracts the structural metadata used for
//! comparison: table dimensions and layout, body paragraph count, and
//! header/footer presence. The fingerprint is recomputed from the file on
//! every call; nothing is cached.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::archive::OoxmlArchive;
use crate::error::Result;

/// Structural metadata for one table, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    /// Column widths in twips, from `tblGrid` when present, otherwise
    /// inferred from the first row's cell widths.
    pub column_widths: Vec<u32>,
    /// Per-row explicit heights in twips; `None` means auto.
    pub row_heights: Vec<Option<u32>>,
    /// Data rows only; rows flagged `tblHeader` are excluded.
    pub row_count: usize,
    pub column_count: usize,
}

/// A summary of a rendered document's structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralFingerprint {
    pub table_count: usize,
    pub tables: Vec<TableInfo>,
    /// Paragraphs at the top body level only. Paragraphs inside table cells
    /// are not counted, so the signal is independent of table content.
    pub paragraph_count: usize,
    pub has_header: bool,
    pub has_footer: bool,
}

/// Inspect a document file on disk.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<StructuralFingerprint> {
    let archive = OoxmlArchive::open(path.as_ref())?;
    log::debug!("inspecting {}", path.as_ref().display());
    fingerprint(&archive)
}

/// Compute the fingerprint of an already-opened package.
pub fn fingerprint(archive: &OoxmlArchive) -> Result<StructuralFingerprint> {
    let (tables, paragraph_count) = scan_body(archive.document_xml()?)?;

    // Presence means a part with actual text, not an empty placeholder
    // region.
    let has_header = archive
        .header_parts()
        .iter()
        .any(|part| part_has_text(archive, part));
    let has_footer = archive
        .footer_parts()
        .iter()
        .any(|part| part_has_text(archive, part));

    Ok(StructuralFingerprint {
        table_count: tables.len(),
        tables,
        paragraph_count,
        has_header,
        has_footer,
    })
}

/// Per-table accumulator while walking document.xml.
#[derive(Default)]
struct TableScan {
    grid_widths: Vec<u32>,
    first_row_widths: Vec<u32>,
    row_heights: Vec<Option<u32>>,
    total_rows: usize,
    header_rows: usize,
    first_row_cells: usize,
}

impl TableScan {
    fn finish(self) -> TableInfo {
        let column_count = if !self.grid_widths.is_empty() {
            self.grid_widths.len()
        } else {
            self.first_row_cells
        };
        let column_widths = if !self.grid_widths.is_empty() {
            self.grid_widths
        } else {
            self.first_row_widths
        };
        TableInfo {
            column_widths,
            row_heights: self.row_heights,
            row_count: self.total_rows - self.header_rows,
            column_count,
        }
    }
}

fn scan_body(xml: &[u8]) -> Result<(Vec<TableInfo>, usize)> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut tables = Vec::new();
    let mut paragraph_count = 0usize;

    // Nesting depth of w:tbl elements; only depth-1 tables are recorded.
    let mut table_depth = 0usize;
    let mut current: Option<TableScan> = None;
    let mut in_first_row = false;
    let mut row_height: Option<u32> = None;
    let mut row_is_header = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match e.local_name().as_ref() {
                    b"tbl" => {
                        table_depth += 1;
                        if table_depth == 1 {
                            current = Some(TableScan::default());
                        }
                    }
                    b"p" if table_depth == 0 => paragraph_count += 1,
                    b"gridCol" if table_depth == 1 => {
                        if let (Some(scan), Some(width)) = (current.as_mut(), attr_u32(e, "w:w")) {
                            scan.grid_widths.push(width);
                        }
                    }
                    b"tr" if table_depth == 1 => {
                        if let Some(scan) = current.as_mut() {
                            in_first_row = scan.total_rows == 0;
                            scan.total_rows += 1;
                        }
                        row_height = None;
                        row_is_header = false;
                    }
                    b"trHeight" if table_depth == 1 => {
                        row_height = attr_u32(e, "w:val");
                    }
                    b"tblHeader" if table_depth == 1 => {
                        row_is_header = true;
                    }
                    b"tc" if table_depth == 1 && in_first_row => {
                        if let Some(scan) = current.as_mut() {
                            scan.first_row_cells += 1;
                        }
                    }
                    b"tcW" if table_depth == 1 && in_first_row => {
                        if let (Some(scan), Some(width)) = (current.as_mut(), attr_u32(e, "w:w")) {
                            scan.first_row_widths.push(width);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"tbl" => {
                    if table_depth == 1 {
                        if let Some(scan) = current.take() {
                            tables.push(scan.finish());
                        }
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                b"tr" if table_depth == 1 => {
                    if let Some(scan) = current.as_mut() {
                        scan.row_heights.push(row_height.take());
                        if row_is_header {
                            scan.header_rows += 1;
                        }
                    }
                    in_first_row = false;
                    row_is_header = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok((tables, paragraph_count))
}

/// True when the part contains any non-whitespace text.
fn part_has_text(archive: &OoxmlArchive, part: &str) -> bool {
    let Some(xml) = archive.get(part) else {
        return false;
    };
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                if let Ok(text) = t.unescape() {
                    if !text.trim().is_empty() {
                        return true;
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => return false,
            _ => {}
        }
        buf.clear();
    }
}

/// Read a numeric attribute, accepting both prefixed and bare names.
fn attr_u32(e: &BytesStart<'_>, name: &str) -> Option<u32> {
    let bare = name.split(':').next_back().unwrap_or(name);
    for attr in e.attributes().filter_map(|a| a.ok()) {
        let key = attr.key.as_ref();
        if key == name.as_bytes() || key == bare.as_bytes() {
            return std::str::from_utf8(&attr.value).ok()?.parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(xml: &str) -> (Vec<TableInfo>, usize) {
        scan_body(xml.as_bytes()).unwrap()
    }

    #[test]
    fn counts_top_level_paragraphs_only() {
        let (tables, paragraphs) = scan(
            r#"<w:document xmlns:w="x"><w:body>
                <w:p/><w:p/>
                <w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>
                <w:p/>
            </w:body></w:document>"#,
        );
        assert_eq!(paragraphs, 3);
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn grid_widths_win_over_cell_widths() {
        let (tables, _) = scan(
            r#"<w:body><w:tbl>
                <w:tblGrid><w:gridCol w:w="4000"/><w:gridCol w:w="5000"/></w:tblGrid>
                <w:tr><w:tc><w:tcPr><w:tcW w:w="1111" w:type="dxa"/></w:tcPr><w:p/></w:tc>
                      <w:tc><w:tcPr><w:tcW w:w="2222" w:type="dxa"/></w:tcPr><w:p/></w:tc></w:tr>
            </w:tbl></w:body>"#,
        );
        assert_eq!(tables[0].column_widths, vec![4000, 5000]);
        assert_eq!(tables[0].column_count, 2);
    }

    #[test]
    fn falls_back_to_first_row_cell_widths() {
        let (tables, _) = scan(
            r#"<w:body><w:tbl>
                <w:tr><w:tc><w:tcPr><w:tcW w:w="1111"/></w:tcPr><w:p/></w:tc></w:tr>
            </w:tbl></w:body>"#,
        );
        assert_eq!(tables[0].column_widths, vec![1111]);
        assert_eq!(tables[0].column_count, 1);
    }

    #[test]
    fn header_rows_excluded_from_row_count() {
        let (tables, _) = scan(
            r#"<w:body><w:tbl>
                <w:tr><w:trPr><w:tblHeader/></w:trPr><w:tc><w:p/></w:tc></w:tr>
                <w:tr><w:tc><w:p/></w:tc></w:tr>
                <w:tr><w:tc><w:p/></w:tc></w:tr>
            </w:tbl></w:body>"#,
        );
        assert_eq!(tables[0].row_count, 2);
        assert_eq!(tables[0].row_heights.len(), 3);
    }

    #[test]
    fn explicit_row_heights_are_recorded() {
        let (tables, _) = scan(
            r#"<w:body><w:tbl>
                <w:tr><w:trPr><w:trHeight w:val="400" w:hRule="auto"/></w:trPr><w:tc><w:p/></w:tc></w:tr>
                <w:tr><w:tc><w:p/></w:tc></w:tr>
            </w:tbl></w:body>"#,
        );
        assert_eq!(tables[0].row_heights, vec![Some(400), None]);
    }

    #[test]
    fn nested_tables_are_not_recorded_separately() {
        let (tables, paragraphs) = scan(
            r#"<w:body><w:tbl>
                <w:tr><w:tc>
                    <w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>
                    <w:p/>
                </w:tc></w:tr>
            </w:tbl></w:body>"#,
        );
        assert_eq!(tables.len(), 1);
        assert_eq!(paragraphs, 0);
    }
}
