//! DOCX Writer
//!
//! This module renders a `docforge_model::DocumentDescription` to a complete
//! DOCX package built from the skeleton parts in [`crate::skeleton`].
//!
//! Sections are emitted strictly in description order. Header and footer
//! text go into their own package parts bound through the section properties,
//! not into the body flow.
//!
//! # Example
//!
//! ```ignore
//! use docforge_model::parse;
//! use docforge_ooxml::writer::DocxWriter;
//!
//! let desc = parse(&raw_json)?;
//! let bytes = DocxWriter::render(&desc)?;
//! std::fs::write("output.docx", bytes)?;
//! ```

use std::path::Path;

use docforge_model::{
    parse_runs, Alignment, Color, DocumentDescription, KeyValueSection, Section, TableSection,
};

use crate::archive::{write_atomic, OoxmlArchive};
use crate::error::{OoxmlError, Result};
use crate::relationships::Relationships;
use crate::skeleton::{self, CONTENT_WIDTH, PAGE_HEIGHT, PAGE_MARGIN, PAGE_WIDTH};

/// Body font size in half-points (11 pt).
const BODY_SIZE: u32 = 22;
/// Title font size in half-points (24 pt).
const TITLE_SIZE: u32 = 48;
/// Subtitle font size in half-points (12 pt).
const SUBTITLE_SIZE: u32 = 24;
/// Header/footer font size in half-points (9 pt).
const MARGIN_TEXT_SIZE: u32 = 18;

/// Cell border color.
const BORDER_COLOR: &str = "CCCCCC";

/// DOCX writer for generating documents from a description
pub struct DocxWriter {
    /// XML output buffer
    output: String,
    /// Document relationships (word/_rels/document.xml.rels)
    relationships: Relationships,
    /// Relationship ID of the header part, when one is emitted
    header_rel: Option<String>,
    /// Relationship ID of the footer part, when one is emitted
    footer_rel: Option<String>,
}

impl DocxWriter {
    fn new() -> Self {
        Self {
            output: String::new(),
            relationships: Relationships::new(),
            header_rel: None,
            footer_rel: None,
        }
    }

    /// Render a description to DOCX bytes.
    pub fn render(description: &DocumentDescription) -> Result<Vec<u8>> {
        let mut writer = DocxWriter::new();
        let archive = writer.build_package(description)?;
        archive.to_bytes()
    }

    /// Render a description and write it to `path` atomically.
    ///
    /// The document is staged in a sibling temporary file and renamed into
    /// place, so a failed render never leaves a partial file at `path`.
    pub fn render_to_path<P: AsRef<Path>>(
        description: &DocumentDescription,
        path: P,
    ) -> Result<()> {
        let bytes = Self::render(description)?;
        write_atomic(path.as_ref(), &bytes)?;
        log::info!("rendered document to {}", path.as_ref().display());
        Ok(())
    }

    /// Assemble all package parts for the description.
    fn build_package(&mut self, description: &DocumentDescription) -> Result<OoxmlArchive> {
        self.relationships
            .add("styles.xml", Relationships::TYPE_STYLES);
        self.relationships
            .add("numbering.xml", Relationships::TYPE_NUMBERING);

        let mut archive = OoxmlArchive::new();

        if let Some(header) = &description.header {
            let id = self.relationships.add("header1.xml", Relationships::TYPE_HEADER);
            self.header_rel = Some(id);
            archive.set_string("word/header1.xml", header_xml(header));
        }
        if let Some(footer) = &description.footer {
            let id = self.relationships.add("footer1.xml", Relationships::TYPE_FOOTER);
            self.footer_rel = Some(id);
            archive.set_string("word/footer1.xml", footer_xml(footer));
        }

        let document_xml = self.generate_document_xml(description)?;

        archive.set_string(
            "[Content_Types].xml",
            skeleton::content_types(true, self.header_rel.is_some(), self.footer_rel.is_some()),
        );
        archive.set_string("_rels/.rels", skeleton::package_rels());
        archive.set_string("word/styles.xml", skeleton::styles_xml());
        archive.set_string("word/numbering.xml", skeleton::numbering_xml());
        archive.set_string("word/document.xml", document_xml);
        archive.set_string("word/_rels/document.xml.rels", self.relationships.to_xml());

        Ok(archive)
    }

    /// Generate the complete document.xml content
    fn generate_document_xml(&mut self, description: &DocumentDescription) -> Result<String> {
        self.output.clear();

        self.output
            .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.output.push('\n');
        self.output.push_str(r#"<w:document "#);
        self.output
            .push_str(r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#);
        self.output.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        self.output.push('\n');
        self.output.push_str("<w:body>\n");

        if let Some(title) = &description.title {
            self.generate_title(title);
        }
        if let Some(subtitle) = &description.subtitle {
            self.generate_subtitle(subtitle);
        }

        for (index, section) in description.sections.iter().enumerate() {
            self.generate_section(index, section)?;
        }

        self.generate_sect_pr();
        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");

        Ok(std::mem::take(&mut self.output))
    }

    /// Generate XML for a single section
    fn generate_section(&mut self, index: usize, section: &Section) -> Result<()> {
        match section {
            Section::Heading { level, text, color } => self.generate_heading(*level, text, color),
            Section::Paragraph {
                text,
                bold,
                italic,
                color,
                alignment,
                font_size,
                space_after,
            } => self.generate_paragraph(
                text,
                *bold,
                *italic,
                color.as_ref(),
                *alignment,
                *font_size,
                *space_after,
            ),
            Section::BulletList { items } => self.generate_list(items, false),
            Section::NumberedList { items } => self.generate_list(items, true),
            Section::Table(table) => return self.generate_table(index, table),
            Section::KeyValueTable(table) => return self.generate_key_value_table(index, table),
            Section::PageBreak => {
                self.output
                    .push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>\n");
            }
            Section::Spacer { size } => {
                self.output.push_str(&format!(
                    "<w:p><w:pPr><w:spacing w:after=\"{}\"/></w:pPr></w:p>\n",
                    size * 20
                ));
            }
        }
        Ok(())
    }

    fn generate_title(&mut self, title: &str) {
        self.output.push_str("<w:p>\n<w:pPr>\n");
        self.output.push_str("<w:jc w:val=\"center\"/>\n");
        self.output.push_str("</w:pPr>\n");
        self.generate_run(title, true, false, Some("1F4E79"), TITLE_SIZE);
        self.output.push_str("</w:p>\n");
    }

    fn generate_subtitle(&mut self, subtitle: &str) {
        self.output.push_str("<w:p>\n<w:pPr>\n");
        self.output.push_str("<w:jc w:val=\"center\"/>\n");
        // 20 pt gap before the first section
        self.output.push_str("<w:spacing w:after=\"400\"/>\n");
        self.output.push_str("</w:pPr>\n");
        self.generate_run(subtitle, false, true, Some("666666"), SUBTITLE_SIZE);
        self.output.push_str("</w:p>\n");
    }

    fn generate_heading(&mut self, level: u8, text: &str, color: &Color) {
        self.output.push_str("<w:p>\n<w:pPr>\n");
        self.output
            .push_str(&format!("<w:pStyle w:val=\"Heading{level}\"/>\n"));
        self.output
            .push_str("<w:spacing w:before=\"300\" w:after=\"120\"/>\n");
        self.output.push_str("</w:pPr>\n");
        // Size and weight come from the heading style; only the color is
        // set at run level.
        self.output.push_str("<w:r>\n<w:rPr>\n");
        self.output
            .push_str(&format!("<w:color w:val=\"{}\"/>\n", color.as_hex()));
        self.output.push_str("</w:rPr>\n");
        self.output
            .push_str(&format!("<w:t xml:space=\"preserve\">{}</w:t>\n", escape_xml(text)));
        self.output.push_str("</w:r>\n</w:p>\n");
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_paragraph(
        &mut self,
        text: &str,
        bold: bool,
        italic: bool,
        color: Option<&Color>,
        alignment: Alignment,
        font_size: u32,
        space_after: u32,
    ) {
        self.output.push_str("<w:p>\n<w:pPr>\n");
        self.output
            .push_str(&format!("<w:jc w:val=\"{}\"/>\n", alignment.as_jc_val()));
        self.output
            .push_str(&format!("<w:spacing w:after=\"{}\"/>\n", space_after * 20));
        self.output.push_str("</w:pPr>\n");

        let hex = color.map(Color::as_hex);
        if text.contains("**") {
            // Inline markers win over the section-level bold flag.
            for run in parse_runs(text) {
                self.generate_run(&run.text, run.bold, italic, hex, font_size * 2);
            }
        } else {
            self.generate_run(text, bold, italic, hex, font_size * 2);
        }
        self.output.push_str("</w:p>\n");
    }

    fn generate_list(&mut self, items: &[String], ordered: bool) {
        let (style, num_id) = if ordered {
            ("ListNumber", 2)
        } else {
            ("ListBullet", 1)
        };
        for item in items {
            self.output.push_str("<w:p>\n<w:pPr>\n");
            self.output
                .push_str(&format!("<w:pStyle w:val=\"{style}\"/>\n"));
            self.output.push_str("<w:numPr>\n");
            self.output.push_str("<w:ilvl w:val=\"0\"/>\n");
            self.output
                .push_str(&format!("<w:numId w:val=\"{num_id}\"/>\n"));
            self.output.push_str("</w:numPr>\n");
            self.output.push_str("</w:pPr>\n");
            self.generate_run(item, false, false, None, BODY_SIZE);
            self.output.push_str("</w:p>\n");
        }
    }

    /// Generate XML for a data table with a styled header row
    fn generate_table(&mut self, index: usize, table: &TableSection) -> Result<()> {
        let columns = table.column_count();
        if columns == 0 {
            // A table with no headers has nothing to lay out.
            log::warn!("section {index}: table with no headers, skipped");
            return Ok(());
        }
        let widths = column_widths(index, columns, table.col_widths.as_deref())?;

        self.open_table(&widths);

        // Header row
        self.open_row(true, table.row_height);
        for (cell, width) in table.headers.iter().zip(&widths) {
            self.generate_cell(
                cell,
                *width,
                Some(&table.header_bg_color),
                Some(&table.header_text_color),
                true,
            );
        }
        self.output.push_str("</w:tr>\n");

        // Data rows; odd indices pick up the alternate shading
        for (row_index, row) in table.rows.iter().enumerate() {
            self.open_row(false, table.row_height);
            let shade = (row_index % 2 == 1).then_some(&table.alt_row_color);
            for (cell, width) in row.iter().zip(&widths) {
                self.generate_cell(cell, *width, shade, None, false);
            }
            self.output.push_str("</w:tr>\n");
        }

        self.output.push_str("</w:tbl>\n");
        // Breathing room after the table
        self.output.push_str("<w:p/>\n");
        Ok(())
    }

    /// Generate XML for a two-column key-value table
    fn generate_key_value_table(&mut self, index: usize, table: &KeyValueSection) -> Result<()> {
        if table.rows.is_empty() {
            log::warn!("section {index}: key-value table with no rows, skipped");
            return Ok(());
        }
        let widths = column_widths(index, 2, table.col_widths.as_deref())?;

        self.open_table(&widths);

        for (row_index, (key, value)) in table.rows.iter().enumerate() {
            self.open_row(false, table.row_height);
            if row_index == 0 {
                // The very first cell carries its own shading, layered over
                // the label column's.
                self.generate_cell(
                    key,
                    widths[0],
                    Some(&table.first_cell_bg_color),
                    Some(&table.first_cell_text_color),
                    true,
                );
            } else {
                self.generate_cell(key, widths[0], Some(&table.first_col_bg_color), None, true);
            }
            self.generate_cell(value, widths[1], None, None, false);
            self.output.push_str("</w:tr>\n");
        }

        self.output.push_str("</w:tbl>\n");
        self.output.push_str("<w:p/>\n");
        Ok(())
    }

    /// Open a `w:tbl` with fixed layout and an explicit grid.
    ///
    /// Explicit grid widths are used instead of auto-fit so the structure
    /// survives a render → inspect round trip.
    fn open_table(&mut self, widths: &[u32]) {
        self.output.push_str("<w:tbl>\n<w:tblPr>\n");
        self.output
            .push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>\n");
        self.output.push_str("<w:tblLayout w:type=\"fixed\"/>\n");
        self.output.push_str("</w:tblPr>\n");
        self.output.push_str("<w:tblGrid>\n");
        for width in widths {
            self.output
                .push_str(&format!("<w:gridCol w:w=\"{width}\"/>\n"));
        }
        self.output.push_str("</w:tblGrid>\n");
    }

    /// Open a `w:tr`, emitting row properties when needed.
    fn open_row(&mut self, is_header: bool, row_height: Option<u32>) {
        self.output.push_str("<w:tr>\n");
        if is_header || row_height.is_some() {
            self.output.push_str("<w:trPr>\n");
            if let Some(points) = row_height {
                self.output.push_str(&format!(
                    "<w:trHeight w:val=\"{}\" w:hRule=\"auto\"/>\n",
                    points * 20
                ));
            }
            if is_header {
                self.output.push_str("<w:tblHeader/>\n");
            }
            self.output.push_str("</w:trPr>\n");
        }
    }

    /// Generate a single table cell with borders, optional shading, and a
    /// tight-spaced paragraph.
    fn generate_cell(
        &mut self,
        text: &str,
        width: u32,
        shade: Option<&Color>,
        text_color: Option<&Color>,
        bold: bool,
    ) {
        self.output.push_str("<w:tc>\n<w:tcPr>\n");
        self.output
            .push_str(&format!("<w:tcW w:w=\"{width}\" w:type=\"dxa\"/>\n"));
        self.output.push_str("<w:tcBorders>\n");
        for side in ["top", "left", "bottom", "right"] {
            self.output.push_str(&format!(
                "<w:{side} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{BORDER_COLOR}\"/>\n"
            ));
        }
        self.output.push_str("</w:tcBorders>\n");
        if let Some(color) = shade {
            self.output.push_str(&format!(
                "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>\n",
                color.as_hex()
            ));
        }
        self.output.push_str("</w:tcPr>\n");

        // Word's default paragraph spacing inside cells looks like extra
        // padding; zero it out.
        self.output.push_str("<w:p>\n<w:pPr>\n");
        self.output.push_str(
            "<w:spacing w:before=\"0\" w:after=\"0\" w:line=\"240\" w:lineRule=\"auto\"/>\n",
        );
        self.output.push_str("</w:pPr>\n");
        self.generate_run(text, bold, false, text_color.map(Color::as_hex), BODY_SIZE);
        self.output.push_str("</w:p>\n</w:tc>\n");
    }

    /// Generate a `w:r` run with explicit properties.
    fn generate_run(
        &mut self,
        text: &str,
        bold: bool,
        italic: bool,
        color: Option<&str>,
        half_size: u32,
    ) {
        self.output.push_str("<w:r>\n<w:rPr>\n");
        self.output
            .push_str("<w:rFonts w:ascii=\"Arial\" w:hAnsi=\"Arial\"/>\n");
        if bold {
            self.output.push_str("<w:b/>\n");
        }
        if italic {
            self.output.push_str("<w:i/>\n");
        }
        self.output
            .push_str(&format!("<w:sz w:val=\"{half_size}\"/>\n"));
        self.output
            .push_str(&format!("<w:szCs w:val=\"{half_size}\"/>\n"));
        if let Some(hex) = color {
            self.output
                .push_str(&format!("<w:color w:val=\"{hex}\"/>\n"));
        }
        self.output.push_str("</w:rPr>\n");
        self.output.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>\n",
            escape_xml(text)
        ));
        self.output.push_str("</w:r>\n");
    }

    /// Close the body with page geometry and header/footer references.
    fn generate_sect_pr(&mut self) {
        self.output.push_str("<w:sectPr>\n");
        if let Some(id) = &self.header_rel {
            self.output.push_str(&format!(
                "<w:headerReference w:type=\"default\" r:id=\"{id}\"/>\n"
            ));
        }
        if let Some(id) = &self.footer_rel {
            self.output.push_str(&format!(
                "<w:footerReference w:type=\"default\" r:id=\"{id}\"/>\n"
            ));
        }
        self.output.push_str(&format!(
            "<w:pgSz w:w=\"{PAGE_WIDTH}\" w:h=\"{PAGE_HEIGHT}\"/>\n"
        ));
        self.output.push_str(&format!(
            "<w:pgMar w:top=\"{m}\" w:right=\"{m}\" w:bottom=\"{m}\" w:left=\"{m}\" w:header=\"709\" w:footer=\"709\" w:gutter=\"0\"/>\n",
            m = PAGE_MARGIN
        ));
        self.output.push_str("</w:sectPr>\n");
    }
}

/// Resolve table column widths: explicit `col_widths` when given (length
/// must match), otherwise an even split of the usable page width.
fn column_widths(section: usize, columns: usize, explicit: Option<&[u32]>) -> Result<Vec<u32>> {
    match explicit {
        Some(widths) if widths.len() == columns => Ok(widths.to_vec()),
        Some(widths) => Err(OoxmlError::Render {
            section,
            message: format!(
                "col_widths has {} entries but the table has {} columns",
                widths.len(),
                columns
            ),
        }),
        None => Ok(vec![CONTENT_WIDTH / columns as u32; columns]),
    }
}

/// `word/header1.xml`: right-aligned muted italic text.
fn header_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:p><w:pPr><w:jc w:val="right"/></w:pPr>
<w:r><w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial"/><w:i/><w:sz w:val="{MARGIN_TEXT_SIZE}"/><w:color w:val="666666"/></w:rPr>
<w:t xml:space="preserve">{}</w:t></w:r></w:p>
</w:hdr>"#,
        escape_xml(text)
    )
}

/// `word/footer1.xml`: centered muted text.
fn footer_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:p><w:pPr><w:jc w:val="center"/></w:pPr>
<w:r><w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial"/><w:sz w:val="{MARGIN_TEXT_SIZE}"/><w:color w:val="666666"/></w:rPr>
<w:t xml:space="preserve">{}</w:t></w:r></w:p>
</w:ftr>"#,
        escape_xml(text)
    )
}

/// Minimal body paragraph markup, used by the editor when appending text.
pub(crate) fn paragraph_xml(text: &str) -> String {
    format!(
        "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>\n",
        escape_xml(text)
    )
}

/// Heading paragraph markup for the editor.
pub(crate) fn heading_paragraph_xml(level: u8, text: &str) -> String {
    let level = level.clamp(1, 4);
    format!(
        "<w:p><w:pPr><w:pStyle w:val=\"Heading{level}\"/></w:pPr><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>\n",
        escape_xml(text)
    )
}

/// Escape text for inclusion in XML content.
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_model::parse;

    fn document_xml_for(raw: &str) -> String {
        let desc = parse(raw).unwrap();
        let bytes = DocxWriter::render(&desc).unwrap();
        let archive = OoxmlArchive::from_reader(std::io::Cursor::new(bytes)).unwrap();
        archive.get_string("word/document.xml").unwrap()
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn sections_render_in_input_order() {
        let xml = document_xml_for(
            r#"{"sections": [
                {"type": "heading", "level": 1, "text": "First"},
                {"type": "paragraph", "text": "Second"},
                {"type": "heading", "level": 2, "text": "Third"}
            ]}"#,
        );
        let first = xml.find("First").unwrap();
        let second = xml.find("Second").unwrap();
        let third = xml.find("Third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn bold_markers_become_bold_runs() {
        let xml = document_xml_for(
            r#"{"sections": [{"type": "paragraph", "text": "Hello **world** today"}]}"#,
        );
        assert!(!xml.contains("**"));
        let bold_run = xml.find("<w:b/>").unwrap();
        let world = xml.find("world").unwrap();
        // The bold property belongs to the run that carries "world".
        assert!(bold_run < world);
        assert!(xml.contains(">Hello </w:t>"));
        assert!(xml.contains("> today</w:t>"));
    }

    #[test]
    fn table_grid_defaults_to_even_split() {
        let xml = document_xml_for(
            r#"{"sections": [{"type": "table", "headers": ["A", "B"], "rows": [["1", "2"]]}]}"#,
        );
        assert_eq!(xml.matches("<w:gridCol").count(), 2);
        assert!(xml.contains(&format!("<w:gridCol w:w=\"{}\"/>", CONTENT_WIDTH / 2)));
        assert!(xml.contains("<w:tblHeader/>"));
        assert!(xml.contains("w:fill=\"1F4E79\""));
    }

    #[test]
    fn alternating_rows_start_at_second_data_row() {
        let xml = document_xml_for(
            r#"{"sections": [{"type": "table", "headers": ["A"], "rows": [["r0"], ["r1"], ["r2"]]}]}"#,
        );
        // One header shade plus one alternate shade (row index 1).
        assert_eq!(xml.matches("w:fill=\"1F4E79\"").count(), 1);
        assert_eq!(xml.matches("w:fill=\"F2F2F2\"").count(), 1);
    }

    #[test]
    fn key_value_first_cell_overrides_column_shading() {
        let xml = document_xml_for(
            r#"{"sections": [{"type": "key_value_table", "rows": [["Name", "Ada"], ["Role", "Engineer"]]}]}"#,
        );
        // First cell: accent; remaining label column cells: light blue.
        assert_eq!(xml.matches("w:fill=\"1F4E79\"").count(), 1);
        assert_eq!(xml.matches("w:fill=\"D6E3F0\"").count(), 1);
    }

    #[test]
    fn col_widths_length_mismatch_is_a_render_error() {
        let desc = parse(
            r#"{"sections": [{"type": "table", "headers": ["A", "B"], "rows": [], "col_widths": [1000]}]}"#,
        )
        .unwrap();
        let err = DocxWriter::render(&desc).unwrap_err();
        match err {
            OoxmlError::Render { section, .. } => assert_eq!(section, 0),
            other => panic!("expected render error, got {other}"),
        }
    }

    #[test]
    fn header_and_footer_become_parts() {
        let desc = parse(
            r#"{"header": "Confidential", "footer": "Page", "sections": []}"#,
        )
        .unwrap();
        let bytes = DocxWriter::render(&desc).unwrap();
        let archive = OoxmlArchive::from_reader(std::io::Cursor::new(bytes)).unwrap();
        assert!(archive.contains("word/header1.xml"));
        assert!(archive.contains("word/footer1.xml"));
        let doc = archive.get_string("word/document.xml").unwrap();
        assert!(doc.contains("<w:headerReference"));
        assert!(doc.contains("<w:footerReference"));
    }

    #[test]
    fn page_break_and_spacer_markup() {
        let xml = document_xml_for(
            r#"{"sections": [{"type": "page_break"}, {"type": "spacer", "size": 20}]}"#,
        );
        assert!(xml.contains("<w:br w:type=\"page\"/>"));
        assert!(xml.contains("<w:spacing w:after=\"400\"/>"));
    }
}
