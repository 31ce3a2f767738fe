//! JSON description parser.
//!
//! Turns a raw JSON document description into a validated
//! [`DocumentDescription`]. Unknown top-level keys are ignored for forward
//! compatibility; unknown section types are rejected. Defaults are applied
//! here so downstream rendering never needs fallback logic.

use serde_json::{Map, Value};

use crate::color::{theme, Color};
use crate::description::DocumentDescription;
use crate::error::{Result, ValidationError};
use crate::section::{
    Alignment, KeyValueSection, Section, TableSection, DEFAULT_FONT_SIZE, DEFAULT_SPACER_SIZE,
    DEFAULT_SPACE_AFTER,
};

/// Parse a raw JSON string into a document description.
pub fn parse(raw: &str) -> Result<DocumentDescription> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    from_value(&value)
}

/// Parse an already-deserialized JSON value into a document description.
pub fn from_value(value: &Value) -> Result<DocumentDescription> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let raw_sections = obj
        .get("sections")
        .ok_or(ValidationError::MissingField {
            section: None,
            field: "sections",
        })?
        .as_array()
        .ok_or(ValidationError::InvalidField {
            section: None,
            field: "sections",
            expected: "an array",
        })?;

    let mut sections = Vec::with_capacity(raw_sections.len());
    for (index, raw) in raw_sections.iter().enumerate() {
        sections.push(parse_section(index, raw)?);
    }

    Ok(DocumentDescription {
        title: top_level_string(obj, "title")?,
        subtitle: top_level_string(obj, "subtitle")?,
        header: top_level_string(obj, "header")?,
        footer: top_level_string(obj, "footer")?,
        sections,
    })
}

fn parse_section(index: usize, value: &Value) -> Result<Section> {
    let obj = value.as_object().ok_or(ValidationError::InvalidField {
        section: Some(index),
        field: "section",
        expected: "a JSON object",
    })?;

    let tag = require_string(obj, index, "type")?;

    match tag.as_str() {
        "heading" => parse_heading(obj, index),
        "paragraph" => parse_paragraph(obj, index),
        "bullet_list" => Ok(Section::BulletList {
            items: require_string_list(obj, index, "items")?,
        }),
        "numbered_list" => Ok(Section::NumberedList {
            items: require_string_list(obj, index, "items")?,
        }),
        "table" => parse_table(obj, index),
        "key_value_table" => parse_key_value_table(obj, index),
        "page_break" => Ok(Section::PageBreak),
        "spacer" => Ok(Section::Spacer {
            size: optional_number(obj, index, "size")?.unwrap_or(DEFAULT_SPACER_SIZE),
        }),
        other => Err(ValidationError::UnknownSectionType {
            section: index,
            found: other.to_string(),
        }),
    }
}

fn parse_heading(obj: &Map<String, Value>, index: usize) -> Result<Section> {
    let raw_level = obj
        .get("level")
        .ok_or(ValidationError::MissingField {
            section: Some(index),
            field: "level",
        })?
        .as_i64()
        .ok_or(ValidationError::InvalidField {
            section: Some(index),
            field: "level",
            expected: "an integer",
        })?;

    // Out-of-range levels are clamped, not rejected; rendering stays
    // best-effort for near-valid input.
    let level = raw_level.clamp(1, 4) as u8;

    Ok(Section::Heading {
        level,
        text: require_string(obj, index, "text")?,
        color: optional_color(obj, index, "color")?.unwrap_or_else(theme::accent),
    })
}

fn parse_paragraph(obj: &Map<String, Value>, index: usize) -> Result<Section> {
    let alignment = match obj.get("alignment") {
        None | Some(Value::Null) => Alignment::default(),
        Some(Value::String(s)) => {
            Alignment::parse(s).ok_or_else(|| ValidationError::InvalidAlignment {
                section: index,
                value: s.clone(),
            })?
        }
        Some(_) => {
            return Err(ValidationError::InvalidField {
                section: Some(index),
                field: "alignment",
                expected: "a string",
            })
        }
    };

    Ok(Section::Paragraph {
        text: require_string(obj, index, "text")?,
        bold: optional_bool(obj, index, "bold")?,
        italic: optional_bool(obj, index, "italic")?,
        color: optional_color(obj, index, "color")?,
        alignment,
        font_size: optional_number(obj, index, "font_size")?.unwrap_or(DEFAULT_FONT_SIZE),
        space_after: optional_number(obj, index, "space_after")?.unwrap_or(DEFAULT_SPACE_AFTER),
    })
}

fn parse_table(obj: &Map<String, Value>, index: usize) -> Result<Section> {
    let headers = require_string_list(obj, index, "headers")?;
    let raw_rows = require_array(obj, index, "rows")?;

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (row_index, raw_row) in raw_rows.iter().enumerate() {
        let cells = row_cells(raw_row, index, "rows")?;
        if cells.len() != headers.len() {
            return Err(ValidationError::RowLengthMismatch {
                section: index,
                row: row_index,
                expected: headers.len(),
                found: cells.len(),
            });
        }
        rows.push(cells);
    }

    let defaults = TableSection::default();
    Ok(Section::Table(TableSection {
        headers,
        rows,
        header_bg_color: optional_color(obj, index, "header_bg_color")?
            .unwrap_or(defaults.header_bg_color),
        header_text_color: optional_color(obj, index, "header_text_color")?
            .unwrap_or(defaults.header_text_color),
        alt_row_color: optional_color(obj, index, "alt_row_color")?
            .unwrap_or(defaults.alt_row_color),
        col_widths: optional_number_list(obj, index, "col_widths")?,
        row_height: optional_number(obj, index, "row_height")?,
    }))
}

fn parse_key_value_table(obj: &Map<String, Value>, index: usize) -> Result<Section> {
    let raw_rows = require_array(obj, index, "rows")?;

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (row_index, raw_row) in raw_rows.iter().enumerate() {
        let cells = row_cells(raw_row, index, "rows")?;
        if cells.len() != 2 {
            return Err(ValidationError::RowLengthMismatch {
                section: index,
                row: row_index,
                expected: 2,
                found: cells.len(),
            });
        }
        let mut iter = cells.into_iter();
        let key = iter.next().unwrap_or_default();
        let value = iter.next().unwrap_or_default();
        rows.push((key, value));
    }

    let defaults = KeyValueSection::default();
    Ok(Section::KeyValueTable(KeyValueSection {
        rows,
        first_col_bg_color: optional_color(obj, index, "first_col_bg_color")?
            .unwrap_or(defaults.first_col_bg_color),
        first_cell_bg_color: optional_color(obj, index, "first_cell_bg_color")?
            .unwrap_or(defaults.first_cell_bg_color),
        first_cell_text_color: optional_color(obj, index, "first_cell_text_color")?
            .unwrap_or(defaults.first_cell_text_color),
        col_widths: optional_number_list(obj, index, "col_widths")?,
        row_height: optional_number(obj, index, "row_height")?,
    }))
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn top_level_string(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidField {
            section: None,
            field,
            expected: "a string",
        }),
    }
}

fn require_string(obj: &Map<String, Value>, index: usize, field: &'static str) -> Result<String> {
    obj.get(field)
        .ok_or(ValidationError::MissingField {
            section: Some(index),
            field,
        })?
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::InvalidField {
            section: Some(index),
            field,
            expected: "a string",
        })
}

fn require_array<'a>(
    obj: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a Vec<Value>> {
    obj.get(field)
        .ok_or(ValidationError::MissingField {
            section: Some(index),
            field,
        })?
        .as_array()
        .ok_or(ValidationError::InvalidField {
            section: Some(index),
            field,
            expected: "an array",
        })
}

fn require_string_list(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Vec<String>> {
    require_array(obj, index, field)?
        .iter()
        .map(|v| {
            cell_text(v).ok_or(ValidationError::InvalidField {
                section: Some(index),
                field,
                expected: "an array of strings",
            })
        })
        .collect()
}

fn row_cells(raw_row: &Value, index: usize, field: &'static str) -> Result<Vec<String>> {
    raw_row
        .as_array()
        .ok_or(ValidationError::InvalidField {
            section: Some(index),
            field,
            expected: "an array of arrays",
        })?
        .iter()
        .map(|v| {
            cell_text(v).ok_or(ValidationError::InvalidField {
                section: Some(index),
                field,
                expected: "rows of scalar cells",
            })
        })
        .collect()
}

/// Cell values may be any JSON scalar; they are stringified the way the
/// document will show them.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn optional_bool(obj: &Map<String, Value>, index: usize, field: &'static str) -> Result<bool> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ValidationError::InvalidField {
            section: Some(index),
            field,
            expected: "a boolean",
        }),
    }
}

fn optional_number(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<u32>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| v as u32)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u32))
            .map(Some)
            .ok_or(ValidationError::InvalidField {
                section: Some(index),
                field,
                expected: "a non-negative number",
            }),
        Some(_) => Err(ValidationError::InvalidField {
            section: Some(index),
            field,
            expected: "a number",
        }),
    }
}

fn optional_number_list(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<Vec<u32>>> {
    let values = match obj.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(values)) => values,
        Some(_) => {
            return Err(ValidationError::InvalidField {
                section: Some(index),
                field,
                expected: "an array of numbers",
            })
        }
    };

    values
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as u32)
                .ok_or(ValidationError::InvalidField {
                    section: Some(index),
                    field,
                    expected: "an array of numbers",
                })
        })
        .collect::<Result<Vec<u32>>>()
        .map(Some)
}

fn optional_color(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<Color>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            Color::parse(s)
                .map(Some)
                .ok_or_else(|| ValidationError::InvalidColor {
                    section: index,
                    field,
                    value: s.clone(),
                })
        }
        Some(_) => Err(ValidationError::InvalidField {
            section: Some(index),
            field,
            expected: "a hex color string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_description() {
        let desc = parse(r#"{"sections": []}"#).unwrap();
        assert!(desc.is_empty());
        assert_eq!(desc.title, None);
    }

    #[test]
    fn missing_sections_key() {
        let err = parse(r#"{"title": "T"}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                section: None,
                field: "sections"
            }
        );
    }

    #[test]
    fn unknown_section_type_carries_index() {
        let err = parse(r#"{"sections": [{"type": "heading", "level": 1, "text": "a"}, {"type": "sidebar"}]}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownSectionType {
                section: 1,
                found: "sidebar".to_string()
            }
        );
    }

    #[test]
    fn heading_missing_text() {
        let err = parse(r#"{"sections": [{"type": "heading", "level": 2}]}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                section: Some(0),
                field: "text"
            }
        );
    }

    #[test]
    fn heading_level_is_clamped() {
        let desc = parse(r#"{"sections": [{"type": "heading", "level": 9, "text": "deep"}]}"#)
            .unwrap();
        match &desc.sections[0] {
            Section::Heading { level, .. } => assert_eq!(*level, 4),
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn table_row_length_mismatch() {
        let err = parse(
            r#"{"sections": [{"type": "table", "headers": ["A", "B"], "rows": [["1", "2", "3"]]}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::RowLengthMismatch {
                section: 0,
                row: 0,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn table_defaults_applied() {
        let desc = parse(
            r#"{"sections": [{"type": "table", "headers": ["A"], "rows": [["1"]]}]}"#,
        )
        .unwrap();
        match &desc.sections[0] {
            Section::Table(table) => {
                assert_eq!(table.header_bg_color.as_hex(), "1F4E79");
                assert_eq!(table.alt_row_color.as_hex(), "F2F2F2");
                assert_eq!(table.column_count(), 1);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn numeric_cells_are_stringified() {
        let desc = parse(
            r#"{"sections": [{"type": "table", "headers": ["n"], "rows": [[42]]}]}"#,
        )
        .unwrap();
        match &desc.sections[0] {
            Section::Table(table) => assert_eq!(table.rows[0][0], "42"),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn key_value_rows_must_be_pairs() {
        let err = parse(
            r#"{"sections": [{"type": "key_value_table", "rows": [["k", "v", "extra"]]}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::RowLengthMismatch {
                section: 0,
                row: 0,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn bad_color_is_rejected() {
        let err = parse(
            r#"{"sections": [{"type": "paragraph", "text": "x", "color": "red"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidColor { section: 0, .. }));
    }

    #[test]
    fn bad_alignment_is_rejected() {
        let err = parse(
            r#"{"sections": [{"type": "paragraph", "text": "x", "alignment": "middle"}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidAlignment {
                section: 0,
                value: "middle".to_string()
            }
        );
    }

    #[test]
    fn invalid_json_reported() {
        assert!(matches!(
            parse("{not json").unwrap_err(),
            ValidationError::InvalidJson(_)
        ));
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let desc = parse(r#"{"sections": [], "content": "ignored", "vsn": 3}"#).unwrap();
        assert!(desc.is_empty());
    }
}
