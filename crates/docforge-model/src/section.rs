//! Section variants of a document description.
//!
//! A description is an ordered list of typed sections. The set of variants is
//! closed: the parser rejects unknown `type` tags rather than passing them
//! through, so every consumer can match exhaustively.

use serde::Serialize;

use crate::color::{theme, Color};

/// One typed block within a document description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    /// A heading styled by level (1..=4).
    Heading {
        level: u8,
        text: String,
        /// Run color; the theme accent when not given.
        color: Color,
    },
    /// A body paragraph. Inline `**bold**` spans are split into runs at
    /// render time regardless of the `bold` flag.
    Paragraph {
        text: String,
        bold: bool,
        italic: bool,
        color: Option<Color>,
        alignment: Alignment,
        /// Font size in points.
        font_size: u32,
        /// Trailing spacing in points.
        space_after: u32,
    },
    /// An unordered list, one entry per item.
    BulletList { items: Vec<String> },
    /// An ordered list, one entry per item.
    NumberedList { items: Vec<String> },
    /// A data table with a styled header row.
    Table(TableSection),
    /// A two-column label/value table.
    KeyValueTable(KeyValueSection),
    /// Forces a new page.
    PageBreak,
    /// Vertical blank space.
    Spacer {
        /// Height in points.
        size: u32,
    },
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parse the alignment keyword; `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }

    /// The `w:jc` attribute value.
    pub fn as_jc_val(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

/// A table section: a header row plus data rows.
///
/// Invariant (enforced by the parser): every data row has exactly as many
/// cells as there are headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSection {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub header_bg_color: Color,
    pub header_text_color: Color,
    pub alt_row_color: Color,
    /// Explicit column widths in twips; even split of the page when absent.
    pub col_widths: Option<Vec<u32>>,
    /// Row height in points, applied to every row.
    pub row_height: Option<u32>,
}

impl TableSection {
    /// Number of columns, from the header row.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// A key-value table: two-column rows with distinct first-column and
/// first-cell shading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValueSection {
    pub rows: Vec<(String, String)>,
    pub first_col_bg_color: Color,
    pub first_cell_bg_color: Color,
    pub first_cell_text_color: Color,
    pub col_widths: Option<Vec<u32>>,
    pub row_height: Option<u32>,
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            header_bg_color: theme::accent(),
            header_text_color: theme::white(),
            alt_row_color: theme::row_shade(),
            col_widths: None,
            row_height: None,
        }
    }
}

impl Default for KeyValueSection {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            first_col_bg_color: theme::label_shade(),
            first_cell_bg_color: theme::accent(),
            first_cell_text_color: theme::white(),
            col_widths: None,
            row_height: None,
        }
    }
}

/// Default spacer height in points (one blank body line).
pub const DEFAULT_SPACER_SIZE: u32 = 11;

/// Default paragraph font size in points.
pub const DEFAULT_FONT_SIZE: u32 = 11;

/// Default paragraph trailing spacing in points.
pub const DEFAULT_SPACE_AFTER: u32 = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_keywords() {
        assert_eq!(Alignment::parse("center"), Some(Alignment::Center));
        assert_eq!(Alignment::parse("JUSTIFY"), Some(Alignment::Justify));
        assert_eq!(Alignment::parse("middle"), None);
    }

    #[test]
    fn justify_maps_to_both() {
        assert_eq!(Alignment::Justify.as_jc_val(), "both");
    }
}
