//! RGB color values as used in WordprocessingML attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A six-hex-digit RGB color (`RRGGBB`, no leading `#`).
///
/// Stored in the normalized uppercase form Word uses in `w:color` and
/// `w:shd` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Parse a color from a hex string.
    ///
    /// Accepts exactly six hex digits, with or without a leading `#`.
    /// Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(hex.to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// The hex digits, uppercase, no prefix.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default colors from the house document theme.
pub mod theme {
    use super::Color;

    /// Dark blue used for titles, headings, and table header shading.
    pub fn accent() -> Color {
        Color("1F4E79".to_string())
    }

    /// Muted gray for subtitles, headers, and footers.
    pub fn muted() -> Color {
        Color("666666".to_string())
    }

    /// White, used for text on dark shading.
    pub fn white() -> Color {
        Color("FFFFFF".to_string())
    }

    /// Light gray shading for alternating table rows.
    pub fn row_shade() -> Color {
        Color("F2F2F2".to_string())
    }

    /// Light blue shading for key-value label columns.
    pub fn label_shade() -> Color {
        Color("D6E3F0".to_string())
    }

    /// Cell border gray.
    pub fn border() -> Color {
        Color("CCCCCC".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_hex() {
        let color = Color::parse("1f4e79").unwrap();
        assert_eq!(color.as_hex(), "1F4E79");
    }

    #[test]
    fn parse_with_hash_prefix() {
        let color = Color::parse("#FF0000").unwrap();
        assert_eq!(color.as_hex(), "FF0000");
    }

    #[test]
    fn reject_bad_lengths_and_digits() {
        assert!(Color::parse("FFF").is_none());
        assert!(Color::parse("12345G").is_none());
        assert!(Color::parse("1234567").is_none());
        assert!(Color::parse("").is_none());
    }
}
