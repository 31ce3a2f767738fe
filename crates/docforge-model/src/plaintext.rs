//! Plain-text to description conversion.

use crate::description::DocumentDescription;
use crate::section::{Alignment, Section, DEFAULT_FONT_SIZE, DEFAULT_SPACE_AFTER};

/// Build a description from plain text: one paragraph per non-blank line.
///
/// Rendering the result goes through the standard pipeline, so converted
/// documents get the same body styling as authored ones.
pub fn from_plain_text(content: &str) -> DocumentDescription {
    let mut description = DocumentDescription::new();
    for line in content.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        description.push(Section::Paragraph {
            text: line.to_string(),
            bold: false,
            italic: false,
            color: None,
            alignment: Alignment::Left,
            font_size: DEFAULT_FONT_SIZE,
            space_after: DEFAULT_SPACE_AFTER,
        });
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        let desc = from_plain_text("first\n\n   \nsecond\n");
        assert_eq!(desc.sections.len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_description() {
        assert!(from_plain_text("").is_empty());
    }
}
