//! Inline bold-span parsing.
//!
//! Paragraph text may contain `**bold**` spans. Splitting happens on the
//! doubled marker: fragments at odd positions are bold, markers are stripped,
//! and parsing is non-recursive. With an odd marker count the fragment after
//! the last marker is still emitted as a bold run.

use serde::Serialize;

/// One run of paragraph text with a single formatting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
}

impl TextRun {
    /// A plain (non-bold) run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// A bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Split paragraph text into runs on `**` markers.
///
/// Empty fragments (adjacent markers, leading marker) are dropped.
pub fn parse_runs(text: &str) -> Vec<TextRun> {
    text.split("**")
        .enumerate()
        .filter(|(_, fragment)| !fragment.is_empty())
        .map(|(i, fragment)| TextRun {
            text: fragment.to_string(),
            bold: i % 2 == 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_run() {
        let runs = parse_runs("no markers here");
        assert_eq!(runs, vec![TextRun::plain("no markers here")]);
    }

    #[test]
    fn bold_span_in_the_middle() {
        let runs = parse_runs("Hello **world** today");
        assert_eq!(
            runs,
            vec![
                TextRun::plain("Hello "),
                TextRun::bold("world"),
                TextRun::plain(" today"),
            ]
        );
    }

    #[test]
    fn unterminated_marker_is_bold() {
        let runs = parse_runs("**unterminated");
        assert_eq!(runs, vec![TextRun::bold("unterminated")]);
    }

    #[test]
    fn adjacent_markers_drop_empty_fragments() {
        let runs = parse_runs("a****b");
        assert_eq!(runs, vec![TextRun::plain("a"), TextRun::plain("b")]);
    }

    #[test]
    fn empty_input_yields_no_runs() {
        assert!(parse_runs("").is_empty());
    }
}
