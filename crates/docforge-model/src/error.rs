//! Validation errors for the description parser.

use thiserror::Error;

/// Errors produced while validating a raw document description.
///
/// Every variant carries enough context (section index, field name) for the
/// caller to fix its input without re-reading the whole document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The input was not well-formed JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The top level was not a JSON object.
    #[error("document description must be a JSON object")]
    NotAnObject,

    /// A required field was absent. `section` is `None` for top-level fields.
    #[error("missing required field `{field}`{}", fmt_section(.section))]
    MissingField {
        section: Option<usize>,
        field: &'static str,
    },

    /// A field was present with the wrong JSON type. `section` is `None`
    /// for top-level fields.
    #[error("field `{field}`{} must be {expected}", fmt_section(.section))]
    InvalidField {
        section: Option<usize>,
        field: &'static str,
        expected: &'static str,
    },

    /// The section `type` tag was not one of the known variants.
    #[error("unknown section type `{found}` at section {section}")]
    UnknownSectionType { section: usize, found: String },

    /// A table row's cell count did not match the header count.
    #[error("section {section}: row {row} has {found} cells, expected {expected}")]
    RowLengthMismatch {
        section: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A color string was not six hex digits.
    #[error("section {section}: field `{field}` is not a 6-digit hex color: `{value}`")]
    InvalidColor {
        section: usize,
        field: &'static str,
        value: String,
    },

    /// An alignment keyword was not recognized.
    #[error("section {section}: unknown alignment `{value}`")]
    InvalidAlignment { section: usize, value: String },
}

fn fmt_section(section: &Option<usize>) -> String {
    match section {
        Some(i) => format!(" in section {i}"),
        None => String::new(),
    }
}

/// Result type for description parsing.
pub type Result<T> = std::result::Result<T, ValidationError>;
