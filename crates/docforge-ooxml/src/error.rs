//! Error types for OOXML operations

use thiserror::Error;

/// Errors that can occur during OOXML operations
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required file not found in archive
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// A section failed to render; the index identifies the offender
    #[error("Failed to render section {section}: {message}")]
    Render { section: usize, message: String },

    /// An edit operation addressed a paragraph that does not exist
    #[error("Paragraph index {index} out of range (document has {count} paragraphs)")]
    ParagraphOutOfRange { index: usize, count: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
