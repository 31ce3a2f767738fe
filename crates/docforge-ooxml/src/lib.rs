//! docforge-ooxml - DOCX generation and structural inspection
//!
//! This crate renders a validated [`docforge_model::DocumentDescription`]
//! into a complete DOCX package, reads structural fingerprints back out of
//! existing packages, compares fingerprints, and applies paragraph-level
//! edits to documents on disk.
//!
//! # Example
//!
//! ```no_run
//! use docforge_model::parse;
//! use docforge_ooxml::{compare, inspect, DocxWriter};
//!
//! let desc = parse(r#"{"sections": [{"type": "paragraph", "text": "Hi"}]}"#)?;
//! DocxWriter::render_to_path(&desc, "out.docx")?;
//!
//! let fingerprint = inspect("out.docx")?;
//! let result = compare(&fingerprint, &fingerprint);
//! assert!(result.is_identical);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod compare;
pub mod edit;
pub mod error;
pub mod inspect;
pub mod relationships;
pub mod skeleton;
pub mod writer;

// Re-exports
pub use archive::OoxmlArchive;
pub use compare::{compare, ComparisonResult, Difference};
pub use edit::{DocxEditor, EditOperation};
pub use error::{OoxmlError, Result};
pub use inspect::{inspect, StructuralFingerprint, TableInfo};
pub use relationships::Relationships;
pub use writer::DocxWriter;
