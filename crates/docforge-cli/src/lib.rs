//! docforge CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docforge:
//! - Render: build a DOCX from a JSON document description
//! - Convert: build a DOCX from plain text
//! - Inspect: extract a structural fingerprint from a DOCX
//! - Compare: diff the structure of two DOCX files
//! - Edit: apply paragraph operations to an existing DOCX
//! - Delete: remove files or empty directories with explicit confirmation
//!
//! # Binary Usage
//!
//! ```bash
//! # Render a description to DOCX
//! docforge render report.json --output report.docx
//!
//! # Inspect document structure
//! docforge inspect report.docx --format json
//!
//! # Compare two documents
//! docforge compare draft.docx final.docx
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    compare_command, convert_command, delete_dir_command, delete_file_command, edit_command,
    inspect_command, render_command, run_cli, OutputFormat,
};
