//! docforge-model - Document description model
//!
//! This crate defines the declarative document description accepted by the
//! docforge renderer, and the parser that turns raw JSON into a validated
//! `DocumentDescription`.
//!
//! # Example
//!
//! ```
//! use docforge_model::parse;
//!
//! let desc = parse(r#"{
//!     "title": "Report",
//!     "sections": [
//!         {"type": "heading", "level": 1, "text": "Overview"},
//!         {"type": "paragraph", "text": "Body **bold** text"}
//!     ]
//! }"#).unwrap();
//! assert_eq!(desc.sections.len(), 2);
//! ```

pub mod color;
pub mod description;
pub mod error;
pub mod parse;
pub mod plaintext;
pub mod richtext;
pub mod section;

// Re-exports
pub use color::Color;
pub use description::DocumentDescription;
pub use error::{Result, ValidationError};
pub use parse::{from_value, parse};
pub use plaintext::from_plain_text;
pub use richtext::{parse_runs, TextRun};
pub use section::{Alignment, KeyValueSection, Section, TableSection};
