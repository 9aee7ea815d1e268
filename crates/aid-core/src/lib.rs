//! Shared types for the assistance summary pipeline: input records, the
//! output document, errors, settings and the small parsing helpers used by
//! the normalizer and classifier.

pub mod dates;
pub mod document;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, SummaryError};
