//! Validation Engine
//!
//! Block consistency checks and document-level diagnostics.

pub mod engine;

pub use engine::{
    validate_document, validate_line, verify_instructions, Diagnostic, LineBlock,
    ValidationResult,
};
