//! G-code Blocks
//!
//! Dialect-aware parsing of G-code program lines into words and blocks, and
//! canonical re-rendering of them.
//!
//! This library provides:
//! - Named dialects of per-letter grammar rules
//! - A tokenizer turning comment-free line text into typed words
//! - Blocks grouping words into instructions and modal parameters
//! - Document-level diagnostics for line-oriented front ends

pub mod block;
pub mod cli;
pub mod config;
pub mod dialect;
pub mod error;
pub mod parser;
pub mod validation;

// Re-exports for clean public API
pub use block::{Block, Classifier, Instruction, ModalClassifier, ModalGroup};
pub use config::{ParseConfig, Precision};
pub use dialect::{Dialect, DialectRegistry};
pub use error::{Error, Result};
pub use parser::{parse_word, text_to_words, Value, Word};
pub use validation::{validate_document, Diagnostic};
