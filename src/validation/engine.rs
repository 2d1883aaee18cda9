//! Validation Engine
//!
//! Per-block instruction consistency checks, and line-by-line processing of
//! whole documents where each failing line becomes a diagnostic.

use std::collections::HashMap;

use serde::Serialize;

use crate::block::{Block, Classifier, Instruction, ModalGroup};
use crate::config::ParseConfig;
use crate::error::{Error, Result};
use crate::parser::{split_comments, Word};

/// Fail if two instructions share a defining word or a modal group
///
/// The reported pair is the first conflict in source order.
pub fn verify_instructions(instructions: &[Instruction]) -> Result<()> {
    let mut code_words: HashMap<&Word, &Instruction> = HashMap::new();
    let mut modal_groups: HashMap<&ModalGroup, &Instruction> = HashMap::new();

    for instruction in instructions {
        if let Some(first) = code_words.insert(instruction.word(), instruction) {
            return Err(Error::SameCodeInBlock {
                first: first.to_string(),
                second: instruction.to_string(),
            });
        }

        if let Some(group) = instruction.modal_group() {
            if let Some(first) = modal_groups.insert(group, instruction) {
                return Err(Error::SameModalGroupInBlock {
                    group: group.to_string(),
                    first: first.to_string(),
                    second: instruction.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// A line that could not be turned into a block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub kind: &'static str,
    pub message: String,
}

/// A line that was turned into a block
#[derive(Debug, Clone)]
pub struct LineBlock<'a> {
    pub line: usize,
    pub block: Block,
    pub comments: Vec<&'a str>,
}

/// Result of processing a document
#[derive(Debug, Clone, Default)]
pub struct ValidationResult<'a> {
    pub blocks: Vec<LineBlock<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult<'_> {
    pub fn add_error(&mut self, line: usize, error: &Error) {
        self.diagnostics.push(Diagnostic {
            line,
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Build a block from one line that may still carry comments
pub fn validate_line<'a>(
    line: &'a str,
    config: &ParseConfig,
    classifier: &dyn Classifier,
) -> Result<(Block, Vec<&'a str>)> {
    let split = split_comments(line);
    let block = Block::parse(&split.code, config, classifier)?;
    Ok((block, split.comments))
}

/// Process every line of a document independently
pub fn validate_document<'a>(
    content: &'a str,
    config: &ParseConfig,
    classifier: &dyn Classifier,
) -> ValidationResult<'a> {
    let mut result = ValidationResult::default();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        match validate_line(line, config, classifier) {
            Ok((block, comments)) => result.blocks.push(LineBlock {
                line: line_num,
                block,
                comments,
            }),
            Err(e) => {
                log::debug!("line {}: {}", line_num, e);
                result.add_error(line_num, &e);
            }
        }
    }

    result
}
