//! Blocks
//!
//! A block is the parsed, validated form of one program line: its words, the
//! instructions they group into, and the leftover modal parameters. All of it
//! is computed at construction; a block never changes afterwards.

pub mod instruction;
pub mod modal;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub use instruction::{Classified, Classifier, Instruction, ModalGroup};
pub use modal::ModalClassifier;

use crate::config::ParseConfig;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::parser::{text_to_words, Word};
use crate::validation::verify_instructions;

/// Trim a line and collapse internal whitespace runs to single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One parsed line of G-code
#[derive(Debug, Clone)]
pub struct Block {
    raw_text: Option<String>,
    text: Option<String>,
    words: Vec<Word>,
    instructions: Vec<Instruction>,
    modal_params: Vec<Word>,
    dialect: Arc<Dialect>,
}

impl Block {
    /// Parse comment-free line text
    ///
    /// Fails without producing a block if tokenizing, classification or (when
    /// `config.verify` is set) instruction verification fails.
    pub fn parse(text: &str, config: &ParseConfig, classifier: &dyn Classifier) -> Result<Self> {
        let normalized = normalize_whitespace(text);
        let words = text_to_words(&normalized, config).collect::<Result<Vec<_>>>()?;
        let Classified {
            instructions,
            modal_params,
        } = classifier.classify(&words, &config.dialect)?;

        if config.verify {
            verify_instructions(&instructions)?;
        }

        Ok(Self {
            raw_text: Some(text.to_string()),
            text: Some(normalized),
            words,
            instructions,
            modal_params,
            dialect: Arc::clone(&config.dialect),
        })
    }

    /// Parse with the default configuration and the LinuxCNC modal groups
    pub fn from_text(text: &str) -> Result<Self> {
        Self::parse(text, &ParseConfig::default(), modal::linuxcnc())
    }

    /// A block with no words, for programmatic assembly
    pub fn empty(dialect: Arc<Dialect>) -> Self {
        Self {
            raw_text: None,
            text: None,
            words: Vec::new(),
            instructions: Vec::new(),
            modal_params: Vec::new(),
            dialect,
        }
    }

    /// Assemble a block from already built instructions and modal parameters
    ///
    /// Its words are each instruction's word and parameters, followed by the
    /// modal parameters.
    pub fn from_parts(
        instructions: Vec<Instruction>,
        modal_params: Vec<Word>,
        dialect: Arc<Dialect>,
        verify: bool,
    ) -> Result<Self> {
        if verify {
            verify_instructions(&instructions)?;
        }

        let words = instructions
            .iter()
            .flat_map(|i| std::iter::once(i.word()).chain(i.params()))
            .chain(&modal_params)
            .cloned()
            .collect();

        Ok(Self {
            words,
            instructions,
            modal_params,
            ..Self::empty(dialect)
        })
    }

    /// Text as given, before whitespace normalization
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    /// Normalized source text, or the canonical text when there is none
    pub fn text(&self) -> Cow<'_, str> {
        match &self.text {
            Some(text) if !text.is_empty() => Cow::Borrowed(text),
            _ => Cow::Owned(self.canonical_text()),
        }
    }

    /// All words, in source order
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn modal_params(&self) -> &[Word] {
        &self.modal_params
    }

    pub fn dialect(&self) -> &Arc<Dialect> {
        &self.dialect
    }

    /// First word with `letter`
    ///
    /// `Ok(None)` means the letter is absent from this block; a letter the
    /// dialect does not define is an error.
    pub fn word_for(&self, letter: char) -> Result<Option<&Word>> {
        self.dialect.require_rule(letter)?;
        let letter = letter.to_ascii_uppercase();
        Ok(self.words.iter().find(|w| w.letter() == letter))
    }

    /// Instructions then modal parameters, in canonical form
    pub fn canonical_text(&self) -> String {
        self.to_string()
    }

    /// Number of instructions, plus one if there are modal parameters
    pub fn len(&self) -> usize {
        self.instructions.len() + usize::from(!self.modal_params.is_empty())
    }

    /// True when the block holds no words at all
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .instructions
            .iter()
            .map(|i| i.to_string())
            .chain(self.modal_params.iter().map(|w| w.to_string()));
        for (idx, part) in parts.enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&part)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  G1 \t X10   Y20 \n"), "G1 X10 Y20");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_parse_block() {
        let block = Block::from_text("  G90   G1 X10.75  Y47.44 ").unwrap();
        assert_eq!(block.raw_text(), Some("  G90   G1 X10.75  Y47.44 "));
        assert_eq!(block.text(), "G90 G1 X10.75 Y47.44");
        assert_eq!(block.words().len(), 4);
        assert_eq!(block.instructions().len(), 2);
        assert_eq!(block.modal_params().len(), 2);
        assert_eq!(block.len(), 3);
        assert_eq!(block.canonical_text(), "G90 G01 X10.750 Y47.440");
    }

    #[test]
    fn test_empty_block() {
        let block = Block::from_text("").unwrap();
        assert!(block.is_empty());
        assert_eq!(block.len(), 0);
        assert_eq!(block.text(), "");
    }

    #[test]
    fn test_modal_params_only() {
        let block = Block::from_text("X1 Y2").unwrap();
        assert!(!block.is_empty());
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_word_for() {
        let block = Block::from_text("G1 X1 X2").unwrap();
        assert_eq!(block.word_for('X').unwrap().unwrap().to_string(), "X1.000");
        assert_eq!(block.word_for('x').unwrap().unwrap().to_string(), "X1.000");
        assert!(block.word_for('F').unwrap().is_none());
        assert!(matches!(
            block.word_for('#'),
            Err(Error::UnknownDialectLetter { letter: '#', .. })
        ));
    }

    #[test]
    fn test_verification_can_be_disabled() {
        assert!(Block::from_text("G1 G1").is_err());
        let config = ParseConfig::default().with_verify(false);
        let block = Block::parse("G1 G1", &config, modal::linuxcnc()).unwrap();
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn test_from_parts() {
        let g1: Word = "G1".parse().unwrap();
        let x: Word = "X5".parse().unwrap();
        let block = Block::from_parts(
            vec![Instruction::new(g1, Some(modal::MOTION))],
            vec![x],
            crate::dialect::linuxcnc::dialect(),
            true,
        )
        .unwrap();
        assert_eq!(block.raw_text(), None);
        assert_eq!(block.text(), "G01 X5.000");
        assert_eq!(block.words().len(), 2);
        assert_eq!(block.len(), 2);
    }
}
