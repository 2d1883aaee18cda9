//! Instructions and the classification contract
//!
//! Which words start an instruction, and which are parameters of an
//! instruction or of the currently active modal state, is decided by a
//! [`Classifier`]. A block only relies on the shape of its output.

use std::borrow::Cow;
use std::fmt;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::parser::Word;

/// Name of a set of mutually exclusive instructions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalGroup(Cow<'static, str>);

impl ModalGroup {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A code word together with the words it consumed as parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    word: Word,
    modal_group: Option<ModalGroup>,
    params: Vec<Word>,
}

impl Instruction {
    pub fn new(word: Word, modal_group: Option<ModalGroup>) -> Self {
        Self {
            word,
            modal_group,
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Word>) -> Self {
        self.params = params;
        self
    }

    /// The word defining this instruction (`G01`, `M05`)
    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn modal_group(&self) -> Option<&ModalGroup> {
        self.modal_group.as_ref()
    }

    pub fn params(&self) -> &[Word] {
        &self.params
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)?;
        for param in &self.params {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

/// Output of a classifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// In the source order of their defining words
    pub instructions: Vec<Instruction>,
    /// Words for the active modal state, in source order
    pub modal_params: Vec<Word>,
}

/// Strategy turning the words of a line into instructions and modal parameters
///
/// Implementations must keep instructions in the order of their defining
/// words and modal parameters in source order, and account for every word
/// either inside an instruction or as a modal parameter.
pub trait Classifier {
    fn classify(&self, words: &[Word], dialect: &Dialect) -> Result<Classified>;
}

impl<F> Classifier for F
where
    F: Fn(&[Word], &Dialect) -> Result<Classified>,
{
    fn classify(&self, words: &[Word], dialect: &Dialect) -> Result<Classified> {
        self(words, dialect)
    }
}
