//! Word Tokenizer
//!
//! Scans comment-free line text into words, in source order. The scan is lazy:
//! each call to `next` locates one letter, matches its value and moves on.

use std::iter::FusedIterator;

use crate::config::ParseConfig;
use crate::error::{Error, Result};
use crate::parser::word::Word;

/// Iterator over the words of one line of text
///
/// Yields `Err` at most once, after which it is exhausted. Unconsumed
/// non-whitespace text at the end of the scan is reported as
/// [`Error::LeftoverText`].
#[derive(Debug)]
pub struct Words<'a> {
    text: &'a str,
    cursor: usize,
    config: &'a ParseConfig,
    finished: bool,
}

/// Tokenize `text` with the dialect and precision of `config`
///
/// `text` is expected to be free of comments already.
pub fn text_to_words<'a>(text: &'a str, config: &'a ParseConfig) -> Words<'a> {
    Words {
        text,
        cursor: 0,
        config,
        finished: false,
    }
}

impl Words<'_> {
    /// Text not consumed yet
    pub fn remainder(&self) -> &str {
        &self.text[self.cursor..]
    }

    fn fail(&mut self, error: Error) -> Option<Result<Word>> {
        self.finished = true;
        Some(Err(error))
    }
}

impl Iterator for Words<'_> {
    type Item = Result<Word>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let (text, config) = (self.text, self.config);
        let Some((letter, letter_end)) = config.dialect.next_letter(&text[self.cursor..]) else {
            self.finished = true;
            let remainder = &text[self.cursor..];
            if remainder.trim().is_empty() {
                return None;
            }
            return self.fail(Error::LeftoverText {
                remainder: remainder.to_string(),
            });
        };
        self.cursor += letter_end;

        let rule = match config.dialect.require_rule(letter) {
            Ok(rule) => rule,
            Err(e) => return self.fail(e),
        };

        let rest = &text[self.cursor..];
        let Some(value_len) = rule.match_value(rest) else {
            return self.fail(Error::WordValueInvalid {
                letter,
                text: rest.to_string(),
            });
        };

        let matched = &rest[..value_len];
        log::trace!("word {}: matched '{}'", letter, matched);
        match Word::from_match(letter, rule, matched, config) {
            Ok(word) => {
                self.cursor += value_len;
                Some(Ok(word))
            }
            Err(e) => self.fail(e),
        }
    }
}

impl FusedIterator for Words<'_> {}
