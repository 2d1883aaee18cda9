//! GCode Parser
//!
//! Dialect-driven tokenizing of comment-free line text into typed words.

pub mod comment;
pub mod lexer;
pub mod word;

use std::collections::BTreeMap;

pub use comment::{split_comments, strip_comments, SplitLine};
pub use lexer::{text_to_words, Words};
pub use word::{Value, Word};

use crate::config::ParseConfig;
use crate::error::{Error, Result};

/// Parse text holding exactly one word
///
/// Zero words and more than one word are both [`Error::SingleWordArity`].
pub fn parse_word(text: &str, config: &ParseConfig) -> Result<Word> {
    let mut words = text_to_words(text, config).collect::<Result<Vec<_>>>()?;
    if words.len() != 1 {
        return Err(Error::SingleWordArity { count: words.len() });
    }
    Ok(words.remove(0))
}

/// Map words by letter, optionally keeping only some letters
///
/// A letter can only appear once in a map; later words win.
pub fn words_to_map<'a>(
    words: impl IntoIterator<Item = &'a Word>,
    limit_letters: Option<&[char]>,
) -> BTreeMap<char, Value> {
    words
        .into_iter()
        .filter(|w| limit_letters.is_none_or(|letters| letters.contains(&w.letter())))
        .map(|w| (w.letter(), w.value().clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word() {
        let config = ParseConfig::default();
        let word = parse_word("G90", &config).unwrap();
        assert_eq!(word.to_string(), "G90");
    }

    #[test]
    fn test_parse_word_arity() {
        let config = ParseConfig::default();
        assert_eq!(
            parse_word("", &config),
            Err(Error::SingleWordArity { count: 0 })
        );
        assert_eq!(
            parse_word("G1 X1", &config),
            Err(Error::SingleWordArity { count: 2 })
        );
    }

    #[test]
    fn test_words_to_map() {
        let config = ParseConfig::default();
        let words: Vec<Word> = text_to_words("G1 X1 Y2 X3", &config)
            .collect::<Result<_>>()
            .unwrap();

        let all = words_to_map(&words, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[&'X'], Value::Real(3.0));

        let limited = words_to_map(&words, Some(&['Y'][..]));
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[&'Y'], Value::Real(2.0));
    }
}
