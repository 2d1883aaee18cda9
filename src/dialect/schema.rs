//! Dialect Schema Types
//!
//! Per-letter grammar rules, the runtime dialect built from them, and the
//! TOML file layout dialects are loaded from.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use super::format;
use crate::config::Precision;
use crate::error::{Error, Result};
use crate::parser::Value;

/// Runtime type of a word's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Real,
    Text,
}

impl ValueKind {
    fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Real)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Canonical rendering policy of a letter's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Three decimal places, zero rendered as `.000`
    Real,
    /// Like `Real`, with the decimal places taken from the parse configuration
    Position,
    /// Two-digit zero padded codes (`G01`, `M05`, `G38.2`)
    Code,
    /// Plain base-10 integer
    Integer,
    /// The value as given
    Verbatim,
}

/// Decimal places used by [`ValueFormat::Real`]
pub const REAL_DECIMALS: usize = 3;

impl ValueFormat {
    fn accepts(self, kind: ValueKind) -> bool {
        match self {
            ValueFormat::Real | ValueFormat::Position | ValueFormat::Code => kind.is_numeric(),
            ValueFormat::Integer => kind == ValueKind::Integer,
            ValueFormat::Verbatim => true,
        }
    }

    /// Render a value into its canonical program text
    ///
    /// Text is written as given whatever the format; a dialect never pairs a
    /// numeric format with a text kind (see [`Dialect::new`]).
    pub fn render(self, value: &Value, xy_decimals: Precision) -> String {
        let number = match (self, value) {
            (_, Value::Text(text)) => return text.clone(),
            (ValueFormat::Verbatim, other) => return other.to_string(),
            (ValueFormat::Integer, Value::Integer(v)) => return format::integer(*v),
            (_, Value::Integer(v)) => *v as f64,
            (_, Value::Real(v)) => *v,
        };

        match self {
            ValueFormat::Integer => format::integer(number.trunc() as i64),
            ValueFormat::Real => format::fixed(number, REAL_DECIMALS),
            ValueFormat::Position => format::fixed(number, xy_decimals.get()),
            ValueFormat::Code => format::code(number),
            ValueFormat::Verbatim => value.to_string(),
        }
    }
}

/// Grammar rule for one letter of a dialect
#[derive(Debug, Clone)]
pub struct WordTypeRule {
    pub kind: ValueKind,
    /// Tried first, anchored at the start of the remaining text
    pub pattern: Regex,
    /// Tried only when `pattern` does not match
    pub fallback: Option<Regex>,
    pub format: ValueFormat,
    pub description: String,
}

impl WordTypeRule {
    /// Length of the value text at the start of `text`, if any pattern accepts it
    pub fn match_value(&self, text: &str) -> Option<usize> {
        anchored_match(&self.pattern, text).or_else(|| {
            self.fallback
                .as_ref()
                .and_then(|fallback| anchored_match(fallback, text))
        })
    }

    /// Convert matched value text into a value of this rule's kind
    pub fn convert(&self, matched: &str) -> Option<Value> {
        let trimmed = matched.trim();
        match self.kind {
            ValueKind::Integer => trimmed.parse::<i64>().ok().map(Value::Integer),
            ValueKind::Real => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Real),
            ValueKind::Text => Some(Value::Text(trimmed.to_string())),
        }
    }
}

fn anchored_match(regex: &Regex, text: &str) -> Option<usize> {
    regex
        .find(text)
        .filter(|m| m.start() == 0)
        .map(|m| m.end())
}

/// A named set of per-letter rules
#[derive(Debug, Clone)]
pub struct Dialect {
    name: String,
    description: Option<String>,
    rules: BTreeMap<char, Arc<WordTypeRule>>,
    next_letter: Regex,
}

impl Dialect {
    /// Build a dialect; letters are normalized to uppercase and must be A-Z
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        rules: impl IntoIterator<Item = (char, WordTypeRule)>,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |message: String| Error::InvalidDialect {
            dialect: name.clone(),
            message,
        };

        let mut table = BTreeMap::new();
        for (letter, rule) in rules {
            if !letter.is_ascii_alphabetic() {
                return Err(invalid(format!("'{letter}' is not a letter")));
            }
            if !rule.format.accepts(rule.kind) {
                return Err(invalid(format!(
                    "letter '{}' cannot render {} values as {:?}",
                    letter, rule.kind, rule.format
                )));
            }
            table.insert(letter.to_ascii_uppercase(), Arc::new(rule));
        }
        if table.is_empty() {
            return Err(invalid("no letters defined".to_string()));
        }

        // ASCII cases only; `(?i)` would also fold U+212A (Kelvin sign) into K
        let letters: String = table
            .keys()
            .flat_map(|c| [*c, c.to_ascii_lowercase()])
            .collect();
        let next_letter = Regex::new(&format!(r"^\s*([{letters}])"))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            name,
            description,
            rules: table,
            next_letter,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Rule for a letter (case-insensitive)
    pub fn rule(&self, letter: char) -> Option<&Arc<WordTypeRule>> {
        self.rules.get(&letter.to_ascii_uppercase())
    }

    /// Like [`Dialect::rule`], failing for letters this dialect does not define
    pub fn require_rule(&self, letter: char) -> Result<&Arc<WordTypeRule>> {
        self.rule(letter).ok_or_else(|| Error::UnknownDialectLetter {
            letter,
            dialect: self.name.clone(),
        })
    }

    pub fn defines(&self, letter: char) -> bool {
        self.rule(letter).is_some()
    }

    /// Defined letters, in alphabetical order
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.rules.keys().copied()
    }

    pub(crate) fn rules(&self) -> impl Iterator<Item = (char, &Arc<WordTypeRule>)> + '_ {
        self.rules.iter().map(|(letter, rule)| (*letter, rule))
    }

    /// Locate a known letter at the start of `text`, skipping whitespace.
    ///
    /// Returns the uppercase letter and the offset just past it.
    pub(crate) fn next_letter(&self, text: &str) -> Option<(char, usize)> {
        let caps = self.next_letter.captures(text)?;
        let letter = caps.get(1)?;
        let ch = letter.as_str().chars().next()?;
        Some((ch.to_ascii_uppercase(), letter.end()))
    }

    /// Build a dialect from a parsed TOML file, starting from `base` when given
    pub fn from_file(file: DialectFile, base: Option<&Dialect>) -> Result<Self> {
        let name = file.dialect.name;
        let invalid = |message: String| Error::InvalidDialect {
            dialect: name.clone(),
            message,
        };

        let mut rules: BTreeMap<char, WordTypeRule> = base
            .map(|base| {
                base.rules()
                    .map(|(letter, rule)| (letter, WordTypeRule::clone(rule)))
                    .collect()
            })
            .unwrap_or_default();

        for def in file.words {
            let mut chars = def.letter.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() => ch.to_ascii_uppercase(),
                _ => return Err(invalid(format!("'{}' is not a single letter", def.letter))),
            };
            let pattern = compile_anchored(&def.pattern).map_err(&invalid)?;
            let fallback = def
                .fallback
                .as_deref()
                .map(compile_anchored)
                .transpose()
                .map_err(&invalid)?;

            rules.insert(
                letter,
                WordTypeRule {
                    kind: def.kind,
                    pattern,
                    fallback,
                    format: def.format,
                    description: def.description,
                },
            );
        }

        let description = file
            .dialect
            .description
            .or_else(|| base.and_then(|b| b.description.clone()));
        Dialect::new(name.clone(), description, rules)
    }

    /// Parse a dialect straight from TOML text (no inheritance)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DialectFile = toml::from_str(content).map_err(|e| Error::InvalidDialect {
            dialect: "<toml>".to_string(),
            message: e.to_string(),
        })?;
        if let Some(base) = &file.dialect.inherits {
            return Err(Error::UnknownDialect(base.clone()));
        }
        Dialect::from_file(file, None)
    }
}

impl PartialEq for Dialect {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.rules.keys().eq(other.rules.keys())
    }
}

fn compile_anchored(pattern: &str) -> std::result::Result<Regex, String> {
    if !pattern.starts_with('^') {
        return Err(format!("pattern '{pattern}' must start with '^'"));
    }
    Regex::new(pattern).map_err(|e| e.to_string())
}

/// Root dialect file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DialectFile {
    pub dialect: DialectMeta,
    #[serde(default)]
    pub words: Vec<WordDef>,
}

/// Dialect metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DialectMeta {
    pub name: String,
    pub description: Option<String>,
    /// Name of an already registered dialect whose rules are taken over
    pub inherits: Option<String>,
}

/// One letter's rule as written in a dialect file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WordDef {
    pub letter: String,
    pub kind: ValueKind,
    pub pattern: String,
    pub fallback: Option<String>,
    pub format: ValueFormat,
    #[serde(default)]
    pub description: String,
}
