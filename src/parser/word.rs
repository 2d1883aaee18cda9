//! Words
//!
//! A word is a single letter/value pair such as `G01` or `X10.750`. It is
//! always built against a dialect rule, so its value has the rule's kind and
//! it knows how to render itself canonically.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::{ParseConfig, Precision};
use crate::dialect::{Dialect, ValueKind, WordTypeRule};
use crate::error::{Error, Result};

/// A typed word value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Integer(_) => 0,
            Value::Real(_) => 1,
            Value::Text(_) => 2,
        }
    }

    /// Convert into `kind`, as a rule of that kind would have parsed it
    fn coerce(self, kind: ValueKind) -> Option<Value> {
        match (kind, self) {
            (ValueKind::Integer, Value::Integer(v)) => Some(Value::Integer(v)),
            (ValueKind::Integer, Value::Real(v)) => {
                let in_range = v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64;
                in_range.then_some(Value::Integer(v as i64))
            }
            (ValueKind::Integer, Value::Text(t)) => t.trim().parse().ok().map(Value::Integer),
            (ValueKind::Real, Value::Integer(v)) => Some(Value::Real(v as f64)),
            (ValueKind::Real, Value::Real(v)) => v.is_finite().then_some(Value::Real(v)),
            (ValueKind::Real, Value::Text(t)) => t
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Real),
            (ValueKind::Text, Value::Text(t)) => Some(Value::Text(t.trim().to_string())),
            (ValueKind::Text, other) => Some(Value::Text(other.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(t) => f.write_str(t),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            _ => self.rank().partial_cmp(&other.rank()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A single letter/value token
#[derive(Clone)]
pub struct Word {
    letter: char,
    value: Value,
    rule: Arc<WordTypeRule>,
    dialect: Arc<Dialect>,
    xy_decimals: Precision,
}

impl Word {
    /// Build a word from a letter and a value, coercing the value into the letter's kind
    ///
    /// The rendered value text must be accepted in full by the letter's
    /// pattern, so a constructed word can always be read back from its
    /// canonical text (`G-1` or `L-5` are rejected).
    pub fn new(letter: char, value: impl Into<Value>, config: &ParseConfig) -> Result<Self> {
        let letter = letter.to_ascii_uppercase();
        let rule = Arc::clone(config.dialect.require_rule(letter)?);
        let value = value.into();
        let repr = value.to_string();
        let value = value
            .coerce(rule.kind)
            .ok_or(Error::WordValueInvalid { letter, text: repr })?;

        let text = rule.format.render(&value, config.xy_decimals);
        if rule.match_value(&text) != Some(text.len()) {
            return Err(Error::WordValueInvalid { letter, text });
        }

        Ok(Self {
            letter,
            value,
            rule,
            dialect: Arc::clone(&config.dialect),
            xy_decimals: config.xy_decimals,
        })
    }

    /// Build a word from value text matched by one of the rule's patterns
    pub(crate) fn from_match(
        letter: char,
        rule: &Arc<WordTypeRule>,
        matched: &str,
        config: &ParseConfig,
    ) -> Result<Self> {
        let value = rule.convert(matched).ok_or_else(|| Error::WordValueInvalid {
            letter,
            text: matched.to_string(),
        })?;

        Ok(Self {
            letter,
            value,
            rule: Arc::clone(rule),
            dialect: Arc::clone(&config.dialect),
            xy_decimals: config.xy_decimals,
        })
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn rule(&self) -> &WordTypeRule {
        &self.rule
    }

    pub fn dialect(&self) -> &Arc<Dialect> {
        &self.dialect
    }

    pub fn xy_decimals(&self) -> Precision {
        self.xy_decimals
    }

    /// Canonical text of the value alone
    pub fn value_str(&self) -> String {
        self.rule.format.render(&self.value, self.xy_decimals)
    }

    /// Human description of the letter, e.g. `F: Feedrate`
    pub fn description(&self) -> String {
        format!("{}: {}", self.letter, self.rule.description)
    }

    fn parse_config(&self) -> ParseConfig {
        ParseConfig {
            dialect: Arc::clone(&self.dialect),
            xy_decimals: self.xy_decimals,
            verify: true,
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.value_str())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({self})")
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.letter == other.letter && self.value == other.value
    }
}

// values are finite by construction, so equality is reflexive
impl Eq for Word {}

impl PartialEq<str> for Word {
    fn eq(&self, other: &str) -> bool {
        super::parse_word(other, &self.parse_config()).is_ok_and(|word| *self == word)
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.letter.hash(state);
        match &self.value {
            Value::Integer(v) => (0u8, *v).hash(state),
            // -0.0 == 0.0, so they must hash alike
            Value::Real(v) => (1u8, (*v + 0.0).to_bits()).hash(state),
            Value::Text(t) => (2u8, t).hash(state),
        }
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering {
        self.letter.cmp(&other.letter).then_with(|| {
            self.value
                .partial_cmp(&other.value)
                .unwrap_or(Ordering::Equal)
        })
    }
}

impl FromStr for Word {
    type Err = Error;

    /// Parse a single word with the default configuration
    fn from_str(s: &str) -> Result<Self> {
        super::parse_word(s, &ParseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn word(letter: char, value: impl Into<Value>) -> Word {
        Word::new(letter, value, &ParseConfig::default()).unwrap()
    }

    #[test]
    fn test_value_is_coerced_to_rule_kind() {
        assert_eq!(word('G', 1).value(), &Value::Real(1.0));
        assert_eq!(word('N', 20.0).value(), &Value::Integer(20));
        assert_eq!(word('T', 2).value(), &Value::Text("2".to_string()));
        assert_eq!(word('X', "1.5").value(), &Value::Real(1.5));
    }

    #[test]
    fn test_invalid_values() {
        let config = ParseConfig::default();
        assert!(matches!(
            Word::new('N', 1.5, &config),
            Err(Error::WordValueInvalid { letter: 'N', .. })
        ));
        assert!(Word::new('X', f64::NAN, &config).is_err());
        assert!(Word::new('X', "abc", &config).is_err());
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(word('G', 1).to_string(), "G01");
        assert_eq!(word('G', 90).to_string(), "G90");
        assert_eq!(word('M', 5).to_string(), "M05");
        assert_eq!(word('F', 70).to_string(), "F70.000");
        assert_eq!(word('Z', -0.0).to_string(), "Z.000");
        assert_eq!(word('N', 100).to_string(), "N100");
        assert_eq!(word('T', "01").to_string(), "T01");
        assert_eq!(word('x', 10.75).to_string(), "X10.750");
    }

    #[test]
    fn test_position_precision() {
        let config = ParseConfig::default().with_xy_decimals(5).unwrap();
        let x = Word::new('X', 0, &config).unwrap();
        assert_eq!(x.value_str(), ".00000");
        let y = Word::new('Y', -0.51111, &config).unwrap();
        assert_eq!(y.value_str(), "-0.51111");
        // precision only applies to X and Y
        let z = Word::new('Z', -0.512, &config).unwrap();
        assert_eq!(z.value_str(), "-0.512");
    }

    #[test]
    fn test_ordering() {
        assert!(word('G', 1) < word('M', 1));
        assert!(word('G', 1) < word('G', 2));
        assert!(word('X', -1.0) < word('X', 0.5));
        let mut words = vec![word('M', 3), word('G', 90), word('G', 1)];
        words.sort();
        assert_eq!(words, vec![word('G', 1), word('G', 90), word('M', 3)]);
    }

    #[test]
    fn test_equality_and_hash() {
        assert_eq!(word('X', 0.0), word('X', -0.0));
        assert_ne!(word('X', 1.0), word('Y', 1.0));

        let set: HashSet<Word> = [word('G', 1), word('G', 1.0), word('X', 0.0), word('X', -0.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_equality_with_str() {
        assert!(word('G', 1) == "G01");
        assert!(word('G', 1) == "g1");
        assert!(word('X', 10.75) == " X10.75 ");
        assert!(word('G', 1) != "G02");
        assert!(word('G', 1) != "G1 X2");
        assert!(word('G', 1) != "");
    }

    #[test]
    fn test_description() {
        assert_eq!(word('F', 100).description(), "F: Feedrate");
    }

    #[test]
    fn test_from_str() {
        let w: Word = "M104".parse().unwrap();
        assert_eq!(w.letter(), 'M');
        assert_eq!(w.value(), &Value::Real(104.0));
        assert!("M3 M5".parse::<Word>().is_err());
    }
}
