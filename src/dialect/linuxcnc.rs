//! LinuxCNC dialect
//!
//! The LinuxCNC dialect is typically used for subtractive fabrication such as
//! milling, and is the built-in default. Other dialects usually start from it
//! (see `inherits` in dialect files).
//!
//! Letter descriptions follow the common G-code letter address table.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{Dialect, ValueFormat, ValueKind, WordTypeRule};

pub const NAME: &str = "linuxcnc";

/// Real numbers, including scientific notation after a decimal point (`-3.234e+4`)
pub const REGEX_FLOAT_SCIENTIFIC: &str = r"^[+-]?\d+(?:\.\d*(?:[eE][+-]?\d+)?)?";
/// Plain real numbers, with optional leading whitespace or digits (`.5`, ` 10`)
pub const REGEX_FLOAT: &str = r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)";
pub const REGEX_POSITIVE_INT: &str = r"^\s*\d+";
/// Codes can't be negative and carry at most one fraction digit
pub const REGEX_CODE: &str = r"^\s*\d+(?:\.\d)?";
/// Everything up to the end of the line
pub const REGEX_TEXT: &str = r"^.+$";

static FLOAT_SCIENTIFIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(REGEX_FLOAT_SCIENTIFIC).expect("valid float regex"));
static FLOAT: Lazy<Regex> = Lazy::new(|| Regex::new(REGEX_FLOAT).expect("valid float regex"));
static POSITIVE_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(REGEX_POSITIVE_INT).expect("valid integer regex"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(REGEX_CODE).expect("valid code regex"));
static TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(REGEX_TEXT).expect("valid text regex"));

static LINUXCNC: Lazy<Arc<Dialect>> = Lazy::new(|| Arc::new(build()));

/// The shared, immutable LinuxCNC dialect
pub fn dialect() -> Arc<Dialect> {
    Arc::clone(&LINUXCNC)
}

fn real(description: &str) -> WordTypeRule {
    WordTypeRule {
        kind: ValueKind::Real,
        pattern: FLOAT_SCIENTIFIC.clone(),
        fallback: Some(FLOAT.clone()),
        format: ValueFormat::Real,
        description: description.to_string(),
    }
}

fn position(description: &str) -> WordTypeRule {
    WordTypeRule {
        format: ValueFormat::Position,
        ..real(description)
    }
}

fn code(description: &str) -> WordTypeRule {
    WordTypeRule {
        kind: ValueKind::Real,
        pattern: CODE.clone(),
        fallback: None,
        format: ValueFormat::Code,
        description: description.to_string(),
    }
}

fn integer(description: &str) -> WordTypeRule {
    WordTypeRule {
        kind: ValueKind::Integer,
        pattern: POSITIVE_INT.clone(),
        fallback: None,
        format: ValueFormat::Integer,
        description: description.to_string(),
    }
}

fn text(pattern: &Regex, description: &str) -> WordTypeRule {
    WordTypeRule {
        kind: ValueKind::Text,
        pattern: pattern.clone(),
        fallback: None,
        format: ValueFormat::Verbatim,
        description: description.to_string(),
    }
}

fn build() -> Dialect {
    let rules = [
        // Rotational axes
        ('A', real("Absolute or incremental position of A axis (rotation around X)")),
        ('B', real("Absolute or incremental position of B axis (rotation around Y)")),
        ('C', real("Absolute or incremental position of C axis (rotation around Z)")),
        ('D', real("Diameter or radial offset used for cutter compensation")),
        // Feed rates
        ('E', real("Precision feedrate for threading on lathes")),
        ('F', real("Feedrate")),
        ('G', code("Address for preparatory commands")),
        ('H', code("Tool length offset")),
        // Arc center offsets
        ('I', real("Arc center in X for G2/G3 arcs; also a canned cycle parameter")),
        ('J', real("Arc center in Y for G2/G3 arcs; also a canned cycle parameter")),
        ('K', real("Arc center in Z for G2/G3 arcs; also a canned cycle parameter")),
        ('L', integer("Fixed cycle loop count; register to edit with G10")),
        ('M', code("Miscellaneous function")),
        ('N', integer("Line (block) number")),
        ('O', text(&TEXT, "Program name")),
        ('P', real("Parameter address for various G and M codes")),
        ('Q', real("Peck increment in canned cycles")),
        ('R', real("Arc radius, or retract height in canned cycles")),
        ('S', code("Spindle speed or surface speed, depending on mode")),
        ('T', text(&POSITIVE_INT, "Tool selection")),
        // Incremental axes
        ('U', real("Incremental axis corresponding to X")),
        ('V', real("Incremental axis corresponding to Y")),
        ('W', real("Incremental axis corresponding to Z")),
        // Linear axes
        ('X', position("Absolute or incremental position of X axis")),
        ('Y', position("Absolute or incremental position of Y axis")),
        ('Z', real("Absolute or incremental position of Z axis")),
    ];

    Dialect::new(
        NAME,
        Some("LinuxCNC, the basis of the other dialects".to_string()),
        rules,
    )
    .expect("built-in LinuxCNC dialect is valid")
}
