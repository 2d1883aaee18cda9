//! Canonical value rendering
//!
//! These are the numeric formatting policies a dialect can attach to a letter.
//! The output is what gets written back into program text, so it has to parse
//! back to the same value.

/// Render `value` with a fixed number of decimal places.
///
/// A value that rounds to zero loses its sign and its leading digit, so both
/// `0.0` and `-0.0` come out as `.000` with three decimals. With zero decimals
/// there is no fraction to keep and the result is `0`.
pub fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if text.parse::<f64>().is_ok_and(|v| v == 0.0) {
        strip_zero(&text)
    } else {
        text
    }
}

fn strip_zero(text: &str) -> String {
    let unsigned = text.trim_start_matches(['-', '+']);
    match unsigned.strip_prefix('0') {
        Some("") | None => "0".to_string(),
        Some(rest) => rest.to_string(),
    }
}

/// Render a G/H/M/S style code.
///
/// Codes below ten are padded to two digits (`05`, `01.5`); larger codes use
/// the shortest representation, with no trailing `.0`.
pub fn code(value: f64) -> String {
    if value < 10.0 {
        format!("0{value}")
    } else {
        format!("{value}")
    }
}

pub fn integer(value: i64) -> String {
    value.to_string()
}
