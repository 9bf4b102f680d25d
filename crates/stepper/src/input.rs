//! Raw comma-separated text to a validated sequence.

use shared::error::InputError;

pub const DEFAULT_LARGE_INPUT_THRESHOLD: usize = 50;
pub const LARGE_INPUT_WARNING: &str = "Warning: Visualizing large arrays may be slow.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub values: Vec<i64>,
    /// Advisory only; the run still proceeds.
    pub warning: Option<String>,
    pub discarded_tokens: usize,
}

pub fn parse_sequence(raw: &str, large_threshold: usize) -> Result<ParsedInput, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InputError::EmptyInput);
    }

    let mut values = Vec::new();
    let mut discarded_tokens = 0;
    for token in raw.split(',') {
        match parse_leading_integer(token) {
            Some(value) => values.push(value),
            None => discarded_tokens += 1,
        }
    }

    if values.is_empty() {
        return Err(InputError::NoValidNumbers);
    }

    if discarded_tokens > 0 {
        tracing::debug!(discarded_tokens, "ignored non-numeric tokens");
    }

    let warning = (values.len() > large_threshold).then(|| LARGE_INPUT_WARNING.to_string());

    Ok(ParsedInput {
        values,
        warning,
        discarded_tokens,
    })
}

/// Reads an optional sign followed by the longest run of digits, ignoring
/// whatever trails it. `"12abc"` is 12, `"3.7"` is 3, `"x1"` is rejected.
/// A `0x`/`0X` prefix switches to hexadecimal, so `"0x1A"` is 26 while a bare
/// `"0x"` is rejected. Digit runs that do not fit in `i64` are rejected too.
fn parse_leading_integer(token: &str) -> Option<i64> {
    let token = token.trim_start();
    let (negative, rest) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_len = rest.chars().take_while(|c| c.is_digit(radix)).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    if negative {
        i64::from_str_radix(&format!("-{digits}"), radix).ok()
    } else {
        i64::from_str_radix(digits, radix).ok()
    }
}
