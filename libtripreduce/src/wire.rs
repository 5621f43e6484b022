//! The line format shared by map output, reduce input and reduce output.
//!
//! One record per line, key and value separated by a single tab. A composite value keeps its
//! sub-fields in the value column, separated by commas.

use std::io::Write;

use errors::*;
use record::{parse_number, ParseError, ParseResult};

pub const FIELD_SEPARATOR: char = '\t';
pub const VALUE_SEPARATOR: char = ',';

/// `WireValue` is implemented by every partial value a mapper can emit.
pub trait WireValue: Sized {
    /// Renders the value as the value column of a map output line.
    fn encode(&self) -> String;

    /// Reads the value column of a reduce input line.
    fn decode(text: &str) -> ParseResult<Self>;
}

impl WireValue for f64 {
    fn encode(&self) -> String {
        format_float(*self)
    }

    fn decode(text: &str) -> ParseResult<Self> {
        parse_number(text).ok_or(ParseError::BadNumber(1))
    }
}

impl WireValue for u64 {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(text: &str) -> ParseResult<Self> {
        text.trim().parse().map_err(|_| ParseError::BadNumber(1))
    }
}

impl WireValue for (f64, f64) {
    fn encode(&self) -> String {
        format!("{}{}{}", format_float(self.0), VALUE_SEPARATOR, format_float(self.1))
    }

    fn decode(text: &str) -> ParseResult<Self> {
        let mut parts = text.split(VALUE_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(first), Some(second), None) => {
                let first = parse_number(first).ok_or(ParseError::BadNumber(1))?;
                let second = parse_number(second).ok_or(ParseError::BadNumber(1))?;
                Ok((first, second))
            }
            _ => Err(ParseError::BadNumber(1)),
        }
    }
}

/// Formats a float the way the downstream tooling reads it: shortest round-trip digits, and a
/// trailing `.0` when the value is integral.
pub fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') && !text.contains('e') {
        text + ".0"
    } else {
        text
    }
}

/// Checks that `key` can be written as the first column of a key-value line.
pub fn check_key(key: &str) -> ParseResult<()> {
    if key.is_empty() {
        Err(ParseError::EmptyKey)
    } else if key.contains(FIELD_SEPARATOR) {
        Err(ParseError::BadKey)
    } else {
        Ok(())
    }
}

/// Splits one key-value line into its key and value columns.
///
/// Surrounding whitespace other than tabs (including a trailing `\r`) is ignored. Exactly two
/// columns are required and the key must not be empty.
pub fn split_pair(line: &str) -> ParseResult<(&str, &str)> {
    if line.trim().is_empty() {
        return Err(ParseError::Blank);
    }
    let line = line.trim_matches(|c: char| c.is_whitespace() && c != FIELD_SEPARATOR);

    let mut columns = line.split(FIELD_SEPARATOR);
    match (columns.next(), columns.next(), columns.next()) {
        (Some(key), Some(value), None) => {
            if key.is_empty() {
                Err(ParseError::EmptyKey)
            } else {
                Ok((key, value))
            }
        }
        _ => Err(ParseError::FieldCount(line.split(FIELD_SEPARATOR).count())),
    }
}

/// Writes one `<key>\t<value>` line.
pub fn write_pair<W: Write>(sink: &mut W, key: &str, value: &str) -> Result<()> {
    writeln!(sink, "{}{}{}", key, FIELD_SEPARATOR, value)
        .chain_err(|| format!("Error writing output line for key {}.", key))?;
    Ok(())
}
