use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// First-column names of the trip-record CSV exports. A line whose first field is one of these is
/// a header and never a record.
pub const DEFAULT_HEADER_LITERALS: &[&str] =
    &["lpep_pickup_datetime", "tpep_pickup_datetime", "VendorID"];

pub const DEFAULT_DELIMITER: char = ',';

// `%.f` also accepts timestamps without a fractional part.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// `ParseError` classifies why a single input line was rejected.
///
/// A `ParseError` is always local to one line: the line is dropped, counted and the run carries on.
/// It is deliberately not part of the crate's error chain, which is reserved for failures that
/// abort a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParseError {
    /// The line is empty or whitespace only.
    Blank,
    /// The line is a CSV header.
    Header,
    /// A required field index is out of range.
    MissingField(usize),
    /// A required field is not a finite number.
    BadNumber(usize),
    /// A required field is not a `YYYY-MM-DD[ HH:MM:SS]` timestamp.
    BadTimestamp(usize),
    /// The grouping key is empty.
    EmptyKey,
    /// The grouping key contains the wire field separator.
    BadKey,
    /// A key-value line did not have exactly the expected number of tab-separated fields.
    FieldCount(usize),
    /// The line is not valid UTF-8.
    InvalidUtf8,
}

impl ParseError {
    /// A short, stable label used when counting skipped lines.
    pub fn reason(&self) -> &'static str {
        match *self {
            ParseError::Blank => "blank",
            ParseError::Header => "header",
            ParseError::MissingField(_) => "missing_field",
            ParseError::BadNumber(_) => "bad_number",
            ParseError::BadTimestamp(_) => "bad_timestamp",
            ParseError::EmptyKey => "empty_key",
            ParseError::BadKey => "bad_key",
            ParseError::FieldCount(_) => "field_count",
            ParseError::InvalidUtf8 => "invalid_utf8",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::Blank => write!(f, "blank line"),
            ParseError::Header => write!(f, "header line"),
            ParseError::MissingField(index) => write!(f, "field {} is missing", index),
            ParseError::BadNumber(index) => write!(f, "field {} is not a number", index),
            ParseError::BadTimestamp(index) => write!(f, "field {} is not a timestamp", index),
            ParseError::EmptyKey => write!(f, "key is empty"),
            ParseError::BadKey => write!(f, "key contains a tab"),
            ParseError::FieldCount(count) => write!(f, "expected 2 fields, found {}", count),
            ParseError::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

/// Shorthand for results of per-line parsing.
pub type ParseResult<T> = ::std::result::Result<T, ParseError>;

/// `RecordParser` splits one raw delimited line into a `Record`.
#[derive(Clone, Debug)]
pub struct RecordParser {
    delimiter: char,
    header_literals: Vec<String>,
}

impl Default for RecordParser {
    fn default() -> Self {
        RecordParser::new(DEFAULT_DELIMITER).header_literals(DEFAULT_HEADER_LITERALS.iter())
    }
}

impl RecordParser {
    /// Constructs a parser for the given delimiter which recognises no header lines.
    pub fn new(delimiter: char) -> Self {
        RecordParser {
            delimiter,
            header_literals: Vec::new(),
        }
    }

    /// Replaces the set of first-field values that mark a header line.
    pub fn header_literals<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.header_literals = literals
            .into_iter()
            .map(|literal| literal.as_ref().to_owned())
            .collect();
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parses one line. Blank and header lines are rejected here; field-level checks happen when
    /// the mapper reads a field through the returned `Record`.
    pub fn parse<'a>(&self, line: &'a str) -> ParseResult<Record<'a>> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Blank);
        }

        let fields: Vec<&'a str> = line.split(self.delimiter).collect();
        let first = clean_field(fields[0]);
        if self.header_literals.iter().any(|literal| literal == first) {
            return Err(ParseError::Header);
        }

        Ok(Record { fields })
    }
}

/// Strips surrounding whitespace and one level of double quotes.
fn clean_field(field: &str) -> &str {
    let field = field.trim();
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].trim()
    } else {
        field
    }
}

/// `Record` is the ordered field sequence of one accepted line.
///
/// Every accessor is checked, so a mapper either reads all the fields it needs or rejects the
/// line as a whole.
#[derive(Debug, PartialEq)]
pub struct Record<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The cleaned text of a field, which may be empty.
    pub fn text(&self, index: usize) -> ParseResult<&'a str> {
        self.fields
            .get(index)
            .map(|field| clean_field(*field))
            .ok_or(ParseError::MissingField(index))
    }

    /// A field used verbatim as a grouping key. Empty keys are rejected.
    pub fn key(&self, index: usize) -> ParseResult<&'a str> {
        let text = self.text(index)?;
        if text.is_empty() {
            return Err(ParseError::EmptyKey);
        }
        Ok(text)
    }

    pub fn number(&self, index: usize) -> ParseResult<f64> {
        parse_number(self.text(index)?).ok_or(ParseError::BadNumber(index))
    }

    /// Like `number`, but a blank field reads as zero.
    pub fn number_or_zero(&self, index: usize) -> ParseResult<f64> {
        let text = self.text(index)?;
        if text.is_empty() {
            return Ok(0.0);
        }
        parse_number(text).ok_or(ParseError::BadNumber(index))
    }

    /// The calendar date of a timestamp field, time of day discarded.
    pub fn date(&self, index: usize) -> ParseResult<NaiveDate> {
        parse_date(self.text(index)?).ok_or(ParseError::BadTimestamp(index))
    }
}

/// Parses a finite floating point number.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(|value| if value.is_finite() { Some(value) } else { None })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map(|timestamp| timestamp.date())
        .or_else(|_| NaiveDate::parse_from_str(text, DATE_FORMAT))
        .ok()
}
