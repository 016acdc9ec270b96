//! Tagged scalar cell values.
//!
//! Raw cells arrive as strings; once a column's type is known every cell is
//! converted to a [`Value`] so downstream statistics and projections never
//! re-derive types from untyped text. `as_number` still re-parses string
//! content on purpose: chart probing classifies columns per request slice,
//! and a string column may be numeric within one slice.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Date layouts accepted during inference, ISO first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Timestamp layouts accepted during inference.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// Shape prefilter so non-date text skips the chrono format loop.
static DATE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(),
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(),
        Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}").unwrap(),
        Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}").unwrap(),
    ]
});

/// A single typed cell.
///
/// Serializes untagged, so a row maps onto the same JSON an untyped record
/// store would produce (`Missing` becomes `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Date(NaiveDateTime),
    Missing,
}

impl Value {
    /// Whether this cell is missing (null/empty in the source).
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell. String content is re-parsed; booleans and
    /// dates have no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Date view of the cell. String content is re-parsed.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => parse_date(s),
            _ => None,
        }
    }

    /// Render the cell the way it would appear in a CSV export.
    pub fn display_text(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => format_date(*d),
            Value::Missing => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

/// Parse text as a finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse text against the supported date and timestamp layouts.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if !DATE_SHAPES.iter().any(|re| re.is_match(trimmed)) {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(parsed);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse text as a boolean flag (`true`/`false`/`1`/`0`, case-insensitive).
pub fn parse_boolean(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Format a number without a trailing `.0` for whole values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Format a date, dropping the midnight time component.
pub fn format_date(d: NaiveDateTime) -> String {
    if d.time() == chrono::NaiveTime::MIN {
        d.format("%Y-%m-%d").to_string()
    } else {
        d.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
