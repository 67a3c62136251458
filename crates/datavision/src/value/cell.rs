//! The tagged cell type and its numeric/textual coercions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table value as produced by ingestion.
///
/// Serializes as a bare JSON number, string, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A finite decimal number.
    Number(f64),
    /// Any text that did not parse as a number.
    Text(String),
    /// No value (missing column or empty spreadsheet cell).
    #[default]
    Absent,
}

impl CellValue {
    /// Type a raw text cell: numbers become `Number`, everything else stays text.
    pub fn from_raw(raw: &str) -> Self {
        match parse_decimal(raw) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(raw.to_string()),
        }
    }

    /// Returns true if this is the absent value.
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Numeric view of the cell. See [`as_number`].
    pub fn as_number(&self) -> f64 {
        as_number(self)
    }

    /// Textual view of the cell. See [`as_text`].
    pub fn as_text(&self) -> String {
        as_text(self)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&as_text(self))
    }
}

/// Parse text as a finite decimal number.
///
/// `inf`, `NaN` and anything else that does not describe a finite value is rejected.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a cell to a number, defaulting to `0` for anything non-numeric.
pub fn as_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_decimal(s).unwrap_or(0.0),
        CellValue::Absent => 0.0,
    }
}

/// Render a cell as display text.
///
/// Integral numbers drop their fractional part (`3.0` renders as `"3"`); other
/// numbers use the shortest representation that round-trips.
pub fn as_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
        CellValue::Absent => String::new(),
    }
}

fn format_number(n: f64) -> String {
    // -0.0 would otherwise render as "-0"
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{}", n)
}
