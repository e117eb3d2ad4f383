//! Cell value types.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// A typed cell value.
///
/// Every variant carries its own default presentation rule, applied when no
/// explicit style overrides it: numbers render in the general format,
/// datetimes pick up a date number format, booleans render as TRUE/FALSE.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// An empty cell (may still carry a style)
    #[default]
    Blank,
    /// A boolean value
    Boolean(bool),
    /// A numeric value (all spreadsheet numbers are f64)
    Number(f64),
    /// A text value
    Text(String),
    /// A date/time value, stored timezone-naive
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Is this a blank cell?
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the datetime value, if this is a datetime.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// The spreadsheet serial number for a datetime value.
    pub fn serial_number(&self) -> Option<f64> {
        match self {
            CellValue::DateTime(dt) => Some(datetime_to_serial(dt)),
            _ => None,
        }
    }

    /// Variant name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Blank => "blank",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::DateTime(_) => "datetime",
        }
    }

    /// Render the value as display text under its default presentation rule.
    ///
    /// This is the text the column autosize pass measures and the text a
    /// tabular report prints for the cell.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Format a number the way the general cell format displays it.
fn format_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Convert a datetime to a spreadsheet serial number.
///
/// Day 1 is 1900-01-01; the epoch 1899-12-30 absorbs the fictitious
/// 1900-02-29 that the formats inherited, so serials agree with
/// spreadsheet applications for all dates from 1900-03-01 on.
pub fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    // Epoch date is always valid; fall back to day zero if chrono refuses it.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    let days = dt.date().signed_duration_since(epoch).num_days() as f64;
    let secs = dt.time().num_seconds_from_midnight() as f64
        + dt.time().nanosecond() as f64 / 1_000_000_000.0;
    days + secs / 86_400.0
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        // Midnight of the given day
        CellValue::DateTime(d.into())
    }
}
