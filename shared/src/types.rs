//! Common types used across the platform
//!
//! Records arrive from a loosely typed document store, so this module also
//! carries the tolerant readers the models use for dates and numbers.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Offset of Asia/Ho_Chi_Minh, the shop's wall clock
pub const VIETNAM_UTC_OFFSET_HOURS: i32 = 7;

/// Date-time layouts accepted after RFC 3339; they carry no offset
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A date field as the document store hands it back.
///
/// The same logical field was written as a timestamp object, an epoch number or
/// an ISO string depending on when the record was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// Database timestamp object
    Timestamp(StoreTimestamp),
    /// Milliseconds since the Unix epoch
    Epoch(f64),
    /// ISO-8601 date or date-time
    Text(String),
    /// Already converted in code
    #[serde(skip_deserializing)]
    Native(DateTime<Utc>),
}

impl From<DateTime<Utc>> for DateValue {
    fn from(value: DateTime<Utc>) -> Self {
        DateValue::Native(value)
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

/// Timestamp object as serialized by the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTimestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(alias = "_nanoseconds", default)]
    pub nanoseconds: u32,
}

impl StoreTimestamp {
    /// Convert to a UTC instant, `None` when the value is out of range
    pub fn to_date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

/// Normalize any stored date representation, reading text without an
/// offset as UTC.
///
/// Returns `None` for blank or invalid text, non-finite or out-of-range epochs,
/// and timestamps that fail to convert. Callers treat `None` as "no date".
pub fn parse_date_value(value: &DateValue) -> Option<DateTime<Utc>> {
    parse_date_value_at(value, &Utc.fix())
}

/// Like [`parse_date_value`], but text without an offset is wall-clock time
/// at `offset`.
///
/// Shop staff enter delivery slots as local times (`2024-03-15T18:00`), and a
/// date-only value names that calendar day at `offset`.
pub fn parse_date_value_at(value: &DateValue, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    match value {
        DateValue::Native(at) => Some(*at),
        DateValue::Timestamp(timestamp) => timestamp.to_date_time(),
        DateValue::Epoch(millis) => parse_epoch_millis(*millis),
        DateValue::Text(text) => parse_date_text(text, offset),
    }
}

fn parse_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    // `as` saturates; saturated values fall outside chrono's range
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

fn parse_date_text(text: &str, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }

    let naive = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    naive
        .and_local_timezone(*offset)
        .single()
        .map(|at| at.with_timezone(&Utc))
}

/// Calendar date of an instant on the wall clock at `offset`
pub fn calendar_date(at: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    at.with_timezone(offset).date_naive()
}

/// Build a fixed offset from whole hours, `None` outside ±23h
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
}

/// The shop's default report offset (UTC+7)
pub fn vietnam_offset() -> FixedOffset {
    offset_from_hours(VIETNAM_UTC_OFFSET_HOURS).unwrap_or_else(|| Utc.fix())
}

/// Read a decimal out of whatever JSON the store returned
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Some(Decimal::from(int));
            }
            if let Some(uint) = number.as_u64() {
                return Some(Decimal::from(uint));
            }
            parse_decimal_text(&number.to_string())
                .or_else(|| number.as_f64().and_then(|float| Decimal::try_from(float).ok()))
        }
        Value::String(text) => parse_decimal_text(text),
        _ => None,
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Lenient `deserialize_with` helpers
///
/// Used as `#[serde(default, deserialize_with = "lenient::decimal")]`. A field
/// that holds the wrong kind of JSON reads as absent instead of failing the
/// whole record.
pub mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(super::decimal_from_json))
    }

    pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        decimal(deserializer).map(|value| value.unwrap_or(Decimal::ZERO))
    }

    /// Any date shape [`DateValue`](super::DateValue) understands, else absent
    pub fn date<'de, D>(deserializer: D) -> Result<Option<super::DateValue>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|value| serde_json::from_value(value).ok()))
    }

    /// Strings pass through, numbers are printed, anything else is absent
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(text)) => Some(text),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        })
    }
}

/// Lowercase, trimmed, `-`/space folded to `_` for enum matching
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}

/// The string inside a JSON label field; null and non-strings read as absent
pub(crate) fn label_from_json(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        _ => None,
    }
}
