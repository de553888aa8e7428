//! Date normalization tests
//!
//! Tests for the tri-form store dates including:
//! - Timestamp objects, epoch numbers and ISO strings
//! - Unparseable input collapsing to "no date"
//! - Calendar-date truncation at the report offset

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use shared::types::*;

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_text() {
        let parsed = parse_date_value(&DateValue::from("2024-03-15T10:00:00Z"));
        assert_eq!(parsed, Some(utc(2024, 3, 15, 10, 0, 0)));
    }

    #[test]
    fn test_parse_rfc3339_with_offset_and_millis() {
        let parsed = parse_date_value(&DateValue::from("2024-03-15T17:00:00.250+07:00"));
        let expected = utc(2024, 3, 15, 10, 0, 0) + chrono::Duration::milliseconds(250);
        assert_eq!(parsed, Some(expected));
    }

    #[test]
    fn test_parse_naive_date_time_as_utc() {
        assert_eq!(
            parse_date_value(&DateValue::from("2024-03-15 08:30:00")),
            Some(utc(2024, 3, 15, 8, 30, 0))
        );
        assert_eq!(
            parse_date_value(&DateValue::from("2024-03-15T08:30")),
            Some(utc(2024, 3, 15, 8, 30, 0))
        );
    }

    #[test]
    fn test_parse_date_only_is_utc_midnight() {
        assert_eq!(
            parse_date_value(&DateValue::from("2024-03-15")),
            Some(utc(2024, 3, 15, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_naive_text_on_local_wall_clock() {
        let offset = vietnam_offset();
        // 18:00 in Vietnam is 11:00 UTC, still the 15th on both clocks
        let evening = parse_date_value_at(&DateValue::from("2024-03-15T18:00"), &offset);
        assert_eq!(evening, Some(utc(2024, 3, 15, 11, 0, 0)));
        assert_eq!(
            calendar_date(evening.unwrap(), &offset),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );

        assert_eq!(
            parse_date_value_at(&DateValue::from("2024-03-15"), &offset),
            Some(utc(2024, 3, 14, 17, 0, 0))
        );
        // Explicit offsets and numeric forms ignore the wall clock
        assert_eq!(
            parse_date_value_at(&DateValue::from("2024-03-15T10:00:00Z"), &offset),
            Some(utc(2024, 3, 15, 10, 0, 0))
        );
        assert_eq!(
            parse_date_value_at(&DateValue::Epoch(1_710_496_800_000.0), &offset),
            Some(utc(2024, 3, 15, 10, 0, 0))
        );
    }

    #[test]
    fn test_parse_epoch_millis() {
        assert_eq!(
            parse_date_value(&DateValue::Epoch(1_710_496_800_000.0)),
            Some(utc(2024, 3, 15, 10, 0, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_object() {
        let value = DateValue::Timestamp(StoreTimestamp {
            seconds: 1_710_496_800,
            nanoseconds: 0,
        });
        assert_eq!(parse_date_value(&value), Some(utc(2024, 3, 15, 10, 0, 0)));
    }

    #[test]
    fn test_unparseable_values() {
        assert_eq!(parse_date_value(&DateValue::from("not-a-date")), None);
        assert_eq!(parse_date_value(&DateValue::from("")), None);
        assert_eq!(parse_date_value(&DateValue::from("   ")), None);
        assert_eq!(parse_date_value(&DateValue::from("2024-13-45")), None);
        assert_eq!(parse_date_value(&DateValue::Epoch(f64::NAN)), None);
        assert_eq!(parse_date_value(&DateValue::Epoch(f64::INFINITY)), None);
        assert_eq!(parse_date_value(&DateValue::Epoch(1e300)), None);
    }

    /// A timestamp that cannot be converted is "no date", not a failure
    #[test]
    fn test_timestamp_conversion_failure() {
        let value = DateValue::Timestamp(StoreTimestamp {
            seconds: i64::MAX,
            nanoseconds: 0,
        });
        assert_eq!(parse_date_value(&value), None);

        let bad_nanos = DateValue::Timestamp(StoreTimestamp {
            seconds: 0,
            nanoseconds: 3_000_000_000,
        });
        assert_eq!(parse_date_value(&bad_nanos), None);
    }

    #[test]
    fn test_native_value_passes_through() {
        let at = utc(2023, 12, 24, 23, 59, 59);
        assert_eq!(parse_date_value(&DateValue::from(at)), Some(at));
    }

    #[test]
    fn test_deserialize_each_shape() {
        let timestamp: DateValue =
            serde_json::from_str(r#"{"seconds": 1710496800, "nanoseconds": 5}"#).unwrap();
        assert!(matches!(timestamp, DateValue::Timestamp(_)));

        let underscored: DateValue =
            serde_json::from_str(r#"{"_seconds": 1710496800, "_nanoseconds": 0}"#).unwrap();
        assert_eq!(
            parse_date_value(&underscored),
            Some(utc(2024, 3, 15, 10, 0, 0))
        );

        let epoch: DateValue = serde_json::from_str("1710496800000").unwrap();
        assert!(matches!(epoch, DateValue::Epoch(_)));

        let text: DateValue = serde_json::from_str(r#""2024-03-15""#).unwrap();
        assert_eq!(text, DateValue::Text("2024-03-15".to_string()));
    }

    #[test]
    fn test_calendar_date_at_vietnam_offset() {
        let offset = vietnam_offset();
        // 20:00 UTC is already the next morning in Vietnam
        assert_eq!(
            calendar_date(utc(2024, 3, 14, 20, 0, 0), &offset),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(
            calendar_date(utc(2024, 3, 15, 10, 0, 0), &offset),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_offset_from_hours() {
        assert_eq!(offset_from_hours(7).unwrap().local_minus_utc(), 7 * 3600);
        assert_eq!(offset_from_hours(-5).unwrap().local_minus_utc(), -5 * 3600);
        assert!(offset_from_hours(24).is_none());
        assert!(offset_from_hours(i32::MAX).is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for instants between 2000 and 2100
    fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
        (946_684_800i64..4_102_444_800i64)
            .prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// All three serialized shapes of one instant normalize to the same value
        #[test]
        fn prop_representations_agree(at in instant_strategy()) {
            let text = DateValue::Text(at.to_rfc3339());
            let epoch = DateValue::Epoch(at.timestamp_millis() as f64);
            let timestamp = DateValue::Timestamp(StoreTimestamp {
                seconds: at.timestamp(),
                nanoseconds: 0,
            });

            prop_assert_eq!(parse_date_value(&text), Some(at));
            prop_assert_eq!(parse_date_value(&epoch), Some(at));
            prop_assert_eq!(parse_date_value(&timestamp), Some(at));
        }

        /// Calendar date ignores time of day: every instant of a local day maps to it
        #[test]
        fn prop_calendar_date_ignores_time_of_day(
            at in instant_strategy(),
            seconds_into_day in 0u32..86_400u32
        ) {
            let offset = vietnam_offset();
            let local_day = calendar_date(at, &offset);
            let local_midnight = offset
                .from_local_datetime(&local_day.and_hms_opt(0, 0, 0).unwrap())
                .unwrap()
                .with_timezone(&Utc);
            let same_day = local_midnight + chrono::Duration::seconds(seconds_into_day as i64);

            prop_assert_eq!(calendar_date(same_day, &offset), local_day);
        }

        /// Offset-less text keeps its written calendar day at any report offset
        #[test]
        fn prop_naive_text_keeps_its_day(
            at in instant_strategy(),
            hours in -12i32..=14i32
        ) {
            let offset = offset_from_hours(hours).unwrap();
            let written = at.naive_utc();
            let text = DateValue::Text(written.format("%Y-%m-%dT%H:%M").to_string());
            let parsed = parse_date_value_at(&text, &offset).unwrap();
            prop_assert_eq!(calendar_date(parsed, &offset), written.date());
        }

        /// Arbitrary text never panics and never yields a year outside chrono's range
        #[test]
        fn prop_arbitrary_text_is_total(text in ".{0,40}") {
            if let Some(at) = parse_date_value(&DateValue::Text(text)) {
                prop_assert!(at.year() > -300_000 && at.year() < 300_000);
            }
        }
    }
}
