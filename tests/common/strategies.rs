use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use batch_generator::TimestampPrecision;

pub fn token_length_strategy() -> impl Strategy<Value = usize> {
    1usize..=64
}

pub fn precision_strategy() -> impl Strategy<Value = TimestampPrecision> {
    prop_oneof![
        Just(TimestampPrecision::Millis),
        Just(TimestampPrecision::Micros),
        Just(TimestampPrecision::Nanos),
    ]
}

/// Instants between the years 1970 and 9999 with arbitrary sub-second parts.
pub fn datetime_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (
        1970i32..=9999,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1_000_000_000,
    )
        .prop_map(|(year, month, day, hour, minute, second, nanos)| {
            let naive = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_nano_opt(hour, minute, second, nanos))
                .unwrap();
            Utc.from_utc_datetime(&naive)
        })
}
