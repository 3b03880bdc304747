use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Scalar;
use crate::error::{validation_error, Error};

/// Pincode differences are folded into a day's worth of hours.
pub const RIDE_HOURS_MODULUS: i64 = 24;

/// Shortest window a booking may occupy, so `end > start` always holds.
pub const MIN_RIDE_HOURS: i64 = 1;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pincode(pub u32);

impl Pincode {
    pub fn parse(field: &str, raw: &Scalar) -> Result<Self, Error> {
        let code = match raw {
            Scalar::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
            Scalar::Text(text) => text.trim().parse::<u32>().ok(),
        };

        code.map(Pincode).ok_or_else(|| validation_error(field))
    }
}

/// Parses a ride start time.
///
/// Strings are RFC 3339 (seconds optional), zone-less ISO 8601 read as UTC,
/// or a bare date read as UTC midnight. Numbers are Unix epoch milliseconds.
pub fn parse_timestamp(field: &str, raw: &Scalar) -> Result<DateTime<Utc>, Error> {
    let timestamp = match raw {
        Scalar::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Scalar::Text(text) => parse_timestamp_text(text.trim()),
    };

    timestamp.ok_or_else(|| validation_error(field))
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }

    if let Some(timestamp) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(timestamp.with_timezone(&Utc));
    }

    // a trailing `Z` is UTC, same as no zone at all
    let naive_text = text.strip_suffix(|c: char| c == 'Z' || c == 'z').unwrap_or(text);

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive_text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Placeholder travel time between two pincodes; not a distance model.
pub fn ride_duration_hours(from: Pincode, to: Pincode) -> i64 {
    let hours = (i64::from(to.0) - i64::from(from.0)).abs() % RIDE_HOURS_MODULUS;

    hours.max(MIN_RIDE_HOURS)
}

/// Half-open `[start, end)` interval a booking occupies on its vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RideWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RideWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn for_route(from: Pincode, to: Pincode, start: DateTime<Utc>) -> Result<Self, Error> {
        let end = start
            .checked_add_signed(Duration::hours(ride_duration_hours(from, to)))
            .ok_or_else(|| validation_error("startTime"))?;

        Ok(Self::new(start, end))
    }

    pub fn overlaps(&self, other: &RideWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, hour, minute, 0).unwrap()
}

#[test]
fn overlap_is_symmetric() {
    let windows = [
        RideWindow::new(at(9, 0), at(11, 0)),
        RideWindow::new(at(10, 0), at(12, 0)),
        RideWindow::new(at(11, 0), at(13, 0)),
        RideWindow::new(at(8, 0), at(14, 0)),
        RideWindow::new(at(13, 30), at(14, 0)),
    ];

    for a in windows.iter() {
        for b in windows.iter() {
            assert_eq!(a.overlaps(b), b.overlaps(a), "{:?} vs {:?}", a, b);
        }
    }
}

#[test]
fn window_overlaps_itself() {
    let window = RideWindow::new(at(9, 0), at(9, 1));

    assert!(window.overlaps(&window));
}

#[test]
fn back_to_back_windows_do_not_overlap() {
    let first = RideWindow::new(at(9, 0), at(11, 0));
    let second = RideWindow::new(at(11, 0), at(13, 0));

    assert!(!first.overlaps(&second));
    assert!(!second.overlaps(&first));
}

#[test]
fn contained_window_overlaps() {
    let outer = RideWindow::new(at(8, 0), at(14, 0));
    let inner = RideWindow::new(at(10, 0), at(11, 0));

    assert!(outer.overlaps(&inner));
}

#[test]
fn duration_uses_pincode_difference_modulo_a_day() {
    // |110005 - 110001| = 4
    assert_eq!(ride_duration_hours(Pincode(110001), Pincode(110005)), 4);
    // symmetric in direction
    assert_eq!(ride_duration_hours(Pincode(110005), Pincode(110001)), 4);
    // |400030 - 400001| = 29 -> 5
    assert_eq!(ride_duration_hours(Pincode(400001), Pincode(400030)), 5);
}

#[test]
fn zero_hour_routes_get_the_minimum_window() {
    // |560001 - 110001| = 450000, a multiple of 24
    assert_eq!(ride_duration_hours(Pincode(110001), Pincode(560001)), 1);
    assert_eq!(ride_duration_hours(Pincode(110001), Pincode(110001)), 1);

    let window = RideWindow::for_route(Pincode(110001), Pincode(560001), at(10, 0)).unwrap();
    assert_eq!(window.end, at(11, 0));
}

#[test]
fn window_for_route_adds_derived_hours() {
    let window = RideWindow::for_route(Pincode(110001), Pincode(110007), at(9, 30)).unwrap();

    assert_eq!(window.start, at(9, 30));
    assert_eq!(window.end, at(15, 30));
}

#[test]
fn pincode_parses_numbers_and_strings() {
    assert_eq!(
        Pincode::parse("fromPincode", &Scalar::from(110001u64)).unwrap(),
        Pincode(110001)
    );
    assert_eq!(
        Pincode::parse("fromPincode", &Scalar::from(" 560001 ")).unwrap(),
        Pincode(560001)
    );
}

#[test]
fn pincode_rejects_garbage() {
    for raw in [
        Scalar::from("abc"),
        Scalar::from("-5"),
        Scalar::from(-5i64),
        Scalar::from(""),
    ] {
        let err = Pincode::parse("toPincode", &raw).unwrap_err();
        assert!(err.is_validation_error());
        assert!(err.message.contains("toPincode"));
    }

    let fractional: Scalar = serde_json::from_str("110001.5").unwrap();
    assert!(Pincode::parse("toPincode", &fractional).is_err());
}

#[test]
fn timestamp_accepts_rfc3339_naive_and_millis() {
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T10:00:00Z")).unwrap(),
        at(10, 0)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T15:30:00+05:30")).unwrap(),
        at(10, 0)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T10:00")).unwrap(),
        at(10, 0)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T10:00:00.000")).unwrap(),
        at(10, 0)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from(at(10, 0).timestamp_millis())).unwrap(),
        at(10, 0)
    );
}

#[test]
fn timestamp_accepts_minute_precision_and_bare_dates() {
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T10:00Z")).unwrap(),
        at(10, 0)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T09:00Z")).unwrap(),
        at(9, 0)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T15:30+05:30")).unwrap(),
        at(10, 0)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20T10:00:30.5Z")).unwrap(),
        at(10, 0) + chrono::Duration::milliseconds(30_500)
    );
    assert_eq!(
        parse_timestamp("startTime", &Scalar::from("2025-08-20")).unwrap(),
        at(0, 0)
    );
}

#[test]
fn timestamp_rejects_invalid_input() {
    for raw in [
        Scalar::from("not a date"),
        Scalar::from("2025-13-40T99:00:00Z"),
        Scalar::from(""),
    ] {
        let err = parse_timestamp("startTime", &raw).unwrap_err();
        assert!(err.message.contains("startTime"));
    }
}
