//! Pure transformation from a [`SeismicEvent`] to display fields.
//!
//! Nothing here is cached: a [`DisplayRecord`] is recomputed on every render
//! and thrown away afterwards.

use chrono::{DateTime, Local, TimeZone};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::models::SeismicEvent;

// ============================================================================
// Constants
// ============================================================================

/// Token a location is split on.
const LOCATION_SEPARATOR: &str = "of";

/// Offset phrase used when the location has no separator.
const NEAR_THE: &str = "near the";

/// Primary location used when the feed gave an empty place.
const UNKNOWN_LOCATION: &str = "Unknown location";

/// Date pattern: four-digit year, two-digit month and day, dot-separated.
const DATE_PATTERN: &str = "%Y.%m.%d";

/// Time pattern: 12-hour clock with AM/PM.
const TIME_PATTERN: &str = "%-I:%M %p";

/// Shown when the epoch value cannot be represented as a date.
const INVALID_DATE_LABEL: &str = "----.--.--";

/// Shown when the epoch value cannot be represented as a time.
const INVALID_TIME_LABEL: &str = "--:--";

// ============================================================================
// Magnitude Bucket
// ============================================================================

/// Discrete magnitude-to-color category.
///
/// `floor(magnitude)` below 1 (negatives and NaN included) lands in
/// [`MagnitudeBucket::One`]; anything at or above 10 lands in
/// [`MagnitudeBucket::TenPlus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagnitudeBucket {
    /// Below 2, including zero and negative magnitudes.
    One,
    /// 2 up to 3.
    Two,
    /// 3 up to 4.
    Three,
    /// 4 up to 5.
    Four,
    /// 5 up to 6.
    Five,
    /// 6 up to 7.
    Six,
    /// 7 up to 8.
    Seven,
    /// 8 up to 9.
    Eight,
    /// 9 up to 10.
    Nine,
    /// Magnitude 10 and above.
    TenPlus,
}

impl MagnitudeBucket {
    /// Maps a magnitude to its bucket.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude.is_nan() {
            return Self::One;
        }

        // Float-to-int casts saturate, so infinities land in the end buckets.
        match magnitude.floor() as i64 {
            i64::MIN..=1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            5 => Self::Five,
            6 => Self::Six,
            7 => Self::Seven,
            8 => Self::Eight,
            9 => Self::Nine,
            _ => Self::TenPlus,
        }
    }

    /// Returns the bucket label (`"1"` .. `"9"`, `"10+"`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::TenPlus => "10+",
        }
    }

    /// Returns the fixed color for this bucket.
    pub fn color(&self) -> MagnitudeColor {
        match self {
            Self::One => MagnitudeColor::rgb(0x4A, 0x7B, 0xA7),
            Self::Two => MagnitudeColor::rgb(0x04, 0xB4, 0xB3),
            Self::Three => MagnitudeColor::rgb(0x10, 0xCA, 0xC9),
            Self::Four => MagnitudeColor::rgb(0xF5, 0xA6, 0x23),
            Self::Five => MagnitudeColor::rgb(0xFF, 0x7D, 0x50),
            Self::Six => MagnitudeColor::rgb(0xFC, 0x66, 0x44),
            Self::Seven => MagnitudeColor::rgb(0xE7, 0x5F, 0x40),
            Self::Eight => MagnitudeColor::rgb(0xE1, 0x3A, 0x20),
            Self::Nine => MagnitudeColor::rgb(0xD9, 0x32, 0x18),
            Self::TenPlus => MagnitudeColor::rgb(0xC0, 0x38, 0x23),
        }
    }

    /// Returns all buckets in ascending order.
    pub fn all() -> [MagnitudeBucket; 10] {
        [
            Self::One,
            Self::Two,
            Self::Three,
            Self::Four,
            Self::Five,
            Self::Six,
            Self::Seven,
            Self::Eight,
            Self::Nine,
            Self::TenPlus,
        ]
    }
}

impl fmt::Display for MagnitudeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for MagnitudeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ============================================================================
// Magnitude Color
// ============================================================================

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MagnitudeColor {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl MagnitudeColor {
    /// Creates a color from its channels.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the color as `#RRGGBB`.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl Serialize for MagnitudeColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

// ============================================================================
// Display Record
// ============================================================================

/// Presentation fields derived from one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    /// Magnitude as text (`"4.0"`, `"6.52"`).
    pub magnitude_label: String,
    /// Color category.
    pub color_bucket: MagnitudeBucket,
    /// Text up to and including the separator, or `"near the"`.
    pub location_offset_phrase: String,
    /// Text after the separator, or the whole location.
    pub primary_location: String,
    /// Local date, `yyyy.MM.dd`.
    pub date_label: String,
    /// Local time, 12-hour clock.
    pub time_label: String,
}

impl DisplayRecord {
    /// Returns the color of this record's bucket.
    pub fn color(&self) -> MagnitudeColor {
        self.color_bucket.color()
    }
}

// ============================================================================
// Derivations
// ============================================================================

/// Derives the display record for `event` in the viewer's local time zone.
pub fn present(event: &SeismicEvent) -> DisplayRecord {
    present_in(event, &Local)
}

/// Derives the display record for `event` in the given time zone.
pub fn present_in<Tz>(event: &SeismicEvent, tz: &Tz) -> DisplayRecord
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let (location_offset_phrase, primary_location) = split_location(&event.raw_location);

    DisplayRecord {
        magnitude_label: magnitude_label(event.magnitude),
        color_bucket: MagnitudeBucket::from_magnitude(event.magnitude),
        location_offset_phrase,
        primary_location,
        date_label: date_label(event.occurred_at_epoch_millis, tz),
        time_label: time_label(event.occurred_at_epoch_millis, tz),
    }
}

/// Formats a magnitude with at least one fractional digit.
pub fn magnitude_label(magnitude: f64) -> String {
    let mut label = magnitude.to_string();
    if magnitude.is_finite() && !label.contains('.') {
        label.push_str(".0");
    }
    label
}

/// Splits a raw location into `(offset phrase, primary location)`.
///
/// The split happens at the first occurrence of `"of"`, keeping the token in
/// the offset phrase and leaving both halves untrimmed. Without a usable
/// split the offset is `"near the"` and the primary location is the input.
/// Both halves are always non-empty.
pub fn split_location(raw_location: &str) -> (String, String) {
    if let Some((before, after)) = raw_location.split_once(LOCATION_SEPARATOR) {
        if !after.trim().is_empty() {
            return (format!("{before}{LOCATION_SEPARATOR}"), after.to_string());
        }
    }

    let primary = if raw_location.trim().is_empty() {
        UNKNOWN_LOCATION
    } else {
        raw_location
    };
    (NEAR_THE.to_string(), primary.to_string())
}

/// Formats epoch milliseconds as a `yyyy.MM.dd` date in `tz`.
pub fn date_label<Tz>(epoch_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format_epoch(epoch_millis, tz, DATE_PATTERN).unwrap_or_else(|| INVALID_DATE_LABEL.to_string())
}

/// Formats epoch milliseconds as a 12-hour `h:mm AM` time in `tz`.
pub fn time_label<Tz>(epoch_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format_epoch(epoch_millis, tz, TIME_PATTERN).unwrap_or_else(|| INVALID_TIME_LABEL.to_string())
}

fn format_epoch<Tz>(epoch_millis: i64, tz: &Tz, pattern: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let utc = DateTime::from_timestamp_millis(epoch_millis)?;
    Some(utc.with_timezone(tz).format(pattern).to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(MagnitudeBucket::from_magnitude(-1.0), MagnitudeBucket::One);
        assert_eq!(MagnitudeBucket::from_magnitude(0.0), MagnitudeBucket::One);
        assert_eq!(MagnitudeBucket::from_magnitude(0.9), MagnitudeBucket::One);
        assert_eq!(MagnitudeBucket::from_magnitude(1.0), MagnitudeBucket::One);
        assert_eq!(MagnitudeBucket::from_magnitude(2.5), MagnitudeBucket::Two);
        assert_eq!(MagnitudeBucket::from_magnitude(9.9), MagnitudeBucket::Nine);
        assert_eq!(MagnitudeBucket::from_magnitude(10.0), MagnitudeBucket::TenPlus);
        assert_eq!(MagnitudeBucket::from_magnitude(15.0), MagnitudeBucket::TenPlus);
        assert_eq!(MagnitudeBucket::from_magnitude(f64::NAN), MagnitudeBucket::One);
        assert_eq!(
            MagnitudeBucket::from_magnitude(f64::INFINITY),
            MagnitudeBucket::TenPlus
        );
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(MagnitudeBucket::Four.label(), "4");
        assert_eq!(MagnitudeBucket::TenPlus.to_string(), "10+");
    }

    #[test]
    fn test_every_bucket_reachable_from_its_lower_bound() {
        for (lower, bucket) in (1..=10).map(f64::from).zip(MagnitudeBucket::all()) {
            assert_eq!(MagnitudeBucket::from_magnitude(lower), bucket);
            assert_eq!(MagnitudeBucket::from_magnitude(lower + 0.99), bucket);
        }
        assert_eq!(
            MagnitudeBucket::from_magnitude(f64::NEG_INFINITY),
            MagnitudeBucket::One
        );
    }

    #[test]
    fn test_each_bucket_has_distinct_color() {
        let colors: Vec<String> = MagnitudeBucket::all().iter().map(|b| b.color().hex()).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(MagnitudeBucket::One.color().hex(), "#4A7BA7");
        assert_eq!(MagnitudeBucket::TenPlus.color().hex(), "#C03823");
    }

    #[test]
    fn test_split_with_separator() {
        let (offset, primary) = split_location("5km SW of Example City");
        assert_eq!(offset, "5km SW of");
        assert_eq!(primary, " Example City");
    }

    #[test]
    fn test_split_without_separator() {
        let (offset, primary) = split_location("Example City");
        assert_eq!(offset, "near the");
        assert_eq!(primary, "Example City");
    }

    #[test]
    fn test_split_uses_first_occurrence() {
        let (offset, primary) = split_location("10km N of Gulf of Aqaba");
        assert_eq!(offset, "10km N of");
        assert_eq!(primary, " Gulf of Aqaba");
    }

    #[test]
    fn test_split_never_yields_empty_halves() {
        let (offset, primary) = split_location("Gulf of");
        assert_eq!(offset, "near the");
        assert_eq!(primary, "Gulf of");

        let (offset, primary) = split_location("");
        assert_eq!(offset, "near the");
        assert_eq!(primary, "Unknown location");
    }

    #[test]
    fn test_magnitude_label() {
        assert_eq!(magnitude_label(4.0), "4.0");
        assert_eq!(magnitude_label(6.52), "6.52");
        assert_eq!(magnitude_label(-0.5), "-0.5");
    }

    #[test]
    fn test_date_and_time_labels_utc() {
        // 2016-01-30 03:25:12 UTC
        let millis = 1_454_124_312_220;
        assert_eq!(date_label(millis, &Utc), "2016.01.30");
        assert_eq!(time_label(millis, &Utc), "3:25 AM");
    }

    #[test]
    fn test_labels_follow_time_zone() {
        let millis = 1_454_124_312_220;
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(date_label(millis, &tz), "2016.01.29");
        assert_eq!(time_label(millis, &tz), "10:25 PM");
    }

    #[test]
    fn test_invalid_epoch_labels() {
        assert_eq!(date_label(i64::MAX, &Utc), "----.--.--");
        assert_eq!(time_label(i64::MAX, &Utc), "--:--");
    }

    #[test]
    fn test_present_in() {
        let event = SeismicEvent::new(
            7.2,
            "88km N of Yelizovo, Russia",
            1_454_124_312_220,
            "https://earthquake.usgs.gov/earthquakes/eventpage/us20004vvx",
        );
        let record = present_in(&event, &Utc);

        assert_eq!(record.magnitude_label, "7.2");
        assert_eq!(record.color_bucket, MagnitudeBucket::Seven);
        assert_eq!(record.location_offset_phrase, "88km N of");
        assert_eq!(record.primary_location, " Yelizovo, Russia");
        assert_eq!(record.date_label, "2016.01.30");
        assert_eq!(record.time_label, "3:25 AM");
        assert_eq!(record.color().hex(), "#E75F40");
    }

    #[test]
    fn test_present_is_deterministic() {
        let event = SeismicEvent::new(3.3, "Example City", 0, "https://x");
        assert_eq!(present(&event), present(&event));
    }
}
