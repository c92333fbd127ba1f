// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Display formatting for overlay values.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Delay in hours with one decimal, e.g. `5.2`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}

/// Probability in `[0, 1]` as a rounded percentage, e.g. `62%`.
///
/// Non-finite input counts as zero.
#[must_use]
pub fn format_percent(probability: f64) -> String {
    let p = if probability.is_finite() { probability } else { 0.0 };
    let rounded = (p * 100.0).round();
    // Avoid "-0%"
    format!("{:.0}%", rounded + 0.0)
}

/// Whole number with thousands separators, e.g. `10,536`.
#[must_use]
pub fn format_grouped(value: f64) -> String {
    let rounded = format!("{:.0}", value.round());
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) if rest != "0" => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

/// Coordinate pair with two decimals, e.g. `1.29, 103.85`.
#[must_use]
pub fn format_position(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.2}, {longitude:.2}")
}

fn parse_in<Tz: TimeZone>(iso: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|dt| dt.with_timezone(tz))
}

/// Medium date-time, e.g. `Jul 14, 2025, 5:15:00 PM`. `None` if unparsable.
#[must_use]
pub fn format_eta<Tz>(iso: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    parse_in(iso, tz).map(|dt| dt.format("%b %-d, %Y, %-I:%M:%S %p").to_string())
}

/// Short day, e.g. `Jun 1`. Empty when missing or unparsable.
#[must_use]
pub fn format_day<Tz>(iso: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    iso.and_then(|iso| parse_in(iso, tz))
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_default()
}

/// Hazard time window, e.g. `Jun 1 — Sep 30`. `None` when neither end is set.
#[must_use]
pub fn format_window<Tz>(start: Option<&str>, end: Option<&str>, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if start.is_none() && end.is_none() {
        return None;
    }
    Some(format!("{} — {}", format_day(start, tz), format_day(end, tz)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_hours_one_decimal() {
        assert_eq!(format_hours(5.2), "5.2");
        assert_eq!(format_hours(3.0), "3.0");
        assert_eq!(format_hours(0.06), "0.1");
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(format_percent(0.62), "62%");
        assert_eq!(format_percent(0.005), "1%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(f64::NAN), "0%");
        assert_eq!(format_percent(-0.001), "0%");
    }

    #[test]
    fn test_grouped_thousands() {
        assert_eq!(format_grouped(10_535.66), "10,536");
        assert_eq!(format_grouped(999.4), "999");
        assert_eq!(format_grouped(1_000.0), "1,000");
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
        assert_eq!(format_grouped(-4_321.0), "-4,321");
        assert_eq!(format_grouped(-0.2), "0");
    }

    #[test]
    fn test_position() {
        assert_eq!(format_position(1.29, 103.85), "1.29, 103.85");
        assert_eq!(format_position(-33.918_861, 18.4233), "-33.92, 18.42");
    }

    #[test]
    fn test_eta_medium_format() {
        assert_eq!(
            format_eta("2025-07-14T17:15:00Z", &Utc).as_deref(),
            Some("Jul 14, 2025, 5:15:00 PM")
        );
        assert!(format_eta("soon", &Utc).is_none());
    }

    #[test]
    fn test_eta_in_local_offset() {
        let cet = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_eta("2025-07-14T23:30:00Z", &cet).as_deref(),
            Some("Jul 15, 2025, 1:30:00 AM")
        );
    }

    #[test]
    fn test_window() {
        assert_eq!(
            format_window(Some("2025-06-01T00:00:00Z"), Some("2025-09-30T00:00:00Z"), &Utc).as_deref(),
            Some("Jun 1 — Sep 30")
        );
        assert_eq!(
            format_window(None, Some("2025-09-30T00:00:00Z"), &Utc).as_deref(),
            Some(" — Sep 30")
        );
        assert!(format_window(None, None, &Utc).is_none());
    }
}
