//! Reference-time layouts (`"01-02-2006"`, `"Jan 2 15:04"`, ...) applied to
//! UTC timestamps.
//!
//! A layout spells out how the reference time `Mon Jan 2 15:04:05 MST 2006`
//! would be written; every recognized chunk is replaced by the matching
//! component of the formatted time and everything else is copied verbatim.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::fmt::Write;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Layout used when a bare time value is printed.
const DEFAULT_LAYOUT: &str = "2006-01-02 15:04:05.999999999 -0700 MST";

/// Numeric UTC offsets, longest first.
const OFFSETS: [(&str, &str); 5] = [
    ("07:00:00", "+00:00:00"),
    ("070000", "+000000"),
    ("07:00", "+00:00"),
    ("0700", "+0000"),
    ("07", "+00"),
];

pub fn month_name(t: &DateTime<Utc>) -> &'static str {
    MONTHS[t.month0() as usize]
}

pub fn weekday_name(t: &DateTime<Utc>) -> &'static str {
    WEEKDAYS[t.weekday().num_days_from_monday() as usize]
}

/// Prints `t` the way an unformatted time value is printed.
pub fn to_default_string(t: &DateTime<Utc>) -> String {
    format(t, DEFAULT_LAYOUT)
}

/// Formats `t` according to a reference-time layout.
pub fn format(t: &DateTime<Utc>, layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() + 10);
    let mut rest = layout;

    while let Some(c) = rest.chars().next() {
        let consumed = chunk(t, rest, &mut out);
        if consumed == 0 {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        } else {
            rest = &rest[consumed..];
        }
    }

    out
}

/// Writes the chunk at the start of `s`, returning how many bytes it used,
/// or 0 when `s` does not start with a recognized chunk.
fn chunk(t: &DateTime<Utc>, s: &str, out: &mut String) -> usize {
    let hour12 = match t.hour() % 12 {
        0 => 12,
        h => h,
    };
    let bytes = s.as_bytes();

    // Writing into a String cannot fail, so write! results are ignored below.
    match bytes[0] {
        b'J' if s.starts_with("January") => {
            out.push_str(month_name(t));
            7
        }
        b'J' if s.starts_with("Jan") => {
            out.push_str(&month_name(t)[..3]);
            3
        }
        b'M' if s.starts_with("Monday") => {
            out.push_str(weekday_name(t));
            6
        }
        b'M' if s.starts_with("Mon") => {
            out.push_str(&weekday_name(t)[..3]);
            3
        }
        b'M' if s.starts_with("MST") => {
            out.push_str("UTC");
            3
        }
        b'0' if s.starts_with("002") => {
            let _ = write!(out, "{:03}", t.ordinal());
            3
        }
        b'0' if bytes.len() >= 2 && (b'1'..=b'6').contains(&bytes[1]) => {
            let value = match bytes[1] {
                b'1' => t.month(),
                b'2' => t.day(),
                b'3' => hour12,
                b'4' => t.minute(),
                b'5' => t.second(),
                _ => t.year().rem_euclid(100) as u32,
            };
            let _ = write!(out, "{value:02}");
            2
        }
        b'1' if s.starts_with("15") => {
            let _ = write!(out, "{:02}", t.hour());
            2
        }
        b'1' => {
            let _ = write!(out, "{}", t.month());
            1
        }
        b'2' if s.starts_with("2006") => {
            let _ = write!(out, "{:04}", t.year());
            4
        }
        b'2' => {
            let _ = write!(out, "{}", t.day());
            1
        }
        b'_' if s.starts_with("__2") => {
            let _ = write!(out, "{:>3}", t.ordinal());
            3
        }
        b'_' if s.starts_with("_2") && !s.starts_with("_2006") => {
            let _ = write!(out, "{:>2}", t.day());
            2
        }
        b'3' => {
            let _ = write!(out, "{hour12}");
            1
        }
        b'4' => {
            let _ = write!(out, "{}", t.minute());
            1
        }
        b'5' => {
            let _ = write!(out, "{}", t.second());
            1
        }
        b'P' if s.starts_with("PM") => {
            out.push_str(if t.hour() >= 12 { "PM" } else { "AM" });
            2
        }
        b'p' if s.starts_with("pm") => {
            out.push_str(if t.hour() >= 12 { "pm" } else { "am" });
            2
        }
        b'-' | b'Z' => OFFSETS
            .iter()
            .find(|(pattern, _)| s[1..].starts_with(pattern))
            .map_or(0, |(pattern, utc)| {
                out.push_str(if bytes[0] == b'Z' { "Z" } else { utc });
                1 + pattern.len()
            }),
        b'.' | b',' => fraction(t, s, out),
        _ => 0,
    }
}

/// Fractional seconds: `.000` keeps a fixed number of digits, `.999` trims
/// trailing zeros and drops the separator when nothing remains.
fn fraction(t: &DateTime<Utc>, s: &str, out: &mut String) -> usize {
    let bytes = s.as_bytes();
    let Some(&digit) = bytes.get(1) else {
        return 0;
    };
    if digit != b'0' && digit != b'9' {
        return 0;
    }

    let run = bytes[1..].iter().take_while(|&&b| b == digit).count();
    if bytes.get(1 + run).is_some_and(u8::is_ascii_digit) {
        return 0;
    }

    let digits = run.min(9);
    let nanos = format!("{:09}", t.nanosecond() % 1_000_000_000);
    let mut frac = nanos[..digits].to_string();

    if digit == b'9' {
        while frac.ends_with('0') {
            frac.pop();
        }
        if frac.is_empty() {
            return 1 + run;
        }
    }

    out.push(char::from(bytes[0]));
    out.push_str(&frac);
    1 + run
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, 2, 1, 2, 3).unwrap() + chrono::Duration::nanoseconds(4)
    }

    #[test]
    fn test_numeric_date() {
        assert_eq!(format(&reference(), "01-02-2006"), "06-02-2022");
        assert_eq!(format(&reference(), "2006/1/2"), "2022/6/2");
        assert_eq!(format(&reference(), "06"), "22");
    }

    #[test]
    fn test_names() {
        assert_eq!(format(&reference(), "Monday, January _2"), "Thursday, June  2");
        assert_eq!(format(&reference(), "Mon Jan 2"), "Thu Jun 2");
    }

    #[test]
    fn test_clock() {
        let t = Utc.with_ymd_and_hms(2022, 6, 2, 15, 4, 5).unwrap();
        assert_eq!(format(&t, "15:04:05"), "15:04:05");
        assert_eq!(format(&t, "3:04PM"), "3:04PM");
        assert_eq!(format(&t, "03:04 pm"), "03:04 pm");
        assert_eq!(format(&t, "002"), "153");
    }

    #[test]
    fn test_zone() {
        assert_eq!(format(&reference(), "-0700 MST"), "+0000 UTC");
        assert_eq!(format(&reference(), "Z07:00"), "Z");
        assert_eq!(format(&reference(), "-07:00"), "+00:00");
    }

    #[test]
    fn test_fraction() {
        assert_eq!(format(&reference(), "05.000"), "03.000");
        assert_eq!(format(&reference(), "05.000000000"), "03.000000004");
        assert_eq!(format(&reference(), "05.999"), "03");
        assert_eq!(format(&reference(), "05.999999999"), "03.000000004");
    }

    #[test]
    fn test_default_string() {
        assert_eq!(
            to_default_string(&reference()),
            "2022-06-02 01:02:03.000000004 +0000 UTC"
        );
        let whole = Utc.with_ymd_and_hms(2022, 6, 2, 1, 2, 3).unwrap();
        assert_eq!(to_default_string(&whole), "2022-06-02 01:02:03 +0000 UTC");
    }

    #[test]
    fn test_literals_pass_through() {
        assert_eq!(format(&reference(), "week-of 2006"), "week-of 2022");
        assert_eq!(format(&reference(), "é/x"), "é/x");
    }
}
