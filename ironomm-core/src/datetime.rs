/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Calendar date, time of day, and combined date-time values with
//! blank-sentinel semantics, plus their string formatter.
//!
//! Every component of a date or time can individually be absent. A value
//! whose components are all absent is **blank**, a state distinct from any
//! zero calendar value. [`DateTimeStringFormat`] renders values in either
//! ISO-8601 or the fixed-width RSSL layout; blank values render as the
//! literal marker `(blank data)`.

use crate::error::FormatError;
use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Sentinel marking an absent hour/minute/second.
pub const BLANK_HMS: u8 = 255;
/// Sentinel marking an absent millisecond.
pub const BLANK_MILLI: u16 = 65535;
/// Sentinel marking an absent microsecond or nanosecond.
pub const BLANK_MICRO_NANO: u16 = 2047;

/// Rendering emitted for fully-blank values.
pub const BLANK_DATA_STR: &str = "(blank data)";

/// Maximum length of any formatted date/time rendering.
pub const FORMATTED_MAX_LEN: usize = 40;

/// Formatted output buffer, stack-allocated.
pub type Formatted = ArrayString<FORMATTED_MAX_LEN>;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Calendar date. A zero component is absent; all-zero is blank.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct OmmDate {
    /// Day of month, 1-31, 0 = absent.
    pub day: u8,
    /// Month, 1-12, 0 = absent.
    pub month: u8,
    /// Four-digit year, 0 = absent.
    pub year: u16,
}

impl OmmDate {
    /// Creates a date from components. Zero means absent.
    #[inline]
    #[must_use]
    pub const fn new(day: u8, month: u8, year: u16) -> Self {
        Self { day, month, year }
    }

    /// The blank date: every component absent.
    #[inline]
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            day: 0,
            month: 0,
            year: 0,
        }
    }

    /// Returns true if every component is absent.
    #[inline]
    #[must_use]
    pub const fn is_blank(self) -> bool {
        self.day == 0 && self.month == 0 && self.year == 0
    }

    /// Range-checks the present components.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        if self.is_blank() {
            return true;
        }
        if self.day > 31 {
            return false;
        }
        if self.month > 12 {
            return false;
        }
        true
    }
}

/// Time of day. Sentinel components are absent; all-sentinel is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OmmTime {
    /// Hour, 0-23, 255 = absent.
    pub hour: u8,
    /// Minute, 0-59, 255 = absent.
    pub minute: u8,
    /// Second, 0-60 (leap second allowed), 255 = absent.
    pub second: u8,
    /// Millisecond, 0-999, 65535 = absent.
    pub millisecond: u16,
    /// Microsecond, 0-999, 2047 = absent.
    pub microsecond: u16,
    /// Nanosecond, 0-999, 2047 = absent.
    pub nanosecond: u16,
}

impl OmmTime {
    /// Creates a time from all six components.
    #[inline]
    #[must_use]
    pub const fn new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
        }
    }

    /// Creates a time with blank sub-second components.
    #[inline]
    #[must_use]
    pub const fn hms(hour: u8, minute: u8, second: u8) -> Self {
        Self::new(hour, minute, second, BLANK_MILLI, BLANK_MICRO_NANO, BLANK_MICRO_NANO)
    }

    /// The blank time: every component absent.
    #[inline]
    #[must_use]
    pub const fn blank() -> Self {
        Self::new(
            BLANK_HMS,
            BLANK_HMS,
            BLANK_HMS,
            BLANK_MILLI,
            BLANK_MICRO_NANO,
            BLANK_MICRO_NANO,
        )
    }

    /// Returns true if every component is absent.
    #[inline]
    #[must_use]
    pub const fn is_blank(self) -> bool {
        self.hour == BLANK_HMS
            && self.minute == BLANK_HMS
            && self.second == BLANK_HMS
            && self.millisecond == BLANK_MILLI
            && self.microsecond == BLANK_MICRO_NANO
            && self.nanosecond == BLANK_MICRO_NANO
    }

    /// Range-checks present components and requires absent components to be
    /// a contiguous low-precision suffix (an absent minute with a present
    /// second has no meaning).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        if self.is_blank() {
            return true;
        }
        if self.hour != BLANK_HMS && self.hour > 23 {
            return false;
        }
        if self.minute != BLANK_HMS && self.minute > 59 {
            return false;
        }
        if self.second != BLANK_HMS && self.second > 60 {
            return false;
        }
        if self.millisecond != BLANK_MILLI && self.millisecond > 999 {
            return false;
        }
        if self.microsecond != BLANK_MICRO_NANO && self.microsecond > 999 {
            return false;
        }
        if self.nanosecond != BLANK_MICRO_NANO && self.nanosecond > 999 {
            return false;
        }
        // blanks must be trailing
        let blanks = [
            self.hour == BLANK_HMS,
            self.minute == BLANK_HMS,
            self.second == BLANK_HMS,
            self.millisecond == BLANK_MILLI,
            self.microsecond == BLANK_MICRO_NANO,
            self.nanosecond == BLANK_MICRO_NANO,
        ];
        let mut seen_blank = false;
        let mut i = 0;
        while i < blanks.len() {
            if blanks[i] {
                seen_blank = true;
            } else if seen_blank {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl Default for OmmTime {
    fn default() -> Self {
        Self::new(0, 0, 0, 0, 0, 0)
    }
}

/// Combined date and time. Either portion may be blank independently.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct OmmDateTime {
    /// Date portion.
    pub date: OmmDate,
    /// Time portion.
    pub time: OmmTime,
}

impl OmmDateTime {
    /// Creates a date-time from its portions.
    #[inline]
    #[must_use]
    pub const fn new(date: OmmDate, time: OmmTime) -> Self {
        Self { date, time }
    }

    /// The blank date-time: both portions blank.
    #[inline]
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            date: OmmDate::blank(),
            time: OmmTime::blank(),
        }
    }

    /// Returns true if both portions are blank.
    #[inline]
    #[must_use]
    pub const fn is_blank(self) -> bool {
        self.date.is_blank() && self.time.is_blank()
    }

    /// Returns true if both portions are valid.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.date.is_valid() && self.time.is_valid()
    }
}

/// Supported textual renderings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum FormatKind {
    /// ISO-8601: `YYYY-MM-DD`, `HH:MM:SS.fraction`, `T` separator.
    Iso8601 = 1,
    /// RSSL fixed-width: `DD MON YYYY`, `HH:MM:SS:mmm:uuu:nnn`, space separator.
    Rssl = 2,
}

/// Date/time string formatter with a runtime-selected [`FormatKind`].
///
/// The formatter holds only the selected kind; all formatting functions are
/// pure given that state. Set the format once, format many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeStringFormat {
    kind: FormatKind,
}

impl DateTimeStringFormat {
    /// Creates a formatter for the given kind.
    #[inline]
    #[must_use]
    pub const fn new(kind: FormatKind) -> Self {
        Self { kind }
    }

    /// Creates a formatter from a raw numeric format code.
    ///
    /// # Errors
    /// Returns [`FormatError::InvalidFormatValue`] naming the input when the
    /// code is not a supported format.
    pub fn from_code(code: i32) -> Result<Self, FormatError> {
        match code {
            1 => Ok(Self::new(FormatKind::Iso8601)),
            2 => Ok(Self::new(FormatKind::Rssl)),
            other => Err(FormatError::InvalidFormatValue(other)),
        }
    }

    /// Returns the selected format kind.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> FormatKind {
        self.kind
    }

    /// Renders a date.
    ///
    /// Blank dates render as `(blank data)` in both modes; invalid dates as
    /// `Invalid date`.
    #[must_use]
    pub fn date_as_string(self, date: &OmmDate) -> Formatted {
        let mut out = Formatted::new();
        if date.is_blank() {
            let _ = out.try_push_str(BLANK_DATA_STR);
            return out;
        }
        if !date.is_valid() {
            let _ = out.try_push_str("Invalid date");
            return out;
        }
        match self.kind {
            FormatKind::Iso8601 => format_date_iso8601(date),
            FormatKind::Rssl => format_date_rssl(date),
        }
    }

    /// Renders a time.
    ///
    /// Blank times render as `(blank data)` in both modes; invalid times as
    /// `Invalid time`.
    #[must_use]
    pub fn time_as_string(self, time: &OmmTime) -> Formatted {
        let mut out = Formatted::new();
        if time.is_blank() {
            let _ = out.try_push_str(BLANK_DATA_STR);
            return out;
        }
        if !time.is_valid() {
            let _ = out.try_push_str("Invalid time");
            return out;
        }
        match self.kind {
            FormatKind::Iso8601 => format_time_iso8601(time),
            FormatKind::Rssl => format_time_rssl(time),
        }
    }

    /// Renders a combined date-time.
    ///
    /// The date portion is omitted when blank and the time portion is
    /// omitted when blank. The time is also omitted when the date carries a
    /// year with day and month both absent (a year-only date renders alone).
    /// A fully blank value renders as `(blank data)`.
    #[must_use]
    pub fn date_time_as_string(self, dt: &OmmDateTime) -> Formatted {
        let mut out = Formatted::new();
        if dt.is_blank() {
            let _ = out.try_push_str(BLANK_DATA_STR);
            return out;
        }
        if !dt.is_valid() {
            let _ = out.try_push_str("Invalid dateTime");
            return out;
        }

        if !dt.date.is_blank() {
            let date_str = match self.kind {
                FormatKind::Iso8601 => format_date_iso8601(&dt.date),
                FormatKind::Rssl => format_date_rssl(&dt.date),
            };
            let _ = out.try_push_str(&date_str);
        }

        let year_only_date =
            dt.date.day == 0 && dt.date.month == 0 && dt.date.year != 0;
        if dt.time.is_blank() || year_only_date {
            return out;
        }

        let time_str = match self.kind {
            FormatKind::Iso8601 => format_time_iso8601(&dt.time),
            FormatKind::Rssl => format_time_rssl(&dt.time),
        };
        if !dt.date.is_blank() {
            let _ = out.try_push(match self.kind {
                FormatKind::Iso8601 => 'T',
                FormatKind::Rssl => ' ',
            });
        }
        let _ = out.try_push_str(&time_str);
        out
    }
}

impl Default for DateTimeStringFormat {
    fn default() -> Self {
        Self::new(FormatKind::Rssl)
    }
}

fn format_date_iso8601(date: &OmmDate) -> Formatted {
    let mut out = Formatted::new();
    if date.year != 0 {
        let _ = write!(out, "{:04}-", date.year);
    } else {
        let _ = out.try_push_str("--");
    }
    if date.month != 0 {
        let _ = write!(out, "{:02}-", date.month);
    } else {
        let _ = out.try_push_str("  -");
    }
    if date.day != 0 {
        let _ = write!(out, "{:02}", date.day);
    } else {
        let _ = out.try_push_str("  ");
    }
    // trim trailing non-digits
    let end = out
        .bytes()
        .rposition(|b| b.is_ascii_digit())
        .map_or(0, |i| i + 1);
    out.truncate(end);
    out
}

fn format_date_rssl(date: &OmmDate) -> Formatted {
    let mut out = Formatted::new();
    if date.day != 0 {
        let _ = write!(out, "{:02} ", date.day);
    } else {
        let _ = out.try_push_str("   ");
    }
    if date.month != 0 {
        let _ = write!(out, "{} ", MONTHS[(date.month - 1) as usize]);
    } else {
        let _ = out.try_push_str("    ");
    }
    if date.year != 0 {
        let _ = write!(out, "{:4}", date.year);
    } else {
        let _ = out.try_push_str("    ");
    }
    let mut trimmed = Formatted::new();
    let _ = trimmed.try_push_str(out.trim());
    trimmed
}

fn format_time_iso8601(time: &OmmTime) -> Formatted {
    let mut out = Formatted::new();
    let _ = write!(out, "{:02}", time.hour);
    if time.minute == BLANK_HMS {
        return out;
    }
    let _ = write!(out, ":{:02}", time.minute);
    if time.second == BLANK_HMS {
        return out;
    }
    let _ = write!(out, ":{:02}", time.second);
    if time.millisecond == BLANK_MILLI {
        return out;
    }
    let _ = write!(out, ".{:03}", time.millisecond);
    if time.microsecond != BLANK_MICRO_NANO {
        let _ = write!(out, "{:03}", time.microsecond);
        if time.nanosecond != BLANK_MICRO_NANO {
            let _ = write!(out, "{:03}", time.nanosecond);
        }
    }
    // trim trailing zero digits from the fraction, dropping the dot if the
    // whole fraction trims away
    if out.contains('.') {
        let mut end = out.len();
        let bytes = out.as_bytes();
        while end > 0 && bytes[end - 1] == b'0' {
            end -= 1;
        }
        if end > 0 && bytes[end - 1] == b'.' {
            end -= 1;
        }
        out.truncate(end);
    }
    out
}

fn format_time_rssl(time: &OmmTime) -> Formatted {
    let mut out = Formatted::new();
    let _ = write!(out, "{:02}", time.hour);
    if time.minute == BLANK_HMS {
        return out;
    }
    let _ = write!(out, ":{:02}", time.minute);
    if time.second == BLANK_HMS {
        return out;
    }
    let _ = write!(out, ":{:02}", time.second);
    if time.millisecond == BLANK_MILLI {
        return out;
    }
    let _ = write!(out, ":{:03}", time.millisecond);
    if time.microsecond == BLANK_MICRO_NANO {
        return out;
    }
    let _ = write!(out, ":{:03}", time.microsecond);
    if time.nanosecond == BLANK_MICRO_NANO {
        return out;
    }
    let _ = write!(out, ":{:03}", time.nanosecond);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso() -> DateTimeStringFormat {
        DateTimeStringFormat::new(FormatKind::Iso8601)
    }

    fn rssl() -> DateTimeStringFormat {
        DateTimeStringFormat::new(FormatKind::Rssl)
    }

    #[test]
    fn test_format_from_code() {
        assert_eq!(
            DateTimeStringFormat::from_code(1).unwrap().kind(),
            FormatKind::Iso8601
        );
        assert_eq!(
            DateTimeStringFormat::from_code(2).unwrap().kind(),
            FormatKind::Rssl
        );
        let err = DateTimeStringFormat::from_code(9).unwrap_err();
        assert_eq!(err.to_string(), "invalid date time string format value: 9");
    }

    #[test]
    fn test_blank_date_both_modes() {
        let blank = OmmDate::blank();
        assert_eq!(iso().date_as_string(&blank).as_str(), "(blank data)");
        assert_eq!(rssl().date_as_string(&blank).as_str(), "(blank data)");
    }

    #[test]
    fn test_full_date() {
        let date = OmmDate::new(30, 10, 2010);
        assert_eq!(iso().date_as_string(&date).as_str(), "2010-10-30");
        assert_eq!(rssl().date_as_string(&date).as_str(), "30 OCT 2010");
    }

    #[test]
    fn test_date_absent_day() {
        let date = OmmDate::new(0, 1, 2011);
        assert_eq!(iso().date_as_string(&date).as_str(), "2011-01");
        assert_eq!(rssl().date_as_string(&date).as_str(), "JAN 2011");
    }

    #[test]
    fn test_date_year_only() {
        let date = OmmDate::new(0, 0, 2011);
        assert_eq!(iso().date_as_string(&date).as_str(), "2011");
        assert_eq!(rssl().date_as_string(&date).as_str(), "2011");
    }

    #[test]
    fn test_date_absent_year() {
        let date = OmmDate::new(15, 6, 0);
        assert_eq!(iso().date_as_string(&date).as_str(), "--06-15");
        assert_eq!(rssl().date_as_string(&date).as_str(), "15 JUN");
    }

    #[test]
    fn test_invalid_date() {
        let date = OmmDate::new(32, 1, 2020);
        assert_eq!(iso().date_as_string(&date).as_str(), "Invalid date");
        let date = OmmDate::new(1, 13, 2020);
        assert_eq!(rssl().date_as_string(&date).as_str(), "Invalid date");
    }

    #[test]
    fn test_time_full_precision() {
        let time = OmmTime::new(11, 20, 30, 10, 90, 40);
        assert_eq!(iso().time_as_string(&time).as_str(), "11:20:30.01009004");
        assert_eq!(
            rssl().time_as_string(&time).as_str(),
            "11:20:30:010:090:040"
        );
    }

    #[test]
    fn test_time_trailing_blank_groups() {
        let time = OmmTime::new(12, 30, 56, 600, BLANK_MICRO_NANO, BLANK_MICRO_NANO);
        assert_eq!(iso().time_as_string(&time).as_str(), "12:30:56.6");
        assert_eq!(rssl().time_as_string(&time).as_str(), "12:30:56:600");
    }

    #[test]
    fn test_time_zero_fraction_trims_away() {
        let time = OmmTime::new(10, 0, 0, 0, BLANK_MICRO_NANO, BLANK_MICRO_NANO);
        assert_eq!(iso().time_as_string(&time).as_str(), "10:00:00");
        assert_eq!(rssl().time_as_string(&time).as_str(), "10:00:00:000");
    }

    #[test]
    fn test_time_hms_only() {
        let time = OmmTime::hms(23, 59, 1);
        assert_eq!(iso().time_as_string(&time).as_str(), "23:59:01");
        assert_eq!(rssl().time_as_string(&time).as_str(), "23:59:01");
    }

    #[test]
    fn test_blank_time_both_modes() {
        let blank = OmmTime::blank();
        assert_eq!(iso().time_as_string(&blank).as_str(), "(blank data)");
        assert_eq!(rssl().time_as_string(&blank).as_str(), "(blank data)");
    }

    #[test]
    fn test_invalid_time() {
        let time = OmmTime::new(24, 0, 0, 0, 0, 0);
        assert_eq!(iso().time_as_string(&time).as_str(), "Invalid time");
        // present second after blank minute
        let time = OmmTime::new(1, BLANK_HMS, 30, BLANK_MILLI, BLANK_MICRO_NANO, BLANK_MICRO_NANO);
        assert!(!time.is_valid());
    }

    #[test]
    fn test_datetime_full() {
        let dt = OmmDateTime::new(OmmDate::new(30, 10, 2010), OmmTime::hms(11, 20, 30));
        assert_eq!(
            iso().date_time_as_string(&dt).as_str(),
            "2010-10-30T11:20:30"
        );
        assert_eq!(
            rssl().date_time_as_string(&dt).as_str(),
            "30 OCT 2010 11:20:30"
        );
    }

    #[test]
    fn test_datetime_blank_date_emits_time_only() {
        let dt = OmmDateTime::new(OmmDate::blank(), OmmTime::hms(11, 20, 30));
        assert_eq!(iso().date_time_as_string(&dt).as_str(), "11:20:30");
        assert_eq!(rssl().date_time_as_string(&dt).as_str(), "11:20:30");
    }

    #[test]
    fn test_datetime_blank_time_emits_date_only() {
        let dt = OmmDateTime::new(OmmDate::new(30, 10, 2010), OmmTime::blank());
        assert_eq!(iso().date_time_as_string(&dt).as_str(), "2010-10-30");
        assert_eq!(rssl().date_time_as_string(&dt).as_str(), "30 OCT 2010");
    }

    #[test]
    fn test_datetime_year_only_date_suppresses_time() {
        let dt = OmmDateTime::new(OmmDate::new(0, 0, 2011), OmmTime::hms(11, 20, 30));
        assert_eq!(iso().date_time_as_string(&dt).as_str(), "2011");
        assert_eq!(rssl().date_time_as_string(&dt).as_str(), "2011");
    }

    #[test]
    fn test_datetime_fully_blank() {
        let dt = OmmDateTime::blank();
        assert_eq!(iso().date_time_as_string(&dt).as_str(), "(blank data)");
        assert_eq!(rssl().date_time_as_string(&dt).as_str(), "(blank data)");
    }

    #[test]
    fn test_blank_classification() {
        assert!(OmmDate::blank().is_blank());
        assert!(!OmmDate::new(0, 0, 1).is_blank());
        assert!(OmmTime::blank().is_blank());
        assert!(!OmmTime::default().is_blank());
        assert!(OmmTime::blank().is_valid());
    }
}
