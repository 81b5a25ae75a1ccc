// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil (UTC calendar) rendering of epochs.
//!
//! Calendar fields are mapped to naive seconds with `chrono`, which knows
//! nothing about the leap-second table. A seconds field `>= 60` marks an
//! inserted leap second: it is built as `:59`, leap-corrected, then pushed
//! one second forward so it lands on the 61st second. Rows claiming `:60`
//! on a minute without a leap second are rejected. Reading back reverses
//! the trick so the row shows `:60` again.

use crate::diagnostics::Flagged;
use crate::epoch::AtomicEpoch;
use crate::error::{check_finite, check_len, Result, TaiError};
use crate::scales::UNIX_TAI0;
use crate::series::EpochSeries;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fraction quanta per nanosecond.
const FRACTION_PER_NANO: u64 = crate::epoch::FRAC_MULTIPLIER / 1_000_000_000;

/// One UTC calendar row. `second` may reach `60.x` on a leap second.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl CalendarDate {
    pub const fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

/// Naive seconds since 1958-01-01 at the start of the given minute.
fn naive_minute_start(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<i64> {
    let datetime = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    Some(datetime.and_utc().timestamp() - UNIX_TAI0)
}

/// Calendar date-time (second precision) of a naive second count.
fn datetime_from_naive(naive_seconds: i64) -> Option<NaiveDateTime> {
    let unix = naive_seconds.checked_add(UNIX_TAI0)?;
    DateTime::<Utc>::from_timestamp(unix, 0).map(|dt| dt.naive_utc())
}

impl EpochSeries {
    /// From UTC calendar columns.
    ///
    /// All six columns must have the same length. Seconds in `[60, 61)`
    /// denote an inserted leap second and are only valid on the last minute
    /// of a day that had one.
    pub fn from_utc_calendar(
        years: &[i32],
        months: &[u32],
        days: &[u32],
        hours: &[u32],
        minutes: &[u32],
        seconds: &[f64],
    ) -> Result<Flagged<Self>> {
        let n = years.len();
        check_len("months", n, months.len())?;
        check_len("days", n, days.len())?;
        check_len("hours", n, hours.len())?;
        check_len("minutes", n, minutes.len())?;
        check_len("seconds", n, seconds.len())?;
        check_finite(seconds)?;

        let invalid = |i: usize| TaiError::InvalidCalendarDate {
            index: i,
            year: years[i],
            month: months[i],
            day: days[i],
            hour: hours[i],
            minute: minutes[i],
            second: seconds[i],
        };

        let mut leap_rows = Vec::new();
        let mut naive = Vec::with_capacity(n);
        for i in 0..n {
            let on_leap = seconds[i] >= 60.0;
            let second = if on_leap { seconds[i] - 1.0 } else { seconds[i] };
            if !(0.0..60.0).contains(&second) {
                return Err(invalid(i));
            }
            let minute_start =
                naive_minute_start(years[i], months[i], days[i], hours[i], minutes[i])
                    .ok_or_else(|| invalid(i))?;
            let epoch = AtomicEpoch::from_seconds_f64(second)
                .and_then(|e| e.checked_shift(minute_start))
                .ok_or_else(|| invalid(i))?;
            if on_leap {
                leap_rows.push(i);
            }
            naive.push(epoch);
        }

        let (mut series, diagnostics) = Self::from_naive(naive).into_parts();
        for &i in &leap_rows {
            // only the last second of a minute that actually had a leap second
            let on_leap = series[i]
                .checked_shift(1)
                .filter(AtomicEpoch::is_leap_second)
                .ok_or_else(|| invalid(i))?;
            series.epochs_mut()[i] = on_leap;
        }
        Ok(Flagged::new(series, diagnostics))
    }

    /// From calendar rows; see [`from_utc_calendar`](Self::from_utc_calendar).
    pub fn from_calendar_dates(rows: &[CalendarDate]) -> Result<Flagged<Self>> {
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        let months: Vec<u32> = rows.iter().map(|r| r.month).collect();
        let days: Vec<u32> = rows.iter().map(|r| r.day).collect();
        let hours: Vec<u32> = rows.iter().map(|r| r.hour).collect();
        let minutes: Vec<u32> = rows.iter().map(|r| r.minute).collect();
        let seconds: Vec<f64> = rows.iter().map(|r| r.second).collect();
        Self::from_utc_calendar(&years, &months, &days, &hours, &minutes, &seconds)
    }

    /// UTC calendar rows. Leap seconds read as `:60`.
    pub fn calendar_dates(&self) -> Result<Flagged<Vec<CalendarDate>>> {
        let (naive, diagnostics) = self.naive_seconds().into_parts();
        let rows = naive
            .iter()
            .zip(self.iter())
            .enumerate()
            .map(|(index, (&n, epoch))| {
                let dt = datetime_from_naive(n).ok_or(TaiError::CalendarOutOfRange {
                    index,
                    naive_seconds: n,
                })?;
                let leap = if epoch.is_leap_second() { 1.0 } else { 0.0 };
                Ok(CalendarDate::new(
                    dt.year(),
                    dt.month(),
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second() as f64 + epoch.fraction_seconds() + leap,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Flagged::new(rows, diagnostics))
    }

    /// UTC date-times at nanosecond resolution.
    ///
    /// Leap seconds use chrono's convention: second 59 with a nanosecond
    /// field of at least 1 000 000 000.
    pub fn datetimes(&self) -> Result<Flagged<Vec<DateTime<Utc>>>> {
        let (naive, diagnostics) = self.naive_seconds().into_parts();
        let stamps = naive
            .iter()
            .zip(self.iter())
            .enumerate()
            .map(|(index, (&n, epoch))| {
                let out_of_range = || TaiError::CalendarOutOfRange {
                    index,
                    naive_seconds: n,
                };
                let dt = datetime_from_naive(n).ok_or_else(out_of_range)?;
                let mut nanos = (epoch.fraction() / FRACTION_PER_NANO) as u32;
                if epoch.is_leap_second() {
                    nanos += 1_000_000_000;
                }
                dt.date()
                    .and_hms_nano_opt(dt.hour(), dt.minute(), dt.second(), nanos)
                    .map(|t| t.and_utc())
                    .ok_or_else(out_of_range)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Flagged::new(stamps, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use chrono::TimeZone;

    #[test]
    fn calendar_matches_mjd() {
        let cal = EpochSeries::from_utc_calendar(&[2020], &[1], &[1], &[0], &[0], &[0.0])
            .unwrap()
            .value;
        let mjd = EpochSeries::from_mjd(&[58_849.0]).unwrap().value;
        assert_eq!(cal, mjd);
    }

    #[test]
    fn calendar_roundtrip_with_fraction() {
        let rows = [
            CalendarDate::new(1999, 12, 31, 23, 59, 59.5),
            CalendarDate::new(2024, 2, 29, 12, 30, 15.25),
        ];
        let s = EpochSeries::from_calendar_dates(&rows).unwrap();
        assert!(s.is_clean());
        let back = s.value.calendar_dates().unwrap();
        assert!(back.is_clean());
        assert_eq!(back.value, rows.to_vec());
    }

    #[test]
    fn leap_second_row_roundtrips_as_sixty() {
        let s = EpochSeries::from_utc_calendar(
            &[2016, 2016, 2017],
            &[12, 12, 1],
            &[31, 31, 1],
            &[23, 23, 0],
            &[59, 59, 0],
            &[59.0, 60.0, 0.0],
        )
        .unwrap()
        .value;
        assert_eq!(s.is_leap_second(), vec![false, true, false]);
        assert_eq!(s.whole_seconds(), vec![1_861_920_035, 1_861_920_036, 1_861_920_037]);

        let back = s.calendar_dates().unwrap();
        assert!(back.has(DiagnosticKind::LeapAmbiguity));
        assert_eq!(back.value[1], CalendarDate::new(2016, 12, 31, 23, 59, 60.0));
        assert_eq!(back.value[2], CalendarDate::new(2017, 1, 1, 0, 0, 0.0));
    }

    #[test]
    fn shape_mismatch_names_column() {
        let err = EpochSeries::from_utc_calendar(
            &[2020, 2021],
            &[1, 1],
            &[1, 1],
            &[0, 0],
            &[0],
            &[0.0, 0.0],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TaiError::ShapeMismatch {
                argument: "minutes",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn invalid_calendar_fields() {
        assert!(matches!(
            EpochSeries::from_utc_calendar(&[2021], &[2], &[29], &[0], &[0], &[0.0]),
            Err(TaiError::InvalidCalendarDate { index: 0, .. })
        ));
        assert!(matches!(
            EpochSeries::from_utc_calendar(&[2021], &[1], &[1], &[0], &[0], &[61.0]),
            Err(TaiError::InvalidCalendarDate { .. })
        ));
    }

    #[test]
    fn pre_1972_calendar_is_flagged() {
        let s = EpochSeries::from_utc_calendar(&[1965], &[6], &[1], &[0], &[0], &[0.0]).unwrap();
        assert!(s.has(DiagnosticKind::UnsupportedEra));

        let back = s.value.calendar_dates().unwrap();
        assert!(back.has(DiagnosticKind::UnsupportedEra));
        assert_eq!(back.value, vec![CalendarDate::new(1965, 6, 1, 0, 0, 0.0)]);
        assert!(matches!(
            s.value.datetimes().unwrap().strict(),
            Err(TaiError::UnsupportedEra { count: 1, first_index: 0 })
        ));
    }

    #[test]
    fn seconds_field_is_counted_once() {
        let s = EpochSeries::from_utc_calendar(
            &[2020, 2020, 2020],
            &[3, 3, 3],
            &[15, 15, 15],
            &[12, 12, 12],
            &[30, 30, 30],
            &[0.0, 30.0, 59.5],
        )
        .unwrap()
        .value;
        assert_eq!(s[1].whole_seconds() - s[0].whole_seconds(), 30);
        assert_eq!(s[2].seconds_since(s[0].whole_seconds()), 59.5);

        let back = s.calendar_dates().unwrap();
        assert!(back.is_clean());
        assert_eq!(
            back.value,
            vec![
                CalendarDate::new(2020, 3, 15, 12, 30, 0.0),
                CalendarDate::new(2020, 3, 15, 12, 30, 30.0),
                CalendarDate::new(2020, 3, 15, 12, 30, 59.5),
            ]
        );
    }

    #[test]
    fn sixty_outside_a_leap_minute_is_rejected() {
        for (year, month, day, hour, minute) in [
            (2020, 3, 15, 12, 30),
            (2016, 12, 31, 23, 58),
            (2017, 12, 31, 23, 59),
            (1965, 12, 31, 23, 59),
        ] {
            assert!(matches!(
                EpochSeries::from_utc_calendar(
                    &[2020, year],
                    &[1, month],
                    &[1, day],
                    &[0, hour],
                    &[0, minute],
                    &[0.0, 60.0]
                ),
                Err(TaiError::InvalidCalendarDate { index: 1, .. })
            ));
        }
    }

    #[test]
    fn fractional_leap_rows_survive_both_accessors() {
        let rows = [
            CalendarDate::new(1972, 6, 30, 23, 59, 60.75),
            CalendarDate::new(2016, 12, 31, 23, 59, 60.25),
        ];
        let s = EpochSeries::from_calendar_dates(&rows).unwrap().value;
        assert_eq!(s.is_leap_second(), vec![true, true]);
        assert_eq!(s.whole_seconds(), vec![457_488_010, 1_861_920_036]);

        assert_eq!(s.calendar_dates().unwrap().value, rows.to_vec());

        let dts = s.datetimes().unwrap();
        assert!(dts.has(DiagnosticKind::LeapAmbiguity));
        let expected = [
            (1972, 6, 30, 1_750_000_000),
            (2016, 12, 31, 1_250_000_000),
        ];
        for (dt, (year, month, day, nanos)) in dts.value.iter().zip(expected) {
            assert_eq!((dt.year(), dt.month(), dt.day()), (year, month, day));
            assert_eq!((dt.hour(), dt.minute(), dt.second()), (23, 59, 59));
            assert_eq!(dt.nanosecond(), nanos);
        }
    }

    #[test]
    fn datetimes_use_chrono_leap_convention() {
        let s = EpochSeries::from_utc_calendar(
            &[2016, 2017],
            &[12, 1],
            &[31, 1],
            &[23, 0],
            &[59, 0],
            &[60.5, 0.25],
        )
        .unwrap()
        .value;
        let dts = s.datetimes().unwrap().value;
        assert_eq!(dts[0].second(), 59);
        assert_eq!(dts[0].nanosecond(), 1_500_000_000);
        assert_eq!(
            dts[1],
            Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(250)
        );
    }
}
