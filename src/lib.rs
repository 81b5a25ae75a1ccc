// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Leap-second-aware TAI timestamps
//!
//! This crate stores instants as exact TAI seconds since 1958-01-01 and
//! converts them to and from the scales used by time-transfer data,
//! inserting or removing UTC leap seconds along the way.
//!
//! # Core types
//!
//! - [`AtomicEpoch`]: whole TAI seconds plus a fraction in `1 / FRAC_MULTIPLIER` s.
//! - [`EpochSeries`]: ordered batch of epochs; every conversion works on one.
//! - [`LeapSecondTable`]: the IERS TAI−UTC table and the apply/remove engine.
//! - [`Flagged<T>`]: a result carrying non-fatal [`Diagnostic`]s.
//! - [`Intersection`] / [`Union`]: two series aligned on a common grid.
//!
//! # Scales
//!
//! | Source | Constructor | Accessor |
//! |--------|-------------|----------|
//! | MJD (UTC) | [`EpochSeries::from_mjd`] | [`EpochSeries::mjd`] |
//! | MJD + seconds of day | [`EpochSeries::from_mjd_sod`] | [`EpochSeries::int_mjd_sod`] |
//! | UTC calendar | [`EpochSeries::from_utc_calendar`] | [`EpochSeries::calendar_dates`] |
//! | Unix time | [`EpochSeries::from_unix_time`] | [`EpochSeries::unix_time_int`] |
//! | Besselian date | [`EpochSeries::from_besselian_date`] | [`EpochSeries::besselian_date`] |
//! | GPS / Galileo / BeiDou week | [`EpochSeries::from_gnss_week_sow`] | [`EpochSeries::gnss_week_sow`] |
//!
//! UTC-based scales go through the leap-second table; GNSS scales are
//! continuous and only differ from TAI by their epoch.
//!
//! # Example
//!
//! ```
//! use taiepoch::EpochSeries;
//!
//! let series = EpochSeries::from_mjd(&[65_000.0]).unwrap().into_value();
//! assert_eq!(series[0].whole_seconds(), (65_000 - 36_204) * 86_400 + 37);
//! assert_eq!(series.mjd().into_value(), vec![65_000.0]);
//! ```

mod align;
mod civil;
mod compare;
mod convert;
mod diagnostics;
mod epoch;
mod error;
mod leap;
pub(crate) mod scales;
mod series;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use align::{intersect_series, union_series, AlignOptions, Intersection, Union};
pub use civil::CalendarDate;
pub use diagnostics::{Diagnostic, DiagnosticKind, Flagged};
pub use epoch::{AtomicEpoch, FRAC_MULTIPLIER};
pub use error::{Result, TaiError};
pub use leap::{apply_leap_seconds, remove_leap_seconds, LeapEntry, LeapSecondTable};
pub use scales::{GnssScale, BDS, GAL, GPS, MJD_TAI0, SECONDS_PER_DAY, SECONDS_PER_WEEK, UNIX_TAI0};
pub use series::EpochSeries;
