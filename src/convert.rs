// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Factories and accessors for the numeric external scales.
//!
//! Every leap-corrected factory first builds a *naive* second count (UTC
//! read as if leap seconds never happened), then hands it to the leap
//! engine. Accessors do the reverse and report the same diagnostics.
//! GNSS scales bypass the engine entirely.
//!
//! Calendar rows live in the `civil` module.

use crate::diagnostics::Flagged;
use crate::epoch::{AtomicEpoch, FRAC_MULTIPLIER};
use crate::error::{check_finite, check_len, Result, TaiError};
use crate::leap::LeapSecondTable;
use crate::scales::{
    GnssScale, B2000_MJD, BDS, BESSELIAN_YEAR, GAL, GPS, MJD_TAI0, SECONDS_PER_DAY,
    SECONDS_PER_WEEK, UNIX_TAI0,
};
use crate::series::EpochSeries;
use qtty::{Days, Simplify};

const SECONDS_PER_DAY_F64: f64 = SECONDS_PER_DAY as f64;

/// Epoch `seconds` after `base` whole seconds, for input row `index`.
///
/// `base` is `None` when it already overflowed; `value` is the caller's
/// input, echoed in the error.
#[inline]
fn epoch_after(
    base: Option<i64>,
    seconds: f64,
    index: usize,
    value: f64,
) -> Result<AtomicEpoch> {
    base.and_then(|base| AtomicEpoch::from_seconds_f64(seconds)?.checked_shift(base))
        .ok_or(TaiError::OutOfRange { index, value })
}

impl EpochSeries {
    // ── engine plumbing ───────────────────────────────────────────────

    /// Apply leap seconds to naive epochs (whole seconds + fraction).
    pub(crate) fn from_naive(naive: Vec<AtomicEpoch>) -> Flagged<Self> {
        let whole: Vec<i64> = naive.iter().map(AtomicEpoch::whole_seconds).collect();
        let (corrected, diagnostics) = LeapSecondTable::iers().apply(&whole).into_parts();
        let epochs = naive
            .iter()
            .zip(corrected)
            .map(|(e, c)| AtomicEpoch::normalized(c, e.fraction()))
            .collect();
        Flagged::new(Self::from_vec(epochs), diagnostics)
    }

    /// Naive whole seconds of every element; leap seconds fold onto `:59`.
    #[inline]
    pub(crate) fn naive_seconds(&self) -> Flagged<Vec<i64>> {
        LeapSecondTable::iers().remove(&self.whole_seconds())
    }

    // ── Modified Julian Date ──────────────────────────────────────────

    /// From fractional UTC MJDs.
    pub fn from_mjd(mjd: &[f64]) -> Result<Flagged<Self>> {
        check_finite(mjd)?;
        let naive = mjd
            .iter()
            .enumerate()
            .map(|(i, &m)| epoch_after(Some(0), (m - MJD_TAI0 as f64) * SECONDS_PER_DAY_F64, i, m))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_naive(naive))
    }

    /// Fractional UTC MJDs. Leap seconds read as the preceding second.
    pub fn mjd(&self) -> Flagged<Vec<f64>> {
        let (naive, diagnostics) = self.naive_seconds().into_parts();
        let mjd = naive
            .iter()
            .zip(self.iter())
            .map(|(&n, e)| {
                n as f64 / SECONDS_PER_DAY_F64
                    + e.fraction_seconds() / SECONDS_PER_DAY_F64
                    + MJD_TAI0 as f64
            })
            .collect();
        Flagged::new(mjd, diagnostics)
    }

    /// From integer UTC MJDs and seconds of day.
    ///
    /// This is the entry point for tabular time-transfer files.
    pub fn from_mjd_sod(mjd: &[i64], sod: &[f64]) -> Result<Flagged<Self>> {
        check_len("sod", mjd.len(), sod.len())?;
        check_finite(sod)?;
        let naive = mjd
            .iter()
            .zip(sod)
            .enumerate()
            .map(|(i, (&day, &s))| {
                let base = day
                    .checked_sub(MJD_TAI0)
                    .and_then(|d| d.checked_mul(SECONDS_PER_DAY));
                epoch_after(base, s, i, day as f64)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_naive(naive))
    }

    /// Integer UTC MJDs and seconds of day, the inverse of [`from_mjd_sod`](Self::from_mjd_sod).
    ///
    /// The fraction is rounded to the nearest second, an exact half rounding
    /// up rather than to even. A result of 86400 rolls over to second 0 of
    /// the next day.
    pub fn int_mjd_sod(&self) -> Flagged<(Vec<i64>, Vec<i64>)> {
        let (naive, diagnostics) = self.naive_seconds().into_parts();
        let (mjd, sod) = naive
            .iter()
            .zip(self.iter())
            .map(|(&n, e)| {
                let round_up = (e.fraction() >= FRAC_MULTIPLIER / 2) as i64;
                let mut day = n.div_euclid(SECONDS_PER_DAY) + MJD_TAI0;
                let mut second = n.rem_euclid(SECONDS_PER_DAY) + round_up;
                if second == SECONDS_PER_DAY {
                    day += 1;
                    second = 0;
                }
                (day, second)
            })
            .unzip();
        Flagged::new((mjd, sod), diagnostics)
    }

    // ── Unix time ─────────────────────────────────────────────────────

    /// From POSIX seconds (leap seconds not counted).
    pub fn from_unix_time(seconds: &[f64]) -> Result<Flagged<Self>> {
        check_finite(seconds)?;
        let naive = seconds
            .iter()
            .enumerate()
            .map(|(i, &s)| epoch_after(Some(-UNIX_TAI0), s, i, s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_naive(naive))
    }

    /// Whole POSIX seconds; the fraction is truncated.
    pub fn unix_time_int(&self) -> Flagged<Vec<i64>> {
        self.naive_seconds()
            .map(|naive| naive.into_iter().map(|n| n.saturating_add(UNIX_TAI0)).collect())
    }

    // ── Besselian date ────────────────────────────────────────────────

    /// From Besselian dates, via `MJD = (B − 2000) · 365.2422 + 51544.03`.
    pub fn from_besselian_date(besselian: &[f64]) -> Result<Flagged<Self>> {
        check_finite(besselian)?;
        let mjd: Vec<f64> = besselian
            .iter()
            .map(|&b| (Days::new((b - 2000.0) * BESSELIAN_YEAR.value()) + B2000_MJD).value())
            .collect();
        Self::from_mjd(&mjd)
    }

    /// Besselian dates.
    pub fn besselian_date(&self) -> Flagged<Vec<f64>> {
        self.mjd().map(|mjd| {
            mjd.into_iter()
                .map(|m| 2000.0 + ((Days::new(m) - B2000_MJD) / BESSELIAN_YEAR).simplify().value())
                .collect()
        })
    }

    // ── GNSS week / second of week ────────────────────────────────────

    /// From week numbers and seconds of week on the GNSS scale `S`.
    pub fn from_gnss_week_sow<S: GnssScale>(week: &[i64], sow: &[f64]) -> Result<Self> {
        check_len("sow", week.len(), sow.len())?;
        check_finite(sow)?;
        week.iter()
            .zip(sow)
            .enumerate()
            .map(|(i, (&w, &s))| {
                let base = w
                    .checked_mul(SECONDS_PER_WEEK)
                    .and_then(|elapsed| elapsed.checked_add(S::EPOCH_TAI_SECONDS));
                epoch_after(base, s, i, w as f64)
            })
            .collect()
    }

    /// Week numbers and seconds of week on the GNSS scale `S`.
    pub fn gnss_week_sow<S: GnssScale>(&self) -> (Vec<i64>, Vec<f64>) {
        self.iter()
            .map(|e| {
                let elapsed = e.whole_seconds().saturating_sub(S::EPOCH_TAI_SECONDS);
                let week = elapsed.div_euclid(SECONDS_PER_WEEK);
                let sow = elapsed.rem_euclid(SECONDS_PER_WEEK) as f64 + e.fraction_seconds();
                (week, sow)
            })
            .unzip()
    }

    #[inline]
    pub fn from_gps_week_sow(week: &[i64], sow: &[f64]) -> Result<Self> {
        Self::from_gnss_week_sow::<GPS>(week, sow)
    }

    #[inline]
    pub fn from_gal_week_sow(week: &[i64], sow: &[f64]) -> Result<Self> {
        Self::from_gnss_week_sow::<GAL>(week, sow)
    }

    #[inline]
    pub fn from_bds_week_sow(week: &[i64], sow: &[f64]) -> Result<Self> {
        Self::from_gnss_week_sow::<BDS>(week, sow)
    }

    #[inline]
    pub fn gps_week_sow(&self) -> (Vec<i64>, Vec<f64>) {
        self.gnss_week_sow::<GPS>()
    }

    #[inline]
    pub fn gal_week_sow(&self) -> (Vec<i64>, Vec<f64>) {
        self.gnss_week_sow::<GAL>()
    }

    #[inline]
    pub fn bds_week_sow(&self) -> (Vec<i64>, Vec<f64>) {
        self.gnss_week_sow::<BDS>()
    }
}
