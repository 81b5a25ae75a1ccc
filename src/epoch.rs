// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Exact instant on the atomic time scale.
//!
//! [`AtomicEpoch`] stores whole seconds since 1958-01-01T00:00:00 TAI plus a
//! sub-second fraction in units of `1 / FRAC_MULTIPLIER` s. All sub-second
//! arithmetic stays in that integer domain; floating point only appears at
//! the edges (MJD, Besselian date, series offsets).
//!
//! Values come from the factories on [`EpochSeries`](crate::EpochSeries)
//! or from [`AtomicEpoch::normalized`]. The fields stay private so that
//! `0 <= fraction < FRAC_MULTIPLIER` always holds.

use crate::leap::LeapSecondTable;
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sub-second quanta per second (10¹⁶, i.e. 0.1 fs).
pub const FRAC_MULTIPLIER: u64 = 10_000_000_000_000_000;

const FRAC_MULTIPLIER_F64: f64 = FRAC_MULTIPLIER as f64;

/// Largest whole-second magnitude the factories produce (2⁶², ~1.5e11 years).
///
/// Leaves headroom so that scale offsets and leap corrections never
/// overflow `i64`.
pub(crate) const MAX_WHOLE_SECONDS: i64 = 1 << 62;

const MAX_WHOLE_SECONDS_F64: f64 = MAX_WHOLE_SECONDS as f64;

// ═══════════════════════════════════════════════════════════════════════════
// AtomicEpoch
// ═══════════════════════════════════════════════════════════════════════════

/// One instant: `whole_seconds + fraction / FRAC_MULTIPLIER` seconds after
/// 1958-01-01T00:00:00 TAI.
///
/// Ordering is lexicographic on `(whole_seconds, fraction)`, which is
/// chronological because the fraction is always normalised.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct AtomicEpoch {
    whole_seconds: i64,
    fraction: u64,
}

impl AtomicEpoch {
    /// 1958-01-01T00:00:00 TAI.
    pub const ORIGIN: Self = Self {
        whole_seconds: 0,
        fraction: 0,
    };

    // ── constructors ──────────────────────────────────────────────────

    /// Build from parts, carrying any fraction overflow into the seconds.
    #[inline]
    pub const fn normalized(whole_seconds: i64, fraction: u64) -> Self {
        Self {
            whole_seconds: whole_seconds + (fraction / FRAC_MULTIPLIER) as i64,
            fraction: fraction % FRAC_MULTIPLIER,
        }
    }

    /// Split a seconds value into floor and rounded fraction.
    ///
    /// `None` unless the value lies within [`MAX_WHOLE_SECONDS`] of the origin.
    #[inline]
    pub(crate) fn from_seconds_f64(seconds: f64) -> Option<Self> {
        let whole = seconds.floor();
        if !(whole.abs() <= MAX_WHOLE_SECONDS_F64) {
            return None;
        }
        let fraction = ((seconds - whole) * FRAC_MULTIPLIER_F64).round() as u64;
        Some(Self::normalized(whole as i64, fraction))
    }

    /// Same instant shifted by a whole number of seconds.
    ///
    /// `None` if the result leaves the ±[`MAX_WHOLE_SECONDS`] range.
    #[inline]
    pub(crate) fn checked_shift(self, seconds: i64) -> Option<Self> {
        let whole_seconds = self.whole_seconds.checked_add(seconds)?;
        (-MAX_WHOLE_SECONDS..=MAX_WHOLE_SECONDS)
            .contains(&whole_seconds)
            .then_some(Self {
                whole_seconds,
                fraction: self.fraction,
            })
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// Whole seconds since the origin, on the leap-corrected axis.
    #[inline]
    pub const fn whole_seconds(&self) -> i64 {
        self.whole_seconds
    }

    /// Sub-second part in units of `1 / FRAC_MULTIPLIER` s.
    #[inline]
    pub const fn fraction(&self) -> u64 {
        self.fraction
    }

    /// Sub-second part in seconds.
    #[inline]
    pub fn fraction_seconds(&self) -> f64 {
        self.fraction as f64 / FRAC_MULTIPLIER_F64
    }

    /// Seconds elapsed since `anchor` whole seconds, as `f64`.
    #[inline]
    pub fn seconds_since(&self, anchor: i64) -> f64 {
        (self.whole_seconds as i128 - anchor as i128) as f64 + self.fraction_seconds()
    }

    /// Whether this instant is an inserted leap second (`23:59:60`).
    #[inline]
    pub fn is_leap_second(&self) -> bool {
        LeapSecondTable::iers().is_leap_second(self.whole_seconds)
    }

    /// Earlier of two instants.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        std::cmp::min(self, other)
    }

    /// Later of two instants.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Generic trait implementations
// ═══════════════════════════════════════════════════════════════════════════

impl Ord for AtomicEpoch {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.whole_seconds
            .cmp(&other.whole_seconds)
            .then(self.fraction.cmp(&other.fraction))
    }
}

impl PartialOrd for AtomicEpoch {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Display ───────────────────────────────────────────────────────────────

impl fmt::Display for AtomicEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TAI {}.{:016}", self.whole_seconds, self.fraction)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for AtomicEpoch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.whole_seconds, self.fraction).serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for AtomicEpoch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (whole_seconds, fraction) = <(i64, u64)>::deserialize(deserializer)?;
        if fraction >= FRAC_MULTIPLIER {
            return Err(serde::de::Error::custom(format!(
                "fraction {fraction} out of range [0, {FRAC_MULTIPLIER})"
            )));
        }
        Ok(Self {
            whole_seconds,
            fraction,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_carries_fraction_overflow() {
        let e = AtomicEpoch::normalized(10, FRAC_MULTIPLIER + 5);
        assert_eq!(e.whole_seconds(), 11);
        assert_eq!(e.fraction(), 5);

        let exact = AtomicEpoch::normalized(10, FRAC_MULTIPLIER);
        assert_eq!((exact.whole_seconds(), exact.fraction()), (11, 0));
    }

    #[test]
    fn from_seconds_f64_splits_negative_values() {
        let e = AtomicEpoch::from_seconds_f64(-1.5).unwrap();
        assert_eq!(e.whole_seconds(), -2);
        assert_eq!(e.fraction(), FRAC_MULTIPLIER / 2);
    }

    #[test]
    fn from_seconds_f64_keeps_exact_fractions() {
        let e = AtomicEpoch::from_seconds_f64(2_487_974_400.25).unwrap();
        assert_eq!(e.whole_seconds(), 2_487_974_400);
        assert_eq!(e.fraction(), FRAC_MULTIPLIER / 4);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = AtomicEpoch::normalized(5, FRAC_MULTIPLIER - 1);
        let b = AtomicEpoch::normalized(6, 0);
        let c = AtomicEpoch::normalized(6, 1);
        assert!(a < b && b < c);
        assert_eq!(a.max(c), c);
        assert_eq!(c.min(a), a);
    }

    #[test]
    fn seconds_since_anchor() {
        let e = AtomicEpoch::normalized(100, FRAC_MULTIPLIER / 4);
        assert_eq!(e.seconds_since(90), 10.25);
        assert_eq!(e.checked_shift(-100).unwrap().seconds_since(0), 0.25);
    }

    #[test]
    fn from_seconds_f64_rejects_values_beyond_range() {
        assert!(AtomicEpoch::from_seconds_f64(1e300).is_none());
        assert!(AtomicEpoch::from_seconds_f64(-1e300).is_none());
        assert!(AtomicEpoch::from_seconds_f64(f64::NAN).is_none());
        let edge = AtomicEpoch::from_seconds_f64(MAX_WHOLE_SECONDS_F64).unwrap();
        assert_eq!(edge.whole_seconds(), MAX_WHOLE_SECONDS);
    }

    #[test]
    fn checked_shift_stops_at_range_limit() {
        let edge = AtomicEpoch::normalized(MAX_WHOLE_SECONDS, 0);
        assert!(edge.checked_shift(1).is_none());
        assert!(edge.checked_shift(i64::MAX).is_none());
        assert_eq!(edge.checked_shift(-1).map(|e| e.whole_seconds()), Some(MAX_WHOLE_SECONDS - 1));
        assert!(AtomicEpoch::ORIGIN.checked_shift(i64::MIN).is_none());
    }

    #[test]
    fn seconds_since_spans_the_full_axis() {
        let far = AtomicEpoch::normalized(i64::MAX, 0);
        assert_eq!(far.seconds_since(i64::MIN), 2f64.powi(64));
    }

    #[test]
    fn display_pads_fraction() {
        let e = AtomicEpoch::normalized(42, 5);
        assert_eq!(e.to_string(), "TAI 42.0000000000000005");
        assert_eq!(AtomicEpoch::ORIGIN.to_string(), "TAI 0.0000000000000000");
    }

    #[test]
    fn leap_second_lookup() {
        // 2016-12-31T23:59:60 UTC
        assert!(AtomicEpoch::normalized(1_861_920_036, 0).is_leap_second());
        assert!(!AtomicEpoch::normalized(1_861_920_037, 0).is_leap_second());
    }
}
