// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Vallés Puig, Ramon

//! Leap-second table and the leap application engine.
//!
//! Two integer second axes are in play, both counted from
//! 1958-01-01T00:00:00:
//!
//! | Axis | Meaning |
//! |------|---------|
//! | *naive* | UTC read as if no leap second had ever been inserted (what MJD, Unix time and calendar rows encode) |
//! | *corrected* | the continuous atomic count stored in [`AtomicEpoch`](crate::AtomicEpoch) |
//!
//! `corrected = naive + (TAI − UTC)`. [`LeapSecondTable::apply`] goes one
//! way, [`LeapSecondTable::remove`] the other. The inverse is lossy: the
//! inserted second `23:59:60` has no naive counterpart and is folded onto
//! `23:59:59`, which is reported as [`Diagnostic::LeapAmbiguity`].
//!
//! ## References
//! * IERS Bulletin C (leap second announcements)

use crate::diagnostics::{Diagnostic, Flagged};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One insertion: from `boundary` (corrected seconds) onward, TAI − UTC = `offset`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeapEntry {
    pub boundary: i64,
    pub offset: i64,
}

impl LeapEntry {
    /// The same boundary on the naive axis (always a UTC midnight).
    #[inline]
    pub const fn naive_boundary(&self) -> i64 {
        self.boundary - self.offset
    }
}

const fn entry(boundary: i64, offset: i64) -> LeapEntry {
    LeapEntry { boundary, offset }
}

/// Source: IERS Bulletin C. Boundaries are 00:00:00 UTC on the day the new
/// offset takes effect, counted in corrected seconds since 1958-01-01.
const IERS_ENTRIES: [LeapEntry; 28] = [
    entry(441_763_210, 10),   // 1972-01-01
    entry(457_488_011, 11),   // 1972-07-01
    entry(473_385_612, 12),   // 1973-01-01
    entry(504_921_613, 13),   // 1974-01-01
    entry(536_457_614, 14),   // 1975-01-01
    entry(567_993_615, 15),   // 1976-01-01
    entry(599_616_016, 16),   // 1977-01-01
    entry(631_152_017, 17),   // 1978-01-01
    entry(662_688_018, 18),   // 1979-01-01
    entry(694_224_019, 19),   // 1980-01-01
    entry(741_484_820, 20),   // 1981-07-01
    entry(773_020_821, 21),   // 1982-07-01
    entry(804_556_822, 22),   // 1983-07-01
    entry(867_715_223, 23),   // 1985-07-01
    entry(946_684_824, 24),   // 1988-01-01
    entry(1_009_843_225, 25), // 1990-01-01
    entry(1_041_379_226, 26), // 1991-01-01
    entry(1_088_640_027, 27), // 1992-07-01
    entry(1_120_176_028, 28), // 1993-07-01
    entry(1_151_712_029, 29), // 1994-07-01
    entry(1_199_145_630, 30), // 1996-01-01
    entry(1_246_406_431, 31), // 1997-07-01
    entry(1_293_840_032, 32), // 1999-01-01
    entry(1_514_764_833, 33), // 2006-01-01
    entry(1_609_459_234, 34), // 2009-01-01
    entry(1_719_792_035, 35), // 2012-07-01
    entry(1_814_400_036, 36), // 2015-07-01
    entry(1_861_920_037, 37), // 2017-01-01
];

static IERS: LeapSecondTable = LeapSecondTable {
    entries: &IERS_ENTRIES,
};

/// Ordered, immutable table of cumulative TAI − UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeapSecondTable {
    entries: &'static [LeapEntry],
}

impl LeapSecondTable {
    /// Date of the newest insertion compiled into [`LeapSecondTable::iers`].
    pub const VERSION: &'static str = "2017-01-01";

    /// The built-in table.
    #[inline]
    pub fn iers() -> &'static Self {
        &IERS
    }

    #[inline]
    pub fn entries(&self) -> &[LeapEntry] {
        self.entries
    }

    /// Number of entries whose key (taken by `key`) is `<= value`.
    #[inline]
    fn partition(&self, value: i64, key: impl Fn(&LeapEntry) -> i64) -> usize {
        self.entries.partition_point(|e| key(e) <= value)
    }

    /// TAI − UTC in force at a naive second count.
    ///
    /// `None` before 1972-01-01, where the table does not apply.
    #[inline]
    pub fn offset_at(&self, naive_seconds: i64) -> Option<i64> {
        match self.partition(naive_seconds, LeapEntry::naive_boundary) {
            0 => None,
            n => Some(self.entries[n - 1].offset),
        }
    }

    /// Offset to subtract from a corrected second count to reach the naive axis.
    ///
    /// The flag is `true` when `corrected_seconds` is an inserted leap second;
    /// the returned offset then folds it onto the preceding naive second.
    /// `None` before 1972-01-01.
    #[inline]
    pub fn offset_at_corrected(&self, corrected_seconds: i64) -> Option<(i64, bool)> {
        let n = self.partition(corrected_seconds, |e| e.boundary);
        if n == 0 {
            return None;
        }
        let offset = self.entries[n - 1].offset;
        if self.is_leap_second(corrected_seconds) {
            Some((offset + 1, true))
        } else {
            Some((offset, false))
        }
    }

    /// Whether `corrected_seconds` is the 61st second of a minute.
    ///
    /// The 1972-01-01 entry is the initial offset, not an insertion.
    #[inline]
    pub fn is_leap_second(&self, corrected_seconds: i64) -> bool {
        self.entries[1..]
            .binary_search_by_key(&(corrected_seconds + 1), |e| e.boundary)
            .is_ok()
    }

    /// Naive → corrected for every element.
    ///
    /// Elements before 1972-01-01 are passed through unchanged and reported
    /// as [`Diagnostic::UnsupportedEra`]. Counts within a few dozen seconds
    /// of `i64::MAX` saturate.
    pub fn apply(&self, naive_seconds: &[i64]) -> Flagged<Vec<i64>> {
        let mut pre_era = vec![false; naive_seconds.len()];
        let corrected = naive_seconds
            .iter()
            .zip(pre_era.iter_mut())
            .map(|(&naive, flag)| match self.offset_at(naive) {
                Some(offset) => naive.saturating_add(offset),
                None => {
                    *flag = true;
                    naive
                }
            })
            .collect();

        let diagnostics = Diagnostic::summarize(&pre_era)
            .map(|(count, first_index)| Diagnostic::UnsupportedEra { count, first_index }.emit())
            .into_iter()
            .collect();
        Flagged::new(corrected, diagnostics)
    }

    /// Corrected → naive for every element.
    ///
    /// Leap seconds collapse onto the preceding second and raise
    /// [`Diagnostic::LeapAmbiguity`]; pre-1972 elements are passed through
    /// and raise [`Diagnostic::UnsupportedEra`].
    pub fn remove(&self, corrected_seconds: &[i64]) -> Flagged<Vec<i64>> {
        let mut pre_era = vec![false; corrected_seconds.len()];
        let mut on_leap = vec![false; corrected_seconds.len()];
        let naive = corrected_seconds
            .iter()
            .enumerate()
            .map(
                |(i, &corrected)| match self.offset_at_corrected(corrected) {
                    Some((offset, leap)) => {
                        on_leap[i] = leap;
                        corrected - offset
                    }
                    None => {
                        pre_era[i] = true;
                        corrected
                    }
                },
            )
            .collect();

        let mut diagnostics = Vec::new();
        if let Some((count, first_index)) = Diagnostic::summarize(&pre_era) {
            diagnostics.push(Diagnostic::UnsupportedEra { count, first_index }.emit());
        }
        if let Some((count, first_index)) = Diagnostic::summarize(&on_leap) {
            diagnostics.push(Diagnostic::LeapAmbiguity { count, first_index }.emit());
        }
        Flagged::new(naive, diagnostics)
    }
}

/// [`LeapSecondTable::apply`] on the built-in table.
#[inline]
pub fn apply_leap_seconds(naive_seconds: &[i64]) -> Flagged<Vec<i64>> {
    LeapSecondTable::iers().apply(naive_seconds)
}

/// [`LeapSecondTable::remove`] on the built-in table.
///
/// `crossed_leap` is `flagged.has(DiagnosticKind::LeapAmbiguity)`.
#[inline]
pub fn remove_leap_seconds(corrected_seconds: &[i64]) -> Flagged<Vec<i64>> {
    LeapSecondTable::iers().remove(corrected_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    const SECONDS_PER_DAY: i64 = 86_400;
    const MJD_1958: i64 = 36_204;

    fn naive_midnight(mjd: i64) -> i64 {
        (mjd - MJD_1958) * SECONDS_PER_DAY
    }

    #[test]
    fn table_is_monotonic() {
        for pair in LeapSecondTable::iers().entries().windows(2) {
            assert!(pair[0].boundary < pair[1].boundary);
            assert!(pair[0].offset <= pair[1].offset);
        }
    }

    #[test]
    fn boundaries_land_on_utc_midnight() {
        for e in LeapSecondTable::iers().entries() {
            assert_eq!(e.naive_boundary() % SECONDS_PER_DAY, 0, "{e:?}");
        }
    }

    #[test]
    fn offset_at_2017_boundary() {
        let table = LeapSecondTable::iers();
        let midnight = naive_midnight(57_754); // 2017-01-01
        assert_eq!(table.offset_at(midnight), Some(37));
        assert_eq!(table.offset_at(midnight - 1), Some(36));
        assert_eq!(table.offset_at(naive_midnight(41_317)), Some(10));
        assert_eq!(table.offset_at(naive_midnight(41_317) - 1), None);
    }

    #[test]
    fn offset_at_corrected_flags_only_the_inserted_second() {
        let table = LeapSecondTable::iers();
        let boundary = 1_861_920_037;
        assert_eq!(table.offset_at_corrected(boundary), Some((37, false)));
        assert_eq!(table.offset_at_corrected(boundary - 1), Some((37, true)));
        assert_eq!(table.offset_at_corrected(boundary - 2), Some((36, false)));
        assert_eq!(table.offset_at_corrected(441_763_209), None);
    }

    #[test]
    fn initial_offset_is_not_a_leap_second() {
        assert!(!LeapSecondTable::iers().is_leap_second(441_763_209));
        assert!(LeapSecondTable::iers().is_leap_second(457_488_010));
    }

    #[test]
    fn apply_then_remove_recovers_naive_seconds() {
        let naive = vec![
            naive_midnight(57_754) - 1,
            naive_midnight(57_754),
            naive_midnight(60_000) + 123,
        ];
        let corrected = apply_leap_seconds(&naive);
        assert!(corrected.is_clean());
        assert_eq!(corrected.value[1] - corrected.value[0], 2);

        let back = remove_leap_seconds(&corrected.value);
        assert!(back.is_clean());
        assert_eq!(back.value, naive);
    }

    #[test]
    fn remove_folds_leap_second_and_reports_it() {
        let corrected = [1_861_920_035, 1_861_920_036, 1_861_920_037];
        let naive = remove_leap_seconds(&corrected);
        assert!(naive.has(DiagnosticKind::LeapAmbiguity));
        assert_eq!(naive.value[0], naive.value[1]);
        assert_eq!(naive.value[2], naive.value[1] + 1);
        assert_eq!(
            naive.diagnostics,
            vec![Diagnostic::LeapAmbiguity {
                count: 1,
                first_index: 1
            }]
        );
    }

    #[test]
    fn apply_saturates_at_the_top_of_the_axis() {
        let corrected = apply_leap_seconds(&[i64::MAX - 1, i64::MIN]);
        assert_eq!(corrected.value, vec![i64::MAX, i64::MIN]);
        assert!(corrected.has(DiagnosticKind::UnsupportedEra));
    }

    #[test]
    fn remove_reports_pre_1972_and_leap_together() {
        let naive = remove_leap_seconds(&[441_763_209, 1_861_920_036, 441_763_210]);
        assert_eq!(naive.value, vec![441_763_209, 1_861_919_999, 441_763_200]);
        assert_eq!(
            naive.diagnostics,
            vec![
                Diagnostic::UnsupportedEra {
                    count: 1,
                    first_index: 0
                },
                Diagnostic::LeapAmbiguity {
                    count: 1,
                    first_index: 1
                },
            ]
        );
    }

    #[test]
    fn pre_1972_is_reported_not_corrected() {
        let naive = [naive_midnight(40_000), naive_midnight(41_317)];
        let corrected = apply_leap_seconds(&naive);
        assert_eq!(corrected.value[0], naive[0]);
        assert_eq!(corrected.value[1], naive[1] + 10);
        assert_eq!(
            corrected.diagnostics,
            vec![Diagnostic::UnsupportedEra {
                count: 1,
                first_index: 0
            }]
        );
        assert!(corrected.strict().is_err());
    }
}
