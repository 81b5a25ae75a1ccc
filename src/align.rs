// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Alignment of two irregularly sampled epoch series.
//!
//! Both series are expressed as `f64` seconds after a shared anchor (the
//! smaller of their minimum whole seconds) and snapped to an integer grid
//! of spacing `rate`. Set operations then run on exact integers, so
//! floating-point error never accumulates across samples.
//!
//! Unless given explicitly, `rate` is a third of the smaller nominal
//! sampling interval (the median of consecutive differences). That is fine
//! enough to tell either series' samples apart and coarse enough to absorb
//! small timing jitter.
//!
//! The method assumes reasonably regular sampling.

use crate::diagnostics::{Diagnostic, Flagged};
use crate::epoch::AtomicEpoch;
use crate::error::{Result, TaiError};
use crate::series::EpochSeries;
use qtty::Seconds;

/// Alignment settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlignOptions {
    /// Grid spacing. `None` derives it from the data.
    pub rate: Option<Seconds>,
}

impl AlignOptions {
    #[inline]
    pub const fn with_rate(rate: Seconds) -> Self {
        Self { rate: Some(rate) }
    }
}

/// Epochs common to two series.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Common grid epochs, in the first series' sample order.
    pub epochs: EpochSeries,
    /// `epochs[k]` is sample `first[k]` of the first series…
    pub first: Vec<usize>,
    /// …and sample `second[k]` of the second.
    pub second: Vec<usize>,
    pub rate: Seconds,
}

/// Merged epochs of two series.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    /// Distinct grid epochs in chronological order.
    pub epochs: EpochSeries,
    /// Sample `i` of the first series sits at `epochs[first[i]]`.
    pub first: Vec<usize>,
    /// Sample `j` of the second series sits at `epochs[second[j]]`.
    pub second: Vec<usize>,
    pub rate: Seconds,
}

/// Both series snapped onto one integer grid.
struct Grid {
    anchor: i64,
    rate: f64,
    first: Vec<i64>,
    second: Vec<i64>,
}

impl Grid {
    fn build(
        first: &EpochSeries,
        second: &EpochSeries,
        options: AlignOptions,
        operation: &'static str,
    ) -> Result<Flagged<Self>> {
        let empty = || TaiError::EmptySeries { operation };
        let (mut offsets1, min1) = first.offsets_from_min().ok_or_else(empty)?;
        let (mut offsets2, min2) = second.offsets_from_min().ok_or_else(empty)?;

        let rate = match options.rate {
            Some(rate) => {
                let rate = rate.value();
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(TaiError::InvalidRate { rate });
                }
                rate
            }
            None => nominal_interval(&offsets1).min(nominal_interval(&offsets2)) / 3.0,
        };

        let anchor = min1.min(min2);
        shift(&mut offsets1, (min1 - anchor) as f64);
        shift(&mut offsets2, (min2 - anchor) as f64);

        let mut diagnostics = Vec::new();
        let spacing = ulp(max_abs(&offsets1)).max(ulp(max_abs(&offsets2)));
        if spacing > rate {
            diagnostics.push(Diagnostic::PrecisionWarning { spacing, rate }.emit());
        }

        let snap = |offsets: &[f64]| -> Vec<i64> {
            offsets.iter().map(|o| (o / rate).round() as i64).collect()
        };
        let grid = Self {
            anchor,
            rate,
            first: snap(&offsets1),
            second: snap(&offsets2),
        };
        Ok(Flagged::new(grid, diagnostics))
    }

    /// Epoch of grid slot `value`; `index` is its output position.
    #[inline]
    fn epoch_at(&self, index: usize, value: i64) -> Result<AtomicEpoch> {
        let seconds = value as f64 * self.rate;
        AtomicEpoch::from_seconds_f64(seconds)
            .and_then(|e| e.checked_shift(self.anchor))
            .ok_or(TaiError::OutOfRange {
                index,
                value: seconds,
            })
    }

    fn series(&self, values: impl IntoIterator<Item = i64>) -> Result<EpochSeries> {
        values
            .into_iter()
            .enumerate()
            .map(|(index, v)| self.epoch_at(index, v))
            .collect()
    }
}

#[inline]
fn shift(offsets: &mut [f64], by: f64) {
    if by != 0.0 {
        offsets.iter_mut().for_each(|o| *o += by);
    }
}

#[inline]
fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

/// Distance to the next representable `f64` above `|x|`.
#[inline]
fn ulp(x: f64) -> f64 {
    let x = x.abs();
    f64::from_bits(x.to_bits() + 1) - x
}

/// Median of the positive consecutive differences of the sorted offsets;
/// `1.0` when there are none.
fn nominal_interval(offsets: &[f64]) -> f64 {
    let mut sorted = offsets.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut steps: Vec<f64> = sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&d| d > 0.0)
        .collect();
    if steps.is_empty() {
        return 1.0;
    }
    steps.sort_by(f64::total_cmp);
    let mid = steps.len() / 2;
    if steps.len() % 2 == 1 {
        steps[mid]
    } else {
        0.5 * (steps[mid - 1] + steps[mid])
    }
}

/// Distinct grid values, ascending, each with its first sample index.
fn distinct(grid: &[i64]) -> Vec<(i64, usize)> {
    let mut pairs: Vec<(i64, usize)> = grid.iter().copied().zip(0..).collect();
    pairs.sort_unstable();
    pairs.dedup_by_key(|p| p.0);
    pairs
}

/// Samples of `first` and `second` that share a grid slot.
///
/// Uses an O(n+m) merge over the distinct sorted grid values; when a slot
/// holds several samples of one series, its first sample is reported.
pub fn intersect_series(
    first: &EpochSeries,
    second: &EpochSeries,
    options: AlignOptions,
) -> Result<Flagged<Intersection>> {
    let (grid, diagnostics) = Grid::build(first, second, options, "intersect")?.into_parts();
    let a = distinct(&grid.first);
    let b = distinct(&grid.second);

    let mut matches = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].0 == b[j].0 {
            matches.push((a[i].1, b[j].1, a[i].0));
            i += 1;
            j += 1;
        } else if a[i].0 < b[j].0 {
            i += 1;
        } else {
            j += 1;
        }
    }
    matches.sort_unstable_by_key(|m| m.0);

    let intersection = Intersection {
        epochs: grid.series(matches.iter().map(|m| m.2))?,
        first: matches.iter().map(|m| m.0).collect(),
        second: matches.iter().map(|m| m.1).collect(),
        rate: Seconds::new(grid.rate),
    };
    Ok(Flagged::new(intersection, diagnostics))
}

/// All grid slots occupied by `first` or `second`.
pub fn union_series(
    first: &EpochSeries,
    second: &EpochSeries,
    options: AlignOptions,
) -> Result<Flagged<Union>> {
    let (grid, diagnostics) = Grid::build(first, second, options, "union")?.into_parts();
    let a = distinct(&grid.first);
    let b = distinct(&grid.second);

    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let next = match (a.get(i), b.get(j)) {
            (Some(x), Some(y)) if x.0 == y.0 => {
                i += 1;
                j += 1;
                x.0
            }
            (Some(x), Some(y)) if x.0 < y.0 => {
                i += 1;
                x.0
            }
            (Some(_), Some(y)) => {
                j += 1;
                y.0
            }
            (Some(x), None) => {
                i += 1;
                x.0
            }
            (None, Some(y)) => {
                j += 1;
                y.0
            }
            (None, None) => break,
        };
        merged.push(next);
    }

    // every grid value is in `merged`, so the search always hits
    let position = |v: &i64| merged.binary_search(v).unwrap_or_else(|p| p);
    let union = Union {
        first: grid.first.iter().map(position).collect(),
        second: grid.second.iter().map(position).collect(),
        epochs: grid.series(merged.iter().copied())?,
        rate: Seconds::new(grid.rate),
    };
    Ok(Flagged::new(union, diagnostics))
}

impl EpochSeries {
    /// See [`intersect_series`].
    #[inline]
    pub fn intersect(
        &self,
        other: &EpochSeries,
        options: AlignOptions,
    ) -> Result<Flagged<Intersection>> {
        intersect_series(self, other, options)
    }

    /// See [`union_series`].
    #[inline]
    pub fn union(&self, other: &EpochSeries, options: AlignOptions) -> Result<Flagged<Union>> {
        union_series(self, other, options)
    }
}
