// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Ordered batches of [`AtomicEpoch`] values.
//!
//! Insertion order is sample order; nothing here sorts or deduplicates.
//! Construction from external scales lives in the `convert` and `civil`
//! modules, alignment in `align`, comparisons in `compare`.

use crate::epoch::AtomicEpoch;
use crate::error::{check_len, Result, TaiError};
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A contiguous, growable sequence of epochs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EpochSeries {
    epochs: Vec<AtomicEpoch>,
}

impl EpochSeries {
    /// An empty series.
    #[inline]
    pub const fn new() -> Self {
        Self { epochs: Vec::new() }
    }

    #[inline]
    pub(crate) fn from_vec(epochs: Vec<AtomicEpoch>) -> Self {
        Self { epochs }
    }

    #[inline]
    pub(crate) fn epochs_mut(&mut self) -> &mut [AtomicEpoch] {
        &mut self.epochs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<AtomicEpoch> {
        self.epochs.get(index).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[AtomicEpoch] {
        &self.epochs
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, AtomicEpoch> {
        self.epochs.iter()
    }

    /// Corrected whole-second column.
    pub fn whole_seconds(&self) -> Vec<i64> {
        self.epochs.iter().map(AtomicEpoch::whole_seconds).collect()
    }

    /// Fraction column, in `1 / FRAC_MULTIPLIER` s.
    pub fn fractions(&self) -> Vec<u64> {
        self.epochs.iter().map(AtomicEpoch::fraction).collect()
    }

    /// Per element: is it an inserted leap second?
    pub fn is_leap_second(&self) -> Vec<bool> {
        self.epochs.iter().map(AtomicEpoch::is_leap_second).collect()
    }

    /// Concatenate `other` after `self`, as is.
    pub fn append(&mut self, other: &EpochSeries) {
        self.epochs.extend_from_slice(&other.epochs);
    }

    /// New series made of the elements at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        indices
            .iter()
            .map(|&index| {
                self.get(index).ok_or(TaiError::IndexOutOfBounds {
                    index,
                    len: self.len(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::from_vec)
    }

    /// Overwrite the elements at `indices` with the elements of `values`.
    ///
    /// Nothing is written unless every index is in bounds.
    pub fn replace(&mut self, indices: &[usize], values: &EpochSeries) -> Result<()> {
        check_len("values", indices.len(), values.len())?;
        let len = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(TaiError::IndexOutOfBounds { index, len });
        }
        for (&index, &epoch) in indices.iter().zip(values.iter()) {
            self.epochs[index] = epoch;
        }
        Ok(())
    }

    /// Seconds of each element after the series' smallest whole second,
    /// together with that whole second.
    ///
    /// `None` for an empty series.
    pub fn offsets_from_min(&self) -> Option<(Vec<f64>, i64)> {
        let anchor = self.epochs.iter().map(AtomicEpoch::whole_seconds).min()?;
        let offsets = self.epochs.iter().map(|e| e.seconds_since(anchor)).collect();
        Some((offsets, anchor))
    }

    /// Indices that put the series in chronological order (stable).
    pub fn argsort(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&i| self.epochs[i]);
        order
    }

    /// Earliest and latest epoch.
    pub fn bounds(&self) -> Option<(AtomicEpoch, AtomicEpoch)> {
        let first = *self.epochs.iter().min()?;
        let last = *self.epochs.iter().max()?;
        Some((first, last))
    }
}

impl Index<usize> for EpochSeries {
    type Output = AtomicEpoch;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.epochs[index]
    }
}

impl<'a> IntoIterator for &'a EpochSeries {
    type Item = &'a AtomicEpoch;
    type IntoIter = std::slice::Iter<'a, AtomicEpoch>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.epochs.iter()
    }
}

impl IntoIterator for EpochSeries {
    type Item = AtomicEpoch;
    type IntoIter = std::vec::IntoIter<AtomicEpoch>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.epochs.into_iter()
    }
}

impl FromIterator<AtomicEpoch> for EpochSeries {
    fn from_iter<I: IntoIterator<Item = AtomicEpoch>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl Extend<AtomicEpoch> for EpochSeries {
    fn extend<I: IntoIterator<Item = AtomicEpoch>>(&mut self, iter: I) {
        self.epochs.extend(iter);
    }
}
