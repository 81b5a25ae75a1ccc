// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Element-wise comparison of a series against one reference epoch.
//!
//! Every function is lexicographic on `(whole_seconds, fraction)`, i.e.
//! plain chronological order through [`AtomicEpoch`]'s `Ord`.

use crate::epoch::AtomicEpoch;
use crate::series::EpochSeries;
use std::cmp::Ordering;

impl EpochSeries {
    /// Ordering of each element relative to `reference`.
    pub fn compare_to(&self, reference: &AtomicEpoch) -> Vec<Ordering> {
        self.iter().map(|e| e.cmp(reference)).collect()
    }

    #[inline]
    fn mask(&self, reference: &AtomicEpoch, keep: impl Fn(Ordering) -> bool) -> Vec<bool> {
        self.iter().map(|e| keep(e.cmp(reference))).collect()
    }

    pub fn greater_than(&self, reference: &AtomicEpoch) -> Vec<bool> {
        self.mask(reference, Ordering::is_gt)
    }

    pub fn greater_or_equal(&self, reference: &AtomicEpoch) -> Vec<bool> {
        self.mask(reference, Ordering::is_ge)
    }

    pub fn less_than(&self, reference: &AtomicEpoch) -> Vec<bool> {
        self.mask(reference, Ordering::is_lt)
    }

    pub fn less_or_equal(&self, reference: &AtomicEpoch) -> Vec<bool> {
        self.mask(reference, Ordering::is_le)
    }

    pub fn equal_to(&self, reference: &AtomicEpoch) -> Vec<bool> {
        self.mask(reference, Ordering::is_eq)
    }

    pub fn not_equal_to(&self, reference: &AtomicEpoch) -> Vec<bool> {
        self.mask(reference, Ordering::is_ne)
    }
}
