// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Non-fatal diagnostics.
//!
//! Conversions that can still produce a best-effort answer return a
//! [`Flagged<T>`]: the value plus every [`Diagnostic`] raised on the way.
//! Each diagnostic is also logged once through `tracing` when it is raised.
//! Callers that want a hard failure call [`Flagged::strict`].

use crate::error::{Result, TaiError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Discriminant of a [`Diagnostic`], handy for assertions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnsupportedEra,
    LeapAmbiguity,
    PrecisionWarning,
}

/// A condition worth knowing about that did not stop the computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diagnostic {
    /// Epochs before 1972-01-01: no leap correction was applied to them.
    UnsupportedEra { count: usize, first_index: usize },
    /// Epochs on an inserted leap second were folded onto the preceding second.
    LeapAmbiguity { count: usize, first_index: usize },
    /// Float spacing of the largest offset is coarser than the alignment rate.
    PrecisionWarning { spacing: f64, rate: f64 },
}

impl Diagnostic {
    #[inline]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::UnsupportedEra { .. } => DiagnosticKind::UnsupportedEra,
            Diagnostic::LeapAmbiguity { .. } => DiagnosticKind::LeapAmbiguity,
            Diagnostic::PrecisionWarning { .. } => DiagnosticKind::PrecisionWarning,
        }
    }

    /// The equivalent hard error.
    pub fn into_error(self) -> TaiError {
        match self {
            Diagnostic::UnsupportedEra { count, first_index } => {
                TaiError::UnsupportedEra { count, first_index }
            }
            Diagnostic::LeapAmbiguity { count, first_index } => {
                TaiError::LeapAmbiguity { count, first_index }
            }
            Diagnostic::PrecisionWarning { spacing, rate } => {
                TaiError::InsufficientPrecision { spacing, rate }
            }
        }
    }

    /// Summarise a per-element mask into `(count, first_index)`.
    pub(crate) fn summarize(mask: &[bool]) -> Option<(usize, usize)> {
        let first_index = mask.iter().position(|&m| m)?;
        let count = mask[first_index..].iter().filter(|&&m| m).count();
        Some((count, first_index))
    }

    /// Log this diagnostic and hand it back.
    pub(crate) fn emit(self) -> Self {
        match &self {
            Diagnostic::UnsupportedEra { count, first_index } => tracing::warn!(
                count,
                first_index,
                "epochs predate 1972-01-01; UTC-TAI offset not tabulated, leap correction skipped"
            ),
            Diagnostic::LeapAmbiguity { count, first_index } => tracing::warn!(
                count,
                first_index,
                "leap second crossed; epochs folded onto the preceding second"
            ),
            Diagnostic::PrecisionWarning { spacing, rate } => tracing::warn!(
                spacing,
                rate,
                "double precision may be insufficient for the alignment grid"
            ),
        }
        self
    }
}

/// A value together with the diagnostics raised while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Flagged<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Flagged<T> {
    /// A value with no diagnostics.
    #[inline]
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    #[inline]
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Whether a diagnostic of `kind` was raised.
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind() == kind)
    }

    /// Drop the diagnostics and keep the value.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Treat any diagnostic as fatal.
    pub fn strict(self) -> Result<T> {
        match self.diagnostics.into_iter().next() {
            Some(diagnostic) => Err(diagnostic.into_error()),
            None => Ok(self.value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Flagged<U> {
        Flagged {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Split into value and diagnostics.
    #[inline]
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_counts_from_first_hit() {
        assert_eq!(Diagnostic::summarize(&[false, false]), None);
        assert_eq!(
            Diagnostic::summarize(&[false, true, false, true]),
            Some((2, 1))
        );
    }

    #[test]
    fn strict_surfaces_first_diagnostic() {
        let clean = Flagged::clean(3);
        assert!(clean.is_clean());
        assert_eq!(clean.strict(), Ok(3));

        let flagged = Flagged::new(
            3,
            vec![Diagnostic::LeapAmbiguity {
                count: 1,
                first_index: 0,
            }],
        );
        assert!(flagged.has(DiagnosticKind::LeapAmbiguity));
        assert!(!flagged.has(DiagnosticKind::UnsupportedEra));
        assert_eq!(
            flagged.strict(),
            Err(TaiError::LeapAmbiguity {
                count: 1,
                first_index: 0
            })
        );
    }

    #[test]
    fn map_keeps_diagnostics() {
        let flagged = Flagged::new(
            2,
            vec![Diagnostic::PrecisionWarning {
                spacing: 1.0,
                rate: 0.5,
            }],
        )
        .map(|v| v * 10);
        assert_eq!(flagged.value, 20);
        assert!(flagged.has(DiagnosticKind::PrecisionWarning));
    }
}
