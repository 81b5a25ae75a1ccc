// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type for epoch construction, conversion, and alignment.
//!
//! | Variant | Raised by | Fatal by default? |
//! |---------|-----------|-------------------|
//! | [`ShapeMismatch`](TaiError::ShapeMismatch) | multi-array factories | yes |
//! | [`InvalidCalendarDate`](TaiError::InvalidCalendarDate) | calendar factory | yes |
//! | [`NonFiniteInput`](TaiError::NonFiniteInput) | floating-point factories | yes |
//! | [`OutOfRange`](TaiError::OutOfRange) | factories, alignment | yes |
//! | [`EmptySeries`](TaiError::EmptySeries) | alignment | yes |
//! | [`IndexOutOfBounds`](TaiError::IndexOutOfBounds) | `select` / `replace` | yes |
//! | [`InvalidRate`](TaiError::InvalidRate) | alignment | yes |
//! | [`CalendarOutOfRange`](TaiError::CalendarOutOfRange) | calendar accessors | yes |
//! | [`UnsupportedEra`](TaiError::UnsupportedEra) | [`Flagged::strict`](crate::Flagged::strict) | no |
//! | [`LeapAmbiguity`](TaiError::LeapAmbiguity) | [`Flagged::strict`](crate::Flagged::strict) | no |
//! | [`InsufficientPrecision`](TaiError::InsufficientPrecision) | [`Flagged::strict`](crate::Flagged::strict) | no |
//!
//! The last three mirror the non-fatal [`Diagnostic`](crate::Diagnostic)s and
//! only appear when a caller opts into failing hard.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaiError {
    /// Input arrays of a multi-array constructor differ in length.
    #[error("input array `{argument}` has length {found}, expected {expected}")]
    ShapeMismatch {
        argument: &'static str,
        expected: usize,
        found: usize,
    },

    /// A calendar row does not name a real UTC instant.
    #[error(
        "invalid calendar date {year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second} at row {index}"
    )]
    InvalidCalendarDate {
        index: usize,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    },

    /// NaN or infinite value passed to a floating-point factory.
    #[error("non-finite input value {value} at row {index}")]
    NonFiniteInput { index: usize, value: f64 },

    /// Value whose epoch lies beyond ±2⁶² s of 1958-01-01.
    #[error("value {value} at row {index} is outside the representable epoch range")]
    OutOfRange { index: usize, value: f64 },

    /// Operation needs at least one epoch.
    #[error("{operation} requires a non-empty epoch series")]
    EmptySeries { operation: &'static str },

    /// Element index past the end of a series.
    #[error("index {index} out of bounds for series of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Alignment rate must be finite and strictly positive.
    #[error("invalid alignment rate {rate} s")]
    InvalidRate { rate: f64 },

    /// Epoch too far from the present for a calendar rendering.
    #[error("epoch at row {index} ({naive_seconds} s since 1958) is outside the calendar range")]
    CalendarOutOfRange { index: usize, naive_seconds: i64 },

    /// Epochs before 1972-01-01, outside the leap-second table.
    #[error("{count} epoch(s) predate 1972-01-01 (first at row {first_index}); leap correction not applicable")]
    UnsupportedEra { count: usize, first_index: usize },

    /// Epochs sitting on an inserted leap second cannot be represented on a leap-free axis.
    #[error("{count} epoch(s) fall on an inserted leap second (first at row {first_index})")]
    LeapAmbiguity { count: usize, first_index: usize },

    /// Double precision is too coarse for the requested alignment grid.
    #[error("double-precision spacing {spacing} s exceeds alignment rate {rate} s")]
    InsufficientPrecision { spacing: f64, rate: f64 },
}

pub type Result<T> = std::result::Result<T, TaiError>;

/// Fail with [`TaiError::ShapeMismatch`] unless `found == expected`.
pub(crate) fn check_len(argument: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(TaiError::ShapeMismatch {
            argument,
            expected,
            found,
        })
    }
}

/// Fail with [`TaiError::NonFiniteInput`] on the first NaN or infinity.
pub(crate) fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(TaiError::NonFiniteInput {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_len_reports_offending_argument() {
        assert!(check_len("sod", 3, 3).is_ok());
        let err = check_len("sod", 3, 2).unwrap_err();
        assert_eq!(
            err,
            TaiError::ShapeMismatch {
                argument: "sod",
                expected: 3,
                found: 2
            }
        );
        assert!(err.to_string().contains("`sod`"));
    }

    #[test]
    fn check_finite_finds_first_nan() {
        assert!(check_finite(&[1.0, 2.0]).is_ok());
        match check_finite(&[1.0, f64::NAN, f64::INFINITY]) {
            Err(TaiError::NonFiniteInput { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected {other:?}"),
        }
    }
}
