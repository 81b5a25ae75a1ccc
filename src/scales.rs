// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Vallés Puig, Ramon

//! External time scales and their anchors on the atomic axis.
//!
//! # Leap-corrected scales
//!
//! | Scale | Anchor |
//! |-------|--------|
//! | Modified Julian Date | [`MJD_TAI0`] = MJD of 1958-01-01 |
//! | Unix time | [`UNIX_TAI0`] = Unix seconds of 1958-01-01 |
//! | Besselian date | `B = 2000 + (MJD − 51544.03) / 365.2422` |
//!
//! # Continuous GNSS scales
//!
//! Each zero-sized marker implementing [`GnssScale`] fixes the corrected
//! second count of its week 0, second-of-week 0. These scales run on a
//! leap-free clock with a constant offset from TAI, so no table lookup is
//! involved.
//!
//! | Marker | Epoch (UTC) | TAI − scale |
//! |--------|-------------|-------------|
//! | [`GPS`] | 1980-01-06 | 19 s |
//! | [`GAL`] | 1999-08-22 (GPS week 1024) | 19 s |
//! | [`BDS`] | 2006-01-01 | 33 s |

use qtty::Days;

/// MJD of 1958-01-01T00:00:00, the atomic origin.
pub const MJD_TAI0: i64 = 36_204;

/// Unix time of 1958-01-01T00:00:00.
pub const UNIX_TAI0: i64 = -378_691_200;

pub const SECONDS_PER_DAY: i64 = 86_400;

pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Length of the Besselian year used by the IERS EOP products.
pub(crate) const BESSELIAN_YEAR: Days = Days::new(365.242_2);

/// MJD of Besselian epoch B2000.
pub(crate) const B2000_MJD: Days = Days::new(51_544.03);

/// A GNSS time scale counted in weeks and seconds of week.
pub trait GnssScale: Copy + Clone + std::fmt::Debug + PartialEq + 'static {
    /// Display label.
    const LABEL: &'static str;

    /// Corrected seconds since 1958-01-01 of week 0, SOW 0.
    const EPOCH_TAI_SECONDS: i64;
}

/// GPS Time: weeks since 1980-01-06T00:00:00 UTC.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GPS;

impl GnssScale for GPS {
    const LABEL: &'static str = "GPS";
    const EPOCH_TAI_SECONDS: i64 = 694_656_019;
}

/// Galileo System Time: weeks since 1999-08-22T00:00:00 GST.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GAL;

impl GnssScale for GAL {
    const LABEL: &'static str = "GST";
    const EPOCH_TAI_SECONDS: i64 = 1_313_971_219;
}

/// BeiDou Time: weeks since 2006-01-01T00:00:00 UTC.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BDS;

impl GnssScale for BDS {
    const LABEL: &'static str = "BDT";
    const EPOCH_TAI_SECONDS: i64 = 1_514_764_833;
}
