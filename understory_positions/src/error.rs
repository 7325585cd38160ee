// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by position queries.

use core::fmt;

use crate::Scalar;

/// Error returned when no row can be found for a y-value.
///
/// This only happens when the cached offsets are corrupt (for example after a
/// height getter returned NaN) or when the queried y-value is NaN. It signals
/// a bug in the caller rather than a condition to recover from.
#[derive(Clone, Copy, PartialEq)]
pub struct FloorIndexError<S: Scalar = f64> {
    /// The y-value that could not be mapped to a row.
    pub y: S,
}

impl<S: Scalar> fmt::Debug for FloorIndexError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FloorIndexError {{ y: {:?} }}", self.y)
    }
}

impl<S: Scalar> fmt::Display for FloorIndexError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to find floor index for y={:?}", self.y)
    }
}

impl<S: Scalar> core::error::Error for FloorIndexError<S> {}
