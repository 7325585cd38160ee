// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction used for row heights and offsets.
//!
//! This trait is intentionally small and only implemented for `f32` and `f64`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Scalar type used for row heights, y-offsets, and scroll positions.
///
/// This is implemented for `f32` and `f64`, with `f64` being the default
/// everywhere a scalar is inferred.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity (typically `0.0`).
    fn zero() -> Self;

    /// Returns `true` if the value is negative, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// Constructs from a `usize` lossily.
    fn from_usize(value: usize) -> Self;

    /// Clamps negative values to zero.
    fn clamp_non_negative(self) -> Self {
        if self.is_sign_negative() {
            Self::zero()
        } else {
            self
        }
    }

    /// Drops the fractional part, rounding toward zero.
    ///
    /// Values outside the `i64` range saturate.
    fn trunc(self) -> Self;
}

impl Scalar for f32 {
    fn zero() -> Self {
        0.0
    }

    fn is_sign_negative(self) -> bool {
        Self::is_sign_negative(self)
    }

    fn from_usize(value: usize) -> Self {
        value as Self
    }

    fn trunc(self) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Truncation toward zero is the point; `core` has no float `trunc`"
        )]
        {
            (self as i64) as Self
        }
    }
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn is_sign_negative(self) -> bool {
        Self::is_sign_negative(self)
    }

    fn from_usize(value: usize) -> Self {
        value as Self
    }

    fn trunc(self) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Truncation toward zero is the point; `core` has no float `trunc`"
        )]
        {
            (self as i64) as Self
        }
    }
}
