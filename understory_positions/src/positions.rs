// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily computed row heights and y-offsets.

use alloc::vec;
use alloc::vec::Vec;

use tracing::{debug, trace, warn};

use crate::{FloorIndexError, Scalar};

/// Number of rows measured past the requested index by [`Positions::default`].
pub const DEFAULT_BUFFER_LEN: usize = 200;

/// Height and top offset of a single row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowPosition<S: Scalar = f64> {
    /// Height of the row.
    pub height: S,
    /// Offset of the row's top edge from the start of the list.
    pub y: S,
}

/// Incremental bookkeeping of row heights and cumulative y-offsets.
///
/// `Positions` tracks a list of `data_len` rows identified only by index.
/// Heights are discovered through a height getter passed to each call, so the
/// caller can switch between measured and estimated heights at will. Only a
/// contiguous prefix of rows is ever known: the watermark
/// [`last_index`](Self::last_index) marks the last row whose height and
/// offset have been computed, and queries past it extend that prefix forward,
/// plus [`buffer_len`](Self::buffer_len) extra rows to amortize the work.
///
/// For every known row `i`, `ys[i + 1] == ys[i] + heights[i]`, and `ys[0]`
/// is `0`.
///
/// # Example
///
/// ```
/// use understory_positions::{Positions, RowPosition};
///
/// let heights = [10.0, 20.0, 10.0, 20.0, 10.0];
/// let mut positions = Positions::new(1);
/// positions.profile_data(heights.len());
///
/// let row = positions.get_row_position(3, |i| heights[i]);
/// assert_eq!(row, Some(RowPosition { height: 20.0, y: 40.0 }));
///
/// // Rows 3 and 4 span y = 40..70.
/// assert_eq!(positions.find_floor_index(45.0, |i| heights[i]), Ok(3));
/// assert_eq!(positions.get_estimated_height(), 70.0);
/// ```
#[derive(Clone, Debug)]
pub struct Positions<S: Scalar = f64> {
    buffer_len: usize,
    data_len: usize,
    /// Heights by row; slots past `last_i` are stale.
    heights: Vec<S>,
    /// Top offsets by row, plus the bottom of the last row. Slots past
    /// `last_i + 1` are stale.
    ys: Vec<S>,
    last_i: Option<usize>,
}

impl<S: Scalar> Default for Positions<S> {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_LEN)
    }
}

impl<S: Scalar> Positions<S> {
    /// Creates an empty, cold instance.
    ///
    /// `buffer_len` is the number of rows measured ahead of each requested
    /// index. A value of `0` is treated as `1` so that lazy extension always
    /// makes progress.
    #[must_use]
    pub fn new(buffer_len: usize) -> Self {
        Self {
            buffer_len: buffer_len.max(1),
            data_len: 0,
            heights: Vec::new(),
            ys: vec![S::zero()],
            last_i: None,
        }
    }

    /// Returns the number of rows measured ahead of each requested index.
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    /// Returns the current number of rows.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Returns `true` if the list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_len == 0
    }

    /// Returns the last row whose height and offset are known, or `None` when
    /// nothing has been computed yet.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.last_i
    }

    /// Returns the heights of the known rows.
    #[must_use]
    pub fn known_heights(&self) -> &[S] {
        match self.last_i {
            Some(last) => &self.heights[..=last],
            None => &[],
        }
    }

    /// Returns the offsets of the known rows followed by the bottom edge of
    /// the last known row.
    #[must_use]
    pub fn known_ys(&self) -> &[S] {
        match self.last_i {
            Some(last) => &self.ys[..=last + 1],
            None => &[],
        }
    }

    /// Updates the number of rows.
    ///
    /// Must be called whenever the length of the caller's list changes. When
    /// the list shrinks below the known territory, the watermark is clamped to
    /// the new last row. Calling this with the current length does nothing.
    pub fn profile_data(&mut self, data_len: usize) {
        if data_len == self.data_len {
            return;
        }
        debug!(from = self.data_len, to = data_len, "row count changed");
        self.data_len = data_len;
        self.heights.resize(data_len, S::zero());
        self.ys.resize(data_len + 1, S::zero());
        self.last_i = match self.last_i {
            Some(last) if last >= data_len => data_len.checked_sub(1),
            last => last,
        };
    }

    /// Extends the known territory to cover `max`, plus the buffer.
    ///
    /// Rows are measured contiguously from the current watermark up to
    /// `max + buffer_len`, clamped to the last row. The row at the watermark
    /// is measured again, since its offset is already known.
    pub fn calc_heights<F>(&mut self, max: usize, mut height_getter: F)
    where
        F: FnMut(usize) -> S,
    {
        let Some(last_row) = self.data_len.checked_sub(1) else {
            return;
        };
        let upper = max.saturating_add(self.buffer_len).min(last_row);
        let start = match self.last_i {
            Some(last) if upper <= last => return,
            Some(last) => last,
            None => {
                self.ys[0] = S::zero();
                0
            }
        };
        trace!(from = start, to = upper, "measuring rows");

        let mut y = self.ys[start];
        let heights = &mut self.heights[start..=upper];
        let ys = &mut self.ys[start + 1..=upper + 1];
        for (offset, (height, next_y)) in heights.iter_mut().zip(ys.iter_mut()).enumerate() {
            *height = height_getter(start + offset);
            y = y + *height;
            *next_y = y;
        }
        self.last_i = Some(upper);
    }

    /// Like [`calc_heights`](Self::calc_heights), but first rewinds the
    /// watermark to `forced_last_i`.
    ///
    /// This recomputes everything after a row whose height is known to have
    /// changed. `None` restarts from the first row. The watermark can only
    /// move backwards: a value past the current watermark is clamped to it.
    pub fn calc_heights_from<F>(
        &mut self,
        max: usize,
        forced_last_i: Option<usize>,
        height_getter: F,
    ) where
        F: FnMut(usize) -> S,
    {
        self.last_i = match (forced_last_i, self.last_i) {
            (Some(forced), Some(last)) => Some(forced.min(last)),
            _ => None,
        };
        self.calc_heights(max, height_getter);
    }

    /// Extends the known territory until it reaches `y` or the end of the
    /// list.
    pub fn calc_ys<F>(&mut self, y: S, mut height_getter: F)
    where
        F: FnMut(usize) -> S,
    {
        while self.needs_rows_for(y) {
            self.calc_heights(self.last_i.unwrap_or(0), &mut height_getter);
        }
    }

    fn needs_rows_for(&self, y: S) -> bool {
        let Some(last_row) = self.data_len.checked_sub(1) else {
            return false;
        };
        match self.last_i {
            None => true,
            Some(last) => last < last_row && y > self.ys[last],
        }
    }

    /// Re-checks the height of row `index`.
    ///
    /// Past the watermark this measures up to `index` (plus the buffer). For
    /// a known row, the height is fetched again and, if it differs, every
    /// later known offset is shifted by the difference.
    ///
    /// Returns `true` if any height or offset changed.
    pub fn confirm_height<F>(&mut self, index: usize, mut height_getter: F) -> bool
    where
        F: FnMut(usize) -> S,
    {
        let last = match self.last_i {
            Some(last) if index <= last => last,
            before => {
                self.calc_heights(index, height_getter);
                return self.last_i != before;
            }
        };

        let height = height_getter(index);
        let old = self.heights[index];
        if height == old {
            return false;
        }
        let delta = height - old;
        self.heights[index] = height;
        for y in &mut self.ys[index + 1..=last + 1] {
            *y = *y + delta;
        }
        debug!(index, ?delta, "row height changed");
        true
    }

    /// Returns the row whose span `[ys[i], ys[i + 1])` contains `y`.
    ///
    /// Rows are measured first as needed to reach `y`. Values above the first
    /// row map to `0` and values past the last row map to the last row. An
    /// empty list also yields `0`.
    ///
    /// # Errors
    ///
    /// Returns [`FloorIndexError`] if `y` is NaN or the offsets it is compared
    /// against are (the height getter reported a NaN height).
    pub fn find_floor_index<F>(
        &mut self,
        y: S,
        height_getter: F,
    ) -> Result<usize, FloorIndexError<S>>
    where
        F: FnMut(usize) -> S,
    {
        self.calc_ys(y, height_getter);
        let Some(last) = self.last_i else {
            return Ok(0);
        };
        let ys = &self.ys;
        if y < ys[1] {
            return Ok(0);
        }
        if y >= ys[last] {
            return Ok(last);
        }

        let (mut imin, mut imax) = (0, last);
        while imin < imax {
            let i = imin + (imax - imin) / 2;
            if y >= ys[i] {
                if y < ys[i + 1] {
                    return Ok(i);
                }
                imin = i + 1;
            } else {
                imax = i;
            }
        }
        warn!(?y, "unable to find floor index");
        Err(FloorIndexError { y })
    }

    /// Returns the height and offset of row `index`, confirming its height
    /// first.
    ///
    /// Returns `None` if `index` is out of range.
    pub fn get_row_position<F>(
        &mut self,
        index: usize,
        height_getter: F,
    ) -> Option<RowPosition<S>>
    where
        F: FnMut(usize) -> S,
    {
        if index >= self.data_len {
            return None;
        }
        self.confirm_height(index, height_getter);
        Some(RowPosition {
            height: self.heights[index],
            y: self.ys[index],
        })
    }

    /// Estimates the total height of the list, truncated to a whole number.
    ///
    /// When every row is known this is exact. Otherwise the average height of
    /// the known rows is extrapolated to the full row count, so the estimate
    /// changes as more rows are measured. A cold instance reports `0`.
    #[must_use]
    pub fn get_estimated_height(&self) -> S {
        let Some(last) = self.last_i else {
            return S::zero();
        };
        let known = self.ys[last] + self.heights[last];
        if last + 1 >= self.data_len {
            return known.trunc();
        }
        (known / S::from_usize(last + 1) * S::from_usize(self.data_len)).trunc()
    }
}
