// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row windowing driven by [`Positions`].
//!
//! [`ListWindow`] is the piece a list view keeps between frames. It owns a
//! [`Positions`] instance and a cache of measured row heights, and answers:
//!
//! - which rows are visible for a scroll offset and viewport height,
//! - which rows should be realized (the visible rows plus
//!   [`WindowOptions::view_buffer`] rows on either side),
//! - whether a new scroll offset still fits the realized rows, and
//! - how tall the scroll spacer should be.
//!
//! Rows that have not been measured yet fall back to a caller-supplied
//! estimate. Measured heights are fed back with
//! [`ListWindow::record_heights`], which recomputes offsets from the first
//! changed row.

use alloc::vec::Vec;
use core::ops::Range;

use tracing::trace;

use crate::{DEFAULT_BUFFER_LEN, FloorIndexError, Positions, RowPosition, Scalar};

/// Default for [`WindowOptions::view_buffer`].
pub const DEFAULT_VIEW_BUFFER: usize = 50;

/// Default for [`WindowOptions::view_buffer_min`].
pub const DEFAULT_VIEW_BUFFER_MIN: usize = 20;

/// Default for [`WindowOptions::initial_draw`].
pub const DEFAULT_INITIAL_DRAW: usize = 300;

/// Configuration for a [`ListWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowOptions {
    /// Rows realized before the first and after the last visible row.
    pub view_buffer: usize,
    /// Once fewer than this many buffered rows remain on either side of the
    /// viewport, the window is recomputed. Clamped to `view_buffer`.
    pub view_buffer_min: usize,
    /// Rows realized before any viewport has been reported.
    pub initial_draw: usize,
    /// Rows measured ahead of each request, see [`Positions::new`].
    pub buffer_len: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            view_buffer: DEFAULT_VIEW_BUFFER,
            view_buffer_min: DEFAULT_VIEW_BUFFER_MIN,
            initial_draw: DEFAULT_INITIAL_DRAW,
            buffer_len: DEFAULT_BUFFER_LEN,
        }
    }
}

#[derive(Clone, Debug)]
struct ViewState<S> {
    visible: Range<usize>,
    realized: Range<usize>,
    /// Scrolling above this offset exhausts the leading buffer.
    start_y: Option<S>,
    /// A viewport bottom at or past this offset exhausts the trailing buffer.
    end_y: Option<S>,
}

impl<S> ViewState<S> {
    fn empty() -> Self {
        Self {
            visible: 0..0,
            realized: 0..0,
            start_y: None,
            end_y: None,
        }
    }
}

/// Visible and realized row ranges for a scrolling list.
///
/// # Example
///
/// ```
/// use understory_positions::{ListWindow, WindowOptions};
///
/// let mut window = ListWindow::new(WindowOptions {
///     view_buffer: 5,
///     view_buffer_min: 2,
///     ..WindowOptions::default()
/// });
/// window.set_data_len(1000);
///
/// // Every row is estimated at 10 units until measured.
/// let estimate = |_| 10.0;
/// assert_eq!(window.update_view(500.0, 100.0, estimate), Ok(true));
/// assert_eq!(window.visible_range(), 50..61);
/// assert_eq!(window.realized_range(), 45..66);
///
/// // A small scroll stays inside the buffered rows.
/// assert_eq!(window.update_view(520.0, 100.0, estimate), Ok(false));
///
/// // Row 50 turned out to be taller once rendered.
/// assert!(window.record_heights([(50, 30.0)], estimate));
/// let row = window.row_position(51, estimate).unwrap();
/// assert_eq!(row.y, 530.0);
/// ```
#[derive(Clone, Debug)]
pub struct ListWindow<S: Scalar = f64> {
    positions: Positions<S>,
    known: Vec<Option<S>>,
    options: WindowOptions,
    scroll_top: S,
    view_height: S,
    view: Option<ViewState<S>>,
    stale: bool,
}

impl<S: Scalar> Default for ListWindow<S> {
    fn default() -> Self {
        Self::new(WindowOptions::default())
    }
}

impl<S: Scalar> ListWindow<S> {
    /// Creates an empty window.
    #[must_use]
    pub fn new(mut options: WindowOptions) -> Self {
        options.view_buffer_min = options.view_buffer_min.min(options.view_buffer);
        Self {
            positions: Positions::new(options.buffer_len),
            known: Vec::new(),
            options,
            scroll_top: S::zero(),
            view_height: S::zero(),
            view: None,
            stale: false,
        }
    }

    /// Returns the options in effect.
    #[must_use]
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// Returns the underlying positions.
    #[must_use]
    pub fn positions(&self) -> &Positions<S> {
        &self.positions
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.positions.data_len()
    }

    /// Returns the last reported scroll offset.
    #[must_use]
    pub fn scroll_top(&self) -> S {
        self.scroll_top
    }

    /// Returns the last reported viewport height.
    #[must_use]
    pub fn view_height(&self) -> S {
        self.view_height
    }

    /// Updates the number of rows.
    ///
    /// Measured heights for rows that remain are kept.
    pub fn set_data_len(&mut self, data_len: usize) {
        if data_len == self.positions.data_len() {
            return;
        }
        self.positions.profile_data(data_len);
        self.known.resize(data_len, None);
        self.stale = true;
    }

    /// Returns the measured height of `index`, or its estimate.
    pub fn height_of<F>(&self, index: usize, mut estimate: F) -> S
    where
        F: FnMut(usize) -> S,
    {
        known_or_estimated(&self.known, index, &mut estimate)
    }

    /// Returns `true` if the window must be recomputed for this scroll offset
    /// and viewport height.
    #[must_use]
    pub fn is_view_changed(&self, scroll_top: S, view_height: S) -> bool {
        let Some(view) = &self.view else {
            return true;
        };
        self.stale
            || view_height != self.view_height
            || view.start_y.is_some_and(|start_y| scroll_top < start_y)
            || view
                .end_y
                .is_some_and(|end_y| scroll_top + view_height >= end_y)
    }

    /// Reports a new scroll offset and viewport height.
    ///
    /// Negative inputs are clamped to zero. The visible and realized ranges
    /// are only recomputed when [`is_view_changed`](Self::is_view_changed)
    /// says so; the return value tells whether that happened.
    ///
    /// # Errors
    ///
    /// Propagates [`FloorIndexError`] from the row lookups, which only occurs
    /// with a NaN scroll offset or NaN row heights.
    pub fn update_view<F>(
        &mut self,
        scroll_top: S,
        view_height: S,
        mut estimate: F,
    ) -> Result<bool, FloorIndexError<S>>
    where
        F: FnMut(usize) -> S,
    {
        let scroll_top = scroll_top.clamp_non_negative();
        let view_height = view_height.clamp_non_negative();
        let changed = self.is_view_changed(scroll_top, view_height);
        self.scroll_top = scroll_top;
        self.view_height = view_height;
        if !changed {
            return Ok(false);
        }

        let Some(last_row) = self.positions.data_len().checked_sub(1) else {
            self.view = Some(ViewState::empty());
            self.stale = false;
            return Ok(true);
        };

        let known = &self.known;
        let mut height = |index| known_or_estimated(known, index, &mut estimate);
        let positions = &mut self.positions;
        let top = positions.find_floor_index(scroll_top, &mut height)?;
        let bottom = positions.find_floor_index(scroll_top + view_height, &mut height)?;

        let WindowOptions {
            view_buffer,
            view_buffer_min,
            ..
        } = self.options;
        let start = top.saturating_sub(view_buffer);
        let end = bottom.saturating_add(view_buffer).min(last_row);
        let start_y = if start == 0 {
            None
        } else {
            positions
                .get_row_position(start + view_buffer_min, &mut height)
                .map(|row| row.y)
        };
        let end_y = if end == last_row {
            None
        } else {
            positions
                .get_row_position(end + 1 - view_buffer_min, &mut height)
                .map(|row| row.y)
        };

        trace!(top, bottom, start, end, "recomputed list window");
        self.stale = false;
        self.view = Some(ViewState {
            visible: top..bottom + 1,
            realized: start..end + 1,
            start_y,
            end_y,
        });
        Ok(true)
    }

    /// Returns the rows inside the viewport as of the last recompute.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        match &self.view {
            Some(view) => self.clamp_range(&view.visible),
            None => 0..0,
        }
    }

    /// Returns the rows the host should instantiate.
    ///
    /// Before the first viewport is reported this is the first
    /// [`WindowOptions::initial_draw`] rows.
    #[must_use]
    pub fn realized_range(&self) -> Range<usize> {
        match &self.view {
            Some(view) => self.clamp_range(&view.realized),
            None => 0..self.options.initial_draw.min(self.data_len()),
        }
    }

    fn clamp_range(&self, range: &Range<usize>) -> Range<usize> {
        let len = self.data_len();
        range.start.min(len)..range.end.min(len)
    }

    /// Returns the position of row `index`, or `None` if it is out of range.
    pub fn row_position<F>(&mut self, index: usize, mut estimate: F) -> Option<RowPosition<S>>
    where
        F: FnMut(usize) -> S,
    {
        let known = &self.known;
        self.positions
            .get_row_position(index, |i| known_or_estimated(known, i, &mut estimate))
    }

    /// Returns the height to give the scroll spacer.
    #[must_use]
    pub fn estimated_height(&self) -> S {
        self.positions.get_estimated_height()
    }

    /// Stores rendered row heights.
    ///
    /// Offsets are recomputed from the first row whose height changed. Rows
    /// past the measured territory are left alone; their measured heights
    /// are picked up when the positions reach them. Indices out of range are
    /// ignored.
    ///
    /// Returns `true` if any stored height changed, in which case the window
    /// is recomputed on the next [`update_view`](Self::update_view).
    pub fn record_heights<I, F>(&mut self, measurements: I, mut estimate: F) -> bool
    where
        I: IntoIterator<Item = (usize, S)>,
        F: FnMut(usize) -> S,
    {
        let mut changed: Option<(usize, usize)> = None;
        for (index, height) in measurements {
            let Some(slot) = self.known.get_mut(index) else {
                continue;
            };
            if *slot == Some(height) {
                continue;
            }
            *slot = Some(height);
            changed = Some(match changed {
                Some((low, high)) => (low.min(index), high.max(index)),
                None => (index, index),
            });
        }
        let Some((low, high)) = changed else {
            return false;
        };

        if self.positions.last_index().is_some_and(|last| low <= last) {
            let known = &self.known;
            self.positions.calc_heights_from(high, low.checked_sub(1), |i| {
                known_or_estimated(known, i, &mut estimate)
            });
        }
        self.stale = true;
        true
    }
}

fn known_or_estimated<S, F>(known: &[Option<S>], index: usize, estimate: &mut F) -> S
where
    S: Scalar,
    F: FnMut(usize) -> S,
{
    known
        .get(index)
        .copied()
        .flatten()
        .unwrap_or_else(|| estimate(index))
}

#[cfg(test)]
mod tests {
    use super::{ListWindow, WindowOptions};

    fn window(len: usize) -> ListWindow {
        let mut window = ListWindow::new(WindowOptions {
            view_buffer: 5,
            view_buffer_min: 2,
            ..WindowOptions::default()
        });
        window.set_data_len(len);
        window
    }

    fn ten(_: usize) -> f64 {
        10.0
    }

    #[test]
    fn initial_draw_before_any_view() {
        let list = window(1000);
        assert_eq!(list.realized_range(), 0..300);
        assert_eq!(list.visible_range(), 0..0);

        let short = window(40);
        assert_eq!(short.realized_range(), 0..40);
    }

    #[test]
    fn view_buffer_min_is_clamped() {
        let window = ListWindow::<f64>::new(WindowOptions {
            view_buffer: 3,
            view_buffer_min: 10,
            ..WindowOptions::default()
        });
        assert_eq!(window.options().view_buffer_min, 3);
    }

    #[test]
    fn realized_rows_surround_visible_rows() {
        let mut window = window(1000);
        assert_eq!(window.update_view(500.0, 100.0, ten), Ok(true));
        assert_eq!(window.visible_range(), 50..61);
        assert_eq!(window.realized_range(), 45..66);
    }

    #[test]
    fn recomputes_only_when_buffer_runs_low() {
        let mut window = window(1000);
        window.update_view(500.0, 100.0, ten).unwrap();

        // Leading threshold is row 47 (y = 470), trailing is row 64 (y = 640).
        assert_eq!(window.update_view(520.0, 100.0, ten), Ok(false));
        assert_eq!(window.scroll_top(), 520.0);
        assert_eq!(window.realized_range(), 45..66);

        assert_eq!(window.update_view(545.0, 100.0, ten), Ok(true));
        assert_eq!(window.visible_range(), 54..65);
        assert_eq!(window.realized_range(), 49..70);

        assert!(window.is_view_changed(500.0, 100.0));
        assert!(!window.is_view_changed(520.0, 100.0));
    }

    #[test]
    fn view_height_change_recomputes() {
        let mut window = window(1000);
        window.update_view(500.0, 100.0, ten).unwrap();
        assert_eq!(window.update_view(500.0, 50.0, ten), Ok(true));
        assert_eq!(window.visible_range(), 50..56);
        assert_eq!(window.view_height(), 50.0);
    }

    #[test]
    fn edges_of_the_list() {
        let mut window = window(1000);
        assert_eq!(window.update_view(-20.0, 100.0, ten), Ok(true));
        assert_eq!(window.scroll_top(), 0.0);
        assert_eq!(window.visible_range(), 0..11);
        assert_eq!(window.realized_range(), 0..16);

        window.update_view(9900.0, 100.0, ten).unwrap();
        assert_eq!(window.visible_range(), 990..1000);
        assert_eq!(window.realized_range(), 985..1000);
        // The trailing edge has no threshold at the end of the list.
        assert_eq!(window.update_view(9905.0, 100.0, ten), Ok(false));
    }

    #[test]
    fn empty_list_has_empty_ranges() {
        let mut window = window(0);
        assert_eq!(window.update_view(0.0, 100.0, ten), Ok(true));
        assert_eq!(window.visible_range(), 0..0);
        assert_eq!(window.realized_range(), 0..0);
        assert_eq!(window.estimated_height(), 0.0);
    }

    #[test]
    fn recorded_heights_shift_later_rows() {
        let mut window = window(1000);
        window.update_view(0.0, 100.0, ten).unwrap();
        assert_eq!(window.row_position(10, ten).map(|row| row.y), Some(100.0));

        assert!(window.record_heights([(2, 30.0)], ten));
        assert_eq!(window.height_of(2, ten), 30.0);
        assert_eq!(window.row_position(10, ten).map(|row| row.y), Some(120.0));
        assert!(window.is_view_changed(0.0, 100.0));

        assert_eq!(window.update_view(0.0, 100.0, ten), Ok(true));
        assert_eq!(window.visible_range(), 0..9);

        // Same measurement again is not a change.
        assert!(!window.record_heights([(2, 30.0)], ten));
        assert!(!window.is_view_changed(0.0, 100.0));
    }

    #[test]
    fn recorded_heights_past_measured_rows_are_used_later() {
        let mut window = window(1000);
        window.update_view(0.0, 100.0, ten).unwrap();
        let last = window.positions().last_index().unwrap_or_default();

        assert!(window.record_heights([(last + 10, 50.0), (5000, 1.0)], ten));
        assert_eq!(window.positions().last_index(), Some(last));
        let row = window.row_position(last + 10, ten).unwrap();
        assert_eq!(row.height, 50.0);
    }

    #[test]
    fn shrinking_clamps_ranges() {
        let mut window = window(1000);
        window.update_view(500.0, 100.0, ten).unwrap();
        window.set_data_len(48);
        assert_eq!(window.realized_range(), 45..48);
        assert!(window.is_view_changed(500.0, 100.0));

        window.update_view(500.0, 100.0, ten).unwrap();
        assert_eq!(window.visible_range(), 47..48);
        assert_eq!(window.realized_range(), 42..48);
    }

    #[test]
    fn estimated_height_uses_measured_and_estimated_rows() {
        let mut window = ListWindow::new(WindowOptions {
            buffer_len: 9,
            ..WindowOptions::default()
        });
        window.set_data_len(100);
        window.record_heights([(0, 40.0)], ten);
        window.row_position(0, ten);
        // Rows 0..=9 known: 40 + 9 * 10 = 130 over 10 rows, times 100.
        assert_eq!(window.estimated_height(), 1300.0);
    }
}
