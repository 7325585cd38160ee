// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_positions --heading-base-level=0

//! Understory Positions: lazy row geometry for virtualized lists.
//!
//! This crate keeps track of the heights and top offsets of a long list of
//! variable-height rows, so that a host can render only the rows currently in
//! view. Nothing is laid out up front: rows are measured on demand, in order,
//! through a height getter the caller passes to each query.
//!
//! The core concepts are:
//!
//! - [`Positions`]: the offset engine. It measures a contiguous prefix of rows
//!   (plus a configurable buffer), maps a y-value back to the row containing
//!   it, patches later offsets when a known row changes height, and estimates
//!   the total height of the list from the rows measured so far.
//! - [`ListWindow`]: a small controller on top of [`Positions`] holding the
//!   scroll state of a list view. It caches measured heights, computes the
//!   visible and realized row ranges, and decides when a scroll requires
//!   recomputing them.
//! - [`Scalar`]: a small abstraction over `f32`/`f64` used for heights and
//!   offsets.
//!
//! This crate deliberately does **not** know about widgets, display trees, or
//! any particular UI framework. Hosts are responsible for:
//!
//! - Owning the rows and their rendered views.
//! - Measuring rendered rows and reporting heights back.
//! - Positioning rows at the offsets returned here and sizing the scroll
//!   spacer from [`Positions::get_estimated_height`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_positions::Positions;
//!
//! // 10_000 rows, alternating between 20 and 30 logical pixels.
//! let height = |i: usize| if i % 2 == 0 { 20.0 } else { 30.0 };
//! let mut positions = Positions::new(50);
//! positions.profile_data(10_000);
//!
//! // Map the scroll offset to the first visible row.
//! let top = positions.find_floor_index(1_010.0, height).unwrap();
//! assert_eq!(top, 40);
//!
//! // Only rows up to the query plus the buffer were measured.
//! assert!(positions.last_index() < Some(200));
//!
//! // Place the row and size the scroll spacer.
//! let row = positions.get_row_position(top, height).unwrap();
//! assert_eq!(row.y, 1_000.0);
//! assert!(positions.get_estimated_height() > 0.0);
//! ```
//!
//! All heights and offsets live in a caller-chosen 1D coordinate space
//! (typically logical pixels) and are expected to be finite and non-negative.
//! Height getters are not validated.
//!
//! ## Logging
//!
//! Measurement and resize events are reported through [`tracing`] at the
//! `trace` and `debug` levels; a failed row lookup is reported at `warn`.
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library in
//!   dependencies. This crate is `no_std` and uses `alloc` otherwise.

#![no_std]

extern crate alloc;

mod error;
mod list_window;
mod positions;
mod scalar;

pub use error::FloorIndexError;
pub use list_window::{
    DEFAULT_INITIAL_DRAW, DEFAULT_VIEW_BUFFER, DEFAULT_VIEW_BUFFER_MIN, ListWindow, WindowOptions,
};
pub use positions::{DEFAULT_BUFFER_LEN, Positions, RowPosition};
pub use scalar::Scalar;
