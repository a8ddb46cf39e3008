//! Grid coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The unique identifier of a grid cell.
///
/// Points order row-major: first by row, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub column: usize,
}

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Vertical axis (the `row` field).
    Row,
    /// Horizontal axis (the `column` field).
    Column,
}

impl Point {
    /// The top-left cell.
    pub const ORIGIN: Point = Point { row: 0, column: 0 };

    /// Creates a point.
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Returns the coordinate along `axis`.
    #[inline]
    pub fn get(self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row,
            Axis::Column => self.column,
        }
    }

    /// Moves by a signed delta, returning `None` when a coordinate would
    /// become negative.
    pub fn offset(self, row_delta: isize, column_delta: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(row_delta)?,
            column: self.column.checked_add_signed(column_delta)?,
        })
    }

    /// Moves by `delta` along a single axis.
    pub fn step(self, axis: Axis, delta: isize) -> Option<Self> {
        match axis {
            Axis::Row => self.offset(delta, 0),
            Axis::Column => self.offset(0, delta),
        }
    }
}

impl From<(usize, usize)> for Point {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}
