//! Inclusive rectangular ranges of cells.

use serde::{Deserialize, Serialize};

use super::matrix::Size;
use super::point::Point;

/// An inclusive rectangle of cells.
///
/// `start` is always the minimal corner and `end` the maximal one; the
/// constructor normalizes whatever corners it is given, so
/// `start.row <= end.row && start.column <= end.column` holds for every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRange")]
pub struct PointRange {
    start: Point,
    end: Point,
}

/// Corners as they appear on the wire, in any order.
#[derive(Deserialize)]
struct RawRange {
    start: Point,
    end: Point,
}

impl From<RawRange> for PointRange {
    fn from(raw: RawRange) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl PointRange {
    /// Creates a range from two arbitrary corners.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            start: Point::new(a.row.min(b.row), a.column.min(b.column)),
            end: Point::new(a.row.max(b.row), a.column.max(b.column)),
        }
    }

    /// A range covering a single cell.
    pub fn single(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// The smallest range containing every point, or `None` for no points.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().fold(None, |acc: Option<Self>, point| {
            Some(match acc {
                None => Self::single(point),
                Some(range) => Self::new(
                    Point::new(range.start.row.min(point.row), range.start.column.min(point.column)),
                    Point::new(range.end.row.max(point.row), range.end.column.max(point.column)),
                ),
            })
        })
    }

    /// The minimal (top-left) corner.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The maximal (bottom-right) corner.
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Whether `point` lies inside the rectangle.
    pub fn contains(&self, point: Point) -> bool {
        (self.start.row..=self.end.row).contains(&point.row)
            && (self.start.column..=self.end.column).contains(&point.column)
    }

    /// Number of rows and columns covered.
    pub fn size(&self) -> Size {
        Size {
            rows: self.end.row - self.start.row + 1,
            columns: self.end.column - self.start.column + 1,
        }
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.column..=self.end.column).map(move |column| Point::new(row, column))
        })
    }

    /// Intersects the range with a grid of the given size.
    ///
    /// Returns `None` when nothing of the range lies inside the grid.
    pub fn clamp_to(&self, size: Size) -> Option<Self> {
        if size.rows == 0 || size.columns == 0 {
            return None;
        }
        if self.start.row >= size.rows || self.start.column >= size.columns {
            return None;
        }
        Some(Self {
            start: self.start,
            end: Point::new(
                self.end.row.min(size.rows - 1),
                self.end.column.min(size.columns - 1),
            ),
        })
    }
}

impl From<Point> for PointRange {
    fn from(point: Point) -> Self {
        Self::single(point)
    }
}
