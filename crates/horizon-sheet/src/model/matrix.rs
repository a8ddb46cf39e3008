//! Immutable, sparse-capable two-dimensional storage.
//!
//! [`Matrix<T>`] is the data container behind the grid. It never mutates in
//! place: [`Matrix::set`], [`Matrix::filter`] and [`Matrix::map`] all return a
//! new matrix and leave the receiver untouched. Rows are shared between
//! versions through `Arc`, so a `set` only copies the row it touches.
//!
//! Because every change produces a new value, observers can detect changes
//! with [`Matrix::ptr_eq`] instead of comparing contents.
//!
//! # Example
//!
//! ```
//! use horizon_sheet::model::{Matrix, Point};
//!
//! let empty: Matrix<i32> = Matrix::new();
//! let grid = empty.set(Point::new(1, 2), 7);
//!
//! assert_eq!(grid.get(Point::new(1, 2)), Some(&7));
//! assert_eq!(grid.get(Point::new(0, 0)), None);
//! assert!(grid.has(Point::new(0, 0)));
//! assert!(!empty.has(Point::new(0, 0)));
//! ```

use std::fmt::Display;
use std::sync::Arc;

use crate::error::SheetResult;

use super::point::Point;

/// Logical size of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

impl Size {
    /// Creates a size.
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Whether `point` lies inside a grid of this size.
    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.column < self.columns
    }
}

type Row<T> = Arc<Vec<Option<T>>>;

/// An immutable two-dimensional container with optional holes.
///
/// The logical [`Size`] is derived from the largest populated row and column
/// index, so a matrix grows simply by setting a value outside its current
/// bounds.
#[derive(Debug, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: Arc<Vec<Row<T>>>,
    size: Size,
}

impl<T> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            size: self.size,
        }
    }
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Matrix<T> {
    /// Creates an empty matrix.
    pub fn new() -> Self {
        Self::from_shared(Vec::new())
    }

    /// Creates a dense matrix from row vectors.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        Self::from_shared(
            rows.into_iter()
                .map(|row| Arc::new(row.into_iter().map(Some).collect()))
                .collect(),
        )
    }

    fn from_shared(rows: Vec<Row<T>>) -> Self {
        let size = Self::measure(&rows);
        Self {
            rows: Arc::new(rows),
            size,
        }
    }

    fn measure(rows: &[Row<T>]) -> Size {
        let mut size = Size::default();
        for (index, row) in rows.iter().enumerate() {
            if let Some(last) = row.iter().rposition(Option::is_some) {
                size.rows = index + 1;
                size.columns = size.columns.max(last + 1);
            }
        }
        size
    }

    /// Returns the logical size.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether the matrix holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.size.rows == 0
    }

    /// Whether `point` lies within the logical size.
    ///
    /// A point can be in bounds and still be a hole; [`get`](Self::get)
    /// returns `None` for those.
    #[inline]
    pub fn has(&self, point: Point) -> bool {
        self.size.contains(point)
    }

    /// Returns the value at `point`, if any.
    pub fn get(&self, point: Point) -> Option<&T> {
        self.rows.get(point.row)?.get(point.column)?.as_ref()
    }

    /// Whether two matrices are the same version (reference identity).
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }

    /// Iterates over populated entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .filter_map(move |(column, value)| {
                    value.as_ref().map(|value| (Point::new(row, column), value))
                })
        })
    }

    /// Applies `f` to every populated entry. Holes stay holes.
    pub fn map<U, F>(&self, mut f: F) -> Matrix<U>
    where
        F: FnMut(&T, Point) -> U,
    {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                Arc::new(
                    values
                        .iter()
                        .enumerate()
                        .map(|(column, value)| {
                            value.as_ref().map(|value| f(value, Point::new(row, column)))
                        })
                        .collect(),
                )
            })
            .collect();
        Matrix::from_shared(rows)
    }

    /// Joins the matrix into text.
    ///
    /// Each row is padded to the full column count; holes render as empty
    /// strings.
    pub fn join(&self, column_separator: &str, row_separator: &str) -> String
    where
        T: Display,
    {
        let mut out = String::new();
        for row in 0..self.size.rows {
            if row > 0 {
                out.push_str(row_separator);
            }
            for column in 0..self.size.columns {
                if column > 0 {
                    out.push_str(column_separator);
                }
                if let Some(value) = self.get(Point::new(row, column)) {
                    out.push_str(&value.to_string());
                }
            }
        }
        out
    }

    /// Parses text produced by [`join`](Self::join) back into a matrix.
    pub fn split<F>(text: &str, column_separator: &str, row_separator: &str, mut f: F) -> Self
    where
        F: FnMut(&str) -> T,
    {
        if text.is_empty() {
            return Self::new();
        }
        Self::from_rows(
            text.split(row_separator)
                .map(|line| line.split(column_separator).map(&mut f).collect())
                .collect(),
        )
    }
}

impl<T: Clone> Matrix<T> {
    /// A fully populated `rows` x `columns` matrix of default values.
    pub fn create_empty(rows: usize, columns: usize) -> Self
    where
        T: Default,
    {
        Self::from_rows(vec![vec![T::default(); columns]; rows])
    }

    /// Returns a new matrix with `value` stored at `point`.
    ///
    /// Setting outside the current bounds grows the matrix; intervening
    /// rows and columns become holes.
    pub fn set(&self, point: Point, value: T) -> Self {
        let mut rows: Vec<Row<T>> = self.rows.as_ref().clone();
        if rows.len() <= point.row {
            rows.resize_with(point.row + 1, || Arc::new(Vec::new()));
        }
        let row = Arc::make_mut(&mut rows[point.row]);
        if row.len() <= point.column {
            row.resize(point.column + 1, None);
        }
        row[point.column] = Some(value);
        Self::from_shared(rows)
    }

    /// Returns a new matrix with a hole at `point`.
    ///
    /// Points that are already holes or out of bounds return an identical
    /// (same version) matrix.
    pub fn unset(&self, point: Point) -> Self {
        if self.get(point).is_none() {
            return self.clone();
        }
        let mut rows: Vec<Row<T>> = self.rows.as_ref().clone();
        Arc::make_mut(&mut rows[point.row])[point.column] = None;
        Self::from_shared(rows)
    }

    /// Keeps the entries for which `predicate` holds.
    ///
    /// Rejected entries become holes, and rows left without any surviving
    /// entry are dropped entirely, shifting later rows up.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&T, Point) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter_map(|(row, values)| {
                let kept: Vec<Option<T>> = values
                    .iter()
                    .enumerate()
                    .map(|(column, value)| {
                        value
                            .as_ref()
                            .filter(|value| predicate(value, Point::new(row, column)))
                            .cloned()
                    })
                    .collect();
                kept.iter().any(Option::is_some).then(|| Arc::new(kept))
            })
            .collect();
        Self::from_shared(rows)
    }

    /// Exports the matrix as delimited text with CSV quoting.
    ///
    /// The output is always rectangular: the matrix is laid over an empty
    /// grid of its own size first, so holes become empty fields.
    pub fn to_csv(&self, delimiter: u8) -> SheetResult<String>
    where
        T: Display,
    {
        let Size { rows, columns } = self.size;
        let normalized = self
            .iter()
            .fold(Matrix::<String>::create_empty(rows, columns), |acc, (point, value)| {
                acc.set(point, value.to_string())
            });

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(Vec::new());
        for row in normalized.rows.iter() {
            writer.write_record(row.iter().map(|value| value.as_deref().unwrap_or_default()))?;
        }
        let bytes = writer.into_inner().map_err(|err| err.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn walk(from: usize, to: usize, inclusive: bool) -> Vec<usize> {
    if from <= to {
        let end = if inclusive { to + 1 } else { to };
        (from..end).collect()
    } else {
        let stop = if inclusive { to } else { to + 1 };
        (stop..=from).rev().collect()
    }
}

fn walk_range(from: Point, to: Point, inclusive: bool) -> Vec<Point> {
    let columns = walk(from.column, to.column, inclusive);
    walk(from.row, to.row, inclusive)
        .into_iter()
        .flat_map(|row| columns.iter().map(move |&column| Point::new(row, column)))
        .collect()
}

/// Points of the rectangle spanned by `from` and `to`, excluding the row and
/// column of `to`.
///
/// Enumeration starts at `from` and walks toward `to`, row-major, so either
/// corner may come first.
pub fn range(from: Point, to: Point) -> Vec<Point> {
    walk_range(from, to, false)
}

/// Like [`range`] but including the row and column of `to`.
pub fn inclusive_range(from: Point, to: Point) -> Vec<Point> {
    walk_range(from, to, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Matrix<&'static str> {
        Matrix::from_rows(vec![vec!["a", "b"], vec!["c", "d"]])
    }

    #[test]
    fn test_get_after_set() {
        let matrix = grid();
        let updated = matrix.set(Point::new(0, 1), "z");
        assert_eq!(updated.get(Point::new(0, 1)), Some(&"z"));
        // Receiver untouched
        assert_eq!(matrix.get(Point::new(0, 1)), Some(&"b"));
        assert!(!updated.ptr_eq(&matrix));
    }

    #[test]
    fn test_set_grows_with_holes() {
        let matrix = grid().set(Point::new(3, 4), "x");
        assert_eq!(matrix.size(), Size::new(4, 5));
        assert_eq!(matrix.get(Point::new(2, 0)), None);
        assert_eq!(matrix.get(Point::new(3, 3)), None);
        assert!(matrix.has(Point::new(2, 0)));
        assert!(!matrix.has(Point::new(4, 0)));
    }

    #[test]
    fn test_set_shares_untouched_rows() {
        let matrix = grid();
        let updated = matrix.set(Point::new(0, 0), "q");
        assert!(Arc::ptr_eq(&matrix.rows[1], &updated.rows[1]));
        assert!(!Arc::ptr_eq(&matrix.rows[0], &updated.rows[0]));
    }

    #[test]
    fn test_filter_drops_empty_rows() {
        let matrix = grid();
        assert_eq!(matrix.filter(|_, _| false).size(), Size::default());

        let kept = matrix.filter(|value, _| *value == "c");
        assert_eq!(kept.size(), Size::new(1, 1));
        assert_eq!(kept.get(Point::new(0, 0)), Some(&"c"));
    }

    #[test]
    fn test_filter_keeps_positions_within_row() {
        let kept = grid().filter(|_, point| point.column == 1);
        assert_eq!(kept.get(Point::new(0, 0)), None);
        assert_eq!(kept.get(Point::new(1, 1)), Some(&"d"));
    }

    #[test]
    fn test_map_preserves_holes() {
        let matrix: Matrix<i32> = Matrix::new().set(Point::new(1, 1), 2);
        let doubled = matrix.map(|value, _| value * 2);
        assert_eq!(doubled.get(Point::new(1, 1)), Some(&4));
        assert_eq!(doubled.get(Point::new(0, 0)), None);
        assert_eq!(doubled.size(), matrix.size());
    }

    #[test]
    fn test_unset() {
        let matrix = grid();
        let updated = matrix.unset(Point::new(1, 1));
        assert_eq!(updated.get(Point::new(1, 1)), None);
        assert_eq!(updated.size(), Size::new(2, 2));
        assert!(matrix.unset(Point::new(9, 9)).ptr_eq(&matrix));
    }

    #[test]
    fn test_join_and_split() {
        let matrix = grid();
        let text = matrix.join("\t", "\n");
        assert_eq!(text, "a\tb\nc\td");

        let parsed = Matrix::split(&text, "\t", "\n", str::to_string);
        assert_eq!(parsed.get(Point::new(1, 0)).map(String::as_str), Some("c"));
        assert_eq!(parsed.size(), Size::new(2, 2));
        assert!(Matrix::split("", "\t", "\n", str::to_string).is_empty());
    }

    #[test]
    fn test_join_pads_holes() {
        let matrix: Matrix<i32> = Matrix::new().set(Point::new(1, 1), 5);
        assert_eq!(matrix.join(", ", "\n"), ", \n, 5");
    }

    #[test]
    fn test_create_empty_is_dense() {
        let matrix: Matrix<String> = Matrix::create_empty(2, 3);
        assert_eq!(matrix.size(), Size::new(2, 3));
        assert_eq!(matrix.iter().count(), 6);
    }

    #[test]
    fn test_to_csv_quotes_and_pads() {
        let matrix: Matrix<String> = Matrix::new()
            .set(Point::new(0, 0), "a,b".to_string())
            .set(Point::new(1, 1), "c".to_string());
        let csv = matrix.to_csv(b',').unwrap();
        assert_eq!(csv, "\"a,b\",\n,c\n");
    }

    #[test]
    fn test_range_is_direction_aware() {
        assert_eq!(
            range(Point::new(0, 0), Point::new(2, 2)),
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(1, 0),
                Point::new(1, 1)
            ]
        );
        assert_eq!(
            range(Point::new(1, 1), Point::new(0, 0)),
            vec![Point::new(1, 1)]
        );
        assert_eq!(
            inclusive_range(Point::new(1, 0), Point::new(0, 0)),
            vec![Point::new(1, 0), Point::new(0, 0)]
        );
    }
}
