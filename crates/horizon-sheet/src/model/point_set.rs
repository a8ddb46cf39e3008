//! Sets of points and the edge algebra used for range selection.

use std::collections::BTreeSet;

use super::matrix::{Matrix, Size};
use super::point::{Axis, Point};
use super::point_range::PointRange;

/// Which edges of a point set's bounding rectangle a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Edges {
    /// Whether the point lies on any edge.
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// A collection of unique points.
///
/// Every operation returns a new set; the receiver is never modified.
/// Iteration is row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PointSet {
    points: BTreeSet<Point>,
}

impl PointSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// All points of an inclusive range.
    pub fn from_range(range: &PointRange) -> Self {
        range.points().collect()
    }

    /// Whether `point` is a member.
    #[inline]
    pub fn has(&self, point: Point) -> bool {
        self.points.contains(&point)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns a set that also contains `point`.
    pub fn add(&self, point: Point) -> Self {
        let mut points = self.points.clone();
        points.insert(point);
        Self { points }
    }

    /// Returns a set without `point`.
    pub fn remove(&self, point: Point) -> Self {
        let mut points = self.points.clone();
        points.remove(&point);
        Self { points }
    }

    /// Keeps the points matching `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(Point) -> bool,
    {
        self.iter().filter(|point| predicate(*point)).collect()
    }

    /// Folds over the points in row-major order.
    pub fn reduce<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, Point) -> A,
    {
        self.iter().fold(init, f)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.iter().collect()
    }

    /// Keeps only the points inside a grid of `size`.
    pub fn within(&self, size: Size) -> Self {
        self.filter(|point| size.contains(point))
    }

    /// The smallest (`delta < 0`) or largest (`delta > 0`) coordinate present
    /// along `axis`.
    pub fn edge_value(&self, axis: Axis, delta: isize) -> Option<usize> {
        let values = self.iter().map(|point| point.get(axis));
        if delta < 0 { values.min() } else { values.max() }
    }

    /// The top-left corner of the bounding rectangle.
    pub fn min(&self) -> Option<Point> {
        Some(Point::new(
            self.edge_value(Axis::Row, -1)?,
            self.edge_value(Axis::Column, -1)?,
        ))
    }

    /// The bottom-right corner of the bounding rectangle.
    pub fn max(&self) -> Option<Point> {
        Some(Point::new(
            self.edge_value(Axis::Row, 1)?,
            self.edge_value(Axis::Column, 1)?,
        ))
    }

    /// The bounding rectangle of the set.
    pub fn bounding_range(&self) -> Option<PointRange> {
        PointRange::bounding(self.iter())
    }

    /// Which bounding-rectangle edges `point` lies on. Empty sets have no
    /// edges.
    pub fn on_edge(&self, point: Point) -> Edges {
        let (Some(min), Some(max)) = (self.min(), self.max()) else {
            return Edges::default();
        };
        Edges {
            top: point.row == min.row,
            bottom: point.row == max.row,
            left: point.column == min.column,
            right: point.column == max.column,
        }
    }

    /// Grows the set by one line along `axis`.
    ///
    /// Every point on the edge facing `delta` is copied one step further in
    /// that direction. Points that would leave `bounds` (or go negative) are
    /// dropped silently.
    pub fn extend_edge(&self, axis: Axis, delta: isize, bounds: Size) -> Self {
        let Some(edge) = self.edge_value(axis, delta) else {
            return self.clone();
        };
        let grown = self
            .iter()
            .filter(|point| point.get(axis) == edge)
            .filter_map(|point| point.step(axis, delta.signum()))
            .filter(|point| bounds.contains(*point));
        Self {
            points: self.points.iter().copied().chain(grown).collect(),
        }
    }

    /// Removes the line of points on the edge facing `delta` along `axis`.
    ///
    /// A set that is a single line thick along `axis` is left unchanged, so
    /// a selection can never be shrunk to nothing.
    pub fn shrink_edge(&self, axis: Axis, delta: isize) -> Self {
        let (Some(low), Some(high)) = (self.edge_value(axis, -1), self.edge_value(axis, 1)) else {
            return self.clone();
        };
        if low == high {
            return self.clone();
        }
        let edge = if delta < 0 { low } else { high };
        self.filter(|point| point.get(axis) != edge)
    }

    /// Builds the sub-matrix of `data` covered by the set's bounding
    /// rectangle, positioned relative to [`min`](Self::min).
    ///
    /// Members that are holes in `data`, and non-members inside the
    /// rectangle, are holes in the result.
    pub fn to_matrix<T: Clone>(&self, data: &Matrix<T>) -> Matrix<T> {
        let Some(origin) = self.min() else {
            return Matrix::new();
        };
        self.reduce(Matrix::new(), |acc, point| match data.get(point) {
            Some(value) => acc.set(
                Point::new(point.row - origin.row, point.column - origin.column),
                value.clone(),
            ),
            None => acc,
        })
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl From<&PointRange> for PointSet {
    fn from(range: &PointRange) -> Self {
        Self::from_range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(a: (usize, usize), b: (usize, usize)) -> PointSet {
        PointSet::from_range(&PointRange::new(a.into(), b.into()))
    }

    #[test]
    fn test_no_duplicates() {
        let set: PointSet = [Point::new(0, 0), Point::new(0, 0), Point::new(1, 0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.has(Point::new(1, 0)));
        assert_eq!(set.add(Point::new(1, 0)).len(), 2);
    }

    #[test]
    fn test_add_remove_are_persistent() {
        let set = PointSet::new().add(Point::new(2, 2));
        let removed = set.remove(Point::new(2, 2));
        assert!(set.has(Point::new(2, 2)));
        assert!(removed.is_empty());
    }

    #[test]
    fn test_edge_values() {
        let set = square((1, 2), (3, 5));
        assert_eq!(set.edge_value(Axis::Row, -1), Some(1));
        assert_eq!(set.edge_value(Axis::Row, 1), Some(3));
        assert_eq!(set.edge_value(Axis::Column, -1), Some(2));
        assert_eq!(set.edge_value(Axis::Column, 1), Some(5));
        assert_eq!(set.min(), Some(Point::new(1, 2)));
        assert_eq!(set.max(), Some(Point::new(3, 5)));
        assert_eq!(PointSet::new().min(), None);
    }

    #[test]
    fn test_on_edge() {
        let set = square((0, 0), (2, 2));
        let corner = set.on_edge(Point::new(0, 2));
        assert!(corner.top && corner.right);
        assert!(!corner.bottom && !corner.left);
        assert!(!set.on_edge(Point::new(1, 1)).any());
    }

    #[test]
    fn test_extend_edge_clamps_to_bounds() {
        let bounds = Size::new(3, 3);
        let set = square((0, 0), (0, 1));

        let grown = set.extend_edge(Axis::Row, 1, bounds);
        assert_eq!(grown, square((0, 0), (1, 1)));

        // Negative coordinates are dropped
        assert_eq!(set.extend_edge(Axis::Row, -1, bounds), set);

        // Past the last column is dropped
        let right = square((0, 2), (0, 2));
        assert_eq!(right.extend_edge(Axis::Column, 1, bounds), right);
    }

    #[test]
    fn test_shrink_reverts_extend() {
        let bounds = Size::new(10, 10);
        let set = square((2, 2), (4, 3));
        for axis in [Axis::Row, Axis::Column] {
            for delta in [-1, 1] {
                let round_trip = set.extend_edge(axis, delta, bounds).shrink_edge(axis, delta);
                assert_eq!(round_trip, set, "axis {axis:?} delta {delta}");
            }
        }
    }

    #[test]
    fn test_shrink_keeps_single_line() {
        let line = square((1, 0), (1, 4));
        assert_eq!(line.shrink_edge(Axis::Row, 1), line);
        assert_eq!(line.shrink_edge(Axis::Column, -1), square((1, 1), (1, 4)));
    }

    #[test]
    fn test_to_matrix_is_relative() {
        let data = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let set = square((0, 1), (1, 2));
        let sub = set.to_matrix(&data);
        assert_eq!(sub.size(), Size::new(2, 2));
        assert_eq!(sub.get(Point::new(0, 0)), Some(&2));
        assert_eq!(sub.get(Point::new(1, 1)), Some(&6));
    }

    #[test]
    fn test_reduce_and_filter() {
        let set = square((0, 0), (1, 1));
        let sum = set.reduce(0, |acc, point| acc + point.row + point.column);
        assert_eq!(sum, 4);
        assert_eq!(set.filter(|point| point.row == 0).len(), 2);
        assert_eq!(set.within(Size::new(1, 1)).to_vec(), vec![Point::ORIGIN]);
    }
}
