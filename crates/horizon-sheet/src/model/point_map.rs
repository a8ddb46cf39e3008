//! Mappings from points to values.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::matrix::Matrix;
use super::point::Point;
use super::point_set::PointSet;

/// An immutable mapping from [`Point`] to `V`.
///
/// Clones share storage; [`set`](Self::set) and [`unset`](Self::unset) copy
/// on write and return a new map.
#[derive(Debug, PartialEq)]
pub struct PointMap<V> {
    entries: Arc<BTreeMap<Point, V>>,
}

impl<V> Clone for PointMap<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for PointMap<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(BTreeMap::new()),
        }
    }
}

impl<V> PointMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, point: Point) -> Option<&V> {
        self.entries.get(&point)
    }

    pub fn has(&self, point: Point) -> bool {
        self.entries.contains_key(&point)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The keys as a point set.
    pub fn keys(&self) -> PointSet {
        self.entries.keys().copied().collect()
    }

    /// Entries in row-major key order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &V)> + '_ {
        self.entries.iter().map(|(point, value)| (*point, value))
    }

    /// Folds over the entries in row-major key order.
    pub fn reduce<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &V, Point) -> A,
    {
        self.iter().fold(init, |acc, (point, value)| f(acc, value, point))
    }

    pub fn map<U, F>(&self, mut f: F) -> PointMap<U>
    where
        F: FnMut(&V, Point) -> U,
    {
        self.iter().map(|(point, value)| (point, f(value, point))).collect()
    }

    /// Whether two maps are the same version (reference identity).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<V: Clone> PointMap<V> {
    /// Builds a map from every populated entry of a matrix.
    pub fn from_matrix(matrix: &Matrix<V>) -> Self {
        matrix.iter().map(|(point, value)| (point, value.clone())).collect()
    }

    /// Returns a map with `value` stored under `point`.
    pub fn set(&self, point: Point, value: V) -> Self {
        let mut entries = Arc::clone(&self.entries);
        Arc::make_mut(&mut entries).insert(point, value);
        Self { entries }
    }

    /// Returns a map without `point`. Missing keys return the same version.
    pub fn unset(&self, point: Point) -> Self {
        if !self.has(point) {
            return self.clone();
        }
        let mut entries = Arc::clone(&self.entries);
        Arc::make_mut(&mut entries).remove(&point);
        Self { entries }
    }

    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, Point) -> bool,
    {
        self.iter()
            .filter(|(point, value)| predicate(value, *point))
            .map(|(point, value)| (point, value.clone()))
            .collect()
    }
}

impl<V> FromIterator<(Point, V)> for PointMap<V> {
    fn from_iter<I: IntoIterator<Item = (Point, V)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}
