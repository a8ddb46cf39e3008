//! Immutable grid data structures.
//!
//! - [`Point`] and [`PointRange`]: coordinates and inclusive rectangles
//! - [`Matrix`]: copy-on-write, sparse-capable 2-D storage
//! - [`PointSet`] and [`PointMap`]: selection sets and per-point mappings
//! - [`Cell`]: the record stored in the grid

mod cell;
mod matrix;
mod point;
mod point_map;
mod point_range;
mod point_set;

pub use cell::{Cell, CellContext, CellValue, DataEditor, DataViewer, TextEditor};
pub use matrix::{Matrix, Size, inclusive_range, range};
pub use point::{Axis, Point};
pub use point_map::PointMap;
pub use point_range::PointRange;
pub use point_set::{Edges, PointSet};
