//! Widget state and state patches.
//!
//! [`StoreState`] is the whole UI state of one mounted spreadsheet. It is
//! replaced, never mutated: reducers return a [`StatePatch`] which is
//! shallow-merged into a copy of the previous state. All container fields
//! are copy-on-write, so an untouched field keeps its identity across
//! transitions and observers can compare fields by reference.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::SpreadsheetConfig;
use crate::model::{Cell, Matrix, Point, PointMap, PointRange, Size};

/// Interaction mode of the active cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    View,
    Edit,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::View => "view",
            Mode::Edit => "edit",
        })
    }
}

/// Measured geometry of a row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowDimensions {
    pub top: f32,
    pub height: f32,
}

/// Measured geometry of a column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnDimensions {
    pub left: f32,
    pub width: f32,
}

/// Pixel rectangle of a cell or a range of cells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellDimensions {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

/// One cell's value transition.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    /// The cell before the change, `None` if it was a hole.
    pub prev_cell: Option<Cell>,
    pub next_cell: Cell,
}

/// What the host receives for each commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitEvent {
    pub changes: Vec<CommitRecord>,
    /// Cells bound to the changed cells, as reported by the binding resolver.
    pub bindings: Vec<Point>,
}

/// The most recent commit. Shared so identity survives state copies.
pub type Commit = Arc<Vec<CommitRecord>>;

type DimensionCache<D> = Arc<BTreeMap<usize, D>>;

/// The complete UI state of a spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub data: Matrix<Cell>,
    pub active: Option<Point>,
    pub selected: Option<PointRange>,
    pub mode: Mode,
    /// Cells captured by the last copy or cut, at their source positions.
    pub copied: PointMap<Cell>,
    pub cut: bool,
    pub has_pasted: bool,
    pub dragging: bool,
    pub last_commit: Option<Commit>,
    pub row_dimensions: DimensionCache<RowDimensions>,
    pub column_dimensions: DimensionCache<ColumnDimensions>,
    /// For each edited cell, the cells its formula depends on.
    pub bindings: PointMap<Vec<Point>>,
}

impl StoreState {
    /// Initial state for host-supplied data.
    pub fn new(data: Matrix<Cell>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Shallow-merges `patch` into a copy of this state.
    pub fn apply(&self, patch: StatePatch) -> Self {
        let mut next = self.clone();
        if let Some(data) = patch.data {
            next.data = data;
        }
        if let Some(active) = patch.active {
            next.active = active;
        }
        if let Some(selected) = patch.selected {
            next.selected = selected;
        }
        if let Some(mode) = patch.mode {
            next.mode = mode;
        }
        if let Some(copied) = patch.copied {
            next.copied = copied;
        }
        if let Some(cut) = patch.cut {
            next.cut = cut;
        }
        if let Some(has_pasted) = patch.has_pasted {
            next.has_pasted = has_pasted;
        }
        if let Some(dragging) = patch.dragging {
            next.dragging = dragging;
        }
        if let Some(last_commit) = patch.last_commit {
            next.last_commit = last_commit;
        }
        if let Some(rows) = patch.row_dimensions {
            next.row_dimensions = rows;
        }
        if let Some(columns) = patch.column_dimensions {
            next.column_dimensions = columns;
        }
        if let Some(bindings) = patch.bindings {
            next.bindings = bindings;
        }
        next
    }

    pub fn size(&self) -> Size {
        self.data.size()
    }

    /// The cell under the active point.
    pub fn active_cell(&self) -> Option<&Cell> {
        self.data.get(self.active?)
    }

    pub fn is_active_read_only(&self) -> bool {
        self.active_cell().is_some_and(|cell| cell.read_only)
    }

    /// Selected points in row-major order.
    pub fn selected_points(&self) -> Vec<Point> {
        self.selected
            .map(|range| range.points().collect())
            .unwrap_or_default()
    }

    /// Top and height of `row`, falling back to the configured default
    /// height for rows that were never measured.
    pub fn row_geometry(&self, row: usize, config: &SpreadsheetConfig) -> RowDimensions {
        if let Some(measured) = self.row_dimensions.get(&row) {
            return *measured;
        }
        let default = config.default_row_height;
        let top = match self.row_dimensions.range(..row).next_back() {
            Some((&above, dims)) => dims.top + dims.height + (row - above - 1) as f32 * default,
            None => row as f32 * default,
        };
        RowDimensions {
            top,
            height: default,
        }
    }

    /// Left and width of `column`, with the same fallback as
    /// [`row_geometry`](Self::row_geometry).
    pub fn column_geometry(&self, column: usize, config: &SpreadsheetConfig) -> ColumnDimensions {
        if let Some(measured) = self.column_dimensions.get(&column) {
            return *measured;
        }
        let default = config.default_column_width;
        let left = match self.column_dimensions.range(..column).next_back() {
            Some((&before, dims)) => {
                dims.left + dims.width + (column - before - 1) as f32 * default
            }
            None => column as f32 * default,
        };
        ColumnDimensions {
            left,
            width: default,
        }
    }

    /// The pixel rectangle covered by `range`.
    pub fn range_dimensions(&self, range: &PointRange, config: &SpreadsheetConfig) -> CellDimensions {
        let (start, end) = (range.start(), range.end());
        let first_row = self.row_geometry(start.row, config);
        let last_row = self.row_geometry(end.row, config);
        let first_column = self.column_geometry(start.column, config);
        let last_column = self.column_geometry(end.column, config);
        CellDimensions {
            top: first_row.top,
            left: first_column.left,
            height: last_row.top + last_row.height - first_row.top,
            width: last_column.left + last_column.width - first_column.left,
        }
    }
}

/// A partial state. `None` fields are left as they are.
///
/// Nullable fields use a nested `Option`: `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub data: Option<Matrix<Cell>>,
    pub active: Option<Option<Point>>,
    pub selected: Option<Option<PointRange>>,
    pub mode: Option<Mode>,
    pub copied: Option<PointMap<Cell>>,
    pub cut: Option<bool>,
    pub has_pasted: Option<bool>,
    pub dragging: Option<bool>,
    pub last_commit: Option<Option<Commit>>,
    pub row_dimensions: Option<DimensionCache<RowDimensions>>,
    pub column_dimensions: Option<DimensionCache<ColumnDimensions>>,
    pub bindings: Option<PointMap<Vec<Point>>>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: Matrix<Cell>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn active(mut self, active: Option<Point>) -> Self {
        self.active = Some(active);
        self
    }

    pub fn selected(mut self, selected: Option<PointRange>) -> Self {
        self.selected = Some(selected);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn copied(mut self, copied: PointMap<Cell>) -> Self {
        self.copied = Some(copied);
        self
    }

    pub fn cut(mut self, cut: bool) -> Self {
        self.cut = Some(cut);
        self
    }

    pub fn has_pasted(mut self, has_pasted: bool) -> Self {
        self.has_pasted = Some(has_pasted);
        self
    }

    pub fn dragging(mut self, dragging: bool) -> Self {
        self.dragging = Some(dragging);
        self
    }

    /// Records a commit. An empty change list is ignored.
    pub fn commit(mut self, changes: Vec<CommitRecord>) -> Self {
        if !changes.is_empty() {
            self.last_commit = Some(Some(Arc::new(changes)));
        }
        self
    }

    pub fn row_dimensions(mut self, rows: DimensionCache<RowDimensions>) -> Self {
        self.row_dimensions = Some(rows);
        self
    }

    pub fn column_dimensions(mut self, columns: DimensionCache<ColumnDimensions>) -> Self {
        self.column_dimensions = Some(columns);
        self
    }

    pub fn bindings(mut self, bindings: PointMap<Vec<Point>>) -> Self {
        self.bindings = Some(bindings);
        self
    }
}

static_assertions::assert_impl_all!(StoreState: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_is_shallow_merge() {
        let state = StoreState::new(Matrix::from_rows(vec![vec![Cell::new("a")]]));
        let next = state.apply(StatePatch::new().active(Some(Point::ORIGIN)).mode(Mode::Edit));

        assert_eq!(next.active, Some(Point::ORIGIN));
        assert_eq!(next.mode, Mode::Edit);
        assert!(next.data.ptr_eq(&state.data));
        assert!(next.bindings.ptr_eq(&state.bindings));
        assert_eq!(state.active, None);
    }

    #[test]
    fn test_nested_option_clears() {
        let state = StoreState {
            active: Some(Point::ORIGIN),
            ..StoreState::default()
        };
        assert_eq!(state.apply(StatePatch::new()).active, Some(Point::ORIGIN));
        assert_eq!(state.apply(StatePatch::new().active(None)).active, None);
    }

    #[test]
    fn test_empty_commit_ignored() {
        assert!(StatePatch::new().commit(Vec::new()).last_commit.is_none());
        let patch = StatePatch::new().commit(vec![CommitRecord {
            prev_cell: None,
            next_cell: Cell::new("x"),
        }]);
        assert!(matches!(patch.last_commit, Some(Some(ref c)) if c.len() == 1));
    }

    #[test]
    fn test_range_dimensions_with_defaults() {
        let config = SpreadsheetConfig::default().with_default_dimensions(10.0, 50.0);
        let state = StoreState::default();
        let dims = state.range_dimensions(
            &PointRange::new(Point::new(1, 1), Point::new(2, 3)),
            &config,
        );
        assert_eq!(
            dims,
            CellDimensions {
                top: 10.0,
                left: 50.0,
                width: 150.0,
                height: 20.0
            }
        );
    }

    #[test]
    fn test_row_geometry_uses_measured_rows() {
        let config = SpreadsheetConfig::default().with_default_dimensions(10.0, 50.0);
        let mut rows = BTreeMap::new();
        rows.insert(1, RowDimensions { top: 10.0, height: 40.0 });
        let state = StoreState {
            row_dimensions: Arc::new(rows),
            ..StoreState::default()
        };
        assert_eq!(state.row_geometry(1, &config).height, 40.0);
        assert_eq!(state.row_geometry(3, &config).top, 60.0);
        assert_eq!(state.row_geometry(0, &config).top, 0.0);
    }

    #[test]
    fn test_active_cell_read_only() {
        let data = Matrix::from_rows(vec![vec![Cell::new("x").with_read_only(true)]]);
        let mut state = StoreState::new(data);
        assert!(!state.is_active_read_only());
        state.active = Some(Point::ORIGIN);
        assert!(state.is_active_read_only());
        assert_eq!(state.selected_points(), Vec::<Point>::new());
    }
}
