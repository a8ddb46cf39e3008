//! The navigation and editing state machine.
//!
//! [`reduce`] maps the current state and one [`Action`] to a [`StatePatch`],
//! or `None` when the action does not change anything. It never touches the
//! clipboard or the host; those side effects live in the controller.

use std::sync::Arc;

use horizon_sheet_core::logging::targets;

use crate::clipboard::pipeline;
use crate::commit::BindingResolver;
use crate::config::SpreadsheetConfig;
use crate::model::{Axis, Cell, CellValue, Matrix, Point, PointRange, PointSet};
use crate::state::{
    CellDimensions, ColumnDimensions, CommitRecord, Mode, RowDimensions, StatePatch, StoreState,
};

use super::actions::Action;
use super::keyboard::{Key, KeyEvent};

/// Collaborators the reducer may consult.
#[derive(Clone, Copy)]
pub struct ReduceContext<'a> {
    pub config: &'a SpreadsheetConfig,
    pub bindings: Option<&'a dyn BindingResolver>,
}

impl<'a> ReduceContext<'a> {
    pub fn new(config: &'a SpreadsheetConfig) -> Self {
        Self {
            config,
            bindings: None,
        }
    }

    pub fn with_bindings(mut self, bindings: Option<&'a dyn BindingResolver>) -> Self {
        self.bindings = bindings;
        self
    }
}

/// Computes the patch for one action.
pub fn reduce(state: &StoreState, action: &Action, ctx: &ReduceContext<'_>) -> Option<StatePatch> {
    match action {
        Action::SetData(data) => set_data(state, data.clone()),
        Action::Activate(point) => activate(state, *point),
        Action::Select(point) => select(state, *point),
        Action::SetCellData { point, cell } => set_cell_data(state, *point, cell, ctx),
        Action::SetCellDimensions { point, dimensions } => {
            set_cell_dimensions(state, *point, *dimensions)
        }
        Action::DragStart => (!state.dragging).then(|| StatePatch::new().dragging(true)),
        Action::DragEnd => state.dragging.then(|| StatePatch::new().dragging(false)),
        Action::Edit => edit(state),
        Action::View => (state.mode == Mode::Edit).then(|| StatePatch::new().mode(Mode::View)),
        Action::Clear => clear(state),
        Action::Blur => blur(state),
        Action::KeyDown(event) => key_down(state, *event),
        Action::Copy => pipeline::copy_patch(state, false),
        Action::Cut => pipeline::copy_patch(state, true),
        Action::Paste(text) => pipeline::paste_patch(state, text, ctx.config),
    }
}

fn set_data(state: &StoreState, data: Matrix<Cell>) -> Option<StatePatch> {
    let size = data.size();
    let active = state.active.filter(|point| size.contains(*point));
    let selected = state.selected.and_then(|range| range.clamp_to(size));
    let mut patch = StatePatch::new().data(data).active(active).selected(selected);
    if active.is_none() && state.mode == Mode::Edit {
        patch = patch.mode(Mode::View);
    }
    Some(patch)
}

fn activate(state: &StoreState, point: Point) -> Option<StatePatch> {
    if !state.data.has(point) {
        return None;
    }
    if state.active == Some(point) {
        if state.mode == Mode::View && !state.is_active_read_only() {
            return Some(StatePatch::new().mode(Mode::Edit));
        }
        return None;
    }
    Some(
        StatePatch::new()
            .active(Some(point))
            .selected(Some(PointRange::single(point)))
            .mode(Mode::View),
    )
}

fn select(state: &StoreState, point: Point) -> Option<StatePatch> {
    let active = state.active?;
    if !state.data.has(point) {
        return None;
    }
    let range = PointRange::new(active, point);
    if state.selected == Some(range) && state.mode == Mode::View {
        return None;
    }
    Some(StatePatch::new().selected(Some(range)).mode(Mode::View))
}

fn set_cell_data(
    state: &StoreState,
    point: Point,
    cell: &Cell,
    ctx: &ReduceContext<'_>,
) -> Option<StatePatch> {
    if !state.data.has(point) {
        return None;
    }
    if state.data.get(point).is_some_and(|existing| existing.read_only) {
        tracing::debug!(target: targets::NAVIGATION, %point, "ignoring edit of read-only cell");
        return None;
    }
    let data = state.data.set(point, cell.clone());
    let mut patch = StatePatch::new().mode(Mode::Edit);
    if let Some(resolver) = ctx.bindings {
        let bindings = resolver.bindings_for_cell(cell, &data);
        patch = patch.bindings(state.bindings.set(point, bindings));
    }
    if state.active != Some(point) {
        patch = patch
            .active(Some(point))
            .selected(Some(PointRange::single(point)));
    }
    Some(patch.data(data))
}

fn set_cell_dimensions(
    state: &StoreState,
    point: Point,
    dimensions: CellDimensions,
) -> Option<StatePatch> {
    let row = RowDimensions {
        top: dimensions.top,
        height: dimensions.height,
    };
    let column = ColumnDimensions {
        left: dimensions.left,
        width: dimensions.width,
    };
    let row_changed = state.row_dimensions.get(&point.row) != Some(&row);
    let column_changed = state.column_dimensions.get(&point.column) != Some(&column);
    if !row_changed && !column_changed {
        return None;
    }

    let mut patch = StatePatch::new();
    if row_changed {
        let mut rows = Arc::clone(&state.row_dimensions);
        Arc::make_mut(&mut rows).insert(point.row, row);
        patch = patch.row_dimensions(rows);
    }
    if column_changed {
        let mut columns = Arc::clone(&state.column_dimensions);
        Arc::make_mut(&mut columns).insert(point.column, column);
        patch = patch.column_dimensions(columns);
    }
    Some(patch)
}

fn edit(state: &StoreState) -> Option<StatePatch> {
    let missing = state.active.is_none_or(|point| !state.data.has(point));
    if state.mode == Mode::Edit || missing || state.is_active_read_only() {
        return None;
    }
    Some(StatePatch::new().mode(Mode::Edit))
}

fn blur(state: &StoreState) -> Option<StatePatch> {
    if state.active.is_none() && state.selected.is_none() && state.mode == Mode::View {
        return None;
    }
    Some(
        StatePatch::new()
            .active(None)
            .selected(None)
            .mode(Mode::View),
    )
}

/// Clears the value of every writable selected cell.
fn clear(state: &StoreState) -> Option<StatePatch> {
    if state.mode == Mode::Edit {
        return None;
    }
    let range = state.selected?;
    let (data, changes) = range.points().fold(
        (state.data.clone(), Vec::new()),
        |(data, mut changes), point| {
            let Some(cell) = data
                .get(point)
                .filter(|cell| !cell.read_only && !cell.value.is_null())
            else {
                return (data, changes);
            };
            let cleared = cell.clone().with_value(CellValue::Null);
            changes.push(CommitRecord {
                prev_cell: Some(cell.clone()),
                next_cell: cleared.clone(),
            });
            let next = data.set(point, cleared);
            (next, changes)
        },
    );
    if changes.is_empty() {
        return None;
    }
    tracing::debug!(target: targets::NAVIGATION, cleared = changes.len(), "selection cleared");
    Some(StatePatch::new().data(data).commit(changes))
}

fn key_down(state: &StoreState, event: KeyEvent) -> Option<StatePatch> {
    let active = state.active?;
    match state.mode {
        Mode::View => view_key_down(state, active, event),
        Mode::Edit => edit_key_down(state, active, event),
    }
}

fn view_key_down(state: &StoreState, active: Point, event: KeyEvent) -> Option<StatePatch> {
    let shift = event.modifiers.shift;
    match event.key {
        key if key.is_arrow() && shift => modify_edge(state, active, key),
        key if key.is_arrow() => {
            let (rows, columns) = key.arrow_delta()?;
            go(state, active, rows, columns)
        }
        Key::Tab if shift => go(state, active, 0, -1),
        Key::Tab => go(state, active, 0, 1),
        Key::Enter => edit(state),
        Key::Backspace | Key::Delete => clear(state),
        Key::Character(_) if !event.modifiers.is_shortcut() => edit(state),
        _ => None,
    }
}

fn edit_key_down(state: &StoreState, active: Point, event: KeyEvent) -> Option<StatePatch> {
    match event.key {
        Key::Escape => Some(StatePatch::new().mode(Mode::View)),
        Key::Tab if event.modifiers.shift => go(state, active, 0, -1),
        Key::Tab => go(state, active, 0, 1),
        Key::Enter => go(state, active, 1, 0),
        // Everything else belongs to the editor.
        _ => None,
    }
}

/// Moves the active point.
///
/// A target outside the data keeps the active point where it is, collapses
/// the selection onto it and returns to view mode.
fn go(state: &StoreState, active: Point, rows: isize, columns: isize) -> Option<StatePatch> {
    let target = active
        .offset(rows, columns)
        .filter(|point| state.data.has(*point));
    let Some(target) = target else {
        tracing::trace!(target: targets::NAVIGATION, %active, rows, columns, "navigation clamped");
        if state.selected == Some(PointRange::single(active)) && state.mode == Mode::View {
            return None;
        }
        return Some(
            StatePatch::new()
                .selected(Some(PointRange::single(active)))
                .mode(Mode::View),
        );
    };
    tracing::trace!(target: targets::NAVIGATION, from = %active, to = %target, "navigated");
    Some(
        StatePatch::new()
            .active(Some(target))
            .selected(Some(PointRange::single(target)))
            .mode(Mode::View),
    )
}

/// Extends or shrinks the selection with Shift+arrow.
///
/// If the cell one step behind the active point (against the arrow) is
/// selected, the far edge on that side moves toward the active point;
/// otherwise the edge facing the arrow grows outward.
fn modify_edge(state: &StoreState, active: Point, key: Key) -> Option<StatePatch> {
    let (rows, columns) = key.arrow_delta()?;
    let (axis, delta) = if rows != 0 {
        (Axis::Row, rows)
    } else {
        (Axis::Column, columns)
    };
    let size = state.size();
    let current = state.selected.unwrap_or_else(|| PointRange::single(active));
    let set = PointSet::from_range(&current);

    let behind = active.step(axis, -delta).filter(|point| set.has(*point));
    let next = match behind {
        Some(_) => set.shrink_edge(axis, -delta),
        None => set.extend_edge(axis, delta, size),
    };
    let next = next.within(size).bounding_range()?;
    if Some(next) == state.selected {
        return None;
    }
    Some(StatePatch::new().selected(Some(next)))
}
