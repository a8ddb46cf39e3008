//! Events understood by the reducer.

use crate::model::{Cell, Matrix, Point};
use crate::state::CellDimensions;

use super::keyboard::KeyEvent;

/// A discrete UI event.
#[derive(Debug, Clone)]
pub enum Action {
    /// The host replaced the data.
    SetData(Matrix<Cell>),
    /// Pointer click on a cell.
    Activate(Point),
    /// Shift-click or drag over a cell: select from the active point.
    Select(Point),
    /// The editor changed the cell at `point`.
    SetCellData { point: Point, cell: Cell },
    /// The view measured a cell.
    SetCellDimensions {
        point: Point,
        dimensions: CellDimensions,
    },
    DragStart,
    DragEnd,
    /// Enter edit mode on the active cell.
    Edit,
    /// Leave edit mode.
    View,
    /// Clear the values of the selected cells.
    Clear,
    /// Focus left the grid.
    Blur,
    KeyDown(KeyEvent),
    /// Clipboard text was written for the selection.
    Copy,
    /// Like [`Action::Copy`], marking the selection as cut.
    Cut,
    /// Clipboard text to paste at the active point.
    Paste(String),
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetData(_) => "set_data",
            Action::Activate(_) => "activate",
            Action::Select(_) => "select",
            Action::SetCellData { .. } => "set_cell_data",
            Action::SetCellDimensions { .. } => "set_cell_dimensions",
            Action::DragStart => "drag_start",
            Action::DragEnd => "drag_end",
            Action::Edit => "edit",
            Action::View => "view",
            Action::Clear => "clear",
            Action::Blur => "blur",
            Action::KeyDown(_) => "key_down",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste(_) => "paste",
        }
    }
}
