//! Horizon Sheet - the state core of a spreadsheet grid widget.
//!
//! The crate holds everything a spreadsheet grid needs besides drawing:
//!
//! - **Model**: immutable, structurally shared matrices, point sets and maps
//! - **Engine**: a pure reducer for activation, selection, keyboard
//!   navigation and editing
//! - **Clipboard**: tab-separated copy, cut and paste against a pluggable
//!   backend
//! - **Formulas**: computed values through an external formula parser
//! - **Commits**: detection of finished edits, with formula bindings
//!
//! [`Spreadsheet`] ties these together and notifies the host through
//! signals.
//!
//! # Example
//!
//! ```
//! use horizon_sheet::{Cell, FormulaOutcome, Matrix, MemoryClipboard, Point, Spreadsheet};
//!
//! let data = Matrix::from_rows(vec![vec![Cell::new("=SUM(1,2)"), Cell::new("x")]]);
//! let sheet = Spreadsheet::builder(data)
//!     .clipboard(MemoryClipboard::new())
//!     .formula_parser(|_: &str| FormulaOutcome::ok(3.0))
//!     .build();
//!
//! assert_eq!(sheet.display_value(Point::ORIGIN), "3");
//! ```

pub mod clipboard;
pub mod commit;
pub mod config;
pub mod engine;
pub mod error;
pub mod formula;
pub mod model;
pub mod state;
mod spreadsheet;

pub use horizon_sheet_core::{ConnectionGuard, Signal};

pub use clipboard::{
    ClipboardBackend, ClipboardError, ClipboardEvent, ClipboardEvents, MemoryClipboard, Permission,
    SystemClipboard,
};
pub use commit::{BindingResolver, CommitTracker};
pub use config::SpreadsheetConfig;
pub use error::{SheetError, SheetResult};
pub use formula::{ComputedValue, FormulaOutcome, FormulaParser, FormulaResolver, ValueExtractor};
pub use model::{
    Axis, Cell, CellContext, CellValue, DataEditor, DataViewer, Matrix, Point, PointMap,
    PointRange, PointSet, Size, TextEditor,
};
pub use spreadsheet::{PasteRequest, Spreadsheet, SpreadsheetBuilder};
pub use state::{CellDimensions, CommitEvent, CommitRecord, Mode, StoreState};
