//! The cell record and the host-pluggable viewer and editor hooks.
//!
//! The grid core only ever looks at [`Cell::value`] and [`Cell::read_only`].
//! Everything else a host wants to carry per cell goes into the opaque
//! [`Cell::payload`], or into the optional [`DataViewer`] / [`DataEditor`]
//! overrides used by the presentation layer.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::point::Point;

/// The raw value stored in a cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::Text(text)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// What a viewer or editor is told about the cell it handles.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub point: Point,
    /// The stored cell, `None` for a hole.
    pub cell: Option<&'a Cell>,
    /// The value to show, as produced by the value extractor.
    pub value: &'a CellValue,
}

/// Renders a cell for display.
pub trait DataViewer: Send + Sync {
    fn render(&self, ctx: &CellContext<'_>) -> String;
}

/// Turns editor input into the next version of a cell.
pub trait DataEditor: Send + Sync {
    fn apply(&self, ctx: &CellContext<'_>, input: &str) -> Cell;
}

/// The editor used when a cell carries no override: the input becomes the
/// raw text value, everything else on the cell is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEditor;

impl DataEditor for TextEditor {
    fn apply(&self, ctx: &CellContext<'_>, input: &str) -> Cell {
        ctx.cell
            .cloned()
            .unwrap_or_default()
            .with_value(input)
    }
}

/// A single grid cell.
#[derive(Clone, Default)]
pub struct Cell {
    pub value: CellValue,
    pub read_only: bool,
    pub data_viewer: Option<Arc<dyn DataViewer>>,
    pub data_editor: Option<Arc<dyn DataEditor>>,
    /// Opaque host data. The core never inspects it.
    pub payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// A cell holding [`CellValue::Null`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a copy with a new value; every other field is kept.
    pub fn with_value(mut self, value: impl Into<CellValue>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_viewer(mut self, viewer: Arc<dyn DataViewer>) -> Self {
        self.data_viewer = Some(viewer);
        self
    }

    pub fn with_editor(mut self, editor: Arc<dyn DataEditor>) -> Self {
        self.data_editor = Some(editor);
        self
    }

    pub fn with_payload<T: Any + Send + Sync>(mut self, payload: T) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    /// Downcasts the payload.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
        }
        self.value == other.value
            && self.read_only == other.read_only
            && same(&self.data_viewer, &other.data_viewer)
            && same(&self.data_editor, &other.data_editor)
            && same(&self.payload, &other.payload)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("value", &self.value)
            .field("read_only", &self.read_only)
            .field("data_viewer", &self.data_viewer.is_some())
            .field("data_editor", &self.data_editor.is_some())
            .field("payload", &self.payload.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(Cell: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl DataViewer for Upper {
        fn render(&self, ctx: &CellContext<'_>) -> String {
            ctx.value.to_string().to_uppercase()
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::from("x").to_string(), "x");
    }

    #[test]
    fn test_equality_uses_identity_for_overrides() {
        let viewer: Arc<dyn DataViewer> = Arc::new(Upper);
        let a = Cell::new("a").with_viewer(viewer.clone());
        let b = Cell::new("a").with_viewer(viewer);
        let c = Cell::new("a").with_viewer(Arc::new(Upper));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Cell::new("a"));
    }

    #[test]
    fn test_with_value_keeps_flags() {
        let cell = Cell::new("x").with_read_only(true).with_payload(7_u32);
        let next = cell.clone().with_value(CellValue::Null);
        assert!(next.read_only);
        assert_eq!(next.payload::<u32>(), Some(&7));
        assert!(next.value.is_null());
    }

    #[test]
    fn test_text_editor() {
        let cell = Cell::new("old").with_read_only(true);
        let ctx = CellContext {
            point: Point::ORIGIN,
            cell: Some(&cell),
            value: &cell.value,
        };
        let next = TextEditor.apply(&ctx, "new");
        assert_eq!(next.value, CellValue::from("new"));
        assert!(next.read_only);

        let ctx = CellContext {
            point: Point::ORIGIN,
            cell: None,
            value: &CellValue::Null,
        };
        assert_eq!(TextEditor.apply(&ctx, "v"), Cell::new("v"));
    }

    #[test]
    fn test_serde_untagged_value() {
        let values: Vec<CellValue> = serde_json::from_str(r#"[null, true, 2.5, "hi"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Bool(true),
                CellValue::Number(2.5),
                CellValue::from("hi")
            ]
        );
    }
}
