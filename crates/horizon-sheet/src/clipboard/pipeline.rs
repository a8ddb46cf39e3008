//! Clipboard serialization and paste composition.
//!
//! Wire format: rows separated by the row separator (`\n`), cells by the
//! column separator (`\t`). There is no escaping, so values containing
//! either separator do not survive a round trip.

use horizon_sheet_core::logging::targets;

use crate::config::SpreadsheetConfig;
use crate::formula::{FormulaResolver, ValueExtractor};
use crate::model::{Cell, Matrix, Point, PointMap, PointRange, PointSet};
use crate::state::{CommitRecord, Mode, StatePatch, StoreState};

/// Serializes the selected cells to clipboard text.
///
/// Every selected position produces a field; holes become empty strings.
/// Returns `None` when nothing is selected or while editing.
pub fn copy_text(
    state: &StoreState,
    formula: &FormulaResolver,
    extractor: &dyn ValueExtractor,
    config: &SpreadsheetConfig,
) -> Option<String> {
    if state.mode == Mode::Edit {
        return None;
    }
    let range = state.selected?;
    let origin = range.start();
    let size = range.size();

    let values = PointSet::from_range(&range)
        .to_matrix(&state.data)
        .map(|_, relative| {
            let point = Point::new(origin.row + relative.row, origin.column + relative.column);
            extractor.get_value(&state.data, point, formula).to_string()
        })
        .iter()
        .fold(
            Matrix::<String>::create_empty(size.rows, size.columns),
            |acc, (point, value)| acc.set(point, value.clone()),
        );
    Some(values.join(&config.column_separator, &config.row_separator))
}

/// The state change of a copy (or cut) of the selection.
pub fn copy_patch(state: &StoreState, cut: bool) -> Option<StatePatch> {
    if state.mode == Mode::Edit {
        return None;
    }
    let range = state.selected?;
    let copied: PointMap<Cell> = range
        .points()
        .filter_map(|point| state.data.get(point).map(|cell| (point, cell.clone())))
        .collect();
    tracing::debug!(target: targets::CLIPBOARD, cells = copied.len(), cut, "selection copied");
    Some(
        StatePatch::new()
            .copied(copied)
            .cut(cut)
            .has_pasted(false),
    )
}

/// Splits clipboard text into a matrix of raw values.
///
/// `\r\n` line endings are accepted, and a single trailing row separator is
/// ignored.
pub fn parse_clipboard_text(text: &str, config: &SpreadsheetConfig) -> Matrix<String> {
    let normalized = if config.row_separator == "\n" {
        text.replace("\r\n", "\n")
    } else {
        text.to_string()
    };
    let body = normalized
        .strip_suffix(config.row_separator.as_str())
        .unwrap_or(&normalized);
    Matrix::split(
        body,
        &config.column_separator,
        &config.row_separator,
        str::to_string,
    )
}

/// The state change of pasting `text` at the active point.
///
/// The pasted block is anchored so that its top-left value lands on the
/// active cell. Targets outside the current data and read-only cells are
/// skipped; the data never grows. Returns `None` when nothing is written.
pub fn paste_patch(state: &StoreState, text: &str, config: &SpreadsheetConfig) -> Option<StatePatch> {
    if state.mode == Mode::Edit {
        return None;
    }
    let active = state.active?;
    let pasted = PointMap::from_matrix(&parse_clipboard_text(text, config));
    let min = pasted.keys().min()?;

    let (data, written, changes) = pasted.reduce(
        (state.data.clone(), PointSet::new(), Vec::new()),
        |(data, written, mut changes), value, point| {
            let target = Point::new(
                point.row - min.row + active.row,
                point.column - min.column + active.column,
            );
            if !data.has(target) {
                return (data, written, changes);
            }
            let existing = data.get(target);
            if existing.is_some_and(|cell| cell.read_only) {
                return (data, written, changes);
            }
            let next_cell = existing
                .cloned()
                .unwrap_or_default()
                .with_value(value.as_str());
            if existing != Some(&next_cell) {
                changes.push(CommitRecord {
                    prev_cell: existing.cloned(),
                    next_cell: next_cell.clone(),
                });
            }
            let next = data.set(target, next_cell);
            (next, written.add(target), changes)
        },
    );

    let Some(selected) = PointRange::bounding(written.iter()) else {
        tracing::debug!(target: targets::CLIPBOARD, %active, "paste wrote no cells");
        return None;
    };
    tracing::debug!(target: targets::CLIPBOARD, cells = written.len(), %active, "pasted");
    Some(
        StatePatch::new()
            .data(data)
            .selected(Some(selected))
            .has_pasted(true)
            .cut(false)
            .mode(Mode::View)
            .commit(changes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::ComputedValue;
    use crate::model::CellValue;

    fn state(rows: Vec<Vec<Cell>>, active: Point, selected: PointRange) -> StoreState {
        StoreState {
            active: Some(active),
            selected: Some(selected),
            ..StoreState::new(Matrix::from_rows(rows))
        }
    }

    fn values(state: &StoreState) -> Vec<Vec<String>> {
        let size = state.size();
        (0..size.rows)
            .map(|row| {
                (0..size.columns)
                    .map(|column| {
                        state
                            .data
                            .get(Point::new(row, column))
                            .map(|cell| cell.value.to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_copy_text_tab_separated() {
        let s = state(
            vec![
                vec![Cell::new("A"), Cell::new("B")],
                vec![Cell::empty(), Cell::empty()],
            ],
            Point::ORIGIN,
            PointRange::new(Point::ORIGIN, Point::new(0, 1)),
        );
        let config = SpreadsheetConfig::default();
        let text = copy_text(&s, &FormulaResolver::default(), &ComputedValue, &config);
        assert_eq!(text.as_deref(), Some("A\tB"));
    }

    #[test]
    fn test_copy_text_pads_holes() {
        let data = Matrix::new().set(Point::new(1, 0), Cell::new("x"));
        let s = StoreState {
            active: Some(Point::ORIGIN),
            selected: Some(PointRange::new(Point::ORIGIN, Point::new(1, 2))),
            ..StoreState::new(data)
        };
        let config = SpreadsheetConfig::default();
        let text = copy_text(&s, &FormulaResolver::default(), &ComputedValue, &config);
        assert_eq!(text.as_deref(), Some("\t\t\nx\t\t"));
    }

    #[test]
    fn test_copy_uses_extractor() {
        let s = state(
            vec![vec![Cell::new("a")]],
            Point::ORIGIN,
            PointRange::single(Point::ORIGIN),
        );
        let upper = |data: &Matrix<Cell>, point: Point, _: &FormulaResolver| {
            CellValue::from(data.get(point).map(|c| c.value.to_string().to_uppercase()).unwrap_or_default())
        };
        let config = SpreadsheetConfig::default();
        let text = copy_text(&s, &FormulaResolver::default(), &upper, &config);
        assert_eq!(text.as_deref(), Some("A"));
    }

    #[test]
    fn test_copy_patch() {
        let s = state(
            vec![vec![Cell::new("A"), Cell::new("B")]],
            Point::ORIGIN,
            PointRange::new(Point::ORIGIN, Point::new(0, 1)),
        );
        let next = s.apply(copy_patch(&s, true).unwrap());
        assert!(next.cut);
        assert!(!next.has_pasted);
        assert_eq!(next.copied.len(), 2);
        assert_eq!(next.copied.get(Point::new(0, 1)), Some(&Cell::new("B")));
    }

    #[test]
    fn test_paste_at_active() {
        let s = state(
            vec![
                vec![Cell::new("A"), Cell::new("B")],
                vec![Cell::empty(), Cell::empty()],
            ],
            Point::new(1, 0),
            PointRange::single(Point::new(1, 0)),
        );
        let config = SpreadsheetConfig::default();
        let next = s.apply(paste_patch(&s, "A\tB", &config).unwrap());

        assert_eq!(values(&next), vec![vec!["A", "B"], vec!["A", "B"]]);
        assert_eq!(
            next.selected,
            Some(PointRange::new(Point::new(1, 0), Point::new(1, 1)))
        );
        assert!(next.has_pasted);
        assert!(!next.cut);
        assert_eq!(next.last_commit.map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_paste_never_grows() {
        let s = state(
            vec![vec![Cell::empty(), Cell::empty()], vec![Cell::empty(), Cell::empty()]],
            Point::new(1, 1),
            PointRange::single(Point::new(1, 1)),
        );
        let config = SpreadsheetConfig::default();
        let next = s.apply(paste_patch(&s, "1\t2\n3\t4", &config).unwrap());
        assert_eq!(next.size(), s.size());
        assert_eq!(values(&next), vec![vec!["", ""], vec!["", "1"]]);
        assert_eq!(next.selected, Some(PointRange::single(Point::new(1, 1))));
    }

    #[test]
    fn test_paste_skips_read_only() {
        let s = state(
            vec![vec![Cell::new("keep").with_read_only(true), Cell::empty()]],
            Point::ORIGIN,
            PointRange::single(Point::ORIGIN),
        );
        let config = SpreadsheetConfig::default();
        let next = s.apply(paste_patch(&s, "x\ty", &config).unwrap());
        assert_eq!(values(&next), vec![vec!["keep", "y"]]);
        assert_eq!(next.selected, Some(PointRange::single(Point::new(0, 1))));

        assert!(paste_patch(&s, "x", &config).is_none());
    }

    #[test]
    fn test_paste_noops() {
        let config = SpreadsheetConfig::default();
        let mut s = state(
            vec![vec![Cell::empty()]],
            Point::ORIGIN,
            PointRange::single(Point::ORIGIN),
        );
        assert!(paste_patch(&s, "", &config).is_none());

        s.mode = Mode::Edit;
        assert!(paste_patch(&s, "x", &config).is_none());

        s.mode = Mode::View;
        s.active = None;
        assert!(paste_patch(&s, "x", &config).is_none());
    }

    #[test]
    fn test_parse_tolerates_crlf_and_trailing_newline() {
        let config = SpreadsheetConfig::default();
        let matrix = parse_clipboard_text("a\tb\r\nc\td\r\n", &config);
        assert_eq!(matrix.size().rows, 2);
        assert_eq!(matrix.get(Point::new(1, 1)).map(String::as_str), Some("d"));

        // Only one trailing terminator is dropped
        let matrix = parse_clipboard_text("a\n\n", &config);
        assert_eq!(matrix.get(Point::new(1, 0)).map(String::as_str), Some(""));
    }

    #[test]
    fn test_paste_keeps_cell_fields() {
        let s = state(
            vec![vec![Cell::new("old").with_payload(3_u8)]],
            Point::ORIGIN,
            PointRange::single(Point::ORIGIN),
        );
        let config = SpreadsheetConfig::default();
        let next = s.apply(paste_patch(&s, "new", &config).unwrap());
        let cell = next.data.get(Point::ORIGIN).unwrap();
        assert_eq!(cell.value, CellValue::from("new"));
        assert_eq!(cell.payload::<u8>(), Some(&3));
    }
}
