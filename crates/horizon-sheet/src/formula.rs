//! Formula detection and delegation.
//!
//! The core does not evaluate formulas. It recognizes formula cells by their
//! prefix, hands the formula text to a host-supplied [`FormulaParser`], and
//! turns the parser's answer into a displayable [`CellValue`]. Evaluation
//! errors become the cell's value.

use std::sync::Arc;

use horizon_sheet_core::logging::targets;

use crate::model::{Cell, CellValue, Matrix, Point};

/// The answer of a [`FormulaParser`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormulaOutcome {
    pub result: CellValue,
    pub error: Option<String>,
}

impl FormulaOutcome {
    pub fn ok(result: impl Into<CellValue>) -> Self {
        Self {
            result: result.into(),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            result: CellValue::Null,
            error: Some(error.into()),
        }
    }
}

/// An external formula engine.
pub trait FormulaParser: Send + Sync {
    /// Evaluates formula text (without its prefix).
    fn parse(&self, formula: &str) -> FormulaOutcome;
}

impl<F> FormulaParser for F
where
    F: Fn(&str) -> FormulaOutcome + Send + Sync,
{
    fn parse(&self, formula: &str) -> FormulaOutcome {
        self(formula)
    }
}

/// Whether `value` is text starting with `prefix`.
pub fn is_formula_value(value: &CellValue, prefix: char) -> bool {
    value
        .as_text()
        .is_some_and(|text| text.starts_with(prefix))
}

/// Whether the cell's raw value is a formula.
pub fn is_formula_cell(cell: &Cell, prefix: char) -> bool {
    is_formula_value(&cell.value, prefix)
}

/// Strips exactly one leading `prefix`.
///
/// Text without the prefix is returned unchanged.
pub fn extract_formula(value: &str, prefix: char) -> &str {
    value.strip_prefix(prefix).unwrap_or(value)
}

/// Resolves an outcome to the value shown: the error if there is one,
/// otherwise the result.
pub fn get_formula_computed_value(outcome: FormulaOutcome) -> CellValue {
    match outcome.error {
        Some(error) => CellValue::Text(error),
        None => outcome.result,
    }
}

/// Resolves cells to their computed values.
///
/// Without a parser, formula cells resolve to their raw value.
#[derive(Clone)]
pub struct FormulaResolver {
    prefix: char,
    parser: Option<Arc<dyn FormulaParser>>,
}

impl FormulaResolver {
    pub fn new(prefix: char, parser: Option<Arc<dyn FormulaParser>>) -> Self {
        Self { prefix, parser }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn has_parser(&self) -> bool {
        self.parser.is_some()
    }

    pub fn is_formula_cell(&self, cell: &Cell) -> bool {
        is_formula_cell(cell, self.prefix)
    }

    /// The computed value of `cell`.
    ///
    /// A missing cell is [`CellValue::Null`], a plain cell is its raw value,
    /// and a formula cell is whatever the parser produces.
    pub fn get_computed_value(&self, cell: Option<&Cell>) -> CellValue {
        let Some(cell) = cell else {
            return CellValue::Null;
        };
        let Some(text) = cell.value.as_text().filter(|text| text.starts_with(self.prefix)) else {
            return cell.value.clone();
        };
        let Some(parser) = &self.parser else {
            tracing::trace!(target: targets::FORMULA, "no formula parser, using raw value");
            return cell.value.clone();
        };

        let formula = extract_formula(text, self.prefix);
        let outcome = parser.parse(formula);
        if let Some(error) = &outcome.error {
            tracing::debug!(target: targets::FORMULA, formula, error = %error, "formula evaluated to error");
        }
        get_formula_computed_value(outcome)
    }
}

impl Default for FormulaResolver {
    fn default() -> Self {
        Self::new('=', None)
    }
}

impl std::fmt::Debug for FormulaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormulaResolver")
            .field("prefix", &self.prefix)
            .field("parser", &self.parser.is_some())
            .finish()
    }
}

/// Produces the value a cell shows and copies as.
pub trait ValueExtractor: Send + Sync {
    fn get_value(&self, data: &Matrix<Cell>, point: Point, formula: &FormulaResolver) -> CellValue;
}

impl<F> ValueExtractor for F
where
    F: Fn(&Matrix<Cell>, Point, &FormulaResolver) -> CellValue + Send + Sync,
{
    fn get_value(&self, data: &Matrix<Cell>, point: Point, formula: &FormulaResolver) -> CellValue {
        self(data, point, formula)
    }
}

/// The default extractor: the cell's computed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputedValue;

impl ValueExtractor for ComputedValue {
    fn get_value(&self, data: &Matrix<Cell>, point: Point, formula: &FormulaResolver) -> CellValue {
        formula.get_computed_value(data.get(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(outcome: FormulaOutcome) -> FormulaResolver {
        let parser = move |_: &str| outcome.clone();
        FormulaResolver::new('=', Some(Arc::new(parser)))
    }

    #[test]
    fn test_is_formula_cell() {
        assert!(is_formula_cell(&Cell::new("=SUM(A1)"), '='));
        assert!(is_formula_cell(&Cell::new("="), '='));
        assert!(!is_formula_cell(&Cell::new("SUM(A1)"), '='));
        assert!(!is_formula_cell(&Cell::new(" =1"), '='));
        assert!(!is_formula_cell(&Cell::new(1.0), '='));
        assert!(!is_formula_cell(&Cell::empty(), '='));
    }

    #[test]
    fn test_extract_formula_strips_once() {
        assert_eq!(extract_formula("=A1+1", '='), "A1+1");
        assert_eq!(extract_formula("==1", '='), "=1");
        assert_eq!(extract_formula("A1", '='), "A1");
    }

    #[test]
    fn test_result_and_error() {
        let ok = resolver(FormulaOutcome::ok(true));
        assert_eq!(
            ok.get_computed_value(Some(&Cell::new("=TRUE()"))),
            CellValue::Bool(true)
        );

        let err = resolver(FormulaOutcome::error("#REF!"));
        assert_eq!(
            err.get_computed_value(Some(&Cell::new("=TRUE()"))),
            CellValue::from("#REF!")
        );
    }

    #[test]
    fn test_parser_receives_stripped_formula() {
        let parser = |formula: &str| FormulaOutcome::ok(formula);
        let resolver = FormulaResolver::new('=', Some(Arc::new(parser)));
        assert_eq!(
            resolver.get_computed_value(Some(&Cell::new("=A1*2"))),
            CellValue::from("A1*2")
        );
    }

    #[test]
    fn test_non_formula_and_missing() {
        let resolver = resolver(FormulaOutcome::error("unused"));
        assert_eq!(resolver.get_computed_value(None), CellValue::Null);
        assert_eq!(
            resolver.get_computed_value(Some(&Cell::new(4.0))),
            CellValue::Number(4.0)
        );
    }

    #[test]
    fn test_missing_parser_degrades_to_raw() {
        let resolver = FormulaResolver::default();
        assert!(!resolver.has_parser());
        assert_eq!(
            resolver.get_computed_value(Some(&Cell::new("=1+1"))),
            CellValue::from("=1+1")
        );
    }

    #[test]
    fn test_computed_value_extractor() {
        let data = Matrix::from_rows(vec![vec![Cell::new("=X"), Cell::new("plain")]]);
        let formula = resolver(FormulaOutcome::ok(2.0));
        assert_eq!(
            ComputedValue.get_value(&data, Point::ORIGIN, &formula),
            CellValue::Number(2.0)
        );
        assert_eq!(
            ComputedValue.get_value(&data, Point::new(0, 1), &formula),
            CellValue::from("plain")
        );
        assert_eq!(
            ComputedValue.get_value(&data, Point::new(5, 5), &formula),
            CellValue::Null
        );
    }

    #[test]
    fn test_custom_prefix() {
        let resolver = FormulaResolver::new('+', None);
        assert!(resolver.is_formula_cell(&Cell::new("+A1")));
        assert!(!resolver.is_formula_cell(&Cell::new("=A1")));
    }
}
