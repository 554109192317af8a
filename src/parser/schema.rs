use crate::error::ExtractError;

/// How a cell's text is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerce {
    Text,
    Number,
    OptionalText,
    OptionalNumber,
}

impl Coerce {
    pub fn is_optional(self) -> bool {
        matches!(self, Coerce::OptionalText | Coerce::OptionalNumber)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    /// CSS selector evaluated relative to the row (`td:nth-child(3)`, `td:nth-child(1) span[style]`).
    pub cell: &'static str,
    pub coerce: Coerce,
}

impl Column {
    pub const fn text(name: &'static str, cell: &'static str) -> Self {
        Self { name, cell, coerce: Coerce::Text }
    }

    pub const fn number(name: &'static str, cell: &'static str) -> Self {
        Self { name, cell, coerce: Coerce::Number }
    }

    pub const fn optional_text(name: &'static str, cell: &'static str) -> Self {
        Self { name, cell, coerce: Coerce::OptionalText }
    }

    #[allow(dead_code)]
    pub const fn optional_number(name: &'static str, cell: &'static str) -> Self {
        Self { name, cell, coerce: Coerce::OptionalNumber }
    }
}

/// Declarative description of one table on a page.
///
/// `table` picks candidate tables, `sentinel` is a phrase known to appear only in
/// the wanted one. Rows are every `tr` with at least one `td` in each matching table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub table: &'static str,
    pub sentinel: &'static str,
    pub columns: &'static [Column],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Absent,
}

/// One extracted row, cells in schema column order.
#[derive(Debug, Clone)]
pub struct Row {
    pub table: &'static str,
    /// 1-based position among the table's data rows.
    pub index: usize,
    pub cells: Vec<(&'static str, Value)>,
}

impl Row {
    fn value(&self, column: &'static str) -> &Value {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, v)| v)
            .unwrap_or(&Value::Absent)
    }

    fn missing(&self, column: &'static str) -> ExtractError {
        ExtractError::MissingCell {
            table: self.table,
            row: self.index,
            column,
        }
    }

    pub fn text(&self, column: &'static str) -> Result<&str, ExtractError> {
        self.opt_text(column).ok_or_else(|| self.missing(column))
    }

    pub fn opt_text(&self, column: &'static str) -> Option<&str> {
        match self.value(column) {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn number(&self, column: &'static str) -> Result<f64, ExtractError> {
        self.opt_number(column).ok_or_else(|| self.missing(column))
    }

    pub fn opt_number(&self, column: &'static str) -> Option<f64> {
        match self.value(column) {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}
