//! Table and cell data structures

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The type of this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Convert to a display string; null renders as the empty string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// Build a cell from a decoded JSON value. Strings that parse as a date or
/// datetime become typed cells; arrays and objects are kept as their compact
/// JSON text.
impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::String(Cow::Owned(n.to_string()))
                }
            }
            Value::String(s) => {
                if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    return CellValue::Date(date);
                }
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    return CellValue::DateTime(dt);
                }
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                    return CellValue::DateTime(dt);
                }
                CellValue::String(Cow::Owned(s.clone()))
            }
            Value::Array(_) | Value::Object(_) => CellValue::String(Cow::Owned(value.to_string())),
        }
    }
}

impl From<&CellValue> for serde_json::Value {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::Int(i) => serde_json::json!(*i),
            CellValue::Float(f) => serde_json::json!(*f),
            CellValue::String(s) => serde_json::Value::String(s.to_string()),
            CellValue::Date(d) => serde_json::Value::String(d.to_string()),
            CellValue::DateTime(dt) => serde_json::Value::String(dt.to_string()),
        }
    }
}

/// A named row index, detached from the column body
#[derive(Debug, Clone)]
pub struct RowIndex {
    /// Index name (the column it was created from)
    pub name: String,
    /// One value per row, in row order
    pub values: Vec<CellValue>,
}

/// A table of named columns and ordered rows, with an optional named row
/// index. Column names are expected to be unique; this is not enforced.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions, in column order
    pub columns: Vec<Column>,
    /// Cell values per row, in column order
    pub rows: Vec<Vec<CellValue>>,
    /// Named row index; `None` models the unnamed positional index
    pub index: Option<RowIndex>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            index: None,
        }
    }

    /// Append a row of cells. A live index stays aligned by growing with a
    /// null value.
    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        self.rows.push(cells);
        if let Some(index) = &mut self.index {
            index.values.push(CellValue::Null);
        }
    }

    /// Get column position by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column metadata by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, not counting the index
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Move the named column out of the body and use it as the row index.
    /// An existing index is discarded.
    pub fn set_index(&mut self, name: &str) -> Result<(), ConvertError> {
        let pos = self
            .column_index(name)
            .ok_or_else(|| ConvertError::MissingColumn(name.to_string()))?;
        self.columns.remove(pos);
        let values = self
            .rows
            .iter_mut()
            .map(|row| {
                if pos < row.len() {
                    row.remove(pos)
                } else {
                    CellValue::Null
                }
            })
            .collect();
        self.index = Some(RowIndex {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// Materialize a named index back into the leading column. No-op when
    /// the table has no index.
    pub fn reset_index(&mut self) {
        if let Some(index) = self.index.take() {
            self.columns.insert(0, Column::new(index.name));
            for (row, value) in self.rows.iter_mut().zip(index.values) {
                row.insert(0, value);
            }
        }
    }

    /// Project onto the given columns, in the given order. The index is
    /// carried over unchanged.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, ConvertError> {
        let mut positions = Vec::with_capacity(columns.len());
        for name in columns {
            let name = name.as_ref();
            let pos = self
                .column_index(name)
                .ok_or_else(|| ConvertError::MissingColumn(name.to_string()))?;
            positions.push(pos);
        }

        let selected = positions.iter().map(|&p| self.columns[p].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                positions
                    .iter()
                    .map(|&p| row.get(p).cloned().unwrap_or(CellValue::Null))
                    .collect()
            })
            .collect();

        Ok(Table {
            columns: selected,
            rows,
            index: self.index.clone(),
        })
    }

    /// Replace every null cell with the given value. Rows shorter than the
    /// column count are padded first; null index values are filled too.
    pub fn fill_null(&mut self, fill: CellValue) {
        let width = self.columns.len();
        for row in &mut self.rows {
            if row.len() < width {
                row.resize(width, CellValue::Null);
            }
            for cell in row.iter_mut() {
                if cell.is_null() {
                    *cell = fill.clone();
                }
            }
        }
        if let Some(index) = &mut self.index {
            for value in &mut index.values {
                if value.is_null() {
                    *value = fill.clone();
                }
            }
        }
    }

    /// Rewrite every column name through the given transform. Row data and
    /// the index are untouched.
    pub fn rename_columns(&mut self, f: impl Fn(&str) -> String) {
        for col in &mut self.columns {
            col.name = f(&col.name);
        }
    }

    /// Recompute each column's inferred type by widening over its cells
    pub fn infer_column_types(&mut self) {
        for (pos, col) in self.columns.iter_mut().enumerate() {
            let mut inferred = CellType::Null;
            for row in &self.rows {
                if let Some(cell) = row.get(pos) {
                    inferred = inferred.widen(cell.cell_type());
                }
            }
            col.inferred_type = inferred;
        }
    }
}
