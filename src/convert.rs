//! Conversion between tables and key-value records

use indexmap::{IndexMap, IndexSet};

use crate::error::ConvertError;
use crate::format;
use crate::model::{CellValue, Column, Table};

/// One row expressed as an insertion-ordered mapping from column name to
/// cell value
pub type Record = IndexMap<String, CellValue>;

/// Column-name transform applied when exporting with capitalized headers
pub type HeaderTransform = Box<dyn Fn(&str) -> String>;

/// Converter between tables and record sequences.
///
/// The header transform is an injected collaborator; the default is
/// [`format::capitalize_header`].
pub struct RecordConverter {
    header_transform: HeaderTransform,
}

impl Default for RecordConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordConverter {
    /// Create a converter with the default header transform
    pub fn new() -> Self {
        Self {
            header_transform: Box::new(format::capitalize_header),
        }
    }

    /// Replace the transform used when `capitalize_headers` is set
    pub fn with_header_transform(mut self, f: impl Fn(&str) -> String + 'static) -> Self {
        self.header_transform = Box::new(f);
        self
    }

    /// Convert a table to a sequence of records, one per row, in row order.
    ///
    /// A named row index is first materialized back into a leading column so
    /// its values are not lost; an unnamed index is dropped. Every null cell
    /// is replaced with the empty string. With `capitalize_headers`, column
    /// names (including a materialized index column) are rewritten through
    /// the header transform before export, so record keys reflect the
    /// rewritten names.
    pub fn table_to_records(&self, table: &Table, capitalize_headers: bool) -> Vec<Record> {
        let mut table = table.clone();
        table.reset_index();
        table.fill_null(CellValue::from(""));
        if capitalize_headers {
            table.rename_columns(|name| (self.header_transform)(name));
        }
        body_records(&table)
    }

    /// Convert a sequence of records to a table, one row per record, in
    /// input order.
    ///
    /// The column set is the union of keys across all records, in first-seen
    /// order. A record lacking a key present in another record yields a null
    /// cell, not an empty string, so the conversion is only a value-clean
    /// inverse of [`Self::table_to_records`] when all records share
    /// identical keys.
    pub fn records_to_table(&self, records: &[Record]) -> Table {
        let mut names: IndexSet<String> = IndexSet::new();
        for record in records {
            for key in record.keys() {
                names.insert(key.clone());
            }
        }

        let columns = names.iter().map(|name| Column::new(name.clone())).collect();
        let mut table = Table::new(columns);
        for record in records {
            let cells = names
                .iter()
                .map(|name| record.get(name).cloned().unwrap_or(CellValue::Null))
                .collect();
            table.push_row(cells);
        }
        table.infer_column_types();
        table
    }

    /// Project a table onto `columns`, use the first selected column as the
    /// row index, and export the remaining columns as records.
    ///
    /// The index column establishes row identity only; its values do not
    /// appear in the returned records. Null cells become the empty string.
    /// No header capitalization is applied.
    pub fn select_columns_as_indexed_records<S: AsRef<str>>(
        &self,
        table: &Table,
        columns: &[S],
    ) -> Result<Vec<Record>, ConvertError> {
        let first = columns.first().ok_or(ConvertError::EmptySelection)?;
        let mut selected = table.select(columns)?;
        selected.set_index(first.as_ref())?;
        selected.fill_null(CellValue::from(""));
        Ok(body_records(&selected))
    }
}

/// Export the column body of a table as records, one per row, keys in
/// column order. The index, if any, is not included.
fn body_records(table: &Table) -> Vec<Record> {
    table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .enumerate()
                .map(|(pos, col)| {
                    let cell = row.get(pos).cloned().unwrap_or(CellValue::Null);
                    (col.name.clone(), cell)
                })
                .collect()
        })
        .collect()
}

/// Convert a table to records with a default converter
pub fn table_to_records(table: &Table, capitalize_headers: bool) -> Vec<Record> {
    RecordConverter::new().table_to_records(table, capitalize_headers)
}

/// Convert records to a table with a default converter
pub fn records_to_table(records: &[Record]) -> Table {
    RecordConverter::new().records_to_table(records)
}

/// Indexed-record selection with a default converter
pub fn select_columns_as_indexed_records<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
) -> Result<Vec<Record>, ConvertError> {
    RecordConverter::new().select_columns_as_indexed_records(table, columns)
}
