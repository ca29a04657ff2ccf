//! tabrec - Convert tabular data between table and record representations
//!
//! An in-memory table (rows x named columns, optional named row index) with
//! conversions to and from ordered sequences of key-value records, plus thin
//! CSV read/write wrappers.

pub mod convert;
pub mod error;
pub mod format;
pub mod io;
pub mod model;

pub use convert::{
    records_to_table, select_columns_as_indexed_records, table_to_records, Record,
    RecordConverter,
};
pub use error::ConvertError;
pub use model::{CellValue, Table};
