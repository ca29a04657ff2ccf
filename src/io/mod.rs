//! File I/O wrappers around the tabular model

mod csv;

pub use self::csv::{read_csv, write_csv};
