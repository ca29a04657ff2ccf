//! CSV read/write wrappers

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::model::{CellValue, Column, Table};

/// Read a CSV file into a table. The header row becomes the column names;
/// cell values are inferred from their text.
pub fn read_csv(path: &Path) -> Result<Table> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();

    let columns: Vec<Column> = headers.iter().map(Column::new).collect();
    let mut table = Table::new(columns);

    for (row_num, result) in csv_reader.records().enumerate() {
        // +2 for 1-indexing and the header row
        let record =
            result.with_context(|| format!("Failed to read CSV row {}", row_num + 2))?;

        let mut cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
        if cells.len() < table.column_count() {
            warn!(
                "row {} has {} of {} fields, padding with nulls",
                row_num + 2,
                cells.len(),
                table.column_count()
            );
            cells.resize(table.column_count(), CellValue::Null);
        }
        table.push_row(cells);
    }

    table.infer_column_types();
    debug!(
        "read {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Write a table to a CSV file. A named row index is materialized as the
/// leading column; null cells are written as empty fields.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut table = table.clone();
    table.reset_index();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    if table.column_count() > 0 {
        writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
        for row in &table.rows {
            let fields: Vec<String> = (0..table.column_count())
                .map(|pos| {
                    row.get(pos)
                        .map(|cell| cell.display().into_owned())
                        .unwrap_or_default()
                })
                .collect();
            writer.write_record(&fields)?;
        }
    }
    writer.flush()?;

    debug!(
        "wrote {} rows x {} columns to {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(())
}

/// Parse a string value into a cell with type inference
fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    // Check for empty/null
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed == "NA" {
        return CellValue::Null;
    }

    // Try parsing as boolean
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("yes") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("no") {
        return CellValue::Bool(false);
    }

    // Try parsing as integer
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    // Try parsing as float
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    // Try parsing as date
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    // Try parsing as datetime (ISO 8601)
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    // Default to string
    CellValue::String(Cow::Owned(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("null"), CellValue::Null);
        assert_eq!(parse_cell_value("NA"), CellValue::Null);
        assert_eq!(parse_cell_value("true"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("false"), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14"), CellValue::Float(3.14));
        assert_eq!(parse_cell_value("hello"), CellValue::from("hello"));
        assert_eq!(
            parse_cell_value("2024-03-01"),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");

        let mut table = Table::new(vec![
            Column::new("name"),
            Column::new("age"),
            Column::new("city"),
        ]);
        table.push_row(vec![
            CellValue::from("a"),
            CellValue::Int(30),
            CellValue::Null,
        ]);
        table.push_row(vec![
            CellValue::from("b"),
            CellValue::Null,
            CellValue::from("NY"),
        ]);

        write_csv(&table, &path).unwrap();
        let read_back = read_csv(&path).unwrap();

        let names: Vec<_> = read_back.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "city"]);
        assert_eq!(read_back.row_count(), 2);
        assert_eq!(read_back.rows[0][1], CellValue::Int(30));
        // Nulls are written as empty fields and read back as nulls
        assert_eq!(read_back.rows[0][2], CellValue::Null);
        assert_eq!(read_back.rows[1][1], CellValue::Null);
        assert_eq!(read_back.column("age").unwrap().inferred_type, CellType::Int);
    }

    #[test]
    fn test_read_csv_pads_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jagged.csv");
        std::fs::write(&path, "name,age,city\na,30,NY\nb,41\n").unwrap();

        let table = read_csv(&path).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[1],
            vec![CellValue::from("b"), CellValue::Int(41), CellValue::Null]
        );
    }

    #[test]
    fn test_write_csv_materializes_named_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexed.csv");

        let mut table = Table::new(vec![Column::new("id"), Column::new("score")]);
        table.push_row(vec![CellValue::Int(1), CellValue::Float(9.5)]);
        table.push_row(vec![CellValue::Int(2), CellValue::Float(7.25)]);
        table.set_index("id").unwrap();

        write_csv(&table, &path).unwrap();
        let read_back = read_csv(&path).unwrap();

        let names: Vec<_> = read_back.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "score"]);
        assert_eq!(read_back.rows[0][0], CellValue::Int(1));
        assert_eq!(read_back.rows[1][1], CellValue::Float(7.25));
    }

    #[test]
    fn test_write_csv_zero_columns_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let mut table = Table::new(Vec::new());
        table.push_row(Vec::new());
        write_csv(&table, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
