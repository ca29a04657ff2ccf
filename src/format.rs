//! Header formatting utilities

use crate::model::Table;

/// Capitalize a column header, word by word.
///
/// Words are separated by spaces, underscores or hyphens; separators are
/// preserved. The first character of each word is uppercased and the rest
/// are lowercased. This is the default policy consumed by
/// [`crate::convert::RecordConverter`]; callers with a different house style
/// can inject their own transform instead.
pub fn capitalize_header(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;

    for ch in name.chars() {
        if ch == ' ' || ch == '_' || ch == '-' {
            out.push(ch);
            word_start = true;
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

/// Return a copy of the table with every column name capitalized. Row data,
/// column count and column order are unchanged.
pub fn capitalize_columns(table: &Table) -> Table {
    let mut renamed = table.clone();
    renamed.rename_columns(capitalize_header);
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    #[test]
    fn test_capitalize_header() {
        assert_eq!(capitalize_header("name"), "Name");
        assert_eq!(capitalize_header("first name"), "First Name");
        assert_eq!(capitalize_header("age_years"), "Age_Years");
        assert_eq!(capitalize_header("unit-price"), "Unit-Price");
        assert_eq!(capitalize_header("AGE"), "Age");
        assert_eq!(capitalize_header(""), "");
        assert_eq!(capitalize_header("col1"), "Col1");
    }

    #[test]
    fn test_capitalize_columns_preserves_data() {
        let mut table = Table::new(vec![Column::new("first name"), Column::new("age")]);
        table.push_row(vec![CellValue::from("a"), CellValue::Int(30)]);

        let renamed = capitalize_columns(&table);
        let names: Vec<_> = renamed.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First Name", "Age"]);
        assert_eq!(renamed.rows, table.rows);
    }
}
