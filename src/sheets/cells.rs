// src/sheets/cells.rs

use super::types::{CellData, GridData, Row, Sheet};

/// Flatten one cell to the string a reader of the sheet would see.
///
/// `formattedValue` wins whenever it is present (even when empty). Otherwise
/// the typed effective value is stringified; anything else becomes `""`.
pub fn cell_text(cell: &CellData) -> String {
    if let Some(formatted) = &cell.formatted_value {
        return formatted.clone();
    }
    if let Some(ev) = &cell.effective_value {
        if let Some(s) = ev.string_value.as_deref().filter(|s| !s.is_empty()) {
            return s.to_string();
        }
        if let Some(n) = ev.number_value {
            return n.to_string();
        }
        if let Some(b) = ev.bool_value {
            return b.to_string();
        }
    }
    String::new()
}

/// Rows of the first grid range of `sheet`, each cell flattened.
pub fn sheet_rows(sheet: &Sheet) -> Vec<Row> {
    sheet
        .data
        .first()
        .map(grid_rows)
        .unwrap_or_default()
}

fn grid_rows(grid: &GridData) -> Vec<Row> {
    grid.row_data
        .iter()
        .map(|row| row.values.iter().map(cell_text).collect())
        .collect()
}
