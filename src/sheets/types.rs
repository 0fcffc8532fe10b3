// src/sheets/types.rs

use serde::Deserialize;

/// One flattened spreadsheet row. Cells are addressed by index.
pub type Row = Vec<String>;

/// The subset of a `spreadsheets.get` response we read.
#[derive(Debug, Default, Deserialize)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sheet {
    pub properties: Option<SheetProperties>,
    #[serde(default)]
    pub data: Vec<GridData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetProperties {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default)]
    pub row_data: Vec<RowData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub formatted_value: Option<String>,
    pub effective_value: Option<ExtendedValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedValue {
    pub string_value: Option<String>,
    pub number_value: Option<f64>,
    pub bool_value: Option<bool>,
}
