pub mod cells;
pub mod fetch;
pub mod types;

pub use cells::{cell_text, sheet_rows};
pub use fetch::{FetchError, GoogleSheetsFetcher, RowFetcher};
pub use types::Row;
