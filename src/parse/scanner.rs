// src/parse/scanner.rs

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::sheets::Row;

/// One labelled amount pulled out of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    pub label: String,
    pub amount: T,
}

impl<T> Entry<T> {
    pub fn new(label: impl Into<String>, amount: T) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Trimmed text of cell `idx`; missing cells read as empty.
pub fn cell(row: &Row, idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    Collecting,
}

/// Finds one named section in a grid and collects its entries.
///
/// Scanning starts at the first row whose first cell contains `header`
/// (case-insensitive) and stops for good at the first row accepted by
/// `terminates`. Rows the extractor rejects, or whose amount is not
/// positive, are skipped without ending the section.
#[derive(Clone, Copy)]
pub struct SectionScanner<T> {
    pub header: &'static str,
    pub terminates: fn(&Row) -> bool,
    pub extract: fn(&Row) -> Option<Entry<T>>,
}

impl<T> SectionScanner<T>
where
    T: PartialOrd + Default + std::fmt::Debug,
{
    pub fn scan(&self, rows: &[Row]) -> Vec<Entry<T>> {
        let zero = T::default();
        let mut state = State::Scanning;
        let mut entries = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            match state {
                State::Scanning => {
                    if cell(row, 0).to_lowercase().contains(self.header) {
                        debug!(section = self.header, row = i + 1, "found section header");
                        state = State::Collecting;
                    }
                }
                State::Collecting => {
                    if (self.terminates)(row) {
                        debug!(section = self.header, row = i + 1, "section ended");
                        break;
                    }
                    match (self.extract)(row) {
                        Some(entry) if entry.amount > zero => {
                            trace!(label = %entry.label, amount = ?entry.amount, "kept row");
                            entries.push(entry);
                        }
                        _ => trace!(row = i + 1, cells = ?row, "skipped row"),
                    }
                }
            }
        }

        if state == State::Scanning {
            debug!(section = self.header, "section header not found");
        }
        entries
    }
}
