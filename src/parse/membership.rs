// src/parse/membership.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::amount::{clean_label, parse_count};
use super::scanner::{cell, Entry, SectionScanner};
use crate::sheets::Row;

/// "Pledges (12)", "Brothers - 40", "Dues $350": a name with a trailing number.
static INLINE_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)[\s(\-]*\$?([0-9,]+)\)?$").expect("inline count pattern should compile")
});

fn is_blank(row: &Row) -> bool {
    cell(row, 0).is_empty()
}

fn membership_entry(row: &Row) -> Option<Entry<u64>> {
    let first = cell(row, 0);
    let mut label = first;
    let mut number = cell(row, 1);

    if number.is_empty() {
        if let Some(caps) = INLINE_COUNT.captures(first) {
            label = caps.get(1).map_or("", |m| m.as_str()).trim();
            number = caps.get(2).map_or("", |m| m.as_str());
        }
    }

    Some(Entry::new(clean_label(label), parse_count(number)))
}

/// Membership counts, possibly written inline; a blank row closes it.
pub const MEMBERSHIP_STRUCTURE: SectionScanner<u64> = SectionScanner {
    header: "akpsi membership structure",
    terminates: is_blank,
    extract: membership_entry,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipSummary {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub total: u64,
}

impl MembershipSummary {
    pub fn from_entries(entries: Vec<Entry<u64>>) -> Self {
        let (labels, values): (Vec<_>, Vec<_>) =
            entries.into_iter().map(|e| (e.label, e.amount)).unzip();
        let total = values
            .iter()
            .try_fold(0u64, |acc, &v| acc.checked_add(v))
            .unwrap_or_else(|| {
                warn!(values = ?values, "membership total overflows u64, reading as 0");
                0
            });
        Self {
            labels,
            values,
            total,
        }
    }
}

#[instrument(level = "debug", skip(rows), fields(row_count = rows.len()))]
pub fn parse_membership(rows: &[Row]) -> MembershipSummary {
    let summary = MembershipSummary::from_entries(MEMBERSHIP_STRUCTURE.scan(rows));
    info!(labels = ?summary.labels, total = summary.total, "parsed membership structure");
    summary
}
