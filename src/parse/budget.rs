// src/parse/budget.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument};

use super::amount::parse_currency;
use super::scanner::{cell, Entry, SectionScanner};
use crate::sheets::Row;

/// The category left out of `expensesWithoutNationals`.
pub const NATIONALS: &str = "Nationals";

fn is_grand_total(row: &Row) -> bool {
    cell(row, 0).to_lowercase().contains("grand total")
}

fn expense_entry(row: &Row) -> Option<Entry<f64>> {
    let (label, amount) = (cell(row, 0), cell(row, 1));
    if label.is_empty() || amount.is_empty() {
        return None;
    }
    Some(Entry::new(label, parse_currency(amount)))
}

/// Two-column section: label in A, currency in B, closed by "Grand Total".
pub const EXPENSE_BREAKDOWN: SectionScanner<f64> = SectionScanner {
    header: "expense breakdown",
    terminates: is_grand_total,
    extract: expense_entry,
};

/// Dues block shipped alongside the expense breakdown. Only
/// `available_funds` is derived from the sheet today; the rest stay zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueSummary {
    pub brother_dues: i64,
    pub pledge_dues: i64,
    pub national_fees_brothers: i64,
    pub national_fees_pledges: i64,
    pub difference: i64,
    pub previous_budget: i64,
    pub available_funds: i64,
    pub remainder: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub due_summary: DueSummary,
    /// Amount per label; repeated labels are summed.
    pub expenses: BTreeMap<String, f64>,
    pub expense_labels: Vec<String>,
    pub expense_values: Vec<f64>,
    pub total_expenses: i64,
    pub expenses_without_nationals: i64,
}

impl BudgetSummary {
    pub fn from_entries(entries: Vec<Entry<f64>>) -> Self {
        let mut expenses: BTreeMap<String, f64> = BTreeMap::new();
        let mut expense_labels = Vec::with_capacity(entries.len());
        let mut expense_values = Vec::with_capacity(entries.len());

        for Entry { label, amount } in entries {
            *expenses.entry(label.clone()).or_default() += amount;
            expense_labels.push(label);
            expense_values.push(amount);
        }

        let total: f64 = expense_values.iter().sum();
        let nationals = expenses.get(NATIONALS).copied().unwrap_or(0.0);
        let total_expenses = total.round() as i64;

        Self {
            due_summary: DueSummary {
                available_funds: total_expenses,
                ..DueSummary::default()
            },
            expenses,
            expense_labels,
            expense_values,
            total_expenses,
            expenses_without_nationals: (total - nationals).round() as i64,
        }
    }
}

/// Parse the "Expense Breakdown" section of a budget sheet.
#[instrument(level = "debug", skip(rows), fields(row_count = rows.len()))]
pub fn parse_budget(rows: &[Row]) -> BudgetSummary {
    let summary = BudgetSummary::from_entries(EXPENSE_BREAKDOWN.scan(rows));
    info!(
        count = summary.expense_labels.len(),
        total = summary.total_expenses,
        "parsed expense breakdown"
    );
    summary
}
