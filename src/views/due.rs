//! Accounts receivable and accounts payable: unpaid transactions tracked against a due date.

use crate::model::{Amount, Transaction, TransactionStatus, TransactionType};
use crate::views::is_overdue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side of the ledger to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueSide {
    /// Unpaid income.
    Receivable,
    /// Unpaid expenses.
    Payable,
}

impl DueSide {
    fn kind(self) -> TransactionType {
        match self {
            DueSide::Receivable => TransactionType::Income,
            DueSide::Payable => TransactionType::Expense,
        }
    }
}

/// Narrows the unpaid transactions.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DueFilter {
    /// Every unpaid transaction.
    #[default]
    All,
    /// Pending and not yet overdue.
    Pending,
    /// Overdue only.
    Overdue,
}

serde_plain::derive_display_from_serialize!(DueFilter);

/// An unpaid transaction together with its derived overdue flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueRow {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub is_overdue: bool,
}

/// The receivables or payables screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueView {
    pub side: DueSide,
    pub filter: DueFilter,
    /// Sorted by due date, earliest first. Rows without a due date come first.
    pub rows: Vec<DueRow>,
    /// The sum of `amount` over `rows`.
    pub total: Amount,
    /// The sum of `amount` over the overdue rows.
    pub total_overdue: Amount,
}

impl DueView {
    /// Selects the transactions of `side` that are not paid, applies `filter` and totals them.
    pub fn build(
        transactions: &[Transaction],
        side: DueSide,
        filter: DueFilter,
        today: NaiveDate,
    ) -> Self {
        let mut rows: Vec<DueRow> = transactions
            .iter()
            .filter(|t| t.kind == side.kind() && !t.is_paid())
            .map(|t| DueRow {
                is_overdue: is_overdue(t.due_date, t.status, today),
                transaction: t.clone(),
            })
            .filter(|row| match filter {
                DueFilter::All => true,
                DueFilter::Overdue => row.is_overdue,
                DueFilter::Pending => {
                    row.transaction.status == Some(TransactionStatus::Pending) && !row.is_overdue
                }
            })
            .collect();

        // `None` orders before any date, which puts undated rows first.
        rows.sort_by_key(|row| row.transaction.due_date);

        let total = rows.iter().map(|row| row.transaction.amount).sum();
        let total_overdue = rows
            .iter()
            .filter(|row| row.is_overdue)
            .map(|row| row.transaction.amount)
            .sum();

        Self {
            side,
            filter,
            rows,
            total,
            total_overdue,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
