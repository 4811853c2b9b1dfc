//! Derived views: pure computations over a snapshot of products and transactions that the screens
//! of the dashboard are built from. Nothing here performs I/O or holds state between calls, and
//! empty inputs always produce empty outputs with zero totals.

pub mod dashboard;
pub mod due;
pub mod inventory;
pub mod monthly;
pub mod reports;

use crate::model::{IsoDate, TransactionStatus};
use chrono::{Local, NaiveDate};

pub use dashboard::{Dashboard, ProductMetrics};
pub use due::{DueFilter, DueRow, DueSide, DueView};
pub use inventory::{Inventory, InventoryRow, InventoryTotals};
pub use monthly::{monthly_totals, MonthBucket, MonthKey};
pub use reports::{Report, ReportQuery, ReportRow, PAGE_SIZE};

/// Whether a transaction with `due_date` and `status` is overdue as of `today`.
///
/// Only a `Pending` transaction with a due date strictly before `today` is overdue. A `Paid`
/// transaction is never overdue, and neither is one without a due date.
pub fn is_overdue(
    due_date: Option<IsoDate>,
    status: Option<TransactionStatus>,
    today: NaiveDate,
) -> bool {
    match (due_date, status) {
        (Some(due), Some(TransactionStatus::Pending)) => due.date() < today,
        _ => false,
    }
}

/// The current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `is_overdue` as of the current local date.
pub fn is_overdue_today(due_date: Option<IsoDate>, status: Option<TransactionStatus>) -> bool {
    is_overdue(due_date, status, today())
}
