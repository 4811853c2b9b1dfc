//! The reports screen: a filtered, searchable and paginated transaction list with its own chart.

use crate::model::{product_name, Amount, IsoDate, Product, Transaction, TransactionType};
use crate::views::is_overdue;
use crate::views::monthly::{monthly_totals, MonthBucket, MonthKey};
use chrono::NaiveDate;
use serde::Serialize;

/// The default number of rows per page.
pub const PAGE_SIZE: usize = 10;

/// The filters and current page of the reports screen. Every filter setter sends the user back to
/// the first page; only `set_page` moves between pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    kind: Option<TransactionType>,
    category: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    search: String,
    page: usize,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            kind: None,
            category: None,
            start: None,
            end: None,
            search: String::new(),
            page: 1,
        }
    }
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<TransactionType> {
        self.kind
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// The requested page, 1-based. `Report::build` clamps it to the pages that exist.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_kind(&mut self, kind: Option<TransactionType>) {
        self.kind = kind;
        self.page = 1;
    }

    /// `None` or an empty string means every category.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
        self.page = 1;
    }

    /// Inclusive.
    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        self.start = start;
        self.page = 1;
    }

    /// Inclusive.
    pub fn set_end(&mut self, end: Option<NaiveDate>) {
        self.end = end;
        self.page = 1;
    }

    /// Restricts the date range to `month`.
    pub fn set_month(&mut self, month: MonthKey) {
        self.start = month.first_day();
        self.end = month.last_day();
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    fn matches(&self, t: &Transaction, product: Option<&str>, needle: &str) -> bool {
        if self.kind.is_some_and(|kind| kind != t.kind) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != t.category) {
            return false;
        }
        let date = t.date.date();
        if self.start.is_some_and(|start| date < start) {
            return false;
        }
        if self.end.is_some_and(|end| date > end) {
            return false;
        }
        needle.is_empty()
            || t.description.to_lowercase().contains(needle)
            || product.is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

/// A transaction as listed in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The transaction's own `product_name`, or else the name of the product it references.
    pub resolved_product_name: Option<String>,
    pub is_overdue: bool,
}

/// One page of a report plus the figures computed over every matching row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The rows of the current page.
    pub rows: Vec<ReportRow>,
    /// 1-based. Always 1 when nothing matched.
    pub page: usize,
    /// Zero when nothing matched.
    pub total_pages: usize,
    pub total_rows: usize,
    pub total_income: Amount,
    pub total_expense: Amount,
    /// Monthly totals over every matching row, not only the current page.
    pub chart: Vec<MonthBucket>,
}

impl Report {
    pub fn build(
        products: &[Product],
        transactions: &[Transaction],
        query: &ReportQuery,
        page_size: usize,
        today: NaiveDate,
    ) -> Self {
        let rows = filter_rows(products, transactions, query, today);
        let page_size = page_size.max(1);
        let total_rows = rows.len();
        let total_pages = total_rows.div_ceil(page_size);
        let page = query.page.clamp(1, total_pages.max(1));

        let chart = monthly_totals(rows.iter().map(|r| &r.transaction));
        let (total_income, total_expense) =
            rows.iter()
                .fold((Amount::ZERO, Amount::ZERO), |(income, expense), r| {
                    match r.transaction.kind {
                        TransactionType::Income => (income + r.transaction.amount, expense),
                        TransactionType::Expense => (income, expense + r.transaction.amount),
                    }
                });

        let rows = rows
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        Self {
            rows,
            page,
            total_pages,
            total_rows,
            total_income,
            total_expense,
            chart,
        }
    }
}

/// Every row that matches `query`, newest first. This ignores pagination and is what gets
/// exported.
pub fn filter_rows(
    products: &[Product],
    transactions: &[Transaction],
    query: &ReportQuery,
    today: NaiveDate,
) -> Vec<ReportRow> {
    let needle = query.search.to_lowercase();
    let mut rows: Vec<ReportRow> = transactions
        .iter()
        .filter_map(|t| {
            let resolved = t.product_name.clone().or_else(|| {
                t.product_id
                    .as_deref()
                    .and_then(|id| product_name(products, id))
                    .map(str::to_string)
            });
            query
                .matches(t, resolved.as_deref(), &needle)
                .then(|| ReportRow {
                    is_overdue: is_overdue(t.due_date, t.status, today),
                    resolved_product_name: resolved,
                    transaction: t.clone(),
                })
        })
        .collect();
    rows.sort_by(|a, b| b.transaction.date.cmp(&a.transaction.date));
    rows
}

impl ReportQuery {
    /// Builds a query from optional CLI-style arguments.
    pub fn from_parts(
        kind: Option<TransactionType>,
        category: Option<String>,
        start: Option<IsoDate>,
        end: Option<IsoDate>,
        month: Option<MonthKey>,
        search: Option<String>,
        page: usize,
    ) -> Self {
        let mut query = Self::new();
        query.set_kind(kind);
        query.set_category(category);
        query.set_start(start.map(|d| d.date()));
        query.set_end(end.map(|d| d.date()));
        if let Some(month) = month {
            query.set_month(month);
        }
        if let Some(search) = search {
            query.set_search(search);
        }
        query.set_page(page);
        query
    }
}
