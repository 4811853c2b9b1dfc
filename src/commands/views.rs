//! The read-only screens: dashboard, receivables, payables, report and inventory.

use crate::args::{DueArgs, ReportArgs};
use crate::commands::{count, Out};
use crate::store::{Action, Store, ViewName};
use crate::views::{
    self, Dashboard, DueSide, DueView, Inventory, MonthBucket, ProductMetrics, Report,
};
use crate::{Config, Result};
use std::fmt::Write;
use tracing::warn;

/// Loads everything and computes the dashboard.
pub async fn dashboard(config: &Config, store: &Store) -> Result<Out<Dashboard>> {
    store.dispatch(Action::SetView(ViewName::Dashboard));
    store.bootstrap().await?;
    let state = store.state();
    let dashboard = Dashboard::build(
        &state.products,
        &state.transactions,
        config.inventory_category(),
    );

    let mut message = format!(
        "Income {}, expenses {}, net profit {}",
        dashboard.total_income, dashboard.total_expenses, dashboard.net_profit
    );
    ranking(&mut message, "Top revenue", &dashboard.top_by_revenue, |m| {
        m.revenue.to_string()
    });
    ranking(&mut message, "Most sold", &dashboard.top_by_units_sold, |m| {
        format!("{} units", m.units_sold)
    });
    ranking(
        &mut message,
        "Most purchased",
        &dashboard.top_by_units_purchased,
        |m| format!("{} units", m.units_purchased),
    );
    ranking(&mut message, "Slow moving", &dashboard.slow_moving, |m| {
        format!("{} sold, {} in stock", m.units_sold, m.stock)
    });
    chart(&mut message, &dashboard.monthly);
    Ok(Out::new(message, dashboard))
}

/// Unpaid income.
pub async fn receivables(store: &Store, args: DueArgs) -> Result<Out<DueView>> {
    store.dispatch(Action::SetView(ViewName::AccountsReceivable));
    due(store, DueSide::Receivable, args).await
}

/// Unpaid expenses.
pub async fn payables(store: &Store, args: DueArgs) -> Result<Out<DueView>> {
    store.dispatch(Action::SetView(ViewName::AccountsPayable));
    due(store, DueSide::Payable, args).await
}

async fn due(store: &Store, side: DueSide, args: DueArgs) -> Result<Out<DueView>> {
    store.fetch_transactions().await?;
    let view = DueView::build(
        &store.state().transactions,
        side,
        args.filter,
        views::today(),
    );

    let noun = match side {
        DueSide::Receivable => "receivables",
        DueSide::Payable => "payables",
    };
    let mut message = format!(
        "{} ({}): total {}, overdue {}",
        count(view.rows.len(), noun.trim_end_matches('s'), noun),
        view.filter,
        view.total,
        view.total_overdue
    );
    for row in &view.rows {
        let t = &row.transaction;
        let due = t
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "no due date".to_string());
        let flag = if row.is_overdue { "  OVERDUE" } else { "" };
        let _ = write!(
            message,
            "\n  {}  {}  due {}  {}{}",
            t.id, t.description, due, t.amount, flag
        );
    }
    Ok(Out::new(message, view))
}

/// One page of the filtered transaction list.
pub async fn report(config: &Config, store: &Store, args: ReportArgs) -> Result<Out<Report>> {
    store.dispatch(Action::SetView(ViewName::Reports));
    store.bootstrap().await?;
    let state = store.state();
    let query = args.query();
    let report = Report::build(
        &state.products,
        &state.transactions,
        &query,
        config.page_size(),
        views::today(),
    );
    if report.page != query.page() {
        warn!(
            "Page {} does not exist, showing page {} of {}",
            query.page(),
            report.page,
            report.total_pages
        );
    }

    let mut message = format!(
        "{}, page {} of {}: income {}, expenses {}",
        count(report.total_rows, "transaction", "transactions"),
        report.page,
        report.total_pages,
        report.total_income,
        report.total_expense
    );
    for row in &report.rows {
        let t = &row.transaction;
        let product = row
            .resolved_product_name
            .as_deref()
            .map(|name| format!("  [{name}]"))
            .unwrap_or_default();
        let flag = if row.is_overdue { "  OVERDUE" } else { "" };
        let _ = write!(
            message,
            "\n  {}  {}  {}  {}  {}{}{}",
            t.date, t.kind, t.category, t.amount, t.description, product, flag
        );
    }
    chart(&mut message, &report.chart);
    Ok(Out::new(message, report))
}

/// Stock valuation.
pub async fn inventory(store: &Store) -> Result<Out<Inventory>> {
    store.dispatch(Action::SetView(ViewName::InventoryList));
    store.fetch_products().await?;
    let inventory = Inventory::build(&store.state().products);

    let totals = &inventory.totals;
    let mut message = format!(
        "{}, {} units, valued at {} cost and {} sale",
        count(totals.products, "product", "products"),
        totals.stock_units,
        totals.value_at_purchase,
        totals.value_at_sale
    );
    for row in &inventory.rows {
        let _ = write!(
            message,
            "\n  {}  {}  stock {}  {}  {}",
            row.product.sku,
            row.product.name,
            row.product.stock,
            row.value_at_purchase,
            row.value_at_sale
        );
    }
    Ok(Out::new(message, inventory))
}

fn ranking<F>(message: &mut String, title: &str, metrics: &[ProductMetrics], value: F)
where
    F: Fn(&ProductMetrics) -> String,
{
    if metrics.is_empty() {
        return;
    }
    let _ = write!(message, "\n{title}:");
    for (i, m) in metrics.iter().enumerate() {
        let _ = write!(message, "\n  {}. {}  {}", i + 1, m.name, value(m));
    }
}

fn chart(message: &mut String, buckets: &[MonthBucket]) {
    if buckets.is_empty() {
        return;
    }
    let _ = write!(message, "\nBy month:");
    for b in buckets {
        let _ = write!(
            message,
            "\n  {}  income {}  expenses {}",
            b.label, b.income, b.expense
        );
    }
}
