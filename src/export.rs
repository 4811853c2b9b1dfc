//! Writes the rows behind a view as CSV. The rows are fully materialized by the views module;
//! this only decides the columns and their text.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{IsoDate, Transaction};
use crate::views::{DueView, Inventory, ReportRow};
use crate::Result;
use anyhow::Context;
use std::io::Write;

const REPORT_HEADER: [&str; 10] = [
    "Date",
    "Type",
    "Description",
    "Category",
    "Product",
    "Quantity",
    "Status",
    "Due Date",
    "Payment Date",
    "Amount",
];

const DUE_HEADER: [&str; 5] = ["Description", "Issue Date", "Due Date", "Status", "Amount"];

const INVENTORY_HEADER: [&str; 7] = [
    "Name",
    "SKU",
    "Purchase Price",
    "Selling Price",
    "Stock",
    "Value at Purchase",
    "Value at Sale",
];

/// Writes report rows, one per transaction, in the order given.
pub fn write_report<W: Write>(rows: &[ReportRow], out: W) -> Result<()> {
    write_records(out, REPORT_HEADER, rows.iter().map(report_record))
}

/// Writes the rows of a receivables or payables view followed by a total line.
pub fn write_due<W: Write>(view: &DueView, out: W) -> Result<()> {
    let total = [
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        view.total.to_string(),
    ];
    let records = view
        .rows
        .iter()
        .map(|row| {
            [
                row.transaction.description.clone(),
                row.transaction.date.to_string(),
                date_text(row.transaction.due_date),
                status_text(&row.transaction, row.is_overdue),
                row.transaction.amount.to_string(),
            ]
        })
        .chain(std::iter::once(total));
    write_records(out, DUE_HEADER, records)
}

/// Writes one row per product followed by a total line.
pub fn write_inventory<W: Write>(inventory: &Inventory, out: W) -> Result<()> {
    let totals = &inventory.totals;
    let total = [
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        totals.stock_units.to_string(),
        totals.value_at_purchase.to_string(),
        totals.value_at_sale.to_string(),
    ];
    let records = inventory
        .rows
        .iter()
        .map(|row| {
            [
                row.product.name.clone(),
                row.product.sku.clone(),
                row.product.purchase_price.to_string(),
                row.product.selling_price.to_string(),
                row.product.stock.to_string(),
                row.value_at_purchase.to_string(),
                row.value_at_sale.to_string(),
            ]
        })
        .chain(std::iter::once(total));
    write_records(out, INVENTORY_HEADER, records)
}

fn report_record(row: &ReportRow) -> [String; 10] {
    let t = &row.transaction;
    [
        t.date.to_string(),
        t.kind.to_string(),
        t.description.clone(),
        t.category.clone(),
        row.resolved_product_name.clone().unwrap_or_default(),
        t.quantity.map(|q| q.to_string()).unwrap_or_default(),
        status_text(t, row.is_overdue),
        date_text(t.due_date),
        date_text(t.payment_date),
        t.amount.to_string(),
    ]
}

/// `overdue` replaces the stored status when the due date has passed.
fn status_text(t: &Transaction, is_overdue: bool) -> String {
    if is_overdue {
        return "overdue".to_string();
    }
    t.status.map(|s| s.to_string()).unwrap_or_default()
}

fn date_text(date: Option<IsoDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

fn write_records<W, H, I, R>(out: W, header: H, records: I) -> Result<()>
where
    W: Write,
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    write_records_inner(out, header, records).pub_result(ErrorType::Io)
}

fn write_records_inner<W, H, I, R>(out: W, header: H, records: I) -> Res<()>
where
    W: Write,
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(header)
        .context("Unable to write the CSV header")?;
    for record in records {
        writer
            .write_record(record)
            .context("Unable to write a CSV row")?;
    }
    writer.flush().context("Unable to flush the CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TransactionStatus, TransactionType};
    use crate::test::{due, product, transaction, with_product};
    use crate::views::{DueFilter, DueSide, Report, ReportQuery};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn to_string(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_write_report() {
        let products = vec![product("p1", "Taza, grande", 2, 6, 10)];
        let transactions = vec![
            with_product(
                transaction("a", TransactionType::Income, "2024-03-01", 12),
                "p1",
                2,
            ),
            due(
                transaction("b", TransactionType::Expense, "2024-04-01", 30),
                "2024-05-01",
                TransactionStatus::Pending,
            ),
        ];
        let report = Report::build(&products, &transactions, &ReportQuery::new(), 10, today());
        let mut out = Vec::new();
        write_report(&report.rows, &mut out).unwrap();
        let text = to_string(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Type,Description,Category,Product,Quantity,Status,Due Date,Payment Date,Amount"
        );
        assert_eq!(
            lines[1],
            "2024-04-01,expense,Movimiento b,Otros Gastos,,,overdue,2024-05-01,,30.00"
        );
        // The product name contains a comma, so it is quoted.
        assert_eq!(
            lines[2],
            "2024-03-01,income,Movimiento a,Otros Ingresos,\"Taza, grande\",2,,,,12.00"
        );
    }

    #[test]
    fn test_write_due() {
        let transactions = vec![
            due(
                transaction("a", TransactionType::Income, "2024-05-01", 100),
                "2024-06-01",
                TransactionStatus::Pending,
            ),
            due(
                transaction("b", TransactionType::Income, "2024-05-02", 40),
                "2024-07-01",
                TransactionStatus::Pending,
            ),
        ];
        let view = DueView::build(&transactions, DueSide::Receivable, DueFilter::All, today());
        let mut out = Vec::new();
        write_due(&view, &mut out).unwrap();
        let text = to_string(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Description,Issue Date,Due Date,Status,Amount");
        assert_eq!(lines[1], "Movimiento a,2024-05-01,2024-06-01,overdue,100.00");
        assert_eq!(lines[2], "Movimiento b,2024-05-02,2024-07-01,pending,40.00");
        assert_eq!(lines[3], "Total,,,,140.00");
    }

    #[test]
    fn test_write_inventory() {
        let inventory = Inventory::build(&[
            product("p1", "Camiseta", 8, 15, 4),
            product("p2", "Taza", 3, 10, 1),
        ]);
        let mut out = Vec::new();
        write_inventory(&inventory, &mut out).unwrap();
        let text = to_string(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Camiseta,SKU-p1,8.00,15.00,4,32.00,60.00");
        assert_eq!(lines[3], "Total,,,,5,35.00,70.00");
    }

    #[test]
    fn test_empty_inventory_still_has_header_and_total() {
        let mut out = Vec::new();
        write_inventory(&Inventory::build(&[]), &mut out).unwrap();
        let text = to_string(out);
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.lines().last(), Some("Total,,,,0,0.00,0.00"));
    }
}
