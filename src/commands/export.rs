use crate::args::{ExportArgs, ExportTable};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::store::Store;
use crate::views::{self, DueSide, DueView, Inventory};
use crate::{export as csv_export, utils, Config, Result};
use anyhow::Context;
use std::path::PathBuf;
use tracing::debug;

/// Computes a view and writes it to a CSV file. The report export contains every matching row,
/// not only one page.
///
/// Returns the path that was written.
pub async fn export(config: &Config, store: &Store, args: ExportArgs) -> Result<Out<PathBuf>> {
    let today = views::today();
    let mut buf = Vec::new();
    let rows = match args.table {
        ExportTable::Inventory => {
            store.fetch_products().await?;
            let inventory = Inventory::build(&store.state().products);
            csv_export::write_inventory(&inventory, &mut buf)?;
            inventory.rows.len()
        }
        ExportTable::Receivables | ExportTable::Payables => {
            let side = if args.table == ExportTable::Receivables {
                DueSide::Receivable
            } else {
                DueSide::Payable
            };
            store.fetch_transactions().await?;
            let view = DueView::build(&store.state().transactions, side, args.filter, today);
            csv_export::write_due(&view, &mut buf)?;
            view.rows.len()
        }
        ExportTable::Report => {
            store.bootstrap().await?;
            let state = store.state();
            let rows = views::reports::filter_rows(
                &state.products,
                &state.transactions,
                &args.report.query(),
                today,
            );
            csv_export::write_report(&rows, &mut buf)?;
            rows.len()
        }
    };

    let path = args
        .output
        .unwrap_or_else(|| config.exports().join(format!("{}-{today}.csv", args.table)));
    debug!("Writing {} bytes to {}", buf.len(), path.display());
    utils::write(&path, &buf)
        .await
        .context("Unable to save the export")
        .pub_result(ErrorType::Io)?;

    Ok(Out::new(
        format!("Exported {rows} {} rows to {}", args.table, path.display()),
        path,
    ))
}
