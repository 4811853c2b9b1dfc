//! These structs provide the CLI interface for the bizdash CLI.

use crate::model::{Amount, IsoDate, TransactionType};
use crate::views::{DueFilter, MonthKey, ReportQuery};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// bizdash: inventory, income and expenses for a small business.
///
/// This program is a client for a bizdash backend API. It lists and records products and
/// transactions, tracks what customers owe you and what you owe suppliers, and computes the
/// dashboard, report and inventory views. Any view can be exported as CSV.
///
/// Run `bizdash init` once to create the configuration, pointing it at your API with --api-url.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. Decide where to keep the configuration and pass
    /// it as --home (by default it is $HOME/bizdash), and pass the base URL of the backend API as
    /// --api-url.
    Init(InitArgs),
    /// List all products.
    Products,
    /// List all transactions.
    Transactions,
    /// Create a product.
    AddProduct(AddProductArgs),
    /// Record an income or expense. Selling a product lowers its stock and buying inventory
    /// raises it.
    AddTransaction(AddTransactionArgs),
    /// Mark a pending receivable or payable as paid.
    MarkPaid(MarkPaidArgs),
    /// Show totals, product rankings and monthly income and expenses.
    Dashboard,
    /// Show unpaid income.
    Receivables(DueArgs),
    /// Show unpaid expenses.
    Payables(DueArgs),
    /// Show a filtered, paginated list of transactions.
    Report(ReportArgs),
    /// Show stock and its value.
    Inventory,
    /// Write a view to a CSV file.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the bizdash configuration is held. Defaults to ~/bizdash
    #[arg(long, env = "BIZDASH_HOME", default_value_t = default_bizdash_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `bizdash init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the backend API.
    #[arg(long, default_value = crate::config::DEFAULT_API_URL)]
    pub api_url: String,
}

/// (Not shown): Args for the `bizdash add-product` command.
#[derive(Debug, Parser, Clone)]
pub struct AddProductArgs {
    #[arg(long)]
    pub name: String,
    /// Stock keeping unit. Must be unique.
    #[arg(long)]
    pub sku: String,
    /// Unit cost, e.g. 8.50
    #[arg(long)]
    pub purchase_price: Amount,
    /// Unit price, e.g. 15.00
    #[arg(long)]
    pub selling_price: Amount,
    /// Units on hand.
    #[arg(long, default_value_t = 0)]
    pub stock: u64,
    #[arg(long)]
    pub image_url: Option<String>,
}

/// (Not shown): Args for the `bizdash add-transaction` command.
#[derive(Debug, Parser, Clone)]
pub struct AddTransactionArgs {
    /// income or expense
    #[arg(long = "type", value_enum)]
    pub kind: TransactionType,
    /// The transaction date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<IsoDate>,
    #[arg(long)]
    pub description: String,
    /// A positive amount, e.g. 49.50
    #[arg(long)]
    pub amount: Amount,
    /// Free-form. Defaults to "Venta de Producto" for income, "Compra de Inventario" for an
    /// expense with --product-id and "Otros Gastos" for any other expense.
    #[arg(long)]
    pub category: Option<String>,
    /// The product sold or bought.
    #[arg(long, requires = "quantity")]
    pub product_id: Option<String>,
    /// Units of --product-id sold or bought.
    #[arg(long, requires = "product_id")]
    pub quantity: Option<u64>,
    /// Makes this a receivable (income) or payable (expense) due on this date.
    #[arg(long)]
    pub due_date: Option<IsoDate>,
}

/// (Not shown): Args for the `bizdash mark-paid` command.
#[derive(Debug, Parser, Clone)]
pub struct MarkPaidArgs {
    /// The id of the transaction.
    pub id: String,
    /// Defaults to today.
    #[arg(long)]
    pub payment_date: Option<IsoDate>,
}

/// (Not shown): Args for the `bizdash receivables` and `bizdash payables` commands.
#[derive(Debug, Parser, Clone, Default)]
pub struct DueArgs {
    /// all, pending (not yet overdue) or overdue
    #[arg(long, value_enum, default_value_t = DueFilter::All)]
    pub filter: DueFilter,
}

/// (Not shown): Args for the `bizdash report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Only income or only expenses.
    #[arg(long = "type", value_enum)]
    pub kind: Option<TransactionType>,
    #[arg(long)]
    pub category: Option<String>,
    /// First date to include, YYYY-MM-DD.
    #[arg(long)]
    pub from: Option<IsoDate>,
    /// Last date to include, YYYY-MM-DD.
    #[arg(long)]
    pub to: Option<IsoDate>,
    /// A single month, as 2024-06 or "jun 2024". Overrides --from and --to.
    #[arg(long)]
    pub month: Option<MonthKey>,
    /// Case-insensitive text to find in the description or product name.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            kind: None,
            category: None,
            from: None,
            to: None,
            month: None,
            search: None,
            page: 1,
        }
    }
}

impl ReportArgs {
    pub fn query(&self) -> ReportQuery {
        ReportQuery::from_parts(
            self.kind,
            self.category.clone(),
            self.from,
            self.to,
            self.month,
            self.search.clone(),
            self.page,
        )
    }
}

/// The views that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportTable {
    Inventory,
    Receivables,
    Payables,
    Report,
}

serde_plain::derive_display_from_serialize!(ExportTable);
serde_plain::derive_fromstr_from_deserialize!(ExportTable);

/// (Not shown): Args for the `bizdash export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Which view to export.
    #[arg(value_enum)]
    pub table: ExportTable,

    /// Where to write the CSV. Defaults to $BIZDASH_HOME/exports/<table>-<date>.csv
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// For receivables and payables.
    #[arg(long, value_enum, default_value_t = DueFilter::All)]
    pub filter: DueFilter,

    /// For report. Every matching row is exported, --page is ignored.
    #[clap(flatten)]
    pub report: ReportArgs,
}

fn default_bizdash_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("bizdash"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or BIZDASH_HOME instead of relying on the default \
                bizdash home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("bizdash")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
