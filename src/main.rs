use bizdash::args::{Args, Command};
use bizdash::{api, commands, Config, Mode, Result, Store};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    if let Command::Init(init_args) = args.command() {
        commands::init(home, &init_args.api_url).await?.print();
        return Ok(());
    }

    let config = Config::load(home).await?;

    // This allows for running the program without a backend. When BIZDASH_IN_TEST_MODE is set
    // and non-empty, the in-memory seeded backend is used instead of the configured API.
    let mode = Mode::from_env();
    let store = Store::new(api::backend(&config, mode)?);

    let _: () = match args.command() {
        Command::Init(_) => {}
        Command::Products => commands::products(&store).await?.print(),
        Command::Transactions => commands::transactions(&store).await?.print(),
        Command::AddProduct(a) => commands::add_product(&store, a.clone()).await?.print(),
        Command::AddTransaction(a) => commands::add_transaction(&store, a.clone())
            .await?
            .print(),
        Command::MarkPaid(a) => commands::mark_paid(&store, a.clone()).await?.print(),
        Command::Dashboard => commands::dashboard(&config, &store).await?.print(),
        Command::Receivables(a) => commands::receivables(&store, a.clone()).await?.print(),
        Command::Payables(a) => commands::payables(&store, a.clone()).await?.print(),
        Command::Report(a) => commands::report(&config, &store, a.clone()).await?.print(),
        Command::Inventory => commands::inventory(&store).await?.print(),
        Command::Export(a) => commands::export(&config, &store, a.clone()).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
