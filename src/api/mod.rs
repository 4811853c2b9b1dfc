//! The backend of record. The `Backend` trait is the seam between the store and the HTTP API so
//! that the whole program can run against an in-memory backend.

mod http;
mod test_backend;

use crate::error::{Error, ErrorType};
use crate::model::{IsoDate, NewProduct, NewTransaction, Product, Transaction};
use crate::{Config, Result};
use std::sync::Arc;
use tracing::debug;

pub use http::HttpBackend;
pub use test_backend::{Endpoint, TestBackend};

/// The path of the products collection, relative to the API base URL.
pub(crate) const PRODUCTS: &str = "products";

/// The path of the transactions collection, relative to the API base URL.
pub(crate) const TRANSACTIONS: &str = "transactions";

/// The name of the environment variable that puts the program in test mode.
pub const TEST_MODE_ENV: &str = "BIZDASH_IN_TEST_MODE";

/// The operations offered by the backend of record. Methods take `&self` so that a single backend
/// can be shared by concurrent store operations.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `GET /products`
    async fn get_products(&self) -> Result<Vec<Product>>;

    /// `POST /products`
    async fn create_product(&self, product: &NewProduct) -> Result<Product>;

    /// `GET /transactions`
    async fn get_transactions(&self) -> Result<Vec<Transaction>>;

    /// `POST /transactions`
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction>;

    /// `PATCH /transactions/{id}/mark-as-paid`
    async fn mark_transaction_as_paid(&self, id: &str, payment_date: IsoDate) -> Result<()>;
}

/// Builds the error for a non-2xx response. `message` is the `message` field of the response body,
/// if there was one.
pub(crate) fn http_error(status: u16, message: Option<String>) -> Error {
    match message {
        Some(message) => Error::msg(ErrorType::HttpMessage, message),
        None => Error::msg(ErrorType::Http, format!("HTTP error! status: {status}")),
    }
}

/// Which `Backend` implementation to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the configured HTTP API.
    #[default]
    Http,
    /// Use the seeded in-memory `TestBackend`.
    Testing,
}

impl Mode {
    /// Returns `Mode::Testing` when `BIZDASH_IN_TEST_MODE` is set to a non-empty value.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(s) if !s.is_empty() => Mode::Testing,
            _ => Mode::Http,
        }
    }
}

/// Creates the `Backend` for `mode`.
pub fn backend(config: &Config, mode: Mode) -> Result<Arc<dyn Backend>> {
    match mode {
        Mode::Http => {
            debug!("Using the HTTP backend at {}", config.api_url());
            Ok(Arc::new(HttpBackend::new(config.api_url())?))
        }
        Mode::Testing => {
            debug!("Using the in-memory test backend");
            Ok(Arc::new(TestBackend::default()))
        }
    }
}
