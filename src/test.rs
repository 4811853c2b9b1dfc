//! Shared test utilities for building fixtures and test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::TestBackend;
use crate::model::{
    Amount, IsoDate, Product, Transaction, TransactionStatus, TransactionType,
};
use crate::{Config, Store};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;

/// Test environment with a bizdash home directory and a seeded in-memory backend.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
    backend: Arc<TestBackend>,
}

impl TestEnv {
    /// Creates a home directory and a `TestBackend` with the default seed data.
    pub async fn new() -> Self {
        Self::with_backend(TestBackend::default()).await
    }

    pub async fn with_backend(backend: TestBackend) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("bizdash");
        let config = Config::create(&root, "http://localhost:5001/api")
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
            backend: Arc::new(backend),
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn backend(&self) -> Arc<TestBackend> {
        self.backend.clone()
    }

    /// A fresh store over this environment's backend. The store has not been bootstrapped.
    pub fn store(&self) -> Store {
        Store::new(self.backend.clone())
    }
}

/// A product with whole-number prices.
pub fn product(id: &str, name: &str, purchase: i64, selling: i64, stock: u64) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        sku: format!("SKU-{id}"),
        purchase_price: Amount::from(purchase),
        selling_price: Amount::from(selling),
        stock,
        image_url: None,
        created_at: None,
        updated_at: None,
    }
}

/// A transaction with no product, due date or status. The category is a generic one for `kind`.
pub fn transaction(id: &str, kind: TransactionType, date: &str, amount: i64) -> Transaction {
    let category = match kind {
        TransactionType::Income => "Otros Ingresos",
        TransactionType::Expense => "Otros Gastos",
    };
    Transaction {
        id: id.to_string(),
        kind,
        date: IsoDate::from_str(date).unwrap(),
        description: format!("Movimiento {id}"),
        amount: Amount::from(amount),
        category: category.to_string(),
        product_id: None,
        product_name: None,
        quantity: None,
        due_date: None,
        status: None,
        payment_date: None,
        created_at: None,
        updated_at: None,
    }
}

/// Adds a due date and status to `t`.
pub fn due(mut t: Transaction, due_date: &str, status: TransactionStatus) -> Transaction {
    t.due_date = Some(IsoDate::from_str(due_date).unwrap());
    t.status = Some(status);
    t
}

/// Makes `t` reference `quantity` units of `product_id`.
pub fn with_product(mut t: Transaction, product_id: &str, quantity: u64) -> Transaction {
    t.product_id = Some(product_id.to_string());
    t.quantity = Some(quantity);
    t
}
