//! Implements the `Backend` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a running API server.

use crate::api::{http_error, Backend};
use crate::error::{ErrorType, IntoResult};
use crate::model::{
    IsoDate, NewProduct, NewTransaction, Product, Transaction, TransactionStatus,
    INVENTORY_PURCHASE,
};
use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::trace;
use uuid::Uuid;

/// Identifies one of the backend operations, used to count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetProducts,
    CreateProduct,
    GetTransactions,
    CreateTransaction,
    MarkAsPaid,
}

/// A failure that the next call will return instead of doing its work.
#[derive(Debug, Clone)]
struct Failure {
    status: u16,
    message: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    transactions: Vec<Transaction>,
    calls: HashMap<Endpoint, usize>,
    fail_next: Option<Failure>,
}

/// An implementation of the `Backend` trait that does not use the network. It holds its data in
/// memory and, by default, is seeded with some existing data. It behaves like the real backend in
/// the ways the client depends on: it assigns ids, adjusts stock when a transaction moves units
/// and rejects unknown ids.
#[derive(Debug)]
pub struct TestBackend {
    inner: Mutex<Inner>,
}

impl TestBackend {
    /// Create a new `TestBackend` holding `products` and `transactions`.
    pub fn new(products: Vec<Product>, transactions: Vec<Transaction>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                products,
                transactions,
                ..Inner::default()
            }),
        }
    }

    /// Create a `TestBackend` with no data.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// The number of times `endpoint` has been called, including calls that failed.
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.get(&endpoint).copied().unwrap_or(0)
    }

    /// Makes the next call, whichever it is, fail with `status`. When `message` is `Some` it is
    /// returned the way the API returns a JSON `message`, otherwise the failure looks like a
    /// response with an unparseable body.
    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        self.lock().fail_next = Some(Failure {
            status,
            message: message.map(str::to_string),
        });
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked while holding it, the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Counts the call and returns the data, or the pending failure if one was set.
    fn begin(&self, endpoint: Endpoint) -> Result<MutexGuard<'_, Inner>> {
        trace!("test backend call {endpoint:?}");
        let mut inner = self.lock();
        *inner.calls.entry(endpoint).or_default() += 1;
        match inner.fail_next.take() {
            Some(f) => Err(http_error(f.status, f.message)),
            None => Ok(inner),
        }
    }
}

#[async_trait::async_trait]
impl Backend for TestBackend {
    async fn get_products(&self) -> Result<Vec<Product>> {
        let inner = self.begin(Endpoint::GetProducts)?;
        Ok(inner.products.clone())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let mut inner = self.begin(Endpoint::CreateProduct)?;
        if product.name.trim().is_empty() || product.sku.trim().is_empty() {
            return Err(http_error(
                400,
                Some("Name and SKU are required".to_string()),
            ));
        }
        if inner.products.iter().any(|p| p.sku == product.sku) {
            return Err(http_error(
                400,
                Some(format!("A product with SKU '{}' already exists", product.sku)),
            ));
        }
        let created = product.clone().into_product(Uuid::new_v4().to_string());
        inner.products.push(created.clone());
        Ok(created)
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>> {
        let inner = self.begin(Endpoint::GetTransactions)?;
        Ok(inner.transactions.clone())
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let mut inner = self.begin(Endpoint::CreateTransaction)?;
        let mut created = transaction
            .clone()
            .into_transaction(Uuid::new_v4().to_string());

        if let Some((product_id, quantity)) = created.product_units() {
            let product = inner
                .products
                .iter_mut()
                .find(|p| p.id == product_id)
                .ok_or_else(|| http_error(404, Some("Product not found".to_string())))?;
            if created.is_income() {
                if product.stock < quantity {
                    return Err(http_error(
                        400,
                        Some(format!("Insufficient stock for {}", product.name)),
                    ));
                }
                product.stock -= quantity;
            } else if created.is_expense() && created.category == INVENTORY_PURCHASE {
                product.stock += quantity;
            }
            created.product_name = Some(product.name.clone());
        }

        inner.transactions.push(created.clone());
        Ok(created)
    }

    async fn mark_transaction_as_paid(&self, id: &str, payment_date: IsoDate) -> Result<()> {
        let mut inner = self.begin(Endpoint::MarkAsPaid)?;
        let transaction = inner
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| http_error(404, Some("Transaction not found".to_string())))?;
        transaction.status = Some(TransactionStatus::Paid);
        transaction.payment_date = Some(payment_date);
        Ok(())
    }
}

impl Default for TestBackend {
    /// Loads seed data from this module.
    fn default() -> Self {
        let (products, transactions) = seed_data();
        Self::new(products, transactions)
    }
}

/// Provides the seed data from this module. The seed constants are fixed, so failing to parse them
/// is a bug that the tests in this module catch.
fn seed_data() -> (Vec<Product>, Vec<Transaction>) {
    let products = load_csv(PRODUCT_DATA).unwrap_or_default();
    let transactions = load_csv(TRANSACTION_DATA).unwrap_or_default();
    (products, transactions)
}

/// Loads records from a CSV-formatted string with a header row.
fn load_csv<T>(csv_data: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result
            .context("Unable to parse seed data")
            .pub_result(ErrorType::Decode)?;
        records.push(record);
    }
    Ok(records)
}

/// Seed product data.
const PRODUCT_DATA: &str = r##"id,name,sku,purchasePrice,sellingPrice,stock
prod-001,Camiseta Básica,CAM-001,8.50,15.00,40
prod-002,Taza de Cerámica,TAZ-002,3.20,9.90,25
prod-003,Cuaderno A5,CUA-003,1.75,4.50,120
prod-004,Botella Térmica,BOT-004,11.00,24.00,0
prod-005,Gorra Bordada,GOR-005,6.00,14.00,12
"##;

/// Seed transaction data.
const TRANSACTION_DATA: &str = r##"id,type,date,description,amount,category,productId,productName,quantity,dueDate,status,paymentDate
tx-001,expense,2024-01-08,Compra inicial de camisetas,425.00,Compra de Inventario,prod-001,Camiseta Básica,50,,paid,2024-01-08
tx-002,expense,2024-01-10,Compra de tazas,96.00,Compra de Inventario,prod-002,Taza de Cerámica,30,,paid,2024-01-10
tx-003,income,2024-01-22,Venta camisetas feria,150.00,Venta de Producto,prod-001,Camiseta Básica,10,,paid,2024-01-22
tx-004,expense,2024-02-01,Alquiler febrero,800.00,Alquiler,,,,,paid,2024-02-01
tx-005,income,2024-02-14,Venta tazas San Valentín,49.50,Venta de Producto,prod-002,Taza de Cerámica,5,,paid,2024-02-14
tx-006,income,2024-03-05,Consultoría diseño,600.00,Servicios,,,,2024-04-05,paid,2024-04-02
tx-007,expense,2024-03-18,Campaña redes sociales,220.00,Marketing,,,,,paid,2024-03-18
tx-008,expense,2024-03-25,Compra de cuadernos,210.00,Compra de Inventario,prod-003,Cuaderno A5,120,,paid,2024-03-25
tx-009,income,2024-04-03,Factura cliente Rivera,1250.00,Factura Emitida,,,,2024-05-03,pending,
tx-010,expense,2024-04-10,Factura proveedor textil,540.00,Factura de Proveedor,,,,2024-05-10,pending,
tx-011,income,2099-01-15,Factura cliente Soto,430.00,Factura Emitida,,,,2099-02-15,pending,
tx-012,expense,2099-01-20,Factura imprenta,180.00,Factura de Proveedor,,,,2099-02-20,pending,
"##;
