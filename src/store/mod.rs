//! The application store: the single client-side source of truth for products and transactions.
//!
//! Every mutation goes through the backend of record. After the backend confirms a change, the
//! affected collections are fetched again and replaced wholesale; nothing is patched locally.
//!
//! The store does not serialize its operations. If two operations run concurrently, each sets
//! `is_loading` on its own and whichever finishes last decides the final snapshot.

mod state;

use crate::api::Backend;
use crate::error::Error;
use crate::model::{IsoDate, NewProduct, NewTransaction, Product, Transaction};
use crate::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, trace, warn};

pub use state::{reduce, Action, AppState, ViewName};

/// Holds the `AppState` and mediates all changes to it. Create one per application (or per test)
/// and pass it by reference to whatever needs it.
pub struct Store {
    backend: Arc<dyn Backend>,
    state: watch::Sender<AppState>,
}

impl Store {
    /// Creates a store in the initial empty, loading state. Call `bootstrap` to populate it.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self { backend, state }
    }

    /// A copy of the current snapshot.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Returns a receiver that is notified after every dispatched action.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Applies `action` to the snapshot and notifies subscribers.
    pub fn dispatch(&self, action: Action) {
        trace!("dispatch {action:?}");
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, action);
        });
    }

    /// Loads products and then transactions. The transactions request is not issued until the
    /// products request has finished, and it is issued even if the products request failed.
    /// Returns the first error, which is also the one left in `AppState::error`.
    pub async fn bootstrap(&self) -> Result<()> {
        debug!("Loading initial data");
        self.dispatch(Action::SetLoading(true));
        let products = self.fetch_products().await;
        let transactions = self.fetch_transactions().await;
        let result = products.and(transactions);
        if let Err(e) = &result {
            // the second fetch starts a new loading cycle, which cleared the first error
            self.dispatch(Action::SetError(e.message()));
        }
        result
    }

    /// Replaces the product list with the backend's.
    pub async fn fetch_products(&self) -> Result<()> {
        self.dispatch(Action::SetLoading(true));
        match self.backend.get_products().await {
            Ok(products) => {
                debug!("Fetched {} products", products.len());
                self.dispatch(Action::SetProducts(products));
                Ok(())
            }
            Err(e) => Err(self.record("Failed to fetch products", e)),
        }
    }

    /// Replaces the transaction list with the backend's.
    pub async fn fetch_transactions(&self) -> Result<()> {
        self.dispatch(Action::SetLoading(true));
        match self.backend.get_transactions().await {
            Ok(transactions) => {
                debug!("Fetched {} transactions", transactions.len());
                self.dispatch(Action::SetTransactions(transactions));
                Ok(())
            }
            Err(e) => Err(self.record("Failed to fetch transactions", e)),
        }
    }

    /// Creates a product and then fetches the product list again. Returns the product as the
    /// backend created it.
    ///
    /// If the product is created but the refresh fails, the created product is still returned;
    /// the refresh failure is left in `AppState::error`.
    pub async fn add_product(&self, product: NewProduct) -> Result<Product> {
        self.dispatch(Action::SetLoading(true));
        let result = match self.backend.create_product(&product).await {
            Ok(created) => {
                debug!("Created product {}", created.id);
                if let Err(e) = self.fetch_products().await {
                    warn!("Product {} was created but the list was not refreshed: {e}", created.id);
                }
                Ok(created)
            }
            Err(e) => Err(self.record("Failed to add product", e)),
        };
        self.dispatch(Action::SetLoading(false));
        result
    }

    /// Creates a transaction and then fetches the transaction list again. When the transaction
    /// moves units of a product the product list is fetched too, since the backend adjusts stock.
    pub async fn add_transaction(&self, transaction: NewTransaction) -> Result<Transaction> {
        self.dispatch(Action::SetLoading(true));
        let result = match self.backend.create_transaction(&transaction).await {
            Ok(created) => {
                debug!("Created transaction {}", created.id);
                let refresh = self.fetch_transactions().await;
                if let Err(e) = &refresh {
                    warn!("Transaction {} was created but the list was not refreshed: {e}", created.id);
                }
                if transaction.references_stock() {
                    if let Err(e) = self.fetch_products().await {
                        warn!("Stock may be stale after transaction {}: {e}", created.id);
                    }
                    // the products fetch starts a new loading cycle, which cleared the first error
                    if let Err(e) = &refresh {
                        self.dispatch(Action::SetError(e.message()));
                    }
                }
                Ok(created)
            }
            Err(e) => Err(self.record("Failed to add transaction", e)),
        };
        self.dispatch(Action::SetLoading(false));
        result
    }

    /// Marks a pending transaction as paid on `payment_date` and fetches the transaction list
    /// again.
    pub async fn mark_transaction_as_paid(&self, id: &str, payment_date: IsoDate) -> Result<()> {
        self.dispatch(Action::SetLoading(true));
        let result = match self.backend.mark_transaction_as_paid(id, payment_date).await {
            Ok(()) => {
                debug!("Marked transaction {id} as paid on {payment_date}");
                if let Err(e) = self.fetch_transactions().await {
                    warn!("Transaction {id} was marked as paid but the list was not refreshed: {e}");
                }
                Ok(())
            }
            Err(e) => Err(self.record("Failed to mark transaction as paid", e)),
        };
        self.dispatch(Action::SetLoading(false));
        result
    }

    /// Logs `e`, stores its message in the snapshot and hands it back.
    fn record(&self, what: &str, e: Error) -> Error {
        error!("{what}: {e:#}");
        self.dispatch(Action::SetError(e.message()));
        e
    }
}
