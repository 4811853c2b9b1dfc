//! The client-side snapshot and the reducer that is the only way to change it.

use crate::model::{Product, Transaction};
use serde::{Deserialize, Serialize};

/// The screens of the dashboard.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum ViewName {
    #[default]
    Dashboard,
    DataEntry,
    Reports,
    AccountsReceivable,
    AccountsPayable,
    InventoryList,
}

serde_plain::derive_display_from_serialize!(ViewName);
serde_plain::derive_fromstr_from_deserialize!(ViewName);

/// The store's snapshot of the backend of record plus a little UI state.
///
/// `is_loading` is true only while a fetch or mutation is outstanding. `error` is only set after a
/// failed network operation and is cleared whenever a new loading cycle begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub products: Vec<Product>,
    pub transactions: Vec<Transaction>,
    pub active_view: ViewName,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AppState {
    /// Empty and loading, as at process start before the bootstrap fetches.
    fn default() -> Self {
        Self {
            products: Vec::new(),
            transactions: Vec::new(),
            active_view: ViewName::default(),
            is_loading: true,
            error: None,
        }
    }
}

/// A state transition. Collections are only ever replaced wholesale from a fetch; there are no
/// incremental add or update actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Sets `is_loading`. Setting it to `true` also clears `error`.
    SetLoading(bool),
    /// Sets `error` and forces `is_loading` to `false`.
    SetError(String),
    /// Replaces the product list and sets `is_loading` to `false`.
    SetProducts(Vec<Product>),
    /// Replaces the transaction list and sets `is_loading` to `false`.
    SetTransactions(Vec<Transaction>),
    /// Changes the active screen. No I/O.
    SetView(ViewName),
}

/// Applies `action` to `state`, returning the new state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::SetLoading(is_loading) => AppState {
            is_loading,
            error: if is_loading { None } else { state.error },
            ..state
        },
        Action::SetError(message) => AppState {
            is_loading: false,
            error: Some(message),
            ..state
        },
        Action::SetProducts(products) => AppState {
            products,
            is_loading: false,
            ..state
        },
        Action::SetTransactions(transactions) => AppState {
            transactions,
            is_loading: false,
            ..state
        },
        Action::SetView(active_view) => AppState {
            active_view,
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{product, transaction};
    use crate::model::TransactionType;

    #[test]
    fn test_initial_state_is_empty_and_loading() {
        let state = AppState::default();
        assert!(state.is_loading);
        assert!(state.error.is_none());
        assert!(state.products.is_empty());
        assert_eq!(state.active_view, ViewName::Dashboard);
    }

    #[test]
    fn test_set_loading_true_clears_error() {
        let state = reduce(AppState::default(), Action::SetError("boom".to_string()));
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("boom"));

        let state = reduce(state, Action::SetLoading(true));
        assert!(state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_set_loading_false_keeps_error() {
        let state = reduce(AppState::default(), Action::SetError("boom".to_string()));
        let state = reduce(state, Action::SetLoading(false));
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_set_collections_replace_and_stop_loading() {
        let state = reduce(
            AppState::default(),
            Action::SetProducts(vec![product("p1", "Taza", 2, 5, 3)]),
        );
        assert!(!state.is_loading);
        assert_eq!(state.products.len(), 1);

        let state = reduce(state, Action::SetLoading(true));
        let state = reduce(
            state,
            Action::SetTransactions(vec![transaction(
                "t1",
                TransactionType::Income,
                "2024-01-01",
                10,
            )]),
        );
        assert!(!state.is_loading);
        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.products.len(), 1);

        let state = reduce(state, Action::SetProducts(Vec::new()));
        assert!(state.products.is_empty());
    }

    #[test]
    fn test_set_view_changes_only_view() {
        let before = AppState::default();
        let after = reduce(before.clone(), Action::SetView(ViewName::InventoryList));
        assert_eq!(after.active_view, ViewName::InventoryList);
        assert_eq!(after.is_loading, before.is_loading);
    }

    #[test]
    fn test_view_name_wire_format() {
        assert_eq!(ViewName::AccountsReceivable.to_string(), "accountsReceivable");
        assert_eq!(
            "inventoryList".parse::<ViewName>().unwrap(),
            ViewName::InventoryList
        );
    }
}
