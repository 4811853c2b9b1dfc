//! Listing and recording products and transactions.

use crate::args::{AddProductArgs, AddTransactionArgs, MarkPaidArgs};
use crate::commands::{count, Out};
use crate::error::{Error, ErrorType};
use crate::model::{
    categories, IsoDate, NewProduct, NewTransaction, Product, Transaction, TransactionType,
    INVENTORY_PURCHASE, PRODUCT_SALE,
};
use crate::store::{Action, Store, ViewName};
use crate::{views, Result};
use std::fmt::Write;
use tracing::warn;

/// The category used for an expense with no product when none is given.
const OTHER_EXPENSES: &str = "Otros Gastos";

/// Fetches and lists every product.
pub async fn products(store: &Store) -> Result<Out<Vec<Product>>> {
    store.dispatch(Action::SetView(ViewName::InventoryList));
    store.fetch_products().await?;
    let products = store.state().products;

    let mut message = count(products.len(), "product", "products");
    for p in &products {
        let _ = write!(
            message,
            "\n  {}  {}  {}  stock {}  cost {}  price {}",
            p.id, p.sku, p.name, p.stock, p.purchase_price, p.selling_price
        );
    }
    Ok(Out::new(message, products))
}

/// Fetches and lists every transaction in the order the backend returns them.
pub async fn transactions(store: &Store) -> Result<Out<Vec<Transaction>>> {
    store.dispatch(Action::SetView(ViewName::Reports));
    store.fetch_transactions().await?;
    let transactions = store.state().transactions;

    let mut message = count(transactions.len(), "transaction", "transactions");
    for t in &transactions {
        let _ = write!(
            message,
            "\n  {}  {}  {}  {}  {}",
            t.id, t.date, t.kind, t.amount, t.description
        );
    }
    Ok(Out::new(message, transactions))
}

/// Creates a product.
///
/// # Errors
/// - Returns an `Input` error if a price is negative.
/// - Returns the backend's error if it rejects the product, e.g. for a duplicate SKU.
pub async fn add_product(store: &Store, args: AddProductArgs) -> Result<Out<Product>> {
    store.dispatch(Action::SetView(ViewName::DataEntry));
    if args.purchase_price.is_negative() || args.selling_price.is_negative() {
        return Err(Error::msg(ErrorType::Input, "Prices cannot be negative"));
    }
    let product = NewProduct {
        name: args.name,
        sku: args.sku,
        purchase_price: args.purchase_price,
        selling_price: args.selling_price,
        stock: args.stock,
        image_url: args.image_url,
    };
    let created = store.add_product(product).await?;
    Ok(Out::new(
        format!("Created product {} ({})", created.name, created.id),
        created,
    ))
}

/// Records an income or expense. The date defaults to today. The category defaults to a product
/// sale for income, an inventory purchase for an expense with a product, and a generic expense
/// otherwise.
///
/// # Errors
/// - Returns an `Input` error if the amount is not positive.
/// - Returns the backend's error if it rejects the transaction, e.g. for insufficient stock.
pub async fn add_transaction(store: &Store, args: AddTransactionArgs) -> Result<Out<Transaction>> {
    store.dispatch(Action::SetView(ViewName::DataEntry));
    if !args.amount.is_positive() {
        return Err(Error::msg(
            ErrorType::Input,
            "The amount must be greater than zero",
        ));
    }
    let category = args.category.unwrap_or_else(|| {
        match (args.kind, args.product_id.is_some()) {
            (TransactionType::Income, _) => PRODUCT_SALE,
            (TransactionType::Expense, true) => INVENTORY_PURCHASE,
            (TransactionType::Expense, false) => OTHER_EXPENSES,
        }
        .to_string()
    });
    if !categories(args.kind).contains(&category.as_str()) {
        warn!("'{category}' is not one of the usual {} categories", args.kind);
    }
    let transaction = NewTransaction {
        kind: args.kind,
        date: args.date.unwrap_or_else(|| IsoDate::new(views::today())),
        description: args.description,
        amount: args.amount,
        category,
        product_id: args.product_id,
        quantity: args.quantity,
        due_date: args.due_date,
    };
    let created = store.add_transaction(transaction).await?;
    Ok(Out::new(
        format!(
            "Recorded {} of {} on {} ({})",
            created.kind, created.amount, created.date, created.id
        ),
        created,
    ))
}

/// Marks a transaction as paid. The payment date defaults to today.
pub async fn mark_paid(store: &Store, args: MarkPaidArgs) -> Result<Out<()>> {
    let payment_date = args
        .payment_date
        .unwrap_or_else(|| IsoDate::new(views::today()));
    store.mark_transaction_as_paid(&args.id, payment_date).await?;
    Ok(format!("Marked {} as paid on {payment_date}", args.id).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, TestBackend};
    use crate::model::{Amount, TransactionStatus};
    use crate::test::TestEnv;
    use std::str::FromStr;

    fn sale(product_id: Option<&str>, quantity: Option<u64>) -> AddTransactionArgs {
        AddTransactionArgs {
            kind: TransactionType::Income,
            date: Some(IsoDate::from_str("2024-06-01").unwrap()),
            description: "Venta mostrador".to_string(),
            amount: Amount::from(30),
            category: None,
            product_id: product_id.map(str::to_string),
            quantity,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_products() {
        let env = TestEnv::new().await;
        let store = env.store();
        let out = products(&store).await.unwrap();
        assert!(out.message().starts_with("5 products"));
        assert!(out.message().contains("CAM-001"));
        assert_eq!(out.structure().unwrap().len(), 5);
        assert_eq!(store.state().active_view, ViewName::InventoryList);
    }

    #[tokio::test]
    async fn test_transactions_failure() {
        let env = TestEnv::new().await;
        env.backend().fail_next(500, None);
        let store = env.store();
        let e = transactions(&store).await.unwrap_err();
        assert_eq!(e.kind(), ErrorType::Http);
        assert_eq!(
            store.state().error.as_deref(),
            Some("HTTP error! status: 500")
        );
    }

    #[tokio::test]
    async fn test_add_product() {
        let env = TestEnv::with_backend(TestBackend::empty()).await;
        let store = env.store();
        let args = AddProductArgs {
            name: "Lámpara".to_string(),
            sku: "LMP-1".to_string(),
            purchase_price: Amount::from(20),
            selling_price: Amount::from(35),
            stock: 4,
            image_url: None,
        };
        let out = add_product(&store, args.clone()).await.unwrap();
        assert!(out.message().starts_with("Created product Lámpara"));
        assert_eq!(store.state().products.len(), 1);

        // The backend rejects a second product with the same SKU.
        let e = add_product(&store, args).await.unwrap_err();
        assert_eq!(e.kind(), ErrorType::HttpMessage);
        assert_eq!(store.state().products.len(), 1);
    }

    #[tokio::test]
    async fn test_add_product_negative_price() {
        let env = TestEnv::new().await;
        let store = env.store();
        let args = AddProductArgs {
            name: "Lámpara".to_string(),
            sku: "LMP-1".to_string(),
            purchase_price: Amount::from(-1),
            selling_price: Amount::from(35),
            stock: 0,
            image_url: None,
        };
        let e = add_product(&store, args).await.unwrap_err();
        assert_eq!(e.kind(), ErrorType::Input);
        assert_eq!(env.backend().calls(Endpoint::CreateProduct), 0);
    }

    #[tokio::test]
    async fn test_add_transaction_defaults_category() {
        let env = TestEnv::new().await;
        let store = env.store();
        let out = add_transaction(&store, sale(Some("prod-002"), Some(5)))
            .await
            .unwrap();
        let created = out.structure().unwrap();
        assert_eq!(created.category, PRODUCT_SALE);
        assert_eq!(created.product_name.as_deref(), Some("Taza de Cerámica"));
        let taza = store
            .state()
            .products
            .into_iter()
            .find(|p| p.id == "prod-002")
            .unwrap();
        assert_eq!(taza.stock, 20);

        let mut purchase = sale(Some("prod-004"), Some(6));
        purchase.kind = TransactionType::Expense;
        let out = add_transaction(&store, purchase).await.unwrap();
        assert_eq!(out.structure().unwrap().category, INVENTORY_PURCHASE);
        let botella = env
            .backend()
            .products()
            .into_iter()
            .find(|p| p.id == "prod-004")
            .unwrap();
        assert_eq!(botella.stock, 6);
    }

    #[tokio::test]
    async fn test_add_transaction_accepts_unusual_category() {
        let env = TestEnv::new().await;
        let store = env.store();
        let mut args = sale(None, None);
        args.category = Some("Donaciones".to_string());
        let out = add_transaction(&store, args).await.unwrap();
        let created = out.structure().unwrap();
        assert_eq!(created.category, "Donaciones");
        assert!(!categories(created.kind).contains(&created.category.as_str()));
    }

    #[tokio::test]
    async fn test_add_transaction_rejects_zero_amount() {
        let env = TestEnv::new().await;
        let store = env.store();
        let mut args = sale(None, None);
        args.amount = Amount::ZERO;
        let e = add_transaction(&store, args).await.unwrap_err();
        assert_eq!(e.kind(), ErrorType::Input);
        assert_eq!(env.backend().calls(Endpoint::CreateTransaction), 0);
    }

    #[tokio::test]
    async fn test_add_transaction_insufficient_stock() {
        let env = TestEnv::new().await;
        let store = env.store();
        let e = add_transaction(&store, sale(Some("prod-004"), Some(1)))
            .await
            .unwrap_err();
        assert!(e.message().contains("Insufficient stock"));
    }

    #[tokio::test]
    async fn test_mark_paid() {
        let env = TestEnv::new().await;
        let store = env.store();
        let args = MarkPaidArgs {
            id: "tx-010".to_string(),
            payment_date: Some(IsoDate::from_str("2024-05-09").unwrap()),
        };
        let out = mark_paid(&store, args).await.unwrap();
        assert_eq!(out.message(), "Marked tx-010 as paid on 2024-05-09");
        let t = env
            .backend()
            .transactions()
            .into_iter()
            .find(|t| t.id == "tx-010")
            .unwrap();
        assert_eq!(t.status, Some(TransactionStatus::Paid));
    }
}
