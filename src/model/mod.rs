//! Types that represent the core data model, such as `Product` and `Transaction`.
mod amount;
mod iso_date;
mod product;
mod transaction;

pub use amount::{Amount, AmountError};
pub use iso_date::IsoDate;
pub use product::{product_name, NewProduct, Product};
pub use transaction::{MarkAsPaid, NewTransaction, Transaction, TransactionStatus, TransactionType};

/// The conventional income categories. Categories are free-form; these are the ones the data entry
/// screen offers.
pub const INCOME_CATEGORIES: &[&str] = &[
    "Venta de Producto",
    "Servicios",
    "Factura Emitida",
    "Otros Ingresos",
];

/// The conventional expense categories.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    INVENTORY_PURCHASE,
    "Alquiler",
    "Salarios",
    "Marketing",
    "Suministros",
    "Factura de Proveedor",
    "Otros Gastos",
];

/// The expense category used when buying stock. Expenses in this category that carry a product
/// and quantity count as units purchased.
pub const INVENTORY_PURCHASE: &str = "Compra de Inventario";

/// The income category used when selling a product.
pub const PRODUCT_SALE: &str = "Venta de Producto";

/// Returns the conventional categories for `kind`.
pub fn categories(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}
