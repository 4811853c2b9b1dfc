//! Stock valuation per product and for the whole inventory.

use crate::model::{Amount, Product};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    #[serde(flatten)]
    pub product: Product,
    /// `stock` times `purchase_price`.
    pub value_at_purchase: Amount,
    /// `stock` times `selling_price`.
    pub value_at_sale: Amount,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTotals {
    pub products: usize,
    pub stock_units: u64,
    pub value_at_purchase: Amount,
    pub value_at_sale: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub rows: Vec<InventoryRow>,
    pub totals: InventoryTotals,
}

impl Inventory {
    pub fn build(products: &[Product]) -> Self {
        let rows: Vec<InventoryRow> = products
            .iter()
            .map(|p| InventoryRow {
                value_at_purchase: p.purchase_price * p.stock,
                value_at_sale: p.selling_price * p.stock,
                product: p.clone(),
            })
            .collect();

        let totals = rows.iter().fold(
            InventoryTotals {
                products: rows.len(),
                ..InventoryTotals::default()
            },
            |mut totals, row| {
                totals.stock_units += row.product.stock;
                totals.value_at_purchase += row.value_at_purchase;
                totals.value_at_sale += row.value_at_sale;
                totals
            },
        );

        Self { rows, totals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::product;

    #[test]
    fn test_valuation() {
        let products = vec![
            product("p1", "Camiseta", 8, 15, 4),
            product("p2", "Taza", 3, 10, 0),
            product("p3", "Gorra", 6, 14, 2),
        ];
        let inventory = Inventory::build(&products);
        assert_eq!(inventory.rows[0].value_at_purchase, Amount::from(32));
        assert_eq!(inventory.rows[0].value_at_sale, Amount::from(60));
        assert_eq!(inventory.rows[1].value_at_sale, Amount::ZERO);
        assert_eq!(inventory.totals.products, 3);
        assert_eq!(inventory.totals.stock_units, 6);
        assert_eq!(inventory.totals.value_at_purchase, Amount::from(44));
        assert_eq!(inventory.totals.value_at_sale, Amount::from(88));
    }

    #[test]
    fn test_decimal_prices() {
        let mut p = product("p1", "Cuaderno", 0, 0, 3);
        p.purchase_price = "1.75".parse().unwrap();
        p.selling_price = "4.50".parse().unwrap();
        let inventory = Inventory::build(&[p]);
        assert_eq!(inventory.totals.value_at_purchase.to_string(), "5.25");
        assert_eq!(inventory.totals.value_at_sale.to_string(), "13.50");
    }

    #[test]
    fn test_empty() {
        let inventory = Inventory::build(&[]);
        assert!(inventory.rows.is_empty());
        assert_eq!(inventory.totals, InventoryTotals::default());
    }
}
