//! The overview screen: overall totals, per-product rankings and the monthly chart.

use crate::model::{Amount, Product, Transaction};
use crate::views::monthly::{monthly_totals, MonthBucket};
use serde::Serialize;
use std::collections::HashMap;

/// How many products each ranking shows.
pub const RANKING_SIZE: usize = 3;

/// A product together with the aggregates the rankings are computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetrics {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub stock: u64,
    /// Sum of `amount` over income transactions that reference this product with a quantity.
    pub revenue: Amount,
    pub units_sold: u64,
    /// Sum of `quantity` over inventory-purchase expenses that reference this product.
    pub units_purchased: u64,
    /// Sum of `amount` over those same inventory-purchase expenses.
    pub purchase_cost: Amount,
}

/// Everything the overview screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_income: Amount,
    pub total_expenses: Amount,
    /// Income minus expenses. May be negative.
    pub net_profit: Amount,
    /// Highest revenue first. Products without sales are included when there are fewer than
    /// three sellers.
    pub top_by_revenue: Vec<ProductMetrics>,
    pub top_by_units_sold: Vec<ProductMetrics>,
    /// Only products with at least one purchased unit.
    pub top_by_units_purchased: Vec<ProductMetrics>,
    /// Products still in stock, fewest units sold first.
    pub slow_moving: Vec<ProductMetrics>,
    pub monthly: Vec<MonthBucket>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    revenue: Amount,
    units_sold: u64,
    units_purchased: u64,
    purchase_cost: Amount,
}

impl Dashboard {
    /// Computes the overview. `inventory_category` names the expense category that counts as a
    /// purchase of stock.
    pub fn build(
        products: &[Product],
        transactions: &[Transaction],
        inventory_category: &str,
    ) -> Self {
        let mut total_income = Amount::ZERO;
        let mut total_expenses = Amount::ZERO;
        let mut tallies: HashMap<&str, Tally> = HashMap::new();

        for t in transactions {
            if t.is_income() {
                total_income += t.amount;
            } else {
                total_expenses += t.amount;
            }

            let Some((product_id, quantity)) = t.product_units() else {
                continue;
            };
            let tally = tallies.entry(product_id).or_default();
            if t.is_income() {
                tally.revenue += t.amount;
                tally.units_sold += quantity;
            } else if t.category == inventory_category {
                tally.units_purchased += quantity;
                tally.purchase_cost += t.amount;
            }
        }

        let metrics: Vec<ProductMetrics> = products
            .iter()
            .map(|p| {
                let tally = tallies.get(p.id.as_str()).copied().unwrap_or_default();
                ProductMetrics {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    sku: p.sku.clone(),
                    stock: p.stock,
                    revenue: tally.revenue,
                    units_sold: tally.units_sold,
                    units_purchased: tally.units_purchased,
                    purchase_cost: tally.purchase_cost,
                }
            })
            .collect();

        // Stable sorts so that ties keep product order.
        let top_by_revenue = ranked(metrics.iter(), |a, b| b.revenue.cmp(&a.revenue));
        let top_by_units_sold = ranked(metrics.iter(), |a, b| b.units_sold.cmp(&a.units_sold));
        let top_by_units_purchased = ranked(
            metrics.iter().filter(|m| m.units_purchased > 0),
            |a, b| b.units_purchased.cmp(&a.units_purchased),
        );
        let slow_moving = ranked(metrics.iter().filter(|m| m.stock > 0), |a, b| {
            a.units_sold.cmp(&b.units_sold)
        });

        Self {
            total_income,
            total_expenses,
            net_profit: total_income - total_expenses,
            top_by_revenue,
            top_by_units_sold,
            top_by_units_purchased,
            slow_moving,
            monthly: monthly_totals(transactions),
        }
    }
}

fn ranked<'a, I, F>(metrics: I, compare: F) -> Vec<ProductMetrics>
where
    I: Iterator<Item = &'a ProductMetrics>,
    F: FnMut(&ProductMetrics, &ProductMetrics) -> std::cmp::Ordering,
{
    let mut v: Vec<ProductMetrics> = metrics.cloned().collect();
    v.sort_by(compare);
    v.truncate(RANKING_SIZE);
    v
}
