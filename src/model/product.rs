use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// A product held in inventory. The backend owns these; the client only caches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub purchase_price: Amount,
    pub selling_price: Amount,
    pub stock: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The body of `POST /products`: a product without its server-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub purchase_price: Amount,
    pub selling_price: Amount,
    pub stock: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewProduct {
    /// Builds the `Product` the backend would return after assigning `id`.
    pub fn into_product(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            sku: self.sku,
            purchase_price: self.purchase_price,
            selling_price: self.selling_price,
            stock: self.stock,
            image_url: self.image_url,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Finds the name of the product with `id` in `products`.
pub fn product_name<'a>(products: &'a [Product], id: &str) -> Option<&'a str> {
    products
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
}
