use crate::model::{Amount, IsoDate};
use serde::{Deserialize, Serialize};

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// The stored payment status of a transaction. Note that `Overdue` may be sent by the backend, but
/// the client always derives overdue-ness itself, see `views::is_overdue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Overdue,
}

serde_plain::derive_display_from_serialize!(TransactionStatus);
serde_plain::derive_fromstr_from_deserialize!(TransactionStatus);

/// A single income or expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: IsoDate,
    pub description: String,
    pub amount: Amount,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<IsoDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<IsoDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_paid(&self) -> bool {
        self.status == Some(TransactionStatus::Paid)
    }

    /// Returns the product id and quantity when this transaction moves units of a product. A zero
    /// quantity does not count.
    pub fn product_units(&self) -> Option<(&str, u64)> {
        match (self.product_id.as_deref(), self.quantity) {
            (Some(id), Some(q)) if !id.is_empty() && q > 0 => Some((id, q)),
            _ => None,
        }
    }
}

/// The body of `POST /transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: IsoDate,
    pub description: String,
    pub amount: Amount,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<IsoDate>,
}

impl NewTransaction {
    /// True when the backend may change a product's stock as a side effect of creating this
    /// transaction, so the product list has to be fetched again.
    pub fn references_stock(&self) -> bool {
        matches!(
            (self.product_id.as_deref(), self.quantity),
            (Some(id), Some(q)) if !id.is_empty() && q > 0
        )
    }

    /// Builds the `Transaction` the backend would return after assigning `id`. A transaction
    /// created with a due date starts out pending, any other is settled on its own date.
    pub fn into_transaction(self, id: impl Into<String>) -> Transaction {
        let (status, payment_date) = match self.due_date {
            Some(_) => (TransactionStatus::Pending, None),
            None => (TransactionStatus::Paid, Some(self.date)),
        };
        Transaction {
            id: id.into(),
            kind: self.kind,
            date: self.date,
            description: self.description,
            amount: self.amount,
            category: self.category,
            product_id: self.product_id,
            product_name: None,
            quantity: self.quantity,
            due_date: self.due_date,
            status: Some(status),
            payment_date,
            created_at: None,
            updated_at: None,
        }
    }
}

/// The body of `PATCH /transactions/{id}/mark-as-paid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsPaid {
    pub payment_date: IsoDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_backend_transaction() {
        let json = r#"{
            "id": "t1",
            "type": "income",
            "date": "2024-06-01",
            "description": "Factura 001",
            "amount": 250.75,
            "category": "Factura Emitida",
            "dueDate": "2024-06-30T00:00:00.000Z",
            "status": "pending"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert!(t.is_income());
        assert_eq!(t.due_date.unwrap().to_string(), "2024-06-30");
        assert_eq!(t.status, Some(TransactionStatus::Pending));
        assert!(t.product_units().is_none());
        assert!(!t.is_paid());
    }

    #[test]
    fn test_missing_category_defaults_to_empty() {
        let json = r#"{"id":"t2","type":"expense","date":"2024-01-01","description":"x","amount":1}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.category, "");
    }

    #[test]
    fn test_new_transaction_body() {
        let nt = NewTransaction {
            kind: TransactionType::Expense,
            date: IsoDate::from_str("2024-02-03").unwrap(),
            description: "Compra".to_string(),
            amount: Amount::from(100),
            category: "Compra de Inventario".to_string(),
            product_id: Some("p1".to_string()),
            quantity: Some(10),
            due_date: None,
        };
        assert!(nt.references_stock());
        let v: serde_json::Value = serde_json::to_value(&nt).unwrap();
        assert_eq!(v["type"], "expense");
        assert_eq!(v["productId"], "p1");
        assert!(v.get("dueDate").is_none());
        assert!(v.get("status").is_none());
    }

    #[test]
    fn test_references_stock_requires_both() {
        let mut nt = NewTransaction {
            kind: TransactionType::Income,
            date: IsoDate::from_str("2024-02-03").unwrap(),
            description: "Venta".to_string(),
            amount: Amount::from(10),
            category: "Servicios".to_string(),
            product_id: Some("p1".to_string()),
            quantity: None,
            due_date: None,
        };
        assert!(!nt.references_stock());
        nt.quantity = Some(0);
        assert!(!nt.references_stock());
        nt.product_id = None;
        nt.quantity = Some(2);
        assert!(!nt.references_stock());
    }

    #[test]
    fn test_into_transaction_status() {
        let mut nt = NewTransaction {
            kind: TransactionType::Income,
            date: IsoDate::from_str("2024-02-03").unwrap(),
            description: "Factura".to_string(),
            amount: Amount::from(10),
            category: "Factura Emitida".to_string(),
            product_id: None,
            quantity: None,
            due_date: None,
        };
        let t = nt.clone().into_transaction("a");
        assert!(t.is_paid());
        assert_eq!(t.payment_date, Some(nt.date));

        nt.due_date = IsoDate::from_ymd(2024, 3, 3);
        let t = nt.into_transaction("b");
        assert_eq!(t.status, Some(TransactionStatus::Pending));
        assert!(t.payment_date.is_none());
    }

    #[test]
    fn test_type_display_and_parse() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(
            TransactionStatus::from_str("paid").unwrap(),
            TransactionStatus::Paid
        );
    }
}
