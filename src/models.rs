// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use crate::lenient;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductName {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    Owned,
    Imported,
}

impl Ownership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ownership::Owned => "owned",
            Ownership::Imported => "imported",
        }
    }
}

impl FromStr for Ownership {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owned" => Ok(Ownership::Owned),
            "imported" => Ok(Ownership::Imported),
            _ => Err(ValidationError::InvalidChoice {
                field: "owned_imported",
                value: s.to_string(),
                expected: "owned|imported",
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, alias = "productName", deserialize_with = "lenient::text")]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    #[serde(default, alias = "companyName", deserialize_with = "lenient::opt_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub shop_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub owned_imported: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub paid_amount: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub pending_amount: Decimal,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub stock_quantity: i64,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Pending on a product purchase never goes below zero.
pub fn product_pending(price: Decimal, paid: Decimal) -> Decimal {
    price.saturating_sub(paid).max(Decimal::ZERO)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub status: i64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItem {
    /// References `products.id`. Items without it count toward no product.
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub product_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub product_price: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub user_name: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub user_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub shipping_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub billing_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub paid_payment: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub pending_payment: Decimal,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub delivered_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub pickup_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub products: Vec<OrderItem>,
}

impl Order {
    /// Outstanding amount derived from the two authoritative fields.
    pub fn outstanding(&self) -> Decimal {
        self.total_amount.saturating_sub(self.paid_payment)
    }

    pub fn is_fully_paid(&self) -> bool {
        self.paid_payment >= self.total_amount
    }

    pub fn references_product(&self, product_id: i64) -> bool {
        self.products
            .iter()
            .any(|item| item.product_id == Some(product_id))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseItem {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub order_id: i64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub expense_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub expenses: Vec<ExpenseItem>,
}

impl Expense {
    pub fn total(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.amount))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentLog {
    pub id: i64,
    pub order_id: i64,
    pub payment_amount: Decimal,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Salary {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub branch: String,
    pub salary_amount: Decimal,
    pub allowance: Decimal,
    pub deduction: Decimal,
    pub status: bool,
}

impl Salary {
    pub fn net_pay(&self) -> Decimal {
        self.salary_amount + self.allowance - self.deduction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(TicketStatus::Pending),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            other => Err(ValidationError::InvalidChoice {
                field: "status",
                value: other.to_string(),
                expected: "pending|in_progress|resolved",
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_from_panel_json_tolerates_junk() {
        let raw = r#"{
            "id": 7,
            "user_name": "Asha",
            "total_amount": "100.00",
            "paid_payment": null,
            "pending_payment": "oops",
            "updated_at": "2024-03-01T09:30:00.000000Z",
            "delivered_date": "",
            "products": [{"product_id": "3", "product_name": "Rice", "quantity": 2, "product_price": 50}]
        }"#;
        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.total_amount, Decimal::from(100));
        assert_eq!(order.paid_payment, Decimal::ZERO);
        assert_eq!(order.pending_payment, Decimal::ZERO);
        assert!(order.updated_at.is_some());
        assert!(order.delivered_date.is_none());
        assert!(order.references_product(3));
        assert_eq!(order.outstanding(), Decimal::from(100));
    }

    #[test]
    fn expense_total_sums_items() {
        let raw = r#"{"order_id": 1, "expense_date": "2024-03-01",
            "expenses": [{"type": "fuel", "amount": "12.50"}, {"type": "toll", "amount": "x"}]}"#;
        let e: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(e.total(), Decimal::new(1250, 2));
        assert_eq!(e.expenses[0].kind, "fuel");
    }

    #[test]
    fn product_pending_floors_at_zero() {
        assert_eq!(
            product_pending(Decimal::from(10), Decimal::from(4)),
            Decimal::from(6)
        );
        assert_eq!(
            product_pending(Decimal::from(10), Decimal::from(14)),
            Decimal::ZERO
        );
    }

    #[test]
    fn ticket_status_round_trips_names() {
        assert_eq!(
            "in_progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert!("closed".parse::<TicketStatus>().is_err());
    }
}
