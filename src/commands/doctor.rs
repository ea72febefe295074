// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::product_pending;
use crate::store::{load_expenses, load_orders, load_products};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Consistency findings as (issue, detail) pairs.
pub fn find_issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();
    let orders = load_orders(conn)?;
    let products = load_products(conn)?;
    let product_ids: HashSet<i64> = products.iter().map(|p| p.id).collect();
    let order_ids: HashSet<i64> = orders.iter().map(|o| o.id).collect();

    for o in &orders {
        if o.paid_payment > o.total_amount {
            issues.push((
                "order_overpaid".into(),
                format!("order {}: paid {} > total {}", o.id, o.paid_payment, o.total_amount),
            ));
        }
        if o.pending_payment != o.outstanding() {
            issues.push((
                "order_pending_mismatch".into(),
                format!(
                    "order {}: stored {} != total - paid {}",
                    o.id,
                    o.pending_payment,
                    o.outstanding()
                ),
            ));
        }
        if let (Some(d), Some(p)) = (o.delivered_date, o.pickup_time) {
            if d < p {
                issues.push((
                    "delivered_before_pickup".into(),
                    format!("order {}: delivered {} < pickup {}", o.id, d, p),
                ));
            }
        }
        for item in &o.products {
            match item.product_id {
                Some(pid) if !product_ids.contains(&pid) => issues.push((
                    "dangling_product".into(),
                    format!("order {}: line '{}' -> product {}", o.id, item.product_name, pid),
                )),
                _ => {}
            }
        }
    }

    for p in &products {
        let expected = product_pending(p.price, p.paid_amount);
        if p.pending_amount != expected {
            issues.push((
                "product_pending_mismatch".into(),
                format!("product {}: stored {} != {}", p.id, p.pending_amount, expected),
            ));
        }
        if p.price < Decimal::ZERO || p.stock_quantity < 0 {
            issues.push(("product_negative".into(), format!("product {}", p.id)));
        }
    }

    for e in load_expenses(conn)? {
        if !order_ids.contains(&e.order_id) {
            issues.push((
                "expense_without_order".into(),
                format!("expense {} -> order {}", e.id, e.order_id),
            ));
        }
    }
    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = find_issues(conn)?
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
