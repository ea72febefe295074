// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard aggregation over the four raw collections.
//!
//! Everything here is a pure function of the records, the picked
//! [`DateRange`] and an explicit `now`; nothing is cached between calls.

pub mod compare;
pub mod filter;
pub mod rankings;
pub mod series;
pub mod summary;

pub use compare::{PeriodDeltas, percentage_change};
pub use filter::{Bounds, DateRange, Dated};
pub use rankings::{RecentOrder, RoleCount, TopProduct};
pub use series::DailyBucket;
pub use summary::Summary;

use crate::models::{Expense, Order, Product, User};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub expenses: Vec<Expense>,
}

/// Borrowed subset of a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub orders: Vec<&'a Order>,
    pub products: Vec<&'a Product>,
    pub users: Vec<&'a User>,
    pub expenses: Vec<&'a Expense>,
}

impl<'a> Selection<'a> {
    pub fn within(data: &'a Dataset, bounds: &Bounds) -> Self {
        Self {
            orders: bounds.select(&data.orders),
            products: bounds.select(&data.products),
            users: bounds.select(&data.users),
            expenses: bounds.select(&data.expenses),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub range: DateRange,
    pub summary: Summary,
    pub deltas: Option<PeriodDeltas>,
    pub series: Vec<DailyBucket>,
    pub top_products: Vec<TopProduct>,
    pub recent_orders: Vec<RecentOrder>,
    pub users_by_role: Vec<RoleCount>,
}

pub fn build_dashboard(data: &Dataset, range: DateRange, now: NaiveDateTime) -> Dashboard {
    let current = Selection::within(data, &range.bounds());
    let summary = summary::summarize(&current);
    let deltas = compare::compare(data, &range, &summary);
    let (first, last) = series::span(data, &range, now);
    let series = series::daily_series(&current, first, last);
    tracing::debug!(
        orders = current.orders.len(),
        days = series.len(),
        "dashboard aggregated"
    );
    Dashboard {
        range,
        summary,
        deltas,
        series,
        top_products: rankings::top_products(
            &data.products,
            &current.orders,
            rankings::TOP_PRODUCTS,
        ),
        recent_orders: rankings::recent_orders(
            &current.orders,
            rankings::DASHBOARD_RECENT_ORDERS,
        ),
        users_by_role: rankings::users_by_role(&current.users),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseItem, OrderItem};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn ts(m: u32, d: u32, h: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap().and_hms_opt(h, 0, 0)
    }

    fn sample() -> Dataset {
        let orders = (1..=12)
            .map(|i| Order {
                id: i,
                user_name: format!("c{}", i),
                total_amount: Decimal::from(100),
                paid_payment: Decimal::from(if i % 2 == 0 { 100 } else { 40 }),
                updated_at: ts(4, i as u32, 9),
                products: vec![OrderItem {
                    product_id: Some(i % 3 + 1),
                    quantity: 1,
                    ..OrderItem::default()
                }],
                ..Order::default()
            })
            .collect();
        let products = (1..=3)
            .map(|id| Product {
                id,
                product_name: format!("p{}", id),
                price: Decimal::from(10),
                updated_at: ts(4, 1, 0),
                ..Product::default()
            })
            .collect();
        let users = vec![User {
            id: 1,
            role: "admin".into(),
            created_at: ts(4, 2, 0),
            ..User::default()
        }];
        let expenses = vec![Expense {
            order_id: 2,
            expense_date: ts(4, 2, 18),
            expenses: vec![ExpenseItem {
                kind: "delivery".into(),
                amount: Decimal::from(15),
            }],
            ..Expense::default()
        }];
        Dataset {
            orders,
            products,
            users,
            expenses,
        }
    }

    #[test]
    fn series_reconciles_with_summary() {
        let data = sample();
        let range = DateRange::between(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
        );
        let now = ts(6, 1, 0).unwrap();
        let dash = build_dashboard(&data, range, now);
        assert_eq!(dash.series.len(), 10);
        let bucketed: usize = dash.series.iter().map(|b| b.orders).sum();
        assert_eq!(bucketed, dash.summary.total_orders);
        assert_eq!(dash.summary.total_orders, 10);
        let net: Decimal = dash.series.iter().map(|b| b.net_amount).sum();
        assert_eq!(net, dash.summary.net_amount);
        assert!(dash.deltas.is_some());
        assert!(dash.top_products.len() <= 5);
        assert_eq!(dash.recent_orders.len(), 5);
        assert_eq!(dash.recent_orders[0].id, 10);
    }

    #[test]
    fn unbounded_dashboard_covers_everything() {
        let data = sample();
        let now = ts(4, 20, 0).unwrap();
        let dash = build_dashboard(&data, DateRange::default(), now);
        assert!(dash.deltas.is_none());
        assert_eq!(dash.summary.total_orders, 12);
        assert_eq!(dash.series.first().unwrap().date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(dash.series.len(), 20);
        assert_eq!(dash.users_by_role.len(), 1);
        assert_eq!(dash.summary.total_expenses, Decimal::from(15));
    }
}
