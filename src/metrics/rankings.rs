// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Order, Product, User};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

pub const TOP_PRODUCTS: usize = 5;
pub const DASHBOARD_RECENT_ORDERS: usize = 5;
pub const TRACKING_RECENT_ORDERS: usize = 9;
pub const ORDERS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProduct {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub order_count: usize,
    pub revenue: Decimal,
}

/// Orders per product, counting each order once however many of its lines
/// reference the product. Lines pointing at unknown products are dropped.
pub fn order_counts(products: &[Product], orders: &[&Order]) -> HashMap<i64, usize> {
    let mut counts: HashMap<i64, usize> = products.iter().map(|p| (p.id, 0)).collect();
    for order in orders {
        let mut seen: Vec<i64> = Vec::new();
        for id in order.products.iter().filter_map(|item| item.product_id) {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(n) = counts.get_mut(&id) {
                *n += 1;
            }
        }
    }
    counts
}

pub fn top_products(products: &[Product], orders: &[&Order], limit: usize) -> Vec<TopProduct> {
    let counts = order_counts(products, orders);
    let mut ranked: Vec<TopProduct> = products
        .iter()
        .map(|p| {
            let order_count = counts.get(&p.id).copied().unwrap_or(0);
            TopProduct {
                id: p.id,
                name: p.product_name.clone(),
                category: p.category.clone(),
                price: p.price,
                order_count,
                revenue: Decimal::from(order_count as u64).saturating_mul(p.price),
            }
        })
        .collect();
    // stable: ties keep catalogue order
    ranked.sort_by_key(|p| Reverse(p.order_count));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentOrder {
    pub id: i64,
    pub user_name: String,
    pub total_amount: Decimal,
    pub paid_payment: Decimal,
    pub pending: Decimal,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<&Order> for RecentOrder {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            user_name: o.user_name.clone(),
            total_amount: o.total_amount,
            paid_payment: o.paid_payment,
            pending: o.outstanding(),
            updated_at: o.updated_at,
        }
    }
}

/// Latest `updated_at` first; undated orders sink to the end.
pub fn recent_orders(orders: &[&Order], limit: usize) -> Vec<RecentOrder> {
    let mut sorted: Vec<&Order> = orders.to_vec();
    sorted.sort_by_key(|o| Reverse(o.updated_at));
    sorted.into_iter().take(limit).map(RecentOrder::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCount {
    pub role: String,
    pub users: usize,
}

pub fn users_by_role(users: &[&User]) -> Vec<RoleCount> {
    let mut out: Vec<RoleCount> = Vec::new();
    for user in users {
        let role = match user.role.trim() {
            "" => "unknown",
            r => r,
        };
        match out.iter_mut().find(|rc| rc.role == role) {
            Some(rc) => rc.users += 1,
            None => out.push(RoleCount {
                role: role.to_string(),
                users: 1,
            }),
        }
    }
    out
}

/// 1-based page of `items`; pages past the end are empty.
pub fn page<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderItem;
    use chrono::NaiveDate;

    fn product(id: i64, category: &str, price: i64) -> Product {
        Product {
            id,
            product_name: format!("P{}", id),
            category: category.into(),
            price: Decimal::from(price),
            ..Product::default()
        }
    }

    fn order_with(id: i64, product_ids: &[i64]) -> Order {
        Order {
            id,
            products: product_ids
                .iter()
                .map(|pid| OrderItem {
                    product_id: Some(*pid),
                    quantity: 1,
                    ..OrderItem::default()
                })
                .collect(),
            ..Order::default()
        }
    }

    #[test]
    fn top_products_capped_and_ranked() {
        let products: Vec<Product> = (1..=7).map(|id| product(id, "grain", 10)).collect();
        let orders = [
            order_with(1, &[3, 3, 5]),
            order_with(2, &[3]),
            order_with(3, &[5, 99]),
            order_with(4, &[6]),
        ];
        let refs: Vec<&Order> = orders.iter().collect();
        let top = top_products(&products, &refs, TOP_PRODUCTS);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].id, 3);
        assert_eq!(top[0].order_count, 2);
        assert_eq!(top[0].revenue, Decimal::from(20));
        assert_eq!(top[1].id, 5);
        assert_eq!(top[2].id, 6);
        // zero-count ties keep catalogue order
        assert_eq!(top[3].id, 1);
        assert_eq!(top[4].id, 2);
    }

    #[test]
    fn counts_only_follow_explicit_references() {
        let products = vec![product(1, "grain", 5), product(2, "oil", 7)];
        let mut loose = order_with(1, &[]);
        loose.products.push(OrderItem {
            product_id: None,
            product_name: "P2".into(),
            ..OrderItem::default()
        });
        let orders = [loose, order_with(2, &[1])];
        let refs: Vec<&Order> = orders.iter().collect();
        let counts = order_counts(&products, &refs);
        assert_eq!(counts[&1], 1);
        assert_eq!(counts[&2], 0);
    }

    #[test]
    fn recent_orders_newest_first_stable() {
        let at = |d: u32| NaiveDate::from_ymd_opt(2024, 5, d).unwrap().and_hms_opt(10, 0, 0);
        let mut orders: Vec<Order> = Vec::new();
        for (id, d) in [(1, Some(3)), (2, Some(7)), (3, None), (4, Some(7)), (5, Some(1))] {
            orders.push(Order {
                id,
                updated_at: d.and_then(at),
                ..Order::default()
            });
        }
        let refs: Vec<&Order> = orders.iter().collect();
        let ids: Vec<i64> = recent_orders(&refs, 5).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 5, 3]);
        assert_eq!(recent_orders(&refs, 2).len(), 2);
    }

    #[test]
    fn roles_grouped_in_first_seen_order() {
        let users: Vec<User> = ["admin", "", "staff", "admin"]
            .iter()
            .map(|r| User {
                role: r.to_string(),
                ..User::default()
            })
            .collect();
        let refs: Vec<&User> = users.iter().collect();
        let roles = users_by_role(&refs);
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[0], RoleCount { role: "admin".into(), users: 2 });
        assert_eq!(roles[1].role, "unknown");
    }

    #[test]
    fn pagination_is_one_based() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(page(&items, 1, 10), &items[0..10]);
        assert_eq!(page(&items, 3, 10), &[21, 22, 23]);
        assert!(page(&items, 4, 10).is_empty());
        assert_eq!(page(&items, 0, 10), &items[0..10]);
        assert_eq!(page_count(23, 10), 3);
        assert_eq!(page_count(0, 10), 0);
    }
}
