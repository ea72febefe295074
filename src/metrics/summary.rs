// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Selection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_orders: usize,
    pub total_products: usize,
    pub total_users: usize,
    pub total_order_amount: Decimal,
    pub successful_payment_count: usize,
    pub successful_payment_amount: Decimal,
    pub total_paid_amount: Decimal,
    pub paid_order_count: usize,
    pub total_pending_amount: Decimal,
    pub total_expenses: Decimal,
    pub net_amount: Decimal,
}

pub fn summarize(sel: &Selection<'_>) -> Summary {
    let mut s = Summary {
        total_orders: sel.orders.len(),
        total_products: sel.products.len(),
        total_users: sel.users.len(),
        ..Summary::default()
    };

    for order in &sel.orders {
        s.total_order_amount = s.total_order_amount.saturating_add(order.total_amount);
        s.total_paid_amount = s.total_paid_amount.saturating_add(order.paid_payment);
        s.total_pending_amount = s.total_pending_amount.saturating_add(order.outstanding());
        if order.is_fully_paid() {
            s.successful_payment_count += 1;
            s.successful_payment_amount =
                s.successful_payment_amount.saturating_add(order.paid_payment);
        }
        if order.paid_payment > Decimal::ZERO {
            s.paid_order_count += 1;
        }
    }

    // Sums clamp at the Decimal bounds rather than overflow.
    s.total_expenses = sel
        .expenses
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.total()));
    s.net_amount = s.total_paid_amount.saturating_sub(s.total_expenses);
    s
}
