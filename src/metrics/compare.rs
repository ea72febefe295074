// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::summary::{Summary, summarize};
use super::{Dataset, DateRange, Selection};
use rust_decimal::Decimal;
use serde::Serialize;

/// Percent change from `previous` to `current`. A zero baseline reports 100
/// when anything appeared and 0 otherwise.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    current
        .checked_sub(previous)
        .and_then(|diff| diff.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn count(n: usize) -> Decimal {
    Decimal::from(n as u64)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodDeltas {
    pub orders: Decimal,
    pub products: Decimal,
    pub users: Decimal,
    pub order_amount: Decimal,
    pub successful_payments: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub expenses: Decimal,
    pub net_amount: Decimal,
}

impl PeriodDeltas {
    pub fn between(current: &Summary, previous: &Summary) -> Self {
        Self {
            orders: percentage_change(count(current.total_orders), count(previous.total_orders)),
            products: percentage_change(
                count(current.total_products),
                count(previous.total_products),
            ),
            users: percentage_change(count(current.total_users), count(previous.total_users)),
            order_amount: percentage_change(
                current.total_order_amount,
                previous.total_order_amount,
            ),
            successful_payments: percentage_change(
                current.successful_payment_amount,
                previous.successful_payment_amount,
            ),
            paid_amount: percentage_change(current.total_paid_amount, previous.total_paid_amount),
            pending_amount: percentage_change(
                current.total_pending_amount,
                previous.total_pending_amount,
            ),
            expenses: percentage_change(current.total_expenses, previous.total_expenses),
            net_amount: percentage_change(current.net_amount, previous.net_amount),
        }
    }
}

/// Summary of the window right before `range`, taken from the unfiltered
/// collections. `None` unless both ends of the range are set.
pub fn previous_summary(data: &Dataset, range: &DateRange) -> Option<Summary> {
    range.closed()?;
    let bounds = range.previous_bounds()?;
    Some(summarize(&Selection::within(data, &bounds)))
}

pub fn compare(data: &Dataset, range: &DateRange, current: &Summary) -> Option<PeriodDeltas> {
    previous_summary(data, range).map(|previous| PeriodDeltas::between(current, &previous))
}
