// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::filter::Dated;
use super::{Dataset, DateRange, Selection};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub orders: usize,
    pub total_amount: Decimal,
    pub successful_payments: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub expenses: Decimal,
    pub net_amount: Decimal,
}

impl DailyBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            orders: 0,
            total_amount: Decimal::ZERO,
            successful_payments: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
            expenses: Decimal::ZERO,
            net_amount: Decimal::ZERO,
        }
    }
}

fn record_dates(data: &Dataset) -> impl Iterator<Item = NaiveDateTime> + '_ {
    let orders = data.orders.iter().filter_map(Dated::dated_at);
    let products = data.products.iter().filter_map(Dated::dated_at);
    let users = data.users.iter().filter_map(Dated::dated_at);
    let expenses = data.expenses.iter().filter_map(Dated::dated_at);
    orders.chain(products).chain(users).chain(expenses)
}

/// First and last day the chart covers. Open ends fall back to the earliest
/// and latest record across every collection, with `now` always counted.
pub fn span(data: &Dataset, range: &DateRange, now: NaiveDateTime) -> (NaiveDate, NaiveDate) {
    if let Some(closed) = range.closed() {
        return closed;
    }
    let (earliest, latest) =
        record_dates(data).fold((now, now), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
    (
        range.start.unwrap_or(earliest.date()),
        range.end.unwrap_or(latest.date()),
    )
}

/// One bucket per day from `first` to `last` inclusive, gap-free, ascending.
pub fn daily_series(sel: &Selection<'_>, first: NaiveDate, last: NaiveDate) -> Vec<DailyBucket> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket> = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| (day, DailyBucket::empty(day)))
        .collect();

    for order in &sel.orders {
        let Some(bucket) = order
            .dated_at()
            .and_then(|ts| buckets.get_mut(&ts.date()))
        else {
            continue;
        };
        bucket.orders += 1;
        bucket.total_amount = bucket.total_amount.saturating_add(order.total_amount);
        if order.is_fully_paid() {
            bucket.successful_payments =
                bucket.successful_payments.saturating_add(order.paid_payment);
        }
        bucket.paid_amount = bucket.paid_amount.saturating_add(order.paid_payment);
        bucket.pending_amount = bucket.pending_amount.saturating_add(order.outstanding());
    }

    for expense in &sel.expenses {
        if let Some(bucket) = expense
            .dated_at()
            .and_then(|ts| buckets.get_mut(&ts.date()))
        {
            bucket.expenses = bucket.expenses.saturating_add(expense.total());
        }
    }

    buckets
        .into_values()
        .map(|mut bucket| {
            bucket.net_amount = bucket.paid_amount.saturating_sub(bucket.expenses);
            bucket
        })
        .collect()
}
