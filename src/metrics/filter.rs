// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Expense, Order, Product, User};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Records that carry the timestamp the dashboard filters them by.
pub trait Dated {
    fn dated_at(&self) -> Option<NaiveDateTime>;
}

impl Dated for Order {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        self.updated_at
    }
}

impl Dated for Product {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        self.updated_at
    }
}

impl Dated for User {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }
}

impl Dated for Expense {
    fn dated_at(&self) -> Option<NaiveDateTime> {
        self.expense_date
    }
}

/// Half-open instant interval `[from, until)`; a missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub from: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
}

impl Bounds {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.until.is_none()
    }

    /// Undated records only pass when there is nothing to compare against.
    pub fn admits(&self, ts: Option<NaiveDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(ts) = ts else {
            return false;
        };
        self.from.is_none_or(|from| ts >= from) && self.until.is_none_or(|until| ts < until)
    }

    pub fn select<'a, T: Dated>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.admits(item.dated_at())).collect()
    }
}

/// Calendar-day range picked on the dashboard. Both ends are inclusive of
/// the whole day: `end` admits everything before the following midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn is_set(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Both ends, when the range is closed.
    pub fn closed(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            from: self.start.map(midnight),
            until: self
                .end
                .map(|end| midnight(end.checked_add_days(Days::new(1)).unwrap_or(end))),
        }
    }

    /// Window of equal length ending right where this one starts.
    pub fn previous_bounds(&self) -> Option<Bounds> {
        let current = self.bounds();
        let (from, until) = (current.from?, current.until?);
        let length = until - from;
        Some(Bounds {
            from: Some(from - length),
            until: Some(from),
        })
    }
}
