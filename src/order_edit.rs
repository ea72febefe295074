// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use crate::models::Order;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;

/// Time of day the panel pre-fills when a date has no time yet.
pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(s.to_string()))
}

/// Date and time-of-day as edited separately on the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeInput {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl DateTimeInput {
    pub fn new(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        Self { date, time }
    }

    pub fn split(ts: Option<NaiveDateTime>) -> Self {
        match ts {
            Some(ts) => Self::new(Some(ts.date()), Some(ts.time())),
            None => Self::default(),
        }
    }

    /// Local timestamp with seconds dropped; no date means no timestamp.
    pub fn compose(&self) -> Option<NaiveDateTime> {
        let date = self.date?;
        let time = self.time.unwrap_or_else(default_time);
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        Some(date.and_time(time))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEdit {
    pub created: DateTimeInput,
    pub delivered: DateTimeInput,
    pub pickup: DateTimeInput,
    pub total_amount: Decimal,
    pub paid_payment: Decimal,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub shipping_address: Option<String>,
    pub billing_number: Option<String>,
}

/// Values ready to be written; only produced by [`OrderEdit::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEdit {
    pub created_at: NaiveDateTime,
    pub delivered_date: Option<NaiveDateTime>,
    pub pickup_time: Option<NaiveDateTime>,
    pub total_amount: Decimal,
    pub paid_payment: Decimal,
    pub pending_payment: Decimal,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub shipping_address: Option<String>,
    pub billing_number: Option<String>,
}

impl OrderEdit {
    pub fn from_order(order: &Order) -> Self {
        Self {
            created: DateTimeInput::split(order.created_at),
            delivered: DateTimeInput::split(order.delivered_date),
            pickup: DateTimeInput::split(order.pickup_time),
            total_amount: order.total_amount,
            paid_payment: order.paid_payment,
            user_email: order.user_email.clone(),
            user_phone: order.user_phone.clone(),
            shipping_address: order.shipping_address.clone(),
            billing_number: order.billing_number.clone(),
        }
    }

    /// Read-only; follows total and paid.
    pub fn pending_payment(&self) -> Decimal {
        self.total_amount.saturating_sub(self.paid_payment)
    }

    pub fn validate(&self) -> Result<ValidatedEdit, ValidationError> {
        let created_at = self
            .created
            .compose()
            .ok_or(ValidationError::MissingOrderDate)?;
        for (field, value) in [
            ("total_amount", self.total_amount),
            ("paid_payment", self.paid_payment),
        ] {
            if value < Decimal::ZERO {
                return Err(ValidationError::Negative { field, value });
            }
        }
        if self.paid_payment > self.total_amount {
            return Err(ValidationError::Overpaid {
                paid: self.paid_payment,
                total: self.total_amount,
            });
        }
        let delivered_date = self.delivered.compose();
        let pickup_time = self.pickup.compose();
        if let (Some(delivered), Some(pickup)) = (delivered_date, pickup_time) {
            if delivered < pickup {
                return Err(ValidationError::DeliveredBeforePickup { delivered, pickup });
            }
        }
        Ok(ValidatedEdit {
            created_at,
            delivered_date,
            pickup_time,
            total_amount: self.total_amount,
            paid_payment: self.paid_payment,
            pending_payment: self.pending_payment(),
            user_email: self.user_email.clone(),
            user_phone: self.user_phone.clone(),
            shipping_address: self.shipping_address.clone(),
            billing_number: self.billing_number.clone(),
        })
    }
}
