// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a save is refused before anything touches the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Delivered date ({delivered}) cannot be before pickup time ({pickup})")]
    DeliveredBeforePickup {
        delivered: NaiveDateTime,
        pickup: NaiveDateTime,
    },

    #[error("Order date is required")]
    MissingOrderDate,

    #[error("{field} cannot be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },

    #[error("Paid payment {paid} exceeds total amount {total}")]
    Overpaid { paid: Decimal, total: Decimal },

    #[error("Payment of {amount} exceeds pending amount {pending}")]
    PaymentExceedsPending { amount: Decimal, pending: Decimal },

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    #[error("Contact number '{0}' must be exactly 10 digits")]
    InvalidContactNumber(String),

    #[error("Invalid {field} '{value}', expected {expected}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{0} is required")]
    Required(&'static str),
}
