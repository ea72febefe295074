// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pulls the four collections from a running panel backend.

use crate::metrics::Dataset;
use crate::utils::http_client;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

const ENVELOPE_KEYS: [&str; 5] = ["userorders", "products", "users", "expenses", "data"];

/// The array inside a response body: the body itself, or the first array
/// found under one of the known envelope keys.
pub fn unwrap_envelope(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|k| match map.remove(*k) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }),
        _ => None,
    }
}

/// Decodes every element that looks like a record; the rest are logged and
/// dropped.
pub fn decode_records<T: DeserializeOwned>(collection: &str, items: Vec<Value>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(rec) => out.push(rec),
            Err(e) => tracing::warn!(collection, idx, error = %e, "skipping malformed record"),
        }
    }
    out
}

fn fetch_collection<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    base: &str,
    path: &str,
) -> Result<Vec<T>> {
    let url = format!("{}/{}", base.trim_end_matches('/'), path);
    tracing::debug!(%url, "fetching collection");
    let body: Value = client
        .get(&url)
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .json()
        .with_context(|| format!("Decode body of {}", url))?;
    let items = unwrap_envelope(body)
        .with_context(|| format!("No record array in response from {}", url))?;
    Ok(decode_records(path, items))
}

pub fn fetch_dataset(base_url: &str) -> Result<Dataset> {
    let client = http_client()?;
    let data = Dataset {
        orders: fetch_collection(&client, base_url, "orders/list")?,
        products: fetch_collection(&client, base_url, "products")?,
        users: fetch_collection(&client, base_url, "users/list")?,
        expenses: fetch_collection(&client, base_url, "expenses")?,
    };
    tracing::debug!(
        orders = data.orders.len(),
        products = data.products.len(),
        users = data.users.len(),
        expenses = data.expenses.len(),
        "fetched dataset"
    );
    Ok(data)
}
