// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::orders::query_rows;
use crate::models::Order;
use crate::utils::fmt_ts;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("orders", sub)) => export_orders(conn, sub),
        _ => Ok(()),
    }
}

const HEADER: [&str; 12] = [
    "id",
    "created_at",
    "customer",
    "email",
    "phone",
    "shipping_address",
    "billing_number",
    "total_amount",
    "paid_payment",
    "pending_payment",
    "pickup_time",
    "delivered_date",
];

fn opt(s: &Option<String>) -> String {
    s.clone().unwrap_or_default()
}

fn record(o: &Order) -> [String; 12] {
    [
        o.id.to_string(),
        fmt_ts(o.created_at),
        o.user_name.clone(),
        opt(&o.user_email),
        opt(&o.user_phone),
        opt(&o.shipping_address),
        opt(&o.billing_number),
        o.total_amount.to_string(),
        o.paid_payment.to_string(),
        o.outstanding().to_string(),
        fmt_ts(o.pickup_time),
        fmt_ts(o.delivered_date),
    ]
}

fn export_orders(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let orders = query_rows(conn, sub)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(HEADER)?;
            for o in &orders {
                wtr.write_record(record(o))?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<serde_json::Value> = orders
                .iter()
                .map(|o| {
                    let values = record(o);
                    let mut obj = serde_json::Map::new();
                    for (k, v) in HEADER.iter().zip(values) {
                        obj.insert((*k).to_string(), json!(v));
                    }
                    serde_json::Value::Object(obj)
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    tracing::info!(rows = orders.len(), path = out.as_str(), "orders exported");
    println!("Exported {} orders to {}", orders.len(), out);
    Ok(())
}
