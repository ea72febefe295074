// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::{Dashboard, Dataset, DateRange, build_dashboard};
use crate::remote::fetch_dataset;
use crate::store::load_dataset;
use crate::utils::{
    SETTING_API_URL, fmt_money, fmt_pct, fmt_ts, get_currency, get_setting, maybe_print_json,
    parse_date, pretty_table,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let range = range_from_matches(m)?;
    let data = load_source(conn, m)?;
    let dash = build_dashboard(&data, range, now);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &dash)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    print_dashboard(&dash, &ccy, m.get_flag("series"));
    Ok(())
}

pub fn range_from_matches(m: &clap::ArgMatches) -> Result<DateRange> {
    let start = m.get_one::<String>("start").map(|s| parse_date(s)).transpose()?;
    let end = m.get_one::<String>("end").map(|s| parse_date(s)).transpose()?;
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            tracing::warn!(%s, %e, "end date precedes start date; the range is empty");
        }
    }
    Ok(DateRange::new(start, end))
}

fn load_source(conn: &Connection, m: &clap::ArgMatches) -> Result<Dataset> {
    if !m.get_flag("remote") {
        return load_dataset(conn);
    }
    let url = match m.get_one::<String>("url") {
        Some(u) => u.clone(),
        None => get_setting(conn, SETTING_API_URL)?
            .context("No backend URL: pass --url or run `shopdesk config set api_url <url>`")?,
    };
    fetch_dataset(&url).with_context(|| format!("Fetch dashboard data from {}", url))
}

fn change(deltas: Option<Decimal>) -> String {
    deltas.map(|d| fmt_pct(&d)).unwrap_or_default()
}

fn period_label(range: &DateRange) -> String {
    if !range.is_set() {
        return "all time".to_string();
    }
    let day = |d: Option<NaiveDate>| d.map(|x| x.to_string()).unwrap_or_else(|| "...".into());
    format!("{} to {}", day(range.start), day(range.end))
}

pub fn print_dashboard(dash: &Dashboard, ccy: &str, with_series: bool) {
    let s = &dash.summary;
    let d = dash.deltas.as_ref();
    let money = |v: &Decimal| fmt_money(v, ccy);
    let rows = vec![
        vec!["Orders".into(), s.total_orders.to_string(), change(d.map(|d| d.orders))],
        vec!["Products".into(), s.total_products.to_string(), change(d.map(|d| d.products))],
        vec!["Users".into(), s.total_users.to_string(), change(d.map(|d| d.users))],
        vec![
            "Order amount".into(),
            money(&s.total_order_amount),
            change(d.map(|d| d.order_amount)),
        ],
        vec![
            "Successful payments".into(),
            format!(
                "{} ({} orders)",
                money(&s.successful_payment_amount),
                s.successful_payment_count
            ),
            change(d.map(|d| d.successful_payments)),
        ],
        vec![
            "Paid".into(),
            format!("{} ({} orders)", money(&s.total_paid_amount), s.paid_order_count),
            change(d.map(|d| d.paid_amount)),
        ],
        vec![
            "Pending".into(),
            money(&s.total_pending_amount),
            change(d.map(|d| d.pending_amount)),
        ],
        vec![
            "Expenses".into(),
            money(&s.total_expenses),
            change(d.map(|d| d.expenses)),
        ],
        vec!["Net".into(), money(&s.net_amount), change(d.map(|d| d.net_amount))],
    ];
    let period = period_label(&dash.range);
    println!("Dashboard: {}", period);
    println!("{}", pretty_table(&["Metric", "Value", "vs previous"], rows));

    if !dash.top_products.is_empty() {
        let rows = dash
            .top_products
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.category.clone(),
                    p.order_count.to_string(),
                    money(&p.revenue),
                ]
            })
            .collect();
        println!("Top products");
        println!("{}", pretty_table(&["Product", "Category", "Orders", "Revenue"], rows));
    }

    if !dash.recent_orders.is_empty() {
        let rows = dash
            .recent_orders
            .iter()
            .map(|o| {
                vec![
                    o.id.to_string(),
                    o.user_name.clone(),
                    money(&o.total_amount),
                    money(&o.pending),
                    fmt_ts(o.updated_at),
                ]
            })
            .collect();
        println!("Recent orders");
        println!(
            "{}",
            pretty_table(&["ID", "Customer", "Total", "Pending", "Updated"], rows)
        );
    }

    if !dash.users_by_role.is_empty() {
        let rows = dash
            .users_by_role
            .iter()
            .map(|r| vec![r.role.clone(), r.users.to_string()])
            .collect();
        println!("{}", pretty_table(&["Role", "Users"], rows));
    }

    if with_series {
        let rows = dash
            .series
            .iter()
            .map(|b| {
                vec![
                    b.date.to_string(),
                    b.orders.to_string(),
                    money(&b.total_amount),
                    money(&b.paid_amount),
                    money(&b.pending_amount),
                    money(&b.expenses),
                    money(&b.net_amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Day", "Orders", "Amount", "Paid", "Pending", "Expenses", "Net"],
                rows
            )
        );
    }
}
