// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Expense, ExpenseItem};
use crate::order_edit::DateTimeInput;
use crate::store::{insert_expense, load_expenses};
use crate::utils::{
    fmt_money, fmt_ts, get_currency, maybe_print_json, parse_amount, parse_date, pretty_table,
    required,
};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let order_id = *sub.get_one::<i64>("order").unwrap();
            let date = match sub.get_one::<String>("date") {
                Some(d) => DateTimeInput::new(Some(parse_date(d)?), None)
                    .compose()
                    .unwrap_or(now),
                None => now,
            };
            let mut items = Vec::new();
            for raw in sub.get_many::<String>("item").into_iter().flatten() {
                items.push(parse_line(raw)?);
            }
            let expense_id = insert_expense(conn, order_id, date, &items)?;
            let total: rust_decimal::Decimal = items.iter().map(|i| i.amount).sum();
            println!(
                "Recorded expense {} on order {} ({})",
                expense_id,
                order_id,
                fmt_money(&total, &get_currency(conn)?)
            );
        }
        Some(("list", sub)) => {
            let order = sub.get_one::<i64>("order").copied();
            let data: Vec<Expense> = load_expenses(conn)?
                .into_iter()
                .filter(|e| order.is_none_or(|id| e.order_id == id))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let ccy = get_currency(conn)?;
                let rows = data
                    .iter()
                    .map(|e| {
                        let lines: Vec<String> = e
                            .expenses
                            .iter()
                            .map(|i| format!("{} {}", i.kind, i.amount))
                            .collect();
                        vec![
                            e.id.to_string(),
                            e.order_id.to_string(),
                            fmt_ts(e.expense_date),
                            lines.join(", "),
                            fmt_money(&e.total(), &ccy),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Order", "Date", "Items", "Total"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

/// `type:amount`, e.g. `delivery:120`.
pub fn parse_line(raw: &str) -> Result<ExpenseItem> {
    let (kind, amount) = raw
        .rsplit_once(':')
        .with_context(|| format!("Invalid expense line '{}', expected type:amount", raw))?;
    Ok(ExpenseItem {
        kind: required("expense type", kind)?,
        amount: parse_amount("expense amount", amount)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn expense_lines() {
        let item = parse_line("fuel: 120.50").unwrap();
        assert_eq!(item.kind, "fuel");
        assert_eq!(item.amount, Decimal::new(12050, 2));
        assert!(parse_line("fuel").is_err());
        assert!(parse_line(":10").is_err());
        assert!(parse_line("fuel:-3").is_err());
    }
}
