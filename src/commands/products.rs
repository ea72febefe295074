// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Ownership, Product, product_pending};
use crate::store::{load_orders, load_products};
use crate::utils::{
    fmt_money, fmt_ts, get_currency, id_for_category, maybe_print_json, parse_amount,
    pretty_table, required,
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let mut product = Product {
                created_at: Some(now),
                ..Product::default()
            };
            apply_fields(conn, &mut product, sub)?;
            let id = insert_product(conn, &product, now)?;
            println!(
                "Added product {} '{}' (pending {})",
                id, product.product_name, product.pending_amount
            );
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let mut product = get_product(conn, id)?;
            apply_fields(conn, &mut product, sub)?;
            update_product(conn, &product, now)?;
            println!("Updated product {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let linked = load_orders(conn)?
                .iter()
                .filter(|o| o.references_product(id))
                .count();
            if conn.execute("DELETE FROM products WHERE id=?1", params![id])? == 0 {
                bail!("Product {} not found", id);
            }
            tracing::info!(product_id = id, linked_orders = linked, "product removed");
            println!("Removed product {}", id);
            if linked > 0 {
                // Line items keep their name but lose the link.
                println!("{} order(s) no longer count toward this product", linked);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Overlays whichever fields were given, then re-derives the ownership
/// split and pending amount.
fn apply_fields(conn: &Connection, p: &mut Product, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(v) = sub.get_one::<String>("name") {
        p.product_name = required("name", v)?;
    }
    if let Some(v) = sub.get_one::<String>("category") {
        id_for_category(conn, v)?;
        p.category = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("ownership") {
        p.owned_imported = Some(v.parse::<Ownership>()?.as_str().to_string());
    }
    if let Some(v) = sub.get_one::<String>("company") {
        p.company_name = Some(v.trim().to_string());
    }
    if let Some(v) = sub.get_one::<String>("shop") {
        p.shop_name = Some(v.trim().to_string());
    }
    if let Some(v) = sub.get_one::<String>("price") {
        p.price = parse_amount("price", v)?;
    }
    if let Some(v) = sub.get_one::<String>("paid") {
        p.paid_amount = parse_amount("paid_amount", v)?;
    }
    if let Some(v) = sub.get_one::<i64>("stock") {
        p.stock_quantity = *v;
    }
    if let Some(v) = sub.get_one::<String>("description") {
        p.description = Some(v.clone());
    }
    normalize(p)
}

/// Owned stock is bought from a shop, imported stock from a company; the
/// other field is cleared.
pub fn normalize(p: &mut Product) -> Result<()> {
    let ownership = p
        .owned_imported
        .as_deref()
        .context("Ownership (owned|imported) is required")?
        .parse::<Ownership>()?;
    match ownership {
        Ownership::Owned => p.company_name = None,
        Ownership::Imported => p.shop_name = None,
    }
    p.pending_amount = product_pending(p.price, p.paid_amount);
    Ok(())
}

pub fn insert_product(conn: &Connection, p: &Product, now: NaiveDateTime) -> Result<i64> {
    conn.execute(
        "INSERT INTO products(product_name, category, company_name, shop_name, owned_imported,
                              price, paid_amount, pending_amount, stock_quantity, description,
                              created_at, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            p.product_name,
            p.category,
            p.company_name,
            p.shop_name,
            p.owned_imported,
            p.price.to_string(),
            p.paid_amount.to_string(),
            p.pending_amount.to_string(),
            p.stock_quantity,
            p.description,
            p.created_at.unwrap_or(now),
            now
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(product_id = id, "product created");
    Ok(id)
}

pub fn update_product(conn: &Connection, p: &Product, now: NaiveDateTime) -> Result<()> {
    conn.execute(
        "UPDATE products SET product_name=?1, category=?2, company_name=?3, shop_name=?4,
                owned_imported=?5, price=?6, paid_amount=?7, pending_amount=?8,
                stock_quantity=?9, description=?10, updated_at=?11
         WHERE id=?12",
        params![
            p.product_name,
            p.category,
            p.company_name,
            p.shop_name,
            p.owned_imported,
            p.price.to_string(),
            p.paid_amount.to_string(),
            p.pending_amount.to_string(),
            p.stock_quantity,
            p.description,
            now,
            p.id
        ],
    )?;
    tracing::info!(product_id = p.id, "product updated");
    Ok(())
}

pub fn get_product(conn: &Connection, id: i64) -> Result<Product> {
    load_products(conn)?
        .into_iter()
        .find(|p| p.id == id)
        .with_context(|| format!("Product {} not found", id))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category");
    let data: Vec<Product> = load_products(conn)?
        .into_iter()
        .filter(|p| category.is_none_or(|c| p.category.eq_ignore_ascii_case(c.trim())))
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = data
        .iter()
        .map(|p| {
            let source = match p.owned_imported.as_deref() {
                Some("owned") => p.shop_name.clone().unwrap_or_default(),
                _ => p.company_name.clone().unwrap_or_default(),
            };
            vec![
                p.id.to_string(),
                p.product_name.clone(),
                p.category.clone(),
                p.owned_imported.clone().unwrap_or_default(),
                source,
                fmt_money(&p.price, &ccy),
                fmt_money(&p.paid_amount, &ccy),
                fmt_money(&p.pending_amount, &ccy),
                p.stock_quantity.to_string(),
                fmt_ts(p.updated_at),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Product", "Category", "Type", "From", "Price", "Paid", "Pending", "Stock",
                "Updated"
            ],
            rows,
        )
    );
    Ok(())
}
