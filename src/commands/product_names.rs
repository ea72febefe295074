// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_category, maybe_print_json, pretty_table, required};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProductNameRow {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required("name", sub.get_one::<String>("name").unwrap())?;
            let category = sub.get_one::<String>("category").unwrap();
            let category_id = id_for_category(conn, category)?;
            conn.execute(
                "INSERT INTO product_names(name, category_id) VALUES (?1, ?2)",
                params![name, category_id],
            )?;
            println!("Added product name '{}' under '{}'", name, category);
        }
        Some(("list", sub)) => {
            let data = query_rows(conn, sub.get_one::<String>("category").map(|s| s.as_str()))?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            r.name.clone(),
                            r.category.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Name", "Category"], rows));
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if conn.execute("DELETE FROM product_names WHERE id=?1", params![id])? == 0 {
                bail!("Product name {} not found", id);
            }
            println!("Removed product name {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, category: Option<&str>) -> Result<Vec<ProductNameRow>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, c.name FROM product_names p
         LEFT JOIN categories c ON p.category_id=c.id
         WHERE (?1 IS NULL OR c.name=?1)
         ORDER BY c.name, p.name",
    )?;
    let rows = stmt.query_map(params![category], |r| {
        Ok(ProductNameRow {
            id: r.get(0)?,
            name: r.get(1)?,
            category: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
