// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required("name", sub.get_one::<String>("name").unwrap())?;
            let image = sub.get_one::<String>("image").map(|s| s.trim().to_string());
            conn.execute(
                "INSERT INTO categories(name, image) VALUES (?1, ?2)",
                params![name, image],
            )?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let data = list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            c.image.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Image"], rows));
            }
        }
        Some(("rename", sub)) => {
            let old = sub.get_one::<String>("old").unwrap();
            let new = required("new name", sub.get_one::<String>("new").unwrap())?;
            let tx = conn.unchecked_transaction()?;
            let n = tx.execute(
                "UPDATE categories SET name=?1 WHERE name=?2",
                params![new, old],
            )?;
            if n == 0 {
                bail!("Category '{}' not found", old);
            }
            // products carry the category by name
            tx.execute(
                "UPDATE products SET category=?1 WHERE category=?2",
                params![new, old],
            )?;
            tx.commit()?;
            println!("Renamed category '{}' to '{}'", old, new);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let n = conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            if n == 0 {
                bail!("Category '{}' not found", name);
            }
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, image FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            image: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
