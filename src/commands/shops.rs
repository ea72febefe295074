// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Shop;
use crate::utils::{maybe_print_json, pretty_table, required, validate_contact_number};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let shop = Shop {
                id: 0,
                name: required("name", sub.get_one::<String>("name").unwrap())?,
                location: required("location", sub.get_one::<String>("location").unwrap())?,
                contact_number: sub.get_one::<String>("contact").unwrap().trim().to_string(),
            };
            let id = add_shop(conn, &shop)?;
            println!("Added shop {} '{}'", id, shop.name);
        }
        Some(("list", sub)) => {
            let data = list_shops(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.name.clone(),
                            s.location.clone(),
                            s.contact_number.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Shop", "Location", "Contact"], rows)
                );
            }
        }
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let mut shop = get_shop(conn, id)?;
            if let Some(v) = sub.get_one::<String>("name") {
                shop.name = required("name", v)?;
            }
            if let Some(v) = sub.get_one::<String>("location") {
                shop.location = required("location", v)?;
            }
            if let Some(v) = sub.get_one::<String>("contact") {
                shop.contact_number = v.trim().to_string();
            }
            update_shop(conn, &shop)?;
            println!("Updated shop {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if conn.execute("DELETE FROM shops WHERE id=?1", params![id])? == 0 {
                bail!("Shop {} not found", id);
            }
            println!("Removed shop {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add_shop(conn: &Connection, shop: &Shop) -> Result<i64> {
    validate_contact_number(&shop.contact_number)?;
    conn.execute(
        "INSERT INTO shops(name, location, contact_number) VALUES (?1, ?2, ?3)",
        params![shop.name, shop.location, shop.contact_number],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_shop(conn: &Connection, shop: &Shop) -> Result<()> {
    validate_contact_number(&shop.contact_number)?;
    conn.execute(
        "UPDATE shops SET name=?1, location=?2, contact_number=?3 WHERE id=?4",
        params![shop.name, shop.location, shop.contact_number, shop.id],
    )?;
    Ok(())
}

pub fn get_shop(conn: &Connection, id: i64) -> Result<Shop> {
    conn.query_row(
        "SELECT id, name, location, contact_number FROM shops WHERE id=?1",
        params![id],
        |r| {
            Ok(Shop {
                id: r.get(0)?,
                name: r.get(1)?,
                location: r.get(2)?,
                contact_number: r.get(3)?,
            })
        },
    )
    .optional()?
    .with_context(|| format!("Shop {} not found", id))
}

pub fn list_shops(conn: &Connection) -> Result<Vec<Shop>> {
    let mut stmt =
        conn.prepare("SELECT id, name, location, contact_number FROM shops ORDER BY name, id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Shop {
            id: r.get(0)?,
            name: r.get(1)?,
            location: r.get(2)?,
            contact_number: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
