// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use crate::store::load_users;
use crate::utils::{fmt_ts, maybe_print_json, pretty_table, required, validate_email};
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = User {
                id: 0,
                name: required("name", sub.get_one::<String>("name").unwrap())?,
                email: sub.get_one::<String>("email").unwrap().trim().to_lowercase(),
                role: sub.get_one::<String>("role").unwrap().trim().to_string(),
                status: *sub.get_one::<i64>("status").unwrap(),
                created_at: Some(now),
            };
            let id = add_user(conn, &user)?;
            println!("Added user {} <{}>", id, user.email);
        }
        Some(("list", sub)) => {
            let data = load_users(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|u| {
                        vec![
                            u.id.to_string(),
                            u.name.clone(),
                            u.email.clone(),
                            u.role.clone(),
                            if u.status == 1 { "active" } else { "inactive" }.to_string(),
                            fmt_ts(u.created_at),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Email", "Role", "Status", "Created"], rows)
                );
            }
        }
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let mut user = load_users(conn)?
                .into_iter()
                .find(|u| u.id == id)
                .with_context(|| format!("User {} not found", id))?;
            if let Some(v) = sub.get_one::<String>("name") {
                user.name = required("name", v)?;
            }
            if let Some(v) = sub.get_one::<String>("email") {
                user.email = v.trim().to_lowercase();
            }
            if let Some(v) = sub.get_one::<String>("role") {
                user.role = v.trim().to_string();
            }
            if let Some(v) = sub.get_one::<i64>("status") {
                user.status = *v;
            }
            update_user(conn, &user)?;
            println!("Updated user {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if conn.execute("DELETE FROM users WHERE id=?1", params![id])? == 0 {
                bail!("User {} not found", id);
            }
            println!("Removed user {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn email_taken(conn: &Connection, email: &str, except: Option<i64>) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE email=?1 AND (?2 IS NULL OR id != ?2)",
            params![email, except],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn add_user(conn: &Connection, u: &User) -> Result<i64> {
    validate_email(&u.email)?;
    if email_taken(conn, &u.email, None)? {
        bail!("Email '{}' is already registered", u.email);
    }
    conn.execute(
        "INSERT INTO users(name, email, role, status, created_at) VALUES (?1,?2,?3,?4,?5)",
        params![u.name, u.email, u.role, u.status, u.created_at],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user_id = id, "user created");
    Ok(id)
}

pub fn update_user(conn: &Connection, u: &User) -> Result<()> {
    validate_email(&u.email)?;
    if email_taken(conn, &u.email, Some(u.id))? {
        bail!("Email '{}' is already registered", u.email);
    }
    conn.execute(
        "UPDATE users SET name=?1, email=?2, role=?3, status=?4 WHERE id=?5",
        params![u.name, u.email, u.role, u.status, u.id],
    )?;
    Ok(())
}
