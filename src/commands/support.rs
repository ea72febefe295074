// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::lenient::parse_timestamp;
use crate::models::{SupportRequest, TicketStatus};
use crate::utils::{fmt_ts, maybe_print_json, pretty_table, required, validate_email};
use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use std::cmp::Reverse;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub.get_one::<String>("email").unwrap().trim().to_string();
            validate_email(&email)?;
            conn.execute(
                "INSERT INTO support_requests(name, email, subject, message, status, created_at)
                 VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    required("name", sub.get_one::<String>("name").unwrap())?,
                    email,
                    required("subject", sub.get_one::<String>("subject").unwrap())?,
                    required("message", sub.get_one::<String>("message").unwrap())?,
                    TicketStatus::Pending.as_str(),
                    now
                ],
            )?;
            println!("Opened ticket {}", conn.last_insert_rowid());
        }
        Some(("list", sub)) => {
            let data = list_tickets(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            fmt_ts(t.created_at),
                            format!("{} <{}>", t.name, t.email),
                            t.subject.clone(),
                            t.status.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Opened", "From", "Subject", "Status"], rows)
                );
            }
        }
        Some(("status", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let status: TicketStatus = sub.get_one::<String>("status").unwrap().parse()?;
            set_status(conn, id, status)?;
            println!("Ticket {} is now {}", id, status);
        }
        _ => {}
    }
    Ok(())
}

pub fn set_status(conn: &Connection, id: i64, status: TicketStatus) -> Result<()> {
    let n = conn.execute(
        "UPDATE support_requests SET status=?1 WHERE id=?2",
        params![status.as_str(), id],
    )?;
    if n == 0 {
        bail!("Ticket {} not found", id);
    }
    Ok(())
}

/// Newest first.
pub fn list_tickets(conn: &Connection) -> Result<Vec<SupportRequest>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, subject, message, status, created_at FROM support_requests",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, email, subject, message, status, created_at) = row?;
        out.push(SupportRequest {
            id,
            name,
            email,
            subject,
            message,
            status: status.parse()?,
            created_at: created_at.as_deref().and_then(parse_timestamp),
        });
    }
    out.sort_by_key(|t| Reverse((t.created_at, t.id)));
    Ok(out)
}
