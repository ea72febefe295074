// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use shopdesk::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    logging::init(matches.get_flag("verbose"));

    let mut conn = db::open_or_init()?;
    let now = chrono::Local::now().naive_local();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("product-name", sub)) => commands::product_names::handle(&conn, sub)?,
        Some(("shop", sub)) => commands::shops::handle(&conn, sub)?,
        Some(("product", sub)) => commands::products::handle(&conn, sub, now)?,
        Some(("user", sub)) => commands::users::handle(&conn, sub, now)?,
        Some(("salary", sub)) => commands::salaries::handle(&conn, sub)?,
        Some(("support", sub)) => commands::support::handle(&conn, sub, now)?,
        Some(("order", sub)) => commands::orders::handle(&mut conn, sub, now)?,
        Some(("expense", sub)) => commands::expenses::handle(&mut conn, sub, now)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, sub, now)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
