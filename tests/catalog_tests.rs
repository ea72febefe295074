// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use shopdesk::commands::{categories, products, shops, support, users};
use shopdesk::models::TicketStatus;
use shopdesk::{cli, db, store};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["shopdesk"];
    argv.extend_from_slice(args);
    cli::build_cli().get_matches_from(argv)
}

fn product(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["product"];
    argv.extend_from_slice(args);
    let m = matches(&argv);
    products::handle(conn, m.subcommand_matches("product").unwrap(), now())
}

fn category(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["category"];
    argv.extend_from_slice(args);
    let m = matches(&argv);
    categories::handle(conn, m.subcommand_matches("category").unwrap())
}

#[test]
fn ownership_decides_which_source_is_kept() {
    let conn = setup();
    category(&conn, &["add", "Grains"]).unwrap();
    product(
        &conn,
        &[
            "add", "--name", "Rice", "--category", "Grains", "--ownership", "owned", "--company",
            "Acme", "--shop", "Lakshmi Stores", "--price", "100", "--paid", "30", "--stock", "5",
        ],
    )
    .unwrap();
    let p = products::get_product(&conn, 1).unwrap();
    assert_eq!(p.shop_name.as_deref(), Some("Lakshmi Stores"));
    assert!(p.company_name.is_none());
    assert_eq!(p.pending_amount, Decimal::from(70));

    product(
        &conn,
        &["update", "1", "--ownership", "imported", "--company", "Acme", "--paid", "150"],
    )
    .unwrap();
    let p = products::get_product(&conn, 1).unwrap();
    assert!(p.shop_name.is_none());
    assert_eq!(p.company_name.as_deref(), Some("Acme"));
    // overpaid purchases show no pending
    assert_eq!(p.pending_amount, Decimal::ZERO);
}

#[test]
fn product_validation() {
    let conn = setup();
    category(&conn, &["add", "Grains"]).unwrap();
    assert!(
        product(
            &conn,
            &["add", "--name", "Rice", "--category", "Pulses", "--ownership", "owned", "--price", "1"],
        )
        .is_err()
    );
    assert!(
        product(
            &conn,
            &["add", "--name", "Rice", "--category", "Grains", "--ownership", "owned", "--price=-1"],
        )
        .is_err()
    );
    assert!(store::load_products(&conn).unwrap().is_empty());
}

#[test]
fn renaming_a_category_carries_its_products() {
    let conn = setup();
    category(&conn, &["add", "Grains", "--image", "img/grains.png"]).unwrap();
    product(
        &conn,
        &["add", "--name", "Rice", "--category", "Grains", "--ownership", "owned", "--price", "1"],
    )
    .unwrap();
    category(&conn, &["rename", "Grains", "Cereals"]).unwrap();
    let cats = categories::list_categories(&conn).unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Cereals");
    assert_eq!(cats[0].image.as_deref(), Some("img/grains.png"));
    assert_eq!(products::get_product(&conn, 1).unwrap().category, "Cereals");
    assert!(category(&conn, &["rm", "Grains"]).is_err());
}

#[test]
fn shop_contact_must_be_ten_digits() {
    let conn = setup();
    let m = matches(&[
        "shop", "add", "--name", "Lakshmi", "--location", "Pune", "--contact", "12345",
    ]);
    assert!(shops::handle(&conn, m.subcommand_matches("shop").unwrap()).is_err());
    let m = matches(&[
        "shop", "add", "--name", "Lakshmi", "--location", "Pune", "--contact", "9876543210",
    ]);
    shops::handle(&conn, m.subcommand_matches("shop").unwrap()).unwrap();
    let m = matches(&["shop", "update", "1", "--location", "Mumbai"]);
    shops::handle(&conn, m.subcommand_matches("shop").unwrap()).unwrap();
    let all = shops::list_shops(&conn).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].location, "Mumbai");
}

#[test]
fn user_emails_are_valid_and_unique() {
    let conn = setup();
    let add = |email: &str| {
        let m = matches(&["user", "add", "--name", "Asha", "--email", email, "--role", "admin"]);
        users::handle(&conn, m.subcommand_matches("user").unwrap(), now())
    };
    add("asha@shop.in").unwrap();
    assert!(add("ASHA@shop.in").is_err());
    assert!(add("not-an-email").is_err());
    let all = store::load_users(&conn).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, 1);
    assert_eq!(all[0].created_at, Some(now()));
}

#[test]
fn support_tickets_move_through_statuses() {
    let conn = setup();
    let m = matches(&[
        "support", "add", "--name", "Ravi", "--email", "ravi@mail.in", "--subject", "Late",
        "--message", "Where is my order?",
    ]);
    support::handle(&conn, m.subcommand_matches("support").unwrap(), now()).unwrap();
    support::set_status(&conn, 1, TicketStatus::InProgress).unwrap();
    let tickets = support::list_tickets(&conn).unwrap();
    assert_eq!(tickets[0].status, TicketStatus::InProgress);
    assert!(support::set_status(&conn, 9, TicketStatus::Resolved).is_err());
}
