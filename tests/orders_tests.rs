// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use shopdesk::commands::{orders, products};
use shopdesk::error::ValidationError;
use shopdesk::metrics::rankings::{ORDERS_PER_PAGE, page};
use shopdesk::{cli, db, store};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 20)
        .unwrap()
        .and_hms_opt(15, 30, 0)
        .unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["shopdesk", "order"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("order", m)) = matches.subcommand() {
        orders::handle(conn, m, now())
    } else {
        panic!("no order subcommand");
    }
}

fn list_rows(conn: &Connection, args: &[&str]) -> Vec<shopdesk::models::Order> {
    let mut argv = vec!["shopdesk", "order", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let list_m = matches
        .subcommand_matches("order")
        .and_then(|m| m.subcommand_matches("list"))
        .expect("order list matches");
    orders::query_rows(conn, list_m).unwrap()
}

fn seed_orders(conn: &mut Connection) {
    for day in 1..=12 {
        let date = format!("2024-03-{:02}", day);
        let customer = if day % 4 == 0 { "Asha Rao" } else { "Vikram" };
        let paid = if day % 2 == 0 { "100" } else { "25" };
        run(
            conn,
            &[
                "add", "--customer", customer, "--total", "100", "--paid", paid, "--date", &date,
            ],
        )
        .unwrap();
    }
}

#[test]
fn list_is_newest_first_and_paged() {
    let mut conn = setup();
    seed_orders(&mut conn);
    let rows = list_rows(&conn, &[]);
    assert_eq!(rows.len(), 12);
    assert_eq!(
        rows[0].created_at,
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap().and_hms_opt(12, 0, 0)
    );
    assert_eq!(page(&rows, 1, ORDERS_PER_PAGE).len(), 10);
    assert_eq!(page(&rows, 2, ORDERS_PER_PAGE).len(), 2);
    assert!(page(&rows, 3, ORDERS_PER_PAGE).is_empty());
}

#[test]
fn list_filters_by_status_range_and_search() {
    let mut conn = setup();
    seed_orders(&mut conn);

    let paid = list_rows(&conn, &["--status", "paid"]);
    assert_eq!(paid.len(), 6);
    assert!(paid.iter().all(|o| o.outstanding() == Decimal::ZERO));

    let pending = list_rows(&conn, &["--status", "pending"]);
    assert_eq!(pending.len(), 6);

    // both end days are included
    let ranged = list_rows(&conn, &["--from", "2024-03-03", "--to", "2024-03-05"]);
    assert_eq!(ranged.len(), 3);

    let by_name = list_rows(&conn, &["--search", "ASHA"]);
    assert_eq!(by_name.len(), 3);

    let by_id = list_rows(&conn, &["--search", "1"]);
    let mut ids: Vec<i64> = by_id.iter().map(|o| o.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 10, 11, 12]);

    // orders never delivered drop out once a delivered range is set
    assert!(list_rows(&conn, &["--delivered-from", "2024-01-01"]).is_empty());
}

#[test]
fn payments_move_pending_to_paid_and_reject_overpayment() {
    let mut conn = setup();
    run(
        &mut conn,
        &["add", "--customer", "Asha", "--total", "100", "--paid", "40"],
    )
    .unwrap();
    run(&mut conn, &["pay", "1", "60"]).unwrap();

    let order = store::load_order(&conn, 1).unwrap();
    assert_eq!(order.paid_payment, Decimal::from(100));
    assert_eq!(order.pending_payment, Decimal::ZERO);
    assert_eq!(store::load_payment_logs(&conn, 1).unwrap().len(), 2);

    let err = run(&mut conn, &["pay", "1", "1"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::PaymentExceedsPending { .. })
    ));
    assert_eq!(store::load_payment_logs(&conn, 1).unwrap().len(), 2);
}

#[test]
fn edit_with_delivery_before_pickup_changes_nothing() {
    let mut conn = setup();
    run(
        &mut conn,
        &["add", "--customer", "Asha", "--total", "100", "--date", "2024-03-01"],
    )
    .unwrap();
    let err = run(
        &mut conn,
        &[
            "edit",
            "1",
            "--pickup-date",
            "2024-03-05",
            "--delivered-date",
            "2024-03-04",
            "--total",
            "250",
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::DeliveredBeforePickup { .. })
    ));
    let order = store::load_order(&conn, 1).unwrap();
    assert_eq!(order.total_amount, Decimal::from(100));
    assert!(order.delivered_date.is_none());
    assert!(order.pickup_time.is_none());
}

#[test]
fn time_without_a_date_is_rejected() {
    let mut conn = setup();
    run(
        &mut conn,
        &["add", "--customer", "Asha", "--total", "100", "--date", "2024-03-01"],
    )
    .unwrap();
    let err = run(
        &mut conn,
        &["edit", "1", "--delivered-time", "10:00", "--total", "150"],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::Required("delivered-date"))
    ));
    let err = run(&mut conn, &["edit", "1", "--pickup-time", "09:00"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::Required("pickup-date"))
    ));
    let order = store::load_order(&conn, 1).unwrap();
    assert_eq!(order.total_amount, Decimal::from(100));
    assert!(order.delivered_date.is_none());
    assert!(order.pickup_time.is_none());

    run(
        &mut conn,
        &["edit", "1", "--delivered-date", "2024-03-04"],
    )
    .unwrap();
    run(&mut conn, &["edit", "1", "--delivered-time", "10:00"]).unwrap();
    assert_eq!(
        store::load_order(&conn, 1).unwrap().delivered_date,
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(10, 0, 0)
    );
}

#[test]
fn edit_recomputes_pending_and_defaults_times() {
    let mut conn = setup();
    run(
        &mut conn,
        &["add", "--customer", "Asha", "--total", "100", "--date", "2024-03-01"],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "edit",
            "1",
            "--pickup-date",
            "2024-03-04",
            "--pickup-time",
            "09:30",
            "--delivered-date",
            "2024-03-05",
            "--total",
            "250",
            "--paid",
            "75",
        ],
    )
    .unwrap();
    let order = store::load_order(&conn, 1).unwrap();
    assert_eq!(order.pending_payment, Decimal::from(175));
    assert_eq!(
        order.delivered_date,
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(12, 0, 0)
    );
    assert_eq!(
        order.pickup_time,
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(9, 30, 0)
    );
    assert_eq!(order.updated_at, Some(now()));

    run(&mut conn, &["edit", "1", "--clear-delivered"]).unwrap();
    assert!(store::load_order(&conn, 1).unwrap().delivered_date.is_none());
}

#[test]
fn line_items_must_reference_known_products() {
    let mut conn = setup();
    assert!(
        run(
            &mut conn,
            &["add", "--customer", "Asha", "--total", "100", "--item", "7:1:100"],
        )
        .is_err()
    );
    conn.execute(
        "INSERT INTO products(id, product_name, category, owned_imported, price, created_at, updated_at)
         VALUES (7, 'Basmati', 'Grains', 'owned', '50', '2024-03-01 10:00:00', '2024-03-01 10:00:00')",
        [],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "add", "--customer", "Asha", "--total", "100", "--item", "7:2:50",
        ],
    )
    .unwrap();
    let order = store::load_order(&conn, 1).unwrap();
    assert_eq!(order.products.len(), 1);
    assert_eq!(order.products[0].product_name, "Basmati");
    assert!(order.references_product(7));

    let matches = cli::build_cli().get_matches_from(["shopdesk", "product", "rm", "7"]);
    products::handle(&conn, matches.subcommand_matches("product").unwrap(), now()).unwrap();
    let order = store::load_order(&conn, 1).unwrap();
    assert!(!order.references_product(7));
    assert_eq!(order.products[0].product_name, "Basmati");
    assert_eq!(order.total_amount, Decimal::from(100));
}

#[test]
fn overpaid_order_is_not_created() {
    let mut conn = setup();
    let err = run(
        &mut conn,
        &["add", "--customer", "Asha", "--total", "10", "--paid", "20"],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::Overpaid { .. })
    ));
    assert!(store::load_orders(&conn).unwrap().is_empty());
}
