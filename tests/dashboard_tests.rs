// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use shopdesk::commands::{dashboard, products};
use shopdesk::metrics::{DateRange, build_dashboard};
use shopdesk::models::{ExpenseItem, OrderItem, Product};
use shopdesk::store::{self, NewOrder};
use shopdesk::{cli, db};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

fn item(product_id: i64) -> OrderItem {
    OrderItem {
        product_id: Some(product_id),
        product_name: format!("p{}", product_id),
        quantity: 1,
        product_price: Decimal::from(10),
    }
}

fn order(total: i64, paid: i64, items: Vec<OrderItem>) -> NewOrder {
    NewOrder {
        user_name: "Asha".into(),
        user_email: None,
        user_phone: None,
        shipping_address: None,
        billing_number: None,
        total_amount: Decimal::from(total),
        paid_payment: Decimal::from(paid),
        created_at: at(1, 9),
        items,
    }
}

/// Three products; orders on May 1..=6 (one per day, written at noon), an
/// expense on May 3.
fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for name in ["Rice", "Dal", "Oil"] {
        let p = Product {
            product_name: name.into(),
            category: "Grocery".into(),
            owned_imported: Some("owned".into()),
            price: Decimal::from(10),
            ..Product::default()
        };
        products::insert_product(&conn, &p, at(1, 8)).unwrap();
    }
    let plan: [(u32, i64, i64, Vec<i64>); 6] = [
        (1, 100, 100, vec![1]),
        (2, 200, 50, vec![2, 2]),
        (3, 300, 300, vec![2, 3]),
        (4, 50, 0, vec![3]),
        (5, 80, 80, vec![3, 1]),
        (6, 40, 40, vec![]),
    ];
    for (day, total, paid, ids) in plan {
        let items = ids.into_iter().map(item).collect();
        store::insert_order(&mut conn, &order(total, paid, items), at(day, 12)).unwrap();
    }
    store::insert_expense(
        &mut conn,
        3,
        at(3, 18),
        &[
            ExpenseItem {
                kind: "delivery".into(),
                amount: Decimal::from(30),
            },
            ExpenseItem {
                kind: "packing".into(),
                amount: Decimal::from(5),
            },
        ],
    )
    .unwrap();
    conn
}

#[test]
fn closed_range_totals_series_and_deltas() {
    let conn = setup();
    let data = store::load_dataset(&conn).unwrap();
    let dash = build_dashboard(&data, DateRange::between(date(4), date(6)), at(30, 0));

    let s = &dash.summary;
    assert_eq!(s.total_orders, 3);
    assert_eq!(s.total_order_amount, Decimal::from(170));
    assert_eq!(s.total_paid_amount, Decimal::from(120));
    assert_eq!(s.total_pending_amount, Decimal::from(50));
    assert_eq!(s.successful_payment_count, 2);
    assert_eq!(s.paid_order_count, 2);
    assert_eq!(s.total_expenses, Decimal::ZERO);
    assert_eq!(s.total_products, 0);

    // previous window is May 1..=3: paid 450, expenses 35
    let d = dash.deltas.as_ref().unwrap();
    assert_eq!(d.orders, Decimal::ZERO);
    assert_eq!(d.expenses, Decimal::from(-100));

    assert_eq!(dash.series.len(), 3);
    assert_eq!(dash.series[0].date, date(4));
    assert_eq!(dash.series[0].pending_amount, Decimal::from(50));
    let bucketed: usize = dash.series.iter().map(|b| b.orders).sum();
    assert_eq!(bucketed, s.total_orders);
}

#[test]
fn top_products_follow_line_item_links() {
    let conn = setup();
    let data = store::load_dataset(&conn).unwrap();
    let dash = build_dashboard(&data, DateRange::default(), at(6, 13));

    // product 2 appears twice in order 2 but counts once there
    let ranked: Vec<(i64, usize)> = dash
        .top_products
        .iter()
        .map(|p| (p.id, p.order_count))
        .collect();
    assert_eq!(ranked, vec![(3, 3), (1, 2), (2, 2)]);

    assert!(dash.deltas.is_none());
    assert_eq!(dash.summary.total_orders, 6);
    assert_eq!(dash.summary.total_products, 3);
    assert_eq!(dash.summary.net_amount, Decimal::from(570 - 35));
    assert_eq!(dash.series.first().unwrap().date, date(1));
    assert_eq!(dash.series.last().unwrap().date, date(6));
    assert_eq!(dash.recent_orders[0].id, 6);
}

#[test]
fn range_flags_parse_from_cli() {
    let matches = cli::build_cli().get_matches_from([
        "shopdesk",
        "dashboard",
        "--start",
        "2024-05-01",
        "--end",
        "2024-05-31",
        "--json",
    ]);
    let m = matches.subcommand_matches("dashboard").unwrap();
    let range = dashboard::range_from_matches(m).unwrap();
    assert_eq!(range, DateRange::between(date(1), date(31)));
    assert!(m.get_flag("json"));

    let open = cli::build_cli().get_matches_from(["shopdesk", "dashboard"]);
    let range = dashboard::range_from_matches(open.subcommand_matches("dashboard").unwrap())
        .unwrap();
    assert!(!range.is_set());
}
