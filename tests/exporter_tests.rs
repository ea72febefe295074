// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use shopdesk::commands::{doctor, exporter};
use shopdesk::{cli, db};
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO orders(id, user_name, user_phone, total_amount, paid_payment, pending_payment,
                           created_at, updated_at)
        VALUES (1, 'Asha', '9876543210', '120.50', '20.50', '100.00',
                '2025-01-02 10:00:00', '2025-01-02 10:00:00'),
               (2, 'Vikram', NULL, '80', '80', '0',
                '2025-01-05 09:15:00', '2025-01-05 09:15:00');
        "#,
    )
    .unwrap();
    conn
}

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["shopdesk", "export", "orders"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_orders_writes_filtered_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("orders.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &conn,
        &["--format", "json", "--out", &out_str, "--status", "pending"],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": "1",
                "created_at": "2025-01-02 10:00:00",
                "customer": "Asha",
                "email": "",
                "phone": "9876543210",
                "shipping_address": "",
                "billing_number": "",
                "total_amount": "120.50",
                "paid_payment": "20.50",
                "pending_payment": "100.00",
                "pickup_time": "N/A",
                "delivered_date": "N/A"
            }
        ])
    );
}

#[test]
fn export_orders_csv_is_newest_first() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("orders.csv");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["--format", "CSV", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let ids: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["2", "1"]);
}

#[test]
fn export_orders_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("orders.xml");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(export(&conn, &["--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}

#[test]
fn doctor_flags_drifted_pending_and_orphans() {
    let conn = base_conn();
    assert!(doctor::find_issues(&conn).unwrap().is_empty());

    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = OFF;
        UPDATE orders SET pending_payment='5' WHERE id=2;
        INSERT INTO order_items(order_id, product_id, product_name) VALUES (1, 42, 'Ghost');
        INSERT INTO expenses(id, order_id, expense_date) VALUES (1, 99, '2025-01-03');
        "#,
    )
    .unwrap();
    let kinds: Vec<String> = doctor::find_issues(&conn)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert!(kinds.contains(&"order_pending_mismatch".to_string()));
    assert!(kinds.contains(&"dangling_product".to_string()));
    assert!(kinds.contains(&"expense_without_order".to_string()));
}
