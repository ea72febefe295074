// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reads the four dashboard collections out of SQLite and performs the
//! order writes that must keep `pending_payment` consistent.

use crate::error::ValidationError;
use crate::lenient::{decimal_or_zero, parse_timestamp};
use crate::metrics::Dataset;
use crate::models::{Expense, ExpenseItem, Order, OrderItem, PaymentLog, Product, User};
use crate::order_edit::ValidatedEdit;
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::HashMap;

fn ts(s: Option<String>) -> Option<NaiveDateTime> {
    s.as_deref().and_then(parse_timestamp)
}

fn dec(s: Option<String>) -> Decimal {
    s.as_deref().map(decimal_or_zero).unwrap_or(Decimal::ZERO)
}

pub fn load_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, product_name, category, company_name, shop_name, owned_imported, price,
                paid_amount, pending_amount, stock_quantity, description, created_at, updated_at
         FROM products ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(Product {
            id: r.get(0)?,
            product_name: r.get(1)?,
            category: r.get(2)?,
            company_name: r.get(3)?,
            shop_name: r.get(4)?,
            owned_imported: r.get(5)?,
            price: dec(r.get(6)?),
            paid_amount: dec(r.get(7)?),
            pending_amount: dec(r.get(8)?),
            stock_quantity: r.get(9)?,
            description: r.get(10)?,
            created_at: ts(r.get(11)?),
            updated_at: ts(r.get(12)?),
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn load_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, role, status, created_at FROM users ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(User {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
            role: r.get(3)?,
            status: r.get(4)?,
            created_at: ts(r.get(5)?),
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

const ORDER_COLUMNS: &str = "id, user_name, user_email, user_phone, shipping_address, billing_number,
     total_amount, paid_payment, pending_payment, created_at, updated_at, delivered_date, pickup_time";

fn order_from_row(r: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: r.get(0)?,
        user_name: r.get(1)?,
        user_email: r.get(2)?,
        user_phone: r.get(3)?,
        shipping_address: r.get(4)?,
        billing_number: r.get(5)?,
        total_amount: dec(r.get(6)?),
        paid_payment: dec(r.get(7)?),
        pending_payment: dec(r.get(8)?),
        created_at: ts(r.get(9)?),
        updated_at: ts(r.get(10)?),
        delivered_date: ts(r.get(11)?),
        pickup_time: ts(r.get(12)?),
        products: Vec::new(),
    })
}

fn load_items(conn: &Connection) -> Result<HashMap<i64, Vec<OrderItem>>> {
    let mut stmt = conn.prepare(
        "SELECT order_id, product_id, product_name, quantity, product_price
         FROM order_items ORDER BY order_id, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            OrderItem {
                product_id: r.get(1)?,
                product_name: r.get(2)?,
                quantity: r.get(3)?,
                product_price: dec(r.get(4)?),
            },
        ))
    })?;
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        let (order_id, item) = row?;
        by_order.entry(order_id).or_default().push(item);
    }
    Ok(by_order)
}

/// Newest first by `created_at`, the order-tracking default.
pub fn load_orders(conn: &Connection) -> Result<Vec<Order>> {
    let sql = format!(
        "SELECT {} FROM orders ORDER BY created_at DESC, id DESC",
        ORDER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], order_from_row)?;
    let mut items = load_items(conn)?;
    let mut out = Vec::new();
    for row in rows {
        let mut order = row?;
        order.products = items.remove(&order.id).unwrap_or_default();
        out.push(order);
    }
    Ok(out)
}

pub fn load_order(conn: &Connection, id: i64) -> Result<Order> {
    let sql = format!("SELECT {} FROM orders WHERE id=?1", ORDER_COLUMNS);
    let mut order = conn
        .query_row(&sql, params![id], order_from_row)
        .optional()?
        .with_context(|| format!("Order {} not found", id))?;
    let mut stmt = conn.prepare(
        "SELECT product_id, product_name, quantity, product_price
         FROM order_items WHERE order_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![id], |r| {
        Ok(OrderItem {
            product_id: r.get(0)?,
            product_name: r.get(1)?,
            quantity: r.get(2)?,
            product_price: dec(r.get(3)?),
        })
    })?;
    for row in rows {
        order.products.push(row?);
    }
    Ok(order)
}

pub fn load_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    let mut items: HashMap<i64, Vec<ExpenseItem>> = HashMap::new();
    {
        let mut stmt =
            conn.prepare("SELECT expense_id, type, amount FROM expense_items ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                ExpenseItem {
                    kind: r.get(1)?,
                    amount: dec(r.get(2)?),
                },
            ))
        })?;
        for row in rows {
            let (expense_id, item) = row?;
            items.entry(expense_id).or_default().push(item);
        }
    }

    let mut stmt = conn.prepare(
        "SELECT id, order_id, expense_date FROM expenses ORDER BY expense_date DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(Expense {
            id: r.get(0)?,
            order_id: r.get(1)?,
            expense_date: ts(r.get(2)?),
            expenses: Vec::new(),
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        let mut expense = row?;
        expense.expenses = items.remove(&expense.id).unwrap_or_default();
        out.push(expense);
    }
    Ok(out)
}

pub fn load_dataset(conn: &Connection) -> Result<Dataset> {
    let data = Dataset {
        orders: load_orders(conn)?,
        products: load_products(conn)?,
        users: load_users(conn)?,
        expenses: load_expenses(conn)?,
    };
    tracing::debug!(
        orders = data.orders.len(),
        products = data.products.len(),
        users = data.users.len(),
        expenses = data.expenses.len(),
        "loaded dataset from sqlite"
    );
    Ok(data)
}

pub fn load_payment_logs(conn: &Connection, order_id: i64) -> Result<Vec<PaymentLog>> {
    let mut stmt = conn.prepare(
        "SELECT id, order_id, payment_amount, created_at FROM payment_logs
         WHERE order_id=?1 ORDER BY created_at, id",
    )?;
    let rows = stmt.query_map(params![order_id], |r| {
        Ok(PaymentLog {
            id: r.get(0)?,
            order_id: r.get(1)?,
            payment_amount: dec(r.get(2)?),
            created_at: ts(r.get(3)?),
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn order_expense_total(conn: &Connection, order_id: i64) -> Result<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT i.amount FROM expense_items i JOIN expenses e ON i.expense_id=e.id
         WHERE e.order_id=?1",
    )?;
    let rows = stmt.query_map(params![order_id], |r| r.get::<_, Option<String>>(0))?;
    let mut total = Decimal::ZERO;
    for row in rows {
        total += dec(row?);
    }
    Ok(total)
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub shipping_address: Option<String>,
    pub billing_number: Option<String>,
    pub total_amount: Decimal,
    pub paid_payment: Decimal,
    pub created_at: NaiveDateTime,
    pub items: Vec<OrderItem>,
}

fn product_exists(conn: &Connection, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM products WHERE id=?1", params![id], |r| r.get(0))
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_order(conn: &mut Connection, o: &NewOrder, now: NaiveDateTime) -> Result<i64> {
    for (field, value) in [("total_amount", o.total_amount), ("paid_payment", o.paid_payment)] {
        if value < Decimal::ZERO {
            return Err(ValidationError::Negative { field, value }.into());
        }
    }
    if o.paid_payment > o.total_amount {
        return Err(ValidationError::Overpaid {
            paid: o.paid_payment,
            total: o.total_amount,
        }
        .into());
    }
    let pending = o.total_amount - o.paid_payment;

    let tx = conn.transaction()?;
    for item in &o.items {
        if let Some(pid) = item.product_id {
            if !product_exists(&tx, pid)? {
                bail!("Product {} referenced by line '{}' not found", pid, item.product_name);
            }
        }
    }
    tx.execute(
        "INSERT INTO orders(user_name, user_email, user_phone, shipping_address, billing_number,
                            total_amount, paid_payment, pending_payment, created_at, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            o.user_name,
            o.user_email,
            o.user_phone,
            o.shipping_address,
            o.billing_number,
            o.total_amount.to_string(),
            o.paid_payment.to_string(),
            pending.to_string(),
            o.created_at,
            now
        ],
    )?;
    let order_id = tx.last_insert_rowid();
    for item in &o.items {
        tx.execute(
            "INSERT INTO order_items(order_id, product_id, product_name, quantity, product_price)
             VALUES (?1,?2,?3,?4,?5)",
            params![
                order_id,
                item.product_id,
                item.product_name,
                item.quantity,
                item.product_price.to_string()
            ],
        )?;
    }
    if o.paid_payment > Decimal::ZERO {
        tx.execute(
            "INSERT INTO payment_logs(order_id, payment_amount, created_at) VALUES (?1,?2,?3)",
            params![order_id, o.paid_payment.to_string(), now],
        )?;
    }
    tx.commit()?;
    tracing::info!(order_id, total = %o.total_amount, "order created");
    Ok(order_id)
}

/// Writes a validated edit in one transaction; a missing order changes
/// nothing.
pub fn apply_order_edit(
    conn: &mut Connection,
    id: i64,
    edit: &ValidatedEdit,
    now: NaiveDateTime,
) -> Result<()> {
    let tx = conn.transaction()?;
    let changed = tx.execute(
        "UPDATE orders SET created_at=?1, delivered_date=?2, pickup_time=?3,
                total_amount=?4, paid_payment=?5, pending_payment=?6,
                user_email=?7, user_phone=?8, shipping_address=?9, billing_number=?10,
                updated_at=?11
         WHERE id=?12",
        params![
            edit.created_at,
            edit.delivered_date,
            edit.pickup_time,
            edit.total_amount.to_string(),
            edit.paid_payment.to_string(),
            edit.pending_payment.to_string(),
            edit.user_email,
            edit.user_phone,
            edit.shipping_address,
            edit.billing_number,
            now,
            id
        ],
    )?;
    if changed != 1 {
        bail!("Order {} not found", id);
    }
    tx.commit()?;
    tracing::info!(order_id = id, pending = %edit.pending_payment, "order updated");
    Ok(())
}

/// Moves `amount` from pending to paid and appends it to the payment log.
pub fn record_payment(
    conn: &mut Connection,
    id: i64,
    amount: Decimal,
    now: NaiveDateTime,
) -> Result<Order> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "payment_amount",
            value: amount,
        }
        .into());
    }
    let tx = conn.transaction()?;
    let order = load_order(&tx, id)?;
    let pending = order.outstanding();
    if amount > pending {
        return Err(ValidationError::PaymentExceedsPending { amount, pending }.into());
    }
    let paid = order.paid_payment + amount;
    tx.execute(
        "UPDATE orders SET paid_payment=?1, pending_payment=?2, updated_at=?3 WHERE id=?4",
        params![
            paid.to_string(),
            (order.total_amount - paid).to_string(),
            now,
            id
        ],
    )?;
    tx.execute(
        "INSERT INTO payment_logs(order_id, payment_amount, created_at) VALUES (?1,?2,?3)",
        params![id, amount.to_string(), now],
    )?;
    tx.commit()?;
    tracing::info!(order_id = id, amount = %amount, "payment recorded");
    load_order(conn, id)
}

pub fn insert_expense(
    conn: &mut Connection,
    order_id: i64,
    date: NaiveDateTime,
    items: &[ExpenseItem],
) -> Result<i64> {
    if items.is_empty() {
        return Err(ValidationError::Required("expense item").into());
    }
    for item in items {
        if item.amount < Decimal::ZERO {
            return Err(ValidationError::Negative {
                field: "expense amount",
                value: item.amount,
            }
            .into());
        }
    }
    let tx = conn.transaction()?;
    load_order(&tx, order_id)?;
    tx.execute(
        "INSERT INTO expenses(order_id, expense_date) VALUES (?1,?2)",
        params![order_id, date],
    )?;
    let expense_id = tx.last_insert_rowid();
    for item in items {
        tx.execute(
            "INSERT INTO expense_items(expense_id, type, amount) VALUES (?1,?2,?3)",
            params![expense_id, item.kind, item.amount.to_string()],
        )?;
    }
    tx.commit()?;
    tracing::info!(order_id, expense_id, "expense recorded");
    Ok(expense_id)
}
