// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use crate::metrics::DateRange;
use crate::metrics::rankings::{
    ORDERS_PER_PAGE, TRACKING_RECENT_ORDERS, page, page_count, recent_orders,
};
use crate::models::{Order, OrderItem, PaymentLog};
use crate::order_edit::{DateTimeInput, OrderEdit, parse_time_of_day};
use crate::store::{
    NewOrder, apply_order_edit, insert_order, load_order, load_orders, load_payment_logs,
    order_expense_total, record_payment,
};
use crate::utils::{
    fmt_money, fmt_ts, get_currency, maybe_print_json, parse_amount, parse_date, pretty_table,
    required,
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Reverse;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, now)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("recent", sub)) => recent(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub, now)?,
        Some(("pay", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let amount = parse_amount("payment_amount", sub.get_one::<String>("amount").unwrap())?;
            let order = record_payment(conn, id, amount, now)?;
            let ccy = get_currency(conn)?;
            println!(
                "Recorded {} on order {}; pending now {}",
                fmt_money(&amount, &ccy),
                id,
                fmt_money(&order.outstanding(), &ccy)
            );
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentStatus {
    #[default]
    All,
    Pending,
    Paid,
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(PaymentStatus::All),
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(ValidationError::InvalidChoice {
                field: "status",
                value: other.to_string(),
                expected: "all|pending|paid",
            }),
        }
    }
}

/// Order-tracking filters. Date ranges include both end days.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub ordered: DateRange,
    pub delivered: DateRange,
    pub status: PaymentStatus,
    pub search: Option<String>,
}

fn opt_date(sub: &clap::ArgMatches, name: &str) -> Result<Option<chrono::NaiveDate>> {
    sub.get_one::<String>(name).map(|s| parse_date(s)).transpose()
}

impl OrderQuery {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        Ok(Self {
            ordered: DateRange::new(opt_date(sub, "from")?, opt_date(sub, "to")?),
            delivered: DateRange::new(
                opt_date(sub, "delivered-from")?,
                opt_date(sub, "delivered-to")?,
            ),
            status: sub
                .get_one::<String>("status")
                .map(|s| s.parse::<PaymentStatus>())
                .transpose()?
                .unwrap_or_default(),
            search: sub
                .get_one::<String>("search")
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        })
    }

    pub fn matches(&self, o: &Order) -> bool {
        if !self.ordered.bounds().admits(o.created_at) {
            return false;
        }
        if !self.delivered.bounds().admits(o.delivered_date) {
            return false;
        }
        let status_ok = match self.status {
            PaymentStatus::All => true,
            PaymentStatus::Pending => o.outstanding() > Decimal::ZERO,
            PaymentStatus::Paid => o.is_fully_paid(),
        };
        if !status_ok {
            return false;
        }
        match &self.search {
            Some(q) => {
                o.id.to_string().contains(q.as_str())
                    || o.user_name.to_lowercase().contains(q.as_str())
            }
            None => true,
        }
    }

    /// Matching orders, newest `created_at` first.
    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        let mut out: Vec<Order> = orders.into_iter().filter(|o| self.matches(o)).collect();
        out.sort_by_key(|o| Reverse(o.created_at));
        out
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Order>> {
    let query = OrderQuery::from_matches(sub)?;
    let orders = query.apply(load_orders(conn)?);
    tracing::debug!(matched = orders.len(), "order query");
    Ok(orders)
}

/// Parses `product_id:qty:price`, taking the line name from the product.
pub fn parse_item(conn: &Connection, raw: &str) -> Result<OrderItem> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [id, qty, price] = parts.as_slice() else {
        bail!("Invalid item '{}', expected product_id:qty:price", raw);
    };
    let product_id: i64 = id
        .parse()
        .with_context(|| format!("Invalid product id in '{}'", raw))?;
    let quantity: i64 = qty
        .parse()
        .with_context(|| format!("Invalid quantity in '{}'", raw))?;
    if quantity <= 0 {
        bail!("Quantity must be positive in '{}'", raw);
    }
    let product_name: String = conn
        .query_row(
            "SELECT product_name FROM products WHERE id=?1",
            params![product_id],
            |r| r.get(0),
        )
        .optional()?
        .with_context(|| format!("Product {} not found", product_id))?;
    Ok(OrderItem {
        product_id: Some(product_id),
        product_name,
        quantity,
        product_price: parse_amount("product_price", price)?,
    })
}

fn opt_text(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let picked = opt_date(sub, "date")?;
    // an explicit date without a time gets the form default
    let time = match (sub.get_one::<String>("time"), picked) {
        (Some(t), _) => Some(parse_time_of_day(t)?),
        (None, Some(_)) => None,
        (None, None) => Some(now.time()),
    };
    let created_at = DateTimeInput::new(Some(picked.unwrap_or(now.date())), time)
        .compose()
        .ok_or(ValidationError::MissingOrderDate)?;

    let mut items = Vec::new();
    if let Some(specs) = sub.get_many::<String>("item") {
        for s in specs {
            items.push(parse_item(conn, s)?);
        }
    }
    let order = NewOrder {
        user_name: required("customer", sub.get_one::<String>("customer").unwrap())?,
        user_email: opt_text(sub, "email"),
        user_phone: opt_text(sub, "phone"),
        shipping_address: opt_text(sub, "address"),
        billing_number: opt_text(sub, "billing"),
        total_amount: parse_amount("total_amount", sub.get_one::<String>("total").unwrap())?,
        paid_payment: parse_amount("paid_payment", sub.get_one::<String>("paid").unwrap())?,
        created_at,
        items,
    };
    let id = insert_order(conn, &order, now)?;
    println!(
        "Created order {} for '{}' (pending {})",
        id,
        order.user_name,
        order.total_amount - order.paid_payment
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct OrderPage {
    pub page: usize,
    pub pages: usize,
    pub total: usize,
    pub orders: Vec<Order>,
}

fn order_table(orders: &[Order], ccy: &str) -> comfy_table::Table {
    let rows = orders
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                fmt_ts(o.created_at),
                o.user_name.clone(),
                o.user_phone.clone().unwrap_or_default(),
                fmt_money(&o.total_amount, ccy),
                fmt_money(&o.paid_payment, ccy),
                fmt_money(&o.outstanding(), ccy),
                fmt_ts(o.pickup_time),
                fmt_ts(o.delivered_date),
            ]
        })
        .collect();
    pretty_table(
        &[
            "ID", "Ordered", "Customer", "Phone", "Total", "Paid", "Pending", "Pickup",
            "Delivered",
        ],
        rows,
    )
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let all = query_rows(conn, sub)?;
    let page_no = (*sub.get_one::<usize>("page").unwrap_or(&1)).max(1);
    let pages = page_count(all.len(), ORDERS_PER_PAGE);
    let slice = page(&all, page_no, ORDERS_PER_PAGE);
    if sub.get_flag("jsonl") {
        maybe_print_json(false, true, &slice)?;
        return Ok(());
    }
    let data = OrderPage {
        page: page_no,
        pages,
        total: all.len(),
        orders: slice.to_vec(),
    };
    if !maybe_print_json(sub.get_flag("json"), false, &data)? {
        let ccy = get_currency(conn)?;
        println!("{}", order_table(&data.orders, &ccy));
        println!("Page {} of {} ({} orders)", data.page, data.pages.max(1), data.total);
    }
    Ok(())
}

fn recent(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let orders = load_orders(conn)?;
    let refs: Vec<&Order> = orders.iter().collect();
    let data = recent_orders(&refs, TRACKING_RECENT_ORDERS);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.user_name.clone(),
                    fmt_money(&r.total_amount, &ccy),
                    fmt_money(&r.pending, &ccy),
                    fmt_ts(r.updated_at),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Customer", "Total", "Pending", "Updated"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub payments: Vec<PaymentLog>,
    pub expense_total: Decimal,
}

pub fn order_detail(conn: &Connection, id: i64) -> Result<OrderDetail> {
    Ok(OrderDetail {
        order: load_order(conn, id)?,
        payments: load_payment_logs(conn, id)?,
        expense_total: order_expense_total(conn, id)?,
    })
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let detail = order_detail(conn, id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &detail)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let o = &detail.order;
    println!("{}", order_table(std::slice::from_ref(o), &ccy));
    println!(
        "Email: {}  Address: {}  Billing: {}",
        o.user_email.as_deref().unwrap_or("-"),
        o.shipping_address.as_deref().unwrap_or("-"),
        o.billing_number.as_deref().unwrap_or("-")
    );
    if !o.products.is_empty() {
        let rows = o
            .products
            .iter()
            .map(|i| {
                vec![
                    i.product_id.map(|p| p.to_string()).unwrap_or_default(),
                    i.product_name.clone(),
                    i.quantity.to_string(),
                    fmt_money(&i.product_price, &ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Product", "Name", "Qty", "Price"], rows));
    }
    if !detail.payments.is_empty() {
        let rows = detail
            .payments
            .iter()
            .map(|p| vec![fmt_ts(p.created_at), fmt_money(&p.payment_amount, &ccy)])
            .collect();
        println!("{}", pretty_table(&["Paid at", "Amount"], rows));
    }
    println!("Expenses: {}", fmt_money(&detail.expense_total, &ccy));
    Ok(())
}

fn overlay_date_time(
    sub: &clap::ArgMatches,
    input: &mut DateTimeInput,
    date_arg: &'static str,
    time_arg: &str,
) -> Result<()> {
    if let Some(d) = opt_date(sub, date_arg)? {
        input.date = Some(d);
    }
    if let Some(t) = sub.get_one::<String>(time_arg) {
        // A time alone has nothing to attach to.
        if input.date.is_none() {
            return Err(ValidationError::Required(date_arg).into());
        }
        input.time = Some(parse_time_of_day(t)?);
    }
    Ok(())
}

/// Current order values with the given flags applied.
pub fn edit_from_matches(order: &Order, sub: &clap::ArgMatches) -> Result<OrderEdit> {
    let mut edit = OrderEdit::from_order(order);
    overlay_date_time(sub, &mut edit.created, "date", "time")?;
    if sub.get_flag("clear-delivered") {
        edit.delivered = DateTimeInput::default();
    }
    overlay_date_time(sub, &mut edit.delivered, "delivered-date", "delivered-time")?;
    if sub.get_flag("clear-pickup") {
        edit.pickup = DateTimeInput::default();
    }
    overlay_date_time(sub, &mut edit.pickup, "pickup-date", "pickup-time")?;
    if let Some(v) = sub.get_one::<String>("total") {
        edit.total_amount = parse_amount("total_amount", v)?;
    }
    if let Some(v) = sub.get_one::<String>("paid") {
        edit.paid_payment = parse_amount("paid_payment", v)?;
    }
    for (arg, field) in [
        ("email", &mut edit.user_email),
        ("phone", &mut edit.user_phone),
        ("address", &mut edit.shipping_address),
        ("billing", &mut edit.billing_number),
    ] {
        if let Some(v) = sub.get_one::<String>(arg) {
            *field = Some(v.trim().to_string()).filter(|s| !s.is_empty());
        }
    }
    Ok(edit)
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let order = load_order(conn, id)?;
    let validated = edit_from_matches(&order, sub)?.validate()?;
    apply_order_edit(conn, id, &validated, now)?;
    let ccy = get_currency(conn)?;
    println!(
        "Updated order {} (pending {})",
        id,
        fmt_money(&validated.pending_payment, &ccy)
    );
    Ok(())
}
