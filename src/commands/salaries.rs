// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::lenient::decimal_or_zero;
use crate::models::Salary;
use crate::utils::{
    fmt_money, get_currency, id_for_user, maybe_print_json, parse_amount, pretty_table, required,
};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub.get_one::<String>("user").unwrap();
            let salary = Salary {
                id: 0,
                user_id: id_for_user(conn, email)?,
                user_name: None,
                account_number: required("account", sub.get_one::<String>("account").unwrap())?,
                ifsc_code: required("ifsc", sub.get_one::<String>("ifsc").unwrap())?
                    .to_uppercase(),
                bank_name: required("bank", sub.get_one::<String>("bank").unwrap())?,
                branch: required("branch", sub.get_one::<String>("branch").unwrap())?,
                salary_amount: parse_amount("salary_amount", sub.get_one::<String>("basic").unwrap())?,
                allowance: parse_amount("allowance", sub.get_one::<String>("allowance").unwrap())?,
                deduction: parse_amount("deduction", sub.get_one::<String>("deduction").unwrap())?,
                status: sub.get_flag("paid"),
            };
            add_salary(conn, &salary)?;
            println!("Recorded salary for {} (net {})", email, salary.net_pay());
        }
        Some(("list", sub)) => {
            let data = list_salaries(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let ccy = get_currency(conn)?;
                let rows = data
                    .iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.user_name.clone().unwrap_or_default(),
                            format!("{} / {}", s.bank_name, s.branch),
                            s.account_number.clone(),
                            fmt_money(&s.salary_amount, &ccy),
                            fmt_money(&s.allowance, &ccy),
                            fmt_money(&s.deduction, &ccy),
                            fmt_money(&s.net_pay(), &ccy),
                            if s.status { "paid" } else { "due" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &[
                            "ID", "User", "Bank", "Account", "Basic", "Allowance", "Deduction",
                            "Net", "Status"
                        ],
                        rows,
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn add_salary(conn: &Connection, s: &Salary) -> Result<i64> {
    conn.execute(
        "INSERT INTO salaries(user_id, account_number, ifsc_code, bank_name, branch,
                              salary_amount, allowance, deduction, status)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            s.user_id,
            s.account_number,
            s.ifsc_code,
            s.bank_name,
            s.branch,
            s.salary_amount.to_string(),
            s.allowance.to_string(),
            s.deduction.to_string(),
            s.status
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_salaries(conn: &Connection) -> Result<Vec<Salary>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.user_id, u.name, s.account_number, s.ifsc_code, s.bank_name, s.branch,
                s.salary_amount, s.allowance, s.deduction, s.status
         FROM salaries s LEFT JOIN users u ON s.user_id=u.id
         ORDER BY s.id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(Salary {
            id: r.get(0)?,
            user_id: r.get(1)?,
            user_name: r.get(2)?,
            account_number: r.get(3)?,
            ifsc_code: r.get(4)?,
            bank_name: r.get(5)?,
            branch: r.get(6)?,
            salary_amount: decimal_or_zero(&r.get::<_, String>(7)?),
            allowance: decimal_or_zero(&r.get::<_, String>(8)?),
            deduction: decimal_or_zero(&r.get::<_, String>(9)?),
            status: r.get(10)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
