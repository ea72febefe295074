// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

/// Filters shared by `order list` and `export orders`.
fn order_filters(cmd: Command) -> Command {
    cmd.arg(opt("from", "Ordered on or after YYYY-MM-DD"))
        .arg(opt("to", "Ordered on or before YYYY-MM-DD"))
        .arg(opt("delivered-from", "Delivered on or after YYYY-MM-DD"))
        .arg(opt("delivered-to", "Delivered on or before YYYY-MM-DD"))
        .arg(
            Arg::new("status")
                .long("status")
                .value_parser(["all", "pending", "paid"])
                .default_value("all"),
        )
        .arg(opt("search", "Order id fragment or customer name"))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage product categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").required(true))
                .arg(opt("image", "Path of the category image")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(
            Command::new("rename")
                .arg(Arg::new("old").required(true))
                .arg(Arg::new("new").required(true)),
        )
        .subcommand(Command::new("rm").arg(Arg::new("name").required(true)))
}

fn product_name_cmd() -> Command {
    Command::new("product-name")
        .about("Manage the product name catalogue")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").required(true))
                .arg(req("category", "Category name")),
        )
        .subcommand(json_flags(
            Command::new("list").arg(opt("category", "Only this category")),
        ))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn shop_cmd() -> Command {
    Command::new("shop")
        .about("Manage supplier shops")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Shop name"))
                .arg(req("location", "Shop location"))
                .arg(req("contact", "10-digit contact number")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .arg(opt("name", "Shop name"))
                .arg(opt("location", "Shop location"))
                .arg(opt("contact", "10-digit contact number")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn product_fields(cmd: Command, required: bool) -> Command {
    let field = |name, help| if required { req(name, help) } else { opt(name, help) };
    cmd.arg(field("name", "Product name"))
        .arg(field("category", "Category name"))
        .arg(
            Arg::new("ownership")
                .long("ownership")
                .required(required)
                .value_parser(["owned", "imported"]),
        )
        .arg(opt("company", "Company name (imported products)"))
        .arg(opt("shop", "Shop name (owned products)"))
        .arg(field("price", "Purchase price"))
        .arg(opt("paid", "Amount already paid"))
        .arg(
            Arg::new("stock")
                .long("stock")
                .value_parser(clap::value_parser!(i64).range(0..)),
        )
        .arg(opt("description", "Free text"))
}

fn product_cmd() -> Command {
    Command::new("product")
        .about("Manage products")
        .subcommand(product_fields(Command::new("add"), true))
        .subcommand(json_flags(
            Command::new("list").arg(opt("category", "Only this category")),
        ))
        .subcommand(product_fields(Command::new("update").arg(id_arg()), false))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn status_arg() -> Arg {
    Arg::new("status")
        .long("status")
        .value_parser(clap::value_parser!(i64).range(0..=1))
}

fn user_cmd() -> Command {
    Command::new("user")
        .about("Manage panel users")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Full name"))
                .arg(req("email", "Unique email"))
                .arg(opt("role", "Role label").default_value("user"))
                .arg(status_arg().default_value("1")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .arg(opt("name", "Full name"))
                .arg(opt("email", "Unique email"))
                .arg(opt("role", "Role label"))
                .arg(status_arg()),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn salary_cmd() -> Command {
    Command::new("salary")
        .about("Record and list salaries")
        .subcommand(
            Command::new("add")
                .arg(req("user", "User email"))
                .arg(req("account", "Bank account number"))
                .arg(req("ifsc", "IFSC code"))
                .arg(req("bank", "Bank name"))
                .arg(req("branch", "Branch"))
                .arg(req("basic", "Basic salary"))
                .arg(opt("allowance", "Allowance").default_value("0"))
                .arg(opt("deduction", "Deduction").default_value("0"))
                .arg(
                    Arg::new("paid")
                        .long("paid")
                        .action(ArgAction::SetTrue)
                        .help("Mark as paid out"),
                ),
        )
        .subcommand(json_flags(Command::new("list")))
}

fn support_cmd() -> Command {
    Command::new("support")
        .about("Support tickets")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Requester name"))
                .arg(req("email", "Requester email"))
                .arg(req("subject", "Subject"))
                .arg(req("message", "Message")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(
            Command::new("status").arg(id_arg()).arg(
                Arg::new("status")
                    .required(true)
                    .value_parser(["pending", "in_progress", "resolved"]),
            ),
        )
}

fn order_cmd() -> Command {
    Command::new("order")
        .about("Order tracking")
        .subcommand(
            Command::new("add")
                .arg(req("customer", "Customer name"))
                .arg(opt("email", "Customer email"))
                .arg(opt("phone", "Customer phone"))
                .arg(opt("address", "Shipping address"))
                .arg(opt("billing", "Billing number"))
                .arg(req("total", "Order total"))
                .arg(opt("paid", "Amount paid up front").default_value("0"))
                .arg(opt("date", "Order date YYYY-MM-DD (default today)"))
                .arg(opt("time", "Order time HH:MM"))
                .arg(
                    Arg::new("item")
                        .long("item")
                        .action(ArgAction::Append)
                        .help("Line item product_id:qty:price"),
                ),
        )
        .subcommand(json_flags(order_filters(Command::new("list")).arg(
            Arg::new("page")
                .long("page")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )))
        .subcommand(json_flags(Command::new("recent")))
        .subcommand(json_flags(Command::new("show").arg(id_arg())))
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(opt("date", "Order date YYYY-MM-DD"))
                .arg(opt("time", "Order time HH:MM"))
                .arg(opt("delivered-date", "Delivered date YYYY-MM-DD"))
                .arg(opt("delivered-time", "Delivered time HH:MM"))
                .arg(opt("pickup-date", "Pickup date YYYY-MM-DD"))
                .arg(opt("pickup-time", "Pickup time HH:MM"))
                .arg(
                    Arg::new("clear-delivered")
                        .long("clear-delivered")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("clear-pickup")
                        .long("clear-pickup")
                        .action(ArgAction::SetTrue),
                )
                .arg(opt("total", "Order total"))
                .arg(opt("paid", "Amount paid"))
                .arg(opt("email", "Customer email"))
                .arg(opt("phone", "Customer phone"))
                .arg(opt("address", "Shipping address"))
                .arg(opt("billing", "Billing number")),
        )
        .subcommand(
            Command::new("pay")
                .arg(id_arg())
                .arg(Arg::new("amount").required(true)),
        )
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Per-order expenses")
        .subcommand(
            Command::new("add")
                .arg(
                    Arg::new("order")
                        .long("order")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(opt("date", "Expense date YYYY-MM-DD (default today)"))
                .arg(
                    Arg::new("item")
                        .long("item")
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Expense line type:amount"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").arg(
                Arg::new("order")
                    .long("order")
                    .value_parser(clap::value_parser!(i64)),
            ),
        ))
}

fn dashboard_cmd() -> Command {
    json_flags(
        Command::new("dashboard")
            .about("Headline metrics, trends and rankings")
            .arg(opt("start", "First day YYYY-MM-DD"))
            .arg(opt("end", "Last day YYYY-MM-DD (inclusive)"))
            .arg(
                Arg::new("remote")
                    .long("remote")
                    .action(ArgAction::SetTrue)
                    .help("Read from the panel backend instead of the local DB"),
            )
            .arg(opt("url", "Backend base URL (overrides the api_url setting)"))
            .arg(
                Arg::new("series")
                    .long("series")
                    .action(ArgAction::SetTrue)
                    .help("Also print the daily series"),
            ),
    )
}

pub fn build_cli() -> Command {
    Command::new("shopdesk")
        .about("Shopdesk: inventory, order tracking and sales dashboard for small shops")
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config")
                .about("Runtime settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(category_cmd())
        .subcommand(product_name_cmd())
        .subcommand(shop_cmd())
        .subcommand(product_cmd())
        .subcommand(user_cmd())
        .subcommand(salary_cmd())
        .subcommand(support_cmd())
        .subcommand(order_cmd())
        .subcommand(expense_cmd())
        .subcommand(dashboard_cmd())
        .subcommand(
            Command::new("export")
                .about("Export orders to a file")
                .subcommand(
                    order_filters(Command::new("orders"))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv|json"),
                        )
                        .arg(req("out", "Output path")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check data consistency"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn verbose_is_global() {
        let m = build_cli().get_matches_from(["shopdesk", "order", "recent", "-v"]);
        assert!(m.get_flag("verbose"));
    }
}
