// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    DEFAULT_CURRENCY, SETTING_API_URL, SETTING_CURRENCY, get_setting, pretty_table, set_setting,
};
use anyhow::{Result, bail};
use rusqlite::Connection;

const KNOWN_KEYS: [&str; 2] = [SETTING_CURRENCY, SETTING_API_URL];

fn check_key(key: &str) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        bail!("Unknown setting '{}' (use {})", key, KNOWN_KEYS.join("|"));
    }
    Ok(())
}

fn normalize(key: &str, value: &str) -> Result<String> {
    let v = value.trim();
    match key {
        SETTING_CURRENCY => {
            if v.len() != 3 || !v.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Currency must be a 3-letter code, got '{}'", value);
            }
            Ok(v.to_uppercase())
        }
        SETTING_API_URL => {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                bail!("api_url must start with http:// or https://");
            }
            Ok(v.trim_end_matches('/').to_string())
        }
        _ => Ok(v.to_string()),
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            check_key(key)?;
            match get_setting(conn, key)? {
                Some(v) => println!("{}", v),
                None if key == SETTING_CURRENCY => println!("{}", DEFAULT_CURRENCY),
                None => println!("(unset)"),
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            check_key(key)?;
            let value = normalize(key, sub.get_one::<String>("value").unwrap())?;
            set_setting(conn, key, &value)?;
            tracing::info!(key = key.as_str(), "setting updated");
            println!("{} = {}", key, value);
        }
        Some(("list", _)) => {
            let mut rows = Vec::new();
            for key in KNOWN_KEYS {
                let v = get_setting(conn, key)?.unwrap_or_else(|| match key {
                    SETTING_CURRENCY => format!("{} (default)", DEFAULT_CURRENCY),
                    _ => "(unset)".to_string(),
                });
                rows.push(vec![key.to_string(), v]);
            }
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
