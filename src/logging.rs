// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SHOPDESK_LOG";

/// Filter directive: `SHOPDESK_LOG`, then `RUST_LOG`, then the verbosity
/// default.
pub fn filter_directive(verbose: bool) -> String {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| {
            if verbose {
                "shopdesk=debug".to_string()
            } else {
                "warn".to_string()
            }
        })
}

/// Diagnostics go to stderr so table and JSON output stay pipeable.
pub fn init(verbose: bool) {
    let filter =
        EnvFilter::try_new(filter_directive(verbose)).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
