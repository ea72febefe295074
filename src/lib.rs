// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod lenient;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod order_edit;
pub mod remote;
pub mod store;
pub mod utils;
