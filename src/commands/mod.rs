// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod config;
pub mod dashboard;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod orders;
pub mod product_names;
pub mod products;
pub mod salaries;
pub mod shops;
pub mod support;
pub mod users;
