// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod exchange;
pub mod filters;
pub mod gate;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod store;
pub mod utils;
