#![doc(test(attr(deny(warnings))))]

//! Savings Core turns a user's income and expense history into savings
//! forecasts: the trailing average monthly net, months-to-goal estimates,
//! what-if simulations, and wishlist arrival dates.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod forecast;
pub mod ledger;
pub mod storage;
pub mod utils;
pub mod wishlist;

pub use errors::{ForecastError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Savings Core tracing initialized.");
    });
}
