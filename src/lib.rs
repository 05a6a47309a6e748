#![doc(test(attr(deny(warnings))))]

//! Cane Core is the bookkeeping engine behind a weighbridge-slip tracking app
//! for a sugarcane hauling operation: records, goal rounds, moisture pricing,
//! reporting aggregates, and a season-end production forecast.

pub mod calendar;
pub mod capture;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod forecast;
pub mod pricing;
pub mod reference;
pub mod storage;
pub mod sync;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cane Core tracing initialized.");
    });
}
