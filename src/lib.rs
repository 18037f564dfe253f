#![doc(test(attr(deny(warnings))))]

//! Rental Core drives a seven-step car-rental booking wizard: per-step
//! validation, duration and pricing derivation, and best-effort persistence of
//! finished agreements to a remote document store and a local cache.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod pricing;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{
    BookingService, BookingWizard, PersistenceReconciler, RentalError, Result, SaveReport,
    WizardStep,
};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Rental Core tracing initialized.");
    });
}
