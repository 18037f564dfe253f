//! Rental pricing: duration buckets, the per-type formula table, and the
//! settlement state carried on every rental.

pub mod duration;
pub mod engine;
pub mod state;

pub use duration::RentalDuration;
pub use engine::{hourly_rate, quote};
pub use state::{PricingMode, PricingState, SmartPricing};
