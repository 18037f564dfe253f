use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{PaymentStatus, RentType};
use crate::pricing::{duration::RentalDuration, engine};

/// Whether the total follows the pricing formula or was typed in by hand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    #[default]
    Automatic,
    /// Latched for the rest of the session once a user edits total or advance.
    Overridden,
}

/// Rate settings stored under `smartPricing`.
///
/// Keys other than `perDayPrice` are carried through untouched so records
/// written by other clients keep them on re-save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartPricing {
    pub per_day_price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Monetary state of a rental: rate, derived duration, and settlement figures.
///
/// Balance and status are re-derived on every change; the total is only
/// recomputed while the mode is [`PricingMode::Automatic`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingState {
    smart_pricing: SmartPricing,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<RentalDuration>,
    total_amount: f64,
    advance_payment: f64,
    balance: f64,
    payment_status: PaymentStatus,
    pricing_mode: PricingMode,
}

impl Default for PricingState {
    fn default() -> Self {
        Self {
            smart_pricing: SmartPricing::default(),
            duration: None,
            total_amount: 0.0,
            advance_payment: 0.0,
            balance: 0.0,
            payment_status: PaymentStatus::Pending,
            pricing_mode: PricingMode::Automatic,
        }
    }
}

impl PricingState {
    pub fn per_day_price(&self) -> f64 {
        self.smart_pricing.per_day_price
    }

    pub fn smart_pricing(&self) -> &SmartPricing {
        &self.smart_pricing
    }

    pub fn duration(&self) -> Option<RentalDuration> {
        self.duration
    }

    pub fn total(&self) -> f64 {
        self.total_amount
    }

    pub fn advance(&self) -> f64 {
        self.advance_payment
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn mode(&self) -> PricingMode {
        self.pricing_mode
    }

    pub fn is_overridden(&self) -> bool {
        self.pricing_mode == PricingMode::Overridden
    }

    /// Rate used for quoting: the booking's own per-day price, or `fallback`
    /// (typically the vehicle's list rate) while none was entered.
    pub fn effective_rate(&self, fallback: Option<f64>) -> f64 {
        if self.smart_pricing.per_day_price > 0.0 {
            self.smart_pricing.per_day_price
        } else {
            fallback.unwrap_or(0.0)
        }
    }

    pub fn set_per_day_price(&mut self, rate: f64) {
        self.smart_pricing.per_day_price = rate;
    }

    pub fn set_duration(&mut self, duration: Option<RentalDuration>) {
        self.duration = duration;
    }

    /// Re-derives the total (when automatic), balance and status.
    pub fn recompute(&mut self, rate: f64, rent_type: RentType, custom_days: u32) {
        if self.pricing_mode == PricingMode::Automatic {
            if let Some(total) =
                engine::quote(rate, rent_type, self.duration.as_ref(), custom_days)
            {
                self.total_amount = total;
            }
        }
        self.settle();
    }

    /// Replaces the total with a hand-entered figure and latches the override.
    pub fn override_total(&mut self, total: f64) {
        self.total_amount = total;
        self.latch();
        self.settle();
    }

    /// Records the advance payment. Counts as a manual edit and latches the
    /// override.
    pub fn set_advance(&mut self, advance: f64) {
        self.advance_payment = advance;
        self.latch();
        self.settle();
    }

    /// Freezes the current total, as when an existing agreement is reopened.
    pub fn latch(&mut self) {
        if self.pricing_mode != PricingMode::Overridden {
            tracing::debug!(total = self.total_amount, "pricing override latched");
        }
        self.pricing_mode = PricingMode::Overridden;
    }

    fn settle(&mut self) {
        self.balance = self.total_amount - self.advance_payment;
        self.payment_status = PaymentStatus::derive(self.total_amount, self.advance_payment);
    }
}
