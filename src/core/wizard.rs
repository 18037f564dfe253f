//! Seven-step booking wizard.
//!
//! The wizard owns the draft [`Rental`] for the lifetime of a session. Moving
//! forward is gated by the active step's validator; moving back is always
//! allowed. Every draft mutation goes through the wizard so that duration,
//! total, balance and payment status stay derived from the inputs.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{RentalError, Result};
use crate::core::validation::{validate_step, FieldErrors, ValidationError};
use crate::domain::{
    Accessories, Client, DamageReport, ImageRef, RentType, Rental, RentalPeriod, Vehicle,
    VehicleCondition, Witness,
};

/// Steps of the booking flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    Client,
    Vehicle,
    Condition,
    Period,
    Witness,
    Payment,
    Agreement,
}

impl WizardStep {
    pub const ORDER: [WizardStep; 7] = [
        WizardStep::Client,
        WizardStep::Vehicle,
        WizardStep::Condition,
        WizardStep::Period,
        WizardStep::Witness,
        WizardStep::Payment,
        WizardStep::Agreement,
    ];

    pub const FIRST: WizardStep = WizardStep::Client;
    pub const LAST: WizardStep = WizardStep::Agreement;

    /// 1-based position in [`WizardStep::ORDER`].
    pub fn ordinal(self) -> usize {
        match self {
            WizardStep::Client => 1,
            WizardStep::Vehicle => 2,
            WizardStep::Condition => 3,
            WizardStep::Period => 4,
            WizardStep::Witness => 5,
            WizardStep::Payment => 6,
            WizardStep::Agreement => 7,
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ORDER.get(self.ordinal()).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.ordinal()
            .checked_sub(2)
            .and_then(|index| Self::ORDER.get(index).copied())
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Client => "Client",
            WizardStep::Vehicle => "Vehicle",
            WizardStep::Condition => "Condition",
            WizardStep::Period => "Period",
            WizardStep::Witness => "Witness",
            WizardStep::Payment => "Payment",
            WizardStep::Agreement => "Agreement",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How the session was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    New,
    Edit,
}

/// An in-progress booking session.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: WizardStep,
    draft: Rental,
    origin: SessionOrigin,
}

impl BookingWizard {
    /// Starts a session on a fresh draft.
    pub fn new(draft: Rental) -> Self {
        let mut wizard = Self {
            step: WizardStep::FIRST,
            draft,
            origin: SessionOrigin::New,
        };
        wizard.resettle();
        wizard
    }

    /// Starts a session editing an existing record.
    ///
    /// Stored payment figures are kept as they are: the pricing override is
    /// latched before anything is re-derived.
    pub fn hydrate(rental: Rental) -> Self {
        let mut draft = rental;
        draft.pricing.latch();
        let mut wizard = Self {
            step: WizardStep::FIRST,
            draft,
            origin: SessionOrigin::Edit,
        };
        wizard.resettle();
        wizard
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn ordinal(&self) -> usize {
        self.step.ordinal()
    }

    pub fn total_steps(&self) -> usize {
        WizardStep::ORDER.len()
    }

    pub fn is_first(&self) -> bool {
        self.step == WizardStep::FIRST
    }

    pub fn is_last(&self) -> bool {
        self.step == WizardStep::LAST
    }

    /// Steps already passed in this session.
    pub fn completed_steps(&self) -> &'static [WizardStep] {
        &WizardStep::ORDER[..self.step.ordinal() - 1]
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    pub fn draft(&self) -> &Rental {
        &self.draft
    }

    pub fn into_draft(self) -> Rental {
        self.draft
    }

    /// Failing fields of the active step.
    pub fn validate_current(&self) -> FieldErrors {
        validate_step(self.step, &self.draft)
    }

    /// Moves to the next step if the active one validates.
    ///
    /// On the last step this is a successful no-op.
    pub fn advance(&mut self) -> std::result::Result<WizardStep, ValidationError> {
        self.validate_current().into_result(self.step)?;
        if let Some(next) = self.step.next() {
            tracing::debug!(from = %self.step, to = %next, "wizard advanced");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Moves to the previous step; stays put on the first one.
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            tracing::debug!(from = %self.step, to = %previous, "wizard retreated");
            self.step = previous;
        }
        self.step
    }

    /// Freezes the draft for persistence.
    ///
    /// Only available on the final step, and only when that step validates.
    /// The returned copy is stamped with `now`; the session's own draft is left
    /// untouched so a failed save can be retried.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<Rental> {
        if !self.is_last() {
            return Err(RentalError::NotOnFinalStep(self.step));
        }
        self.validate_current().into_result(self.step)?;

        let mut frozen = self.draft.clone();
        frozen.created_at.get_or_insert(now);
        frozen.updated_at = Some(now);
        tracing::info!(id = %frozen.id, agreement = %frozen.agreement_number, "draft frozen for submission");
        Ok(frozen)
    }

    pub fn update_client(&mut self, edit: impl FnOnce(&mut Client)) {
        edit(&mut self.draft.client);
    }

    pub fn update_witness(&mut self, edit: impl FnOnce(&mut Witness)) {
        edit(&mut self.draft.witness);
    }

    /// Edits the vehicle. Its list rate may feed pricing, so derived figures
    /// are refreshed.
    pub fn update_vehicle(&mut self, edit: impl FnOnce(&mut Vehicle)) {
        edit(&mut self.draft.vehicle);
        self.resettle();
    }

    pub fn update_condition(&mut self, edit: impl FnOnce(&mut VehicleCondition)) {
        edit(&mut self.draft.vehicle_condition);
    }

    pub fn update_damage(&mut self, edit: impl FnOnce(&mut DamageReport)) {
        edit(&mut self.draft.dents_scratches);
    }

    pub fn update_accessories(&mut self, edit: impl FnOnce(&mut Accessories)) {
        edit(&mut self.draft.accessories);
    }

    pub fn set_signatures(&mut self, client: Option<ImageRef>, owner: Option<ImageRef>) {
        self.draft.signatures.client = client;
        self.draft.signatures.owner = owner;
    }

    pub fn set_agreement_number(&mut self, number: impl Into<String>) {
        self.draft.agreement_number = number.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.notes = notes.into();
    }

    pub fn update_period(&mut self, edit: impl FnOnce(&mut RentalPeriod)) {
        edit(&mut self.draft.period);
        self.resettle();
    }

    pub fn set_delivery(&mut self, at: NaiveDateTime) {
        self.update_period(|period| period.set_delivery(at));
    }

    pub fn set_return(&mut self, at: NaiveDateTime) {
        self.update_period(|period| period.set_return(at));
    }

    pub fn set_rent_type(&mut self, rent_type: RentType) {
        self.update_period(|period| period.rent_type = rent_type);
    }

    pub fn set_custom_days(&mut self, days: u32) {
        self.update_period(|period| period.custom_days = days);
    }

    pub fn set_per_day_price(&mut self, rate: f64) {
        self.draft.pricing.set_per_day_price(rate);
        self.resettle();
    }

    /// Hand-entered total; disables automatic pricing for the session.
    pub fn override_total(&mut self, total: f64) {
        self.draft.pricing.override_total(total);
    }

    /// Hand-entered advance; disables automatic pricing for the session.
    pub fn set_advance(&mut self, advance: f64) {
        self.draft.pricing.set_advance(advance);
    }

    fn resettle(&mut self) {
        let draft = &mut self.draft;
        draft.pricing.set_duration(draft.period.duration());
        let rate = draft.pricing.effective_rate(draft.vehicle.daily_rate);
        draft
            .pricing
            .recompute(rate, draft.period.rent_type, draft.period.custom_days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentStatus;
    use crate::pricing::PricingMode;
    use chrono::{NaiveDate, TimeZone};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    fn fill_client(wizard: &mut BookingWizard) {
        wizard.update_client(|client| {
            *client = Client::new("Ali Raza", "12345-1234567-1", "0300-1234567", "Lahore");
        });
    }

    fn fill_vehicle(wizard: &mut BookingWizard) {
        wizard.update_vehicle(|vehicle| {
            *vehicle = Vehicle::new("Toyota", "Corolla", "2022", "White").with_plate("LEA-1234");
        });
    }

    fn fill_period(wizard: &mut BookingWizard) {
        wizard.set_delivery(at(1, 10));
        wizard.set_return(at(3, 10));
    }

    fn fill_witness(wizard: &mut BookingWizard) {
        wizard.update_witness(|witness| {
            *witness = Witness::new("Sara Khan", "54321-7654321-9", "0301-7654321", "Lahore");
        });
    }

    fn complete_wizard() -> BookingWizard {
        let mut wizard = BookingWizard::new(Rental::draft("r-1", at(1, 0).date()));
        fill_client(&mut wizard);
        wizard.advance().expect("client");
        fill_vehicle(&mut wizard);
        wizard.advance().expect("vehicle");
        wizard.advance().expect("condition");
        fill_period(&mut wizard);
        wizard.set_per_day_price(1000.0);
        wizard.advance().expect("period");
        fill_witness(&mut wizard);
        wizard.advance().expect("witness");
        wizard.advance().expect("payment");
        wizard
    }

    #[test]
    fn step_order_table() {
        assert_eq!(WizardStep::Client.next(), Some(WizardStep::Vehicle));
        assert_eq!(WizardStep::Agreement.next(), None);
        assert_eq!(WizardStep::Client.previous(), None);
        assert_eq!(WizardStep::Period.previous(), Some(WizardStep::Condition));
        for (index, step) in WizardStep::ORDER.iter().enumerate() {
            assert_eq!(step.ordinal(), index + 1);
        }
    }

    #[test]
    fn advance_is_blocked_by_failing_fields() {
        let mut wizard = BookingWizard::new(Rental::default());
        let err = wizard.advance().expect_err("empty client must not validate");
        assert_eq!(err.step, WizardStep::Client);
        assert!(err.fields.contains("cnic"));
        assert_eq!(wizard.step(), WizardStep::Client);

        wizard.update_client(|client| {
            *client = Client::new("Ali", "1234-1234567-1", "0300", "Lahore");
        });
        assert!(wizard.advance().is_err());
        assert_eq!(wizard.ordinal(), 1);
    }

    #[test]
    fn retreat_floors_at_first_step() {
        let mut wizard = BookingWizard::new(Rental::default());
        assert_eq!(wizard.retreat(), WizardStep::Client);
        assert_eq!(wizard.ordinal(), 1);

        fill_client(&mut wizard);
        wizard.advance().expect("client");
        assert_eq!(wizard.retreat(), WizardStep::Client);
    }

    #[test]
    fn advance_caps_at_last_step() {
        let mut wizard = complete_wizard();
        assert!(wizard.is_last());
        assert_eq!(wizard.advance(), Ok(WizardStep::Agreement));
        assert_eq!(wizard.ordinal(), 7);
        assert_eq!(wizard.completed_steps().len(), 6);
    }

    #[test]
    fn pricing_follows_period_and_rate() {
        let wizard = complete_wizard();
        let pricing = &wizard.draft().pricing;
        assert_eq!(pricing.duration().map(|d| d.days), Some(2));
        assert_eq!(pricing.total(), 2000.0);
        assert_eq!(pricing.mode(), PricingMode::Automatic);
    }

    #[test]
    fn hourly_scenario() {
        let mut wizard = BookingWizard::new(Rental::default());
        fill_period(&mut wizard);
        wizard.set_rent_type(RentType::Hourly);
        wizard.set_per_day_price(1200.0);
        let pricing = &wizard.draft().pricing;
        assert_eq!(pricing.duration().map(|d| d.hours), Some(48));
        assert_eq!(pricing.total(), 2400.0);
    }

    #[test]
    fn vehicle_rate_is_used_until_a_rate_is_entered() {
        let mut wizard = BookingWizard::new(Rental::default());
        fill_period(&mut wizard);
        wizard.update_vehicle(|vehicle| vehicle.daily_rate = Some(800.0));
        assert_eq!(wizard.draft().pricing.total(), 1600.0);

        wizard.set_per_day_price(1000.0);
        assert_eq!(wizard.draft().pricing.total(), 2000.0);
    }

    #[test]
    fn manual_total_survives_later_changes() {
        let mut wizard = complete_wizard();
        wizard.override_total(1500.0);
        wizard.retreat();
        wizard.retreat();
        wizard.set_rent_type(RentType::Weekly);
        wizard.set_per_day_price(5000.0);

        let pricing = &wizard.draft().pricing;
        assert_eq!(pricing.total(), 1500.0);
        assert_eq!(pricing.balance(), 1500.0);
    }

    #[test]
    fn paid_in_full_scenario() {
        let mut wizard = complete_wizard();
        wizard.set_advance(2000.0);
        let pricing = &wizard.draft().pricing;
        assert_eq!(pricing.balance(), 0.0);
        assert_eq!(pricing.status(), PaymentStatus::Paid);
    }

    #[test]
    fn hydrated_sessions_keep_stored_totals() {
        let mut record = complete_wizard().into_draft();
        // stored before the mode was persisted
        record.pricing = serde_json::from_value(serde_json::json!({
            "smartPricing": { "perDayPrice": 1000.0 },
            "totalAmount": 1750.0,
            "advancePayment": 0.0
        }))
        .expect("pricing");

        let wizard = BookingWizard::hydrate(record);
        assert_eq!(wizard.origin(), SessionOrigin::Edit);
        assert_eq!(wizard.step(), WizardStep::Client);
        assert_eq!(wizard.draft().pricing.total(), 1750.0);
        assert_eq!(wizard.draft().pricing.balance(), 1750.0);
        assert!(wizard.draft().pricing.is_overridden());
    }

    #[test]
    fn submit_requires_final_step() {
        let mut wizard = BookingWizard::new(Rental::default());
        fill_client(&mut wizard);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().expect("now");
        let err = wizard.submit(now).expect_err("not on final step");
        assert!(matches!(err, RentalError::NotOnFinalStep(WizardStep::Client)));
    }

    #[test]
    fn submit_stamps_a_copy() {
        let wizard = complete_wizard();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().expect("now");
        let frozen = wizard.submit(now).expect("submit");
        assert_eq!(frozen.created_at, Some(now));
        assert_eq!(frozen.updated_at, Some(now));
        assert_eq!(wizard.draft().updated_at, None);
    }
}
