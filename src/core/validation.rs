//! Per-step validation gates for the booking wizard.
//!
//! Every validator is a pure function over the draft returning the failing
//! fields; an empty [`FieldErrors`] means the step may be left.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::core::wizard::WizardStep;
use crate::domain::{parse_instant, Client, Rental, RentalPeriod, Vehicle, Witness};

static NATIONAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}-[0-9]{7}-[0-9]$").expect("valid national id pattern"));

pub const NATIONAL_ID_HINT: &str = "Use the format 12345-1234567-1";

/// Failing field names mapped to a user-facing message, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Converts into a blocking error for `step` unless no field failed.
    pub fn into_result(self, step: WizardStep) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { step, fields: self })
        }
    }

    fn require(&mut self, field: &'static str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Blocking, field-level failure raised when a wizard step is left or the
/// draft is submitted with unmet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step} step is incomplete: {fields}")]
pub struct ValidationError {
    pub step: WizardStep,
    pub fields: FieldErrors,
}

/// Matches the `NNNNN-NNNNNNN-N` national identity card format.
pub fn is_valid_national_id(value: &str) -> bool {
    NATIONAL_ID.is_match(value)
}

/// Runs the validator that gates `step`.
pub fn validate_step(step: WizardStep, draft: &Rental) -> FieldErrors {
    match step {
        WizardStep::Client => validate_client(&draft.client),
        WizardStep::Vehicle => validate_vehicle(&draft.vehicle),
        WizardStep::Condition | WizardStep::Agreement => FieldErrors::new(),
        WizardStep::Period => validate_period(&draft.period),
        WizardStep::Witness => validate_witness(&draft.witness),
        WizardStep::Payment => validate_payment(draft.pricing.advance()),
    }
}

pub fn validate_client(client: &Client) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require("fullName", &client.full_name, "Full name");
    check_national_id(&mut errors, &client.national_id);
    errors.require("phone", &client.phone, "Phone");
    errors.require("address", &client.address, "Address");
    errors
}

pub fn validate_witness(witness: &Witness) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require("name", &witness.name, "Witness name");
    check_national_id(&mut errors, &witness.national_id);
    errors.require("phone", &witness.phone, "Witness phone");
    errors.require("address", &witness.address, "Witness address");
    errors
}

pub fn validate_vehicle(vehicle: &Vehicle) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require("brand", &vehicle.brand, "Brand");
    errors.require("model", &vehicle.model, "Model");
    errors.require("year", &vehicle.year, "Manufacturing year");
    errors.require("color", &vehicle.color, "Color");
    errors
}

pub fn validate_period(period: &RentalPeriod) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require("deliveryDate", &period.delivery_date, "Delivery date");
    errors.require("deliveryTime", &period.delivery_time, "Delivery time");
    errors.require("returnDate", &period.return_date, "Return date");
    errors.require("returnTime", &period.return_time, "Return time");
    if !errors.is_empty() {
        return errors;
    }

    let delivered = parse_instant(&period.delivery_date, &period.delivery_time);
    let returned = parse_instant(&period.return_date, &period.return_time);
    match (delivered, returned) {
        (Some(delivered), Some(returned)) => {
            if returned <= delivered {
                errors.push("returnDate", "Return must be after delivery");
            }
        }
        (delivered, returned) => {
            if delivered.is_none() {
                errors.push("deliveryDate", "Use YYYY-MM-DD and HH:MM");
            }
            if returned.is_none() {
                errors.push("returnDate", "Use YYYY-MM-DD and HH:MM");
            }
        }
    }
    errors
}

pub fn validate_payment(advance: f64) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if advance < 0.0 || advance.is_nan() {
        errors.push("advancePayment", "Advance payment cannot be negative");
    }
    errors
}

fn check_national_id(errors: &mut FieldErrors, value: &str) {
    if value.trim().is_empty() {
        errors.push("cnic", "CNIC is required");
    } else if !is_valid_national_id(value) {
        errors.push("cnic", NATIONAL_ID_HINT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_id_format() {
        assert!(is_valid_national_id("12345-1234567-1"));
        assert!(!is_valid_national_id("1234-1234567-1"));
        assert!(!is_valid_national_id("12345123456 71"));
        assert!(!is_valid_national_id("12345-1234567-12"));
        assert!(!is_valid_national_id(" 12345-1234567-1"));
    }

    #[test]
    fn client_requires_every_field() {
        let errors = validate_client(&Client::default());
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["address", "cnic", "fullName", "phone"]);
        assert_eq!(errors.message("cnic"), Some("CNIC is required"));
    }

    #[test]
    fn client_rejects_malformed_national_id() {
        let client = Client::new("Ali Raza", "1234-1234567-1", "0300-1234567", "Lahore");
        let errors = validate_client(&client);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message("cnic"), Some(NATIONAL_ID_HINT));

        let client = Client::new("Ali Raza", "12345-1234567-1", "0300-1234567", "Lahore");
        assert!(validate_client(&client).is_empty());
    }

    #[test]
    fn witness_uses_same_rules() {
        let witness = Witness::new("Sara", "12345123456 71", "0301", "Karachi");
        assert!(validate_witness(&witness).contains("cnic"));
    }

    #[test]
    fn vehicle_requires_descriptive_fields() {
        let vehicle = Vehicle::new("Toyota", "Corolla", "", "White");
        let errors = validate_vehicle(&vehicle);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["year"]);
    }

    #[test]
    fn period_requires_ordered_instants() {
        let mut period = RentalPeriod {
            delivery_date: "2024-01-03".into(),
            delivery_time: "10:00".into(),
            return_date: "2024-01-01".into(),
            return_time: "10:00".into(),
            ..RentalPeriod::default()
        };
        assert!(validate_period(&period).contains("returnDate"));

        period.return_date = "2024-01-03".into();
        assert!(validate_period(&period).contains("returnDate"));

        period.return_date = "2024-01-05".into();
        assert!(validate_period(&period).is_empty());

        period.delivery_time = String::new();
        assert_eq!(
            validate_period(&period).fields().collect::<Vec<_>>(),
            vec!["deliveryTime"]
        );
    }

    #[test]
    fn period_reports_unparseable_values() {
        let period = RentalPeriod {
            delivery_date: "03/01/2024".into(),
            delivery_time: "10:00".into(),
            return_date: "2024-01-05".into(),
            return_time: "25:99".into(),
            ..RentalPeriod::default()
        };
        let errors = validate_period(&period);
        assert!(errors.contains("deliveryDate"));
        assert!(errors.contains("returnDate"));
    }

    #[test]
    fn payment_rejects_negative_advance() {
        assert!(validate_payment(0.0).is_empty());
        assert!(validate_payment(1500.0).is_empty());
        assert!(validate_payment(-1.0).contains("advancePayment"));
    }

    #[test]
    fn free_steps_always_pass() {
        let draft = Rental::default();
        assert!(validate_step(WizardStep::Condition, &draft).is_empty());
        assert!(validate_step(WizardStep::Agreement, &draft).is_empty());
        assert!(!validate_step(WizardStep::Client, &draft).is_empty());
    }
}
