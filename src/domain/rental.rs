use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::checklist::{Accessories, DamageReport, Signatures, VehicleCondition};
use crate::domain::common::{Displayable, Identifiable, ImageRef, RentType};
use crate::domain::party::{Client, Witness};
use crate::domain::vehicle::Vehicle;
use crate::pricing::{PricingState, RentalDuration};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Hand-over and return schedule, kept in the form it is entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RentalPeriod {
    pub delivery_date: String,
    pub delivery_time: String,
    pub return_date: String,
    pub return_time: String,
    pub rent_type: RentType,
    /// Billed day count for [`RentType::Custom`]; `0` while unset.
    pub custom_days: u32,
}

impl RentalPeriod {
    pub fn delivery_instant(&self) -> Option<NaiveDateTime> {
        parse_instant(&self.delivery_date, &self.delivery_time)
    }

    pub fn return_instant(&self) -> Option<NaiveDateTime> {
        parse_instant(&self.return_date, &self.return_time)
    }

    /// Billing buckets for the period, when both ends are known and ordered.
    pub fn duration(&self) -> Option<RentalDuration> {
        RentalDuration::from_endpoints(self.delivery_instant(), self.return_instant())
    }

    pub fn set_delivery(&mut self, at: NaiveDateTime) {
        self.delivery_date = at.format(DATE_FORMAT).to_string();
        self.delivery_time = at.format(TIME_FORMAT).to_string();
    }

    pub fn set_return(&mut self, at: NaiveDateTime) {
        self.return_date = at.format(DATE_FORMAT).to_string();
        self.return_time = at.format(TIME_FORMAT).to_string();
    }
}

/// Combines a `YYYY-MM-DD` date and an `HH:MM` time into a local instant.
pub fn parse_instant(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).ok()?;
    Some(date.and_time(time))
}

/// The rental agreement aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Rental {
    pub id: String,
    pub agreement_number: String,
    pub client: Client,
    pub vehicle: Vehicle,
    pub witness: Witness,
    #[serde(flatten)]
    pub period: RentalPeriod,
    #[serde(flatten)]
    pub pricing: PricingState,
    pub notes: String,
    pub vehicle_condition: VehicleCondition,
    pub accessories: Accessories,
    pub dents_scratches: DamageReport,
    #[serde(flatten)]
    pub signatures: Signatures,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Rental {
    /// Creates an empty draft with the given identifier and a fresh agreement
    /// number dated `today`.
    pub fn draft(id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id: id.into(),
            agreement_number: agreement_number(today),
            ..Self::default()
        }
    }

    /// Returns `true` when the identifier marks a record that never leaves the
    /// local cache.
    pub fn is_local_only(&self, local_prefix: &str) -> bool {
        !local_prefix.is_empty() && self.id.starts_with(local_prefix)
    }

    /// Every image slot on the rental, paired with a stable slot name.
    pub fn image_slots_mut(&mut self) -> Vec<(String, &mut Option<ImageRef>)> {
        let mut slots: Vec<(String, &mut Option<ImageRef>)> = vec![
            ("client-photo".into(), &mut self.client.photo),
            ("cnic-front".into(), &mut self.client.cnic_front_image),
            ("cnic-back".into(), &mut self.client.cnic_back_image),
            (
                "driving-license".into(),
                &mut self.client.driving_license_image,
            ),
            ("vehicle".into(), &mut self.vehicle.image),
            ("client-signature".into(), &mut self.signatures.client),
            ("owner-signature".into(), &mut self.signatures.owner),
        ];
        slots.retain(|(_, slot)| slot.is_some());
        slots
    }
}

impl Identifiable for Rental {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Rental {
    fn display_label(&self) -> String {
        format!(
            "{} - {} - {}",
            self.agreement_number,
            self.client.full_name,
            self.vehicle.display_label()
        )
    }
}

/// Identifier for a record eligible for remote replication.
pub fn new_rental_id() -> String {
    Uuid::new_v4().to_string()
}

/// Identifier for a record kept only in the local cache.
pub fn new_local_rental_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

/// Agreement numbers look like `RA-20240101-1a2b3c`.
pub fn agreement_number(today: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("RA-{}-{}", today.format("%Y%m%d"), &suffix[..6])
}
