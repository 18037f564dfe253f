pub mod checklist;
pub mod common;
pub mod party;
pub mod rental;
pub mod vehicle;

pub use checklist::{Accessories, DamageReport, Signatures, VehicleCondition};
pub use common::{Displayable, Identifiable, ImageRef, NamedEntity, PaymentStatus, RentType};
pub use party::{Client, Witness};
pub use rental::{
    agreement_number, new_local_rental_id, new_rental_id, parse_instant, Rental, RentalPeriod,
    DATE_FORMAT, TIME_FORMAT,
};
pub use vehicle::Vehicle;
