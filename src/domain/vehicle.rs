use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, ImageRef};

/// Vehicle handed over under the agreement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub logo: String,
    /// Registration plate.
    pub car_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// Fleet list price, used when no per-day rate was entered for the booking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<f64>,
}

impl Vehicle {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year: year.into(),
            color: color.into(),
            ..Self::default()
        }
    }

    pub fn with_plate(mut self, plate: impl Into<String>) -> Self {
        self.car_number = plate.into();
        self
    }

    pub fn with_daily_rate(mut self, rate: f64) -> Self {
        self.daily_rate = Some(rate);
        self
    }
}

impl Displayable for Vehicle {
    fn display_label(&self) -> String {
        let mut label = format!("{} {} {}", self.brand, self.model, self.year);
        if !self.car_number.trim().is_empty() {
            label.push_str(&format!(" [{}]", self.car_number));
        }
        label
    }
}
