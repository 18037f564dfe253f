//! Hand-over checklists captured on the Condition and Agreement steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::common::ImageRef;

const CONDITION_ITEMS: [&str; 8] = [
    "exterior",
    "interior",
    "tyres",
    "lights",
    "brakes",
    "airConditioning",
    "engine",
    "windows",
];

const ACCESSORY_ITEMS: [&str; 7] = [
    "spareTyre",
    "jack",
    "toolKit",
    "firstAidKit",
    "floorMats",
    "registrationPapers",
    "fireExtinguisher",
];

/// Inspection results recorded at delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleCondition {
    /// Item name to "in good order" flag.
    pub items: BTreeMap<String, bool>,
    pub fuel_level: String,
    pub odometer: String,
    pub notes: String,
}

impl Default for VehicleCondition {
    fn default() -> Self {
        Self {
            items: CONDITION_ITEMS
                .iter()
                .map(|item| (item.to_string(), true))
                .collect(),
            fuel_level: String::new(),
            odometer: String::new(),
            notes: String::new(),
        }
    }
}

impl VehicleCondition {
    pub fn set(&mut self, item: impl Into<String>, ok: bool) {
        self.items.insert(item.into(), ok);
    }

    /// Items flagged as not in good order.
    pub fn issues(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Accessories handed over with the vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Accessories(pub BTreeMap<String, bool>);

impl Default for Accessories {
    fn default() -> Self {
        Self(
            ACCESSORY_ITEMS
                .iter()
                .map(|item| (item.to_string(), false))
                .collect(),
        )
    }
}

impl Accessories {
    pub fn set(&mut self, item: impl Into<String>, present: bool) {
        self.0.insert(item.into(), present);
    }

    pub fn is_present(&self, item: &str) -> bool {
        self.0.get(item).copied().unwrap_or(false)
    }

    pub fn present(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, present)| **present)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Dents and scratches noted before hand-over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DamageReport {
    pub has_damage: bool,
    pub description: String,
    pub images: Vec<ImageRef>,
}

/// Client and owner signatures, stored as image references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Signatures {
    #[serde(rename = "clientSignature", skip_serializing_if = "Option::is_none")]
    pub client: Option<ImageRef>,
    #[serde(rename = "ownerSignature", skip_serializing_if = "Option::is_none")]
    pub owner: Option<ImageRef>,
}
