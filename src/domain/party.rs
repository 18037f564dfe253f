use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, ImageRef, NamedEntity};

/// The renter named on the agreement, with references to their document scans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    pub id: String,
    pub full_name: String,
    #[serde(rename = "cnic")]
    pub national_id: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnic_front_image: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnic_back_image: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_license_image: Option<ImageRef>,
}

impl Client {
    pub fn new(
        full_name: impl Into<String>,
        national_id: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            national_id: national_id.into(),
            phone: phone.into(),
            address: address.into(),
            ..Self::default()
        }
    }
}

impl NamedEntity for Client {
    fn name(&self) -> &str {
        &self.full_name
    }
}

impl Displayable for Client {
    fn display_label(&self) -> String {
        format!("{} ({})", self.full_name, self.national_id)
    }
}

/// Person countersigning the agreement. Carries no document images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Witness {
    pub name: String,
    #[serde(rename = "cnic")]
    pub national_id: String,
    pub phone: String,
    pub address: String,
}

impl Witness {
    pub fn new(
        name: impl Into<String>,
        national_id: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            national_id: national_id.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }
}

impl NamedEntity for Witness {
    fn name(&self) -> &str {
        &self.name
    }
}
