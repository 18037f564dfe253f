use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies records that expose a stable string identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Selects the pricing formula applied to a rental period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RentType {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl RentType {
    pub const ALL: [RentType; 5] = [
        RentType::Hourly,
        RentType::Daily,
        RentType::Weekly,
        RentType::Monthly,
        RentType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RentType::Hourly => "hourly",
            RentType::Daily => "daily",
            RentType::Weekly => "weekly",
            RentType::Monthly => "monthly",
            RentType::Custom => "custom",
        }
    }

    /// Parses a user-supplied label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == normalized)
    }
}

impl fmt::Display for RentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement state derived from the total and the advance payment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    #[default]
    Pending,
}

impl PaymentStatus {
    /// Derives the status for a total/advance pair.
    ///
    /// A zero total means pricing has not been settled yet, so the rental stays
    /// `Pending` whatever the advance is.
    pub fn derive(total: f64, advance: f64) -> Self {
        if total > 0.0 && advance >= total {
            PaymentStatus::Paid
        } else if advance > 0.0 && advance < total {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Pending => "pending",
        };
        f.write_str(label)
    }
}

const DATA_URL_PREFIX: &str = "data:";

/// Reference to an image: either a remote URL or an inline `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// True when the image bytes are embedded in the reference itself.
    pub fn is_inline(&self) -> bool {
        self.0.starts_with(DATA_URL_PREFIX)
    }

    /// Splits an inline reference into its MIME type and base64 payload.
    pub fn inline_parts(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix(DATA_URL_PREFIX)?;
        let (header, payload) = rest.split_once(',')?;
        let mime = header.strip_suffix(";base64")?;
        Some((mime, payload))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_follows_total_and_advance() {
        assert_eq!(PaymentStatus::derive(2000.0, 2000.0), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::derive(2000.0, 2500.0), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::derive(2000.0, 500.0), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::derive(2000.0, 0.0), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::derive(0.0, 0.0), PaymentStatus::Pending);
    }

    #[test]
    fn rent_type_parses_case_insensitively() {
        assert_eq!(RentType::parse(" Weekly "), Some(RentType::Weekly));
        assert_eq!(RentType::parse("fortnightly"), None);
    }

    #[test]
    fn inline_image_parts_are_split() {
        let image = ImageRef::new("data:image/png;base64,aGVsbG8=");
        assert!(image.is_inline());
        assert_eq!(image.inline_parts(), Some(("image/png", "aGVsbG8=")));

        let remote = ImageRef::new("https://cdn.example.com/a.jpg");
        assert!(!remote.is_inline());
        assert_eq!(remote.inline_parts(), None);
    }
}
