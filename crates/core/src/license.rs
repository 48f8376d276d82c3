//! License records issued with each purchase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codes::{CodeGenerator, EntropySource};
use crate::types::{Email, OrderId, ProductId};

/// Tier a product was licensed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    #[default]
    Standard,
    Extended,
}

/// One usage right and whether a license tier grants it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseRight {
    pub label: &'static str,
    pub granted: bool,
}

const fn right(label: &'static str, granted: bool) -> LicenseRight {
    LicenseRight { label, granted }
}

const STANDARD_RIGHTS: [LicenseRight; 5] = [
    right("Personal Use", true),
    right("Single Commercial Project", true),
    right("Single End Product", true),
    right("SaaS/Web App Use", false),
    right("Resale Rights", false),
];

const EXTENDED_RIGHTS: [LicenseRight; 5] = [
    right("Personal and Commercial Use", true),
    right("Unlimited Projects", true),
    right("SaaS/Web App Use", true),
    right("Resale Rights", true),
    right("Unlimited Team Members", true),
];

impl LicenseType {
    /// Rights listed on the license certificate, granted ones first.
    #[must_use]
    pub const fn rights(self) -> &'static [LicenseRight] {
        match self {
            Self::Standard => &STANDARD_RIGHTS,
            Self::Extended => &EXTENDED_RIGHTS,
        }
    }

    /// Whether this tier grants the right named `label`.
    #[must_use]
    pub fn grants(self, label: &str) -> bool {
        self.rights()
            .iter()
            .any(|r| r.granted && r.label == label)
    }
}

impl std::fmt::Display for LicenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

/// Everything printed on a buyer's license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseData {
    pub license_key: String,
    pub purchase_date: DateTime<Utc>,
    pub buyer_name: String,
    pub buyer_email: Email,
    pub product_title: String,
    pub product_id: ProductId,
    pub license_type: LicenseType,
    pub order_id: OrderId,
}

/// Purchase details a license is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseGrant {
    pub buyer_name: String,
    pub buyer_email: Email,
    pub product_title: String,
    pub product_id: ProductId,
    pub license_type: LicenseType,
    pub order_id: OrderId,
}

impl LicenseData {
    /// Mint a license key for `grant`, dated `purchased_at`.
    pub fn issue<E: EntropySource>(
        generator: &mut CodeGenerator<E>,
        grant: LicenseGrant,
        purchased_at: DateTime<Utc>,
    ) -> Self {
        Self {
            license_key: generator.license_key(),
            purchase_date: purchased_at,
            buyer_name: grant.buyer_name,
            buyer_email: grant.buyer_email,
            product_title: grant.product_title,
            product_id: grant.product_id,
            license_type: grant.license_type,
            order_id: grant.order_id,
        }
    }

    /// Suggested download name, e.g. `license-M94-AB12-CD34-EF56`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("license-{}", self.license_key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codes::{SeededEntropy, validate_license_key};

    fn grant(license_type: LicenseType) -> LicenseGrant {
        LicenseGrant {
            buyer_name: "Meera".to_string(),
            buyer_email: Email::parse("meera@example.com").unwrap(),
            product_title: "Icon Pack".to_string(),
            product_id: ProductId::new("icon-pack"),
            license_type,
            order_id: OrderId::new("1042"),
        }
    }

    #[test]
    fn test_issue_generates_valid_key() {
        let mut generator = CodeGenerator::new(SeededEntropy::new(11));
        let purchased_at = "2026-03-01T12:00:00Z".parse().unwrap();
        let license = LicenseData::issue(&mut generator, grant(LicenseType::Extended), purchased_at);

        assert!(validate_license_key(&license.license_key));
        assert_eq!(license.file_stem(), format!("license-{}", license.license_key));
        assert_eq!(license.purchase_date, purchased_at);
    }

    #[test]
    fn test_standard_excludes_saas_and_resale() {
        assert!(LicenseType::Standard.grants("Personal Use"));
        assert!(!LicenseType::Standard.grants("SaaS/Web App Use"));
        assert!(!LicenseType::Standard.grants("Resale Rights"));
    }

    #[test]
    fn test_extended_grants_everything_listed() {
        assert!(LicenseType::Extended.rights().iter().all(|r| r.granted));
        assert!(LicenseType::Extended.grants("Resale Rights"));
    }

    #[test]
    fn test_wire_format() {
        let mut generator = CodeGenerator::fast();
        let license = LicenseData::issue(
            &mut generator,
            grant(LicenseType::Standard),
            "2026-03-01T12:00:00Z".parse().unwrap(),
        );
        let json = serde_json::to_value(&license).unwrap();
        assert_eq!(json["licenseType"], "standard");
        assert_eq!(json["orderId"], "1042");
        assert_eq!(json["buyerEmail"], "meera@example.com");
    }
}
