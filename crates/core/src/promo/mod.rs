//! Promo codes: checkout-side application and seller-side records.
//!
//! The backend is the authority on whether a code is valid and what it is
//! worth. The client normalizes input, asks a [`PromoValidator`], and keeps
//! at most one applied code.

mod input;
mod seller;

pub use input::{PromoCodeInput, PromoInputError, PromoInputState, normalize_code};
pub use seller::{PromoCode, PromoCodeDraft, PromoCodeError, PromoCodeStats};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::CurrencyCode;

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `value` percent off the subtotal.
    Percentage,
    /// `value` currency units off the subtotal.
    Fixed,
}

impl DiscountType {
    /// Amount taken off `subtotal`, clamped to `0..=subtotal` and rounded to
    /// two decimal places. Percentages above 100 count as 100.
    #[must_use]
    pub fn discount_amount(self, value: Decimal, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO || value <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let raw = match self {
            Self::Percentage => {
                let percent = value.min(Decimal::ONE_HUNDRED);
                subtotal.checked_mul(percent).map_or_else(
                    || (subtotal / Decimal::ONE_HUNDRED).saturating_mul(percent),
                    |scaled| scaled / Decimal::ONE_HUNDRED,
                )
            }
            Self::Fixed => value,
        };
        raw.min(subtotal).round_dp(2)
    }

    /// Badge text such as `-20%` or `-₹500`.
    #[must_use]
    pub fn label(self, value: Decimal, currency: CurrencyCode) -> String {
        match self {
            Self::Percentage => format!("-{}%", value.normalize()),
            Self::Fixed => format!("-{}{}", currency.symbol(), value.normalize()),
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("invalid discount type: {s}")),
        }
    }
}

/// Body of a promo validation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoValidationRequest {
    pub code: String,
}

/// Backend verdict on a promo code.
///
/// A rejection may omit `discount` and `discountType`; an accepted code must
/// carry its discount type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPromoValidation")]
pub struct PromoValidation {
    pub valid: bool,
    pub discount: Decimal,
    pub discount_type: DiscountType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPromoValidation {
    valid: bool,
    #[serde(default)]
    discount: Decimal,
    #[serde(default)]
    discount_type: Option<DiscountType>,
}

impl TryFrom<RawPromoValidation> for PromoValidation {
    type Error = &'static str;

    fn try_from(raw: RawPromoValidation) -> Result<Self, Self::Error> {
        let discount_type = match (raw.valid, raw.discount_type) {
            (_, Some(discount_type)) => discount_type,
            (false, None) => DiscountType::Percentage,
            (true, None) => return Err("valid promo code without discountType"),
        };
        Ok(Self {
            valid: raw.valid,
            discount: raw.discount,
            discount_type,
        })
    }
}

/// Outcome of one apply attempt. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoApplication {
    pub code: String,
    pub valid: bool,
    pub discount: Decimal,
    pub discount_type: DiscountType,
}

impl PromoApplication {
    #[must_use]
    pub fn from_validation(code: impl Into<String>, validation: PromoValidation) -> Self {
        Self {
            code: code.into(),
            valid: validation.valid,
            discount: validation.discount,
            discount_type: validation.discount_type,
        }
    }

    /// Discount this application takes off `subtotal`; zero if invalid.
    #[must_use]
    pub fn discount_amount(&self, subtotal: Decimal) -> Decimal {
        if self.valid {
            self.discount_type.discount_amount(self.discount, subtotal)
        } else {
            Decimal::ZERO
        }
    }
}

/// Backend collaborator that judges promo codes.
#[async_trait]
pub trait PromoValidator: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ask whether `code` (already normalized) is redeemable.
    async fn validate(&self, code: &str) -> Result<PromoValidation, Self::Error>;
}
