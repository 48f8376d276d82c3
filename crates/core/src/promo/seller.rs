//! Seller-managed promo code records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DiscountType;
use crate::codes::{CodeGenerator, EntropySource, validate_promo_code};
use crate::types::PromoCodeId;

/// Reasons a seller's new promo code is rejected before it reaches the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoCodeError {
    #[error("Please enter a discount value")]
    MissingDiscount,

    #[error("Percentage discounts cannot exceed 100%")]
    PercentageTooLarge,

    #[error("Code {0} is not a valid promo code")]
    InvalidCode(String),

    #[error("Maximum uses must be at least 1")]
    ZeroMaxUses,

    #[error("Expiry date {until} is before {today}")]
    ExpiresInPast { until: NaiveDate, today: NaiveDate },
}

/// A promo code as the seller dashboard lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub id: PromoCodeId,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    /// `None` means unlimited.
    pub max_uses: Option<u32>,
    pub current_uses: u32,
    pub valid_from: NaiveDate,
    /// `None` means no expiry.
    pub valid_until: Option<NaiveDate>,
    pub is_active: bool,
}

impl PromoCode {
    /// Uses left, or `None` when unlimited.
    #[must_use]
    pub fn remaining_uses(&self) -> Option<u32> {
        self.max_uses
            .map(|max| max.saturating_sub(self.current_uses))
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_uses() == Some(0)
    }

    /// Past `valid_until` as of `today`.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.valid_until.is_some_and(|until| until < today)
    }

    /// Active, inside its date window and not used up.
    #[must_use]
    pub fn is_redeemable(&self, today: NaiveDate) -> bool {
        self.is_active
            && self.valid_from <= today
            && !self.is_expired(today)
            && !self.is_exhausted()
    }

    pub fn toggle_active(&mut self) {
        self.is_active = !self.is_active;
    }
}

/// A promo code being created on the seller dashboard.
///
/// The code is pre-filled from the generator; the seller fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCodeDraft {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Option<Decimal>,
    pub max_uses: Option<u32>,
    pub valid_until: Option<NaiveDate>,
}

impl PromoCodeDraft {
    /// Fresh percentage draft with a generated `PROMO-XXXXXX` code.
    pub fn generate<E: EntropySource>(generator: &mut CodeGenerator<E>) -> Self {
        Self {
            code: generator.default_promo_code(),
            discount_type: DiscountType::Percentage,
            discount_value: None,
            max_uses: None,
            valid_until: None,
        }
    }

    /// Check the draft and turn it into a record valid from `today`.
    ///
    /// # Errors
    ///
    /// Returns a [`PromoCodeError`] naming the first field that fails.
    pub fn finalize(self, id: PromoCodeId, today: NaiveDate) -> Result<PromoCode, PromoCodeError> {
        let code = self.code.trim().to_uppercase();
        if !validate_promo_code(&code) {
            return Err(PromoCodeError::InvalidCode(code));
        }

        let discount_value = self
            .discount_value
            .filter(|value| *value > Decimal::ZERO)
            .ok_or(PromoCodeError::MissingDiscount)?;
        if self.discount_type == DiscountType::Percentage && discount_value > Decimal::ONE_HUNDRED {
            return Err(PromoCodeError::PercentageTooLarge);
        }

        if self.max_uses == Some(0) {
            return Err(PromoCodeError::ZeroMaxUses);
        }
        if let Some(until) = self.valid_until.filter(|until| *until < today) {
            return Err(PromoCodeError::ExpiresInPast { until, today });
        }

        Ok(PromoCode {
            id,
            code,
            discount_type: self.discount_type,
            discount_value,
            max_uses: self.max_uses,
            current_uses: 0,
            valid_from: today,
            valid_until: self.valid_until,
            is_active: true,
        })
    }
}

/// Summary figures for the seller's promo code list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeStats {
    pub total: usize,
    pub active: usize,
    pub total_uses: u64,
}

impl PromoCodeStats {
    #[must_use]
    pub fn from_codes(codes: &[PromoCode]) -> Self {
        Self {
            total: codes.len(),
            active: codes.iter().filter(|c| c.is_active).count(),
            total_uses: codes.iter().map(|c| u64::from(c.current_uses)).sum(),
        }
    }
}
