//! Checkout promo code entry.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use super::{PromoApplication, PromoValidator};
use crate::types::CurrencyCode;

/// Inline problems shown under the promo field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromoInputError {
    #[error("Please enter a promo code")]
    EmptyCode,

    #[error("Invalid or expired promo code")]
    InvalidOrExpired,

    #[error("Failed to validate promo code")]
    ValidationFailed,
}

/// What the promo field currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromoInputState {
    /// No code applied and nothing to report.
    #[default]
    Idle,
    /// Last attempt failed; no code applied.
    Error(PromoInputError),
    /// A valid code is applied.
    Applied(PromoApplication),
}

/// Trim and uppercase user input. `None` if nothing is left.
#[must_use]
pub fn normalize_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Promo field state machine: one applied code at a time.
#[derive(Debug, Clone, Default)]
pub struct PromoCodeInput {
    state: PromoInputState,
    currency: CurrencyCode,
}

impl PromoCodeInput {
    #[must_use]
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            state: PromoInputState::Idle,
            currency,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PromoInputState {
        &self.state
    }

    /// The applied code, if any.
    #[must_use]
    pub const fn applied(&self) -> Option<&PromoApplication> {
        match &self.state {
            PromoInputState::Applied(application) => Some(application),
            _ => None,
        }
    }

    /// Normalize `input`, ask `validator`, and move to the resulting state.
    ///
    /// While a code is applied this does nothing; call [`remove`](Self::remove)
    /// first. Validator errors are logged and shown as a generic failure.
    pub async fn apply<V>(&mut self, input: &str, validator: &V) -> &PromoInputState
    where
        V: PromoValidator + ?Sized,
    {
        if let PromoInputState::Applied(current) = &self.state {
            debug!(applied = %current.code, "Promo code already applied, ignoring");
            return &self.state;
        }

        let Some(code) = normalize_code(input) else {
            self.state = PromoInputState::Error(PromoInputError::EmptyCode);
            return &self.state;
        };

        self.state = match validator.validate(&code).await {
            Ok(validation) if validation.valid => {
                debug!(code = %code, "Promo code applied");
                PromoInputState::Applied(PromoApplication::from_validation(code, validation))
            }
            Ok(_) => {
                debug!(code = %code, "Promo code rejected");
                PromoInputState::Error(PromoInputError::InvalidOrExpired)
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Promo validation failed");
                PromoInputState::Error(PromoInputError::ValidationFailed)
            }
        };
        &self.state
    }

    /// Drop the applied code (or clear an error) and return to idle.
    pub fn remove(&mut self) {
        self.state = PromoInputState::Idle;
    }

    /// Badge text for the applied code, e.g. `-20%`.
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        self.applied()
            .map(|a| a.discount_type.label(a.discount, self.currency))
    }

    /// One-line description of the field.
    #[must_use]
    pub fn status_line(&self) -> String {
        match &self.state {
            PromoInputState::Idle => "No code applied".to_string(),
            PromoInputState::Error(e) => e.to_string(),
            PromoInputState::Applied(a) => format!(
                "{} applied, {}",
                a.code,
                a.discount_type.label(a.discount, self.currency)
            ),
        }
    }

    /// Discount the applied code takes off `subtotal`.
    #[must_use]
    pub fn discount_amount(&self, subtotal: Decimal) -> Decimal {
        self.applied()
            .map_or(Decimal::ZERO, |a| a.discount_amount(subtotal))
    }

    /// `subtotal` less the applied discount.
    #[must_use]
    pub fn total_after_discount(&self, subtotal: Decimal) -> Decimal {
        subtotal - self.discount_amount(subtotal)
    }
}
