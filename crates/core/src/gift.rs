//! Gift checkout payloads.
//!
//! A buyer sends a product to someone else. The client checks the recipient
//! address, mints a `GIFT-XXXXXXXX` code and hands the backend a
//! [`GiftPurchase`]; the backend stores the code and emails the recipient.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codes::{CodeGenerator, EntropySource};
use crate::types::{Email, EmailError};

/// Problems with the gift form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GiftError {
    #[error("Please enter the recipient's email address")]
    EmailRequired,

    #[error("Invalid recipient email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// What the buyer typed into the gift dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GiftForm {
    pub recipient_email: String,
    /// Optional; empty is fine.
    pub recipient_name: String,
    /// Optional; empty is fine.
    pub personal_message: String,
}

/// Request body for a gift purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftPurchase {
    pub recipient_email: Email,
    pub recipient_name: String,
    pub personal_message: String,
    pub gift_code: String,
}

impl GiftForm {
    /// Validate the form and attach a freshly generated gift code.
    ///
    /// # Errors
    ///
    /// Returns [`GiftError::EmailRequired`] for a blank address and
    /// [`GiftError::InvalidEmail`] for a malformed one.
    pub fn into_purchase<E: EntropySource>(
        self,
        generator: &mut CodeGenerator<E>,
    ) -> Result<GiftPurchase, GiftError> {
        if self.recipient_email.trim().is_empty() {
            return Err(GiftError::EmailRequired);
        }
        let recipient_email = Email::parse(&self.recipient_email)?;

        Ok(GiftPurchase {
            recipient_email,
            recipient_name: self.recipient_name.trim().to_string(),
            personal_message: self.personal_message.trim().to_string(),
            gift_code: generator.gift_code(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codes::SeededEntropy;

    fn form(email: &str) -> GiftForm {
        GiftForm {
            recipient_email: email.to_string(),
            recipient_name: " Asha ".to_string(),
            personal_message: "Enjoy!".to_string(),
        }
    }

    #[test]
    fn test_purchase_carries_gift_code() {
        let mut generator = CodeGenerator::new(SeededEntropy::new(3));
        let purchase = form("asha@example.com").into_purchase(&mut generator).unwrap();

        assert_eq!(purchase.recipient_email.as_str(), "asha@example.com");
        assert_eq!(purchase.recipient_name, "Asha");
        let body = purchase.gift_code.strip_prefix("GIFT-").unwrap();
        assert_eq!(body.len(), 8);
        assert!(body.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn test_blank_email_is_required_error() {
        let mut generator = CodeGenerator::fast();
        assert_eq!(
            form("  ").into_purchase(&mut generator),
            Err(GiftError::EmailRequired)
        );
    }

    #[test]
    fn test_malformed_email() {
        let mut generator = CodeGenerator::fast();
        assert!(matches!(
            form("asha.example.com").into_purchase(&mut generator),
            Err(GiftError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_wire_format() {
        let mut generator = CodeGenerator::fast();
        let purchase = form("asha@example.com").into_purchase(&mut generator).unwrap();
        let json = serde_json::to_value(&purchase).unwrap();
        assert_eq!(json["recipientEmail"], "asha@example.com");
        assert_eq!(json["personalMessage"], "Enjoy!");
        assert!(json["giftCode"].as_str().unwrap().starts_with("GIFT-"));
    }
}
