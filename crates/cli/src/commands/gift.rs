//! Gift a product to someone else.

use mercato_core::gift::GiftForm;
use mercato_storefront::{StorefrontConfig, StorefrontSession};

/// # Errors
///
/// Returns an error if the form is invalid or the backend rejects the gift.
pub async fn send(
    config: StorefrontConfig,
    slug: &str,
    recipient_email: String,
    recipient_name: String,
    personal_message: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = StorefrontSession::open(config)?;
    let form = GiftForm {
        recipient_email,
        recipient_name,
        personal_message,
    };

    let result = session.send_gift(slug, form).await;
    session.close();

    match result {
        Ok(purchase) => {
            println!("Gift sent to {}", purchase.recipient_email);
            println!("Gift code: {}", purchase.gift_code);
            Ok(())
        }
        Err(e) => {
            e.report();
            Err(format!("Failed to send gift: {}", e.user_message()).into())
        }
    }
}
