//! Promo code commands.

use chrono::NaiveDate;
use mercato_core::codes::{CodeGenerator, SecureEntropy};
use mercato_core::promo::{PromoCodeDraft, PromoInputState};
use mercato_core::{DiscountType, Price, PromoCodeId, PromoCodeInput};
use mercato_storefront::{ApiClient, StorefrontConfig};
use rust_decimal::Decimal;
use tracing::info;

/// Validate `code` with the backend and print the resulting discount on
/// `subtotal`.
///
/// # Errors
///
/// Returns an error if the code is empty, rejected, or cannot be validated.
pub async fn apply(
    config: StorefrontConfig,
    code: &str,
    subtotal: Decimal,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(&config)?;
    let mut input = PromoCodeInput::new(config.currency);

    if let PromoInputState::Error(err) = input.apply(code, &client).await {
        return Err(err.to_string().into());
    }

    println!("{}", input.status_line());
    if subtotal > Decimal::ZERO {
        let price = |amount| Price::new(amount, config.currency).display();
        println!("Subtotal: {}", price(subtotal));
        println!("Discount: -{}", price(input.discount_amount(subtotal)));
        println!("Total:    {}", price(input.total_after_discount(subtotal)));
    }
    Ok(())
}

/// Options for drafting a seller promo code.
pub struct CreateArgs {
    pub prefix: Option<String>,
    pub discount_type: DiscountType,
    pub discount: Decimal,
    pub max_uses: Option<u32>,
    pub valid_until: Option<NaiveDate>,
}

/// Draft a promo code and print it as JSON, ready to submit to the backend.
///
/// # Errors
///
/// Returns an error if the draft fails validation.
pub fn create(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = chrono::Utc::now().date_naive();
    let mut generator = CodeGenerator::new(SecureEntropy::new());

    let mut draft = PromoCodeDraft::generate(&mut generator);
    if let Some(prefix) = args.prefix.as_deref() {
        draft.code = generator.promo_code(prefix);
    }
    draft.discount_type = args.discount_type;
    draft.discount_value = Some(args.discount);
    draft.max_uses = args.max_uses;
    draft.valid_until = args.valid_until;

    // The backend assigns the real ID on save.
    let promo = draft.finalize(PromoCodeId::new(0), today)?;

    info!(code = %promo.code, "Drafted promo code");
    println!("{}", serde_json::to_string_pretty(&promo)?);
    Ok(())
}
