//! License issuing.

use mercato_core::codes::{CodeGenerator, SecureEntropy};
use mercato_core::license::{LicenseData, LicenseGrant, LicenseType};
use mercato_core::{Email, OrderId, ProductId};
use tracing::info;

pub struct IssueArgs {
    pub buyer_name: String,
    pub buyer_email: String,
    pub product_title: String,
    pub product_id: String,
    pub order_id: String,
    pub license_type: LicenseType,
}

/// Issue a license and print it as JSON followed by its rights.
///
/// # Errors
///
/// Returns an error if the buyer email is invalid.
pub fn issue(args: IssueArgs) -> Result<(), Box<dyn std::error::Error>> {
    let grant = LicenseGrant {
        buyer_name: args.buyer_name,
        buyer_email: Email::parse(&args.buyer_email)?,
        product_title: args.product_title,
        product_id: ProductId::new(args.product_id),
        license_type: args.license_type,
        order_id: OrderId::new(args.order_id),
    };

    let mut generator = CodeGenerator::new(SecureEntropy::new());
    let license = LicenseData::issue(&mut generator, grant, chrono::Utc::now());
    info!(license_key = %license.license_key, "Issued license");

    println!("{}", serde_json::to_string_pretty(&license)?);
    for right in license.license_type.rights() {
        let mark = if right.granted { "✓" } else { "✗" };
        eprintln!("{mark} {}", right.label);
    }
    Ok(())
}
