//! Shopper session: the stores and clients one storefront visit works with.

use std::sync::Arc;

use mercato_core::codes::SecureEntropy;
use mercato_core::gift::{GiftForm, GiftPurchase};
use mercato_core::persistence::ScopedPersistence;
use mercato_core::review::{Review, ReviewSubmission};
use mercato_core::{CartStore, CodeGenerator, PromoCodeInput, PromoInputState, WishlistStore};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::{Result, add_breadcrumb};
use crate::storage::FileStorage;

/// Wishlist persisted to the session's data directory.
pub type FileWishlist = WishlistStore<ScopedPersistence<FileStorage>>;

/// Everything a shopper touches during one visit.
///
/// The cart and promo field live only as long as the session. The wishlist is
/// restored from the data directory on [`open`](Self::open) and written back
/// after every change.
#[derive(Debug)]
pub struct StorefrontSession {
    config: StorefrontConfig,
    client: ApiClient,
    cart: CartStore,
    wishlist: FileWishlist,
    promo: PromoCodeInput,
    codes: CodeGenerator<SecureEntropy>,
}

impl StorefrontSession {
    /// Open a session, restoring the wishlist from `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        let storage = FileStorage::new(config.data_dir.clone());
        let wishlist = WishlistStore::with_backend(storage);
        let promo = PromoCodeInput::new(config.currency);

        info!(
            api = %config.api.base_url,
            data_dir = %config.data_dir.display(),
            wishlist_items = wishlist.len(),
            "Storefront session opened"
        );

        Ok(Self {
            config,
            client,
            cart: CartStore::new(),
            wishlist,
            promo,
            codes: CodeGenerator::new(SecureEntropy::new()),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &FileWishlist {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut FileWishlist {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn promo(&self) -> &PromoCodeInput {
        &self.promo
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Validate `input` against the backend and apply it if accepted.
    pub async fn apply_promo(&mut self, input: &str) -> &PromoInputState {
        let state = self.promo.apply(input, &self.client).await;
        if let PromoInputState::Applied(application) = state {
            add_breadcrumb("checkout", "Applied promo code", Some(&[("code", application.code.as_str())]));
        }
        state
    }

    pub fn remove_promo(&mut self) {
        self.promo.remove();
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    /// Discount from the applied promo code.
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.promo.discount_amount(self.cart.subtotal())
    }

    /// Amount due after the promo discount.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.promo.total_after_discount(self.cart.subtotal())
    }

    // =========================================================================
    // Gifts and Reviews
    // =========================================================================

    /// Validate `form`, mint a gift code and record the gift for `slug`.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or the backend call fails.
    #[instrument(skip(self, form))]
    pub async fn send_gift(&mut self, slug: &str, form: GiftForm) -> Result<GiftPurchase> {
        let purchase = form.into_purchase(&mut self.codes)?;
        self.client.purchase_gift(slug, &purchase).await?;

        add_breadcrumb("gift", "Sent gift", Some(&[("product", slug)]));
        info!(gift_code = %purchase.gift_code, "Gift sent");
        Ok(purchase)
    }

    /// Validate and submit a review for `slug`.
    ///
    /// # Errors
    ///
    /// Returns an error if the rating or comment is invalid or the backend
    /// call fails.
    #[instrument(skip(self, comment))]
    pub async fn submit_review(&self, slug: &str, stars: u8, comment: &str) -> Result<()> {
        let submission = ReviewSubmission::new(stars, comment)?;
        self.client.submit_review(slug, &submission).await?;

        add_breadcrumb("review", "Submitted review", Some(&[("product", slug)]));
        Ok(())
    }

    /// Published reviews for `slug`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn reviews(&self, slug: &str) -> Result<Arc<Vec<Review>>> {
        Ok(self.client.list_reviews(slug).await?)
    }

    /// End the session. The wishlist is flushed; the cart and promo are
    /// discarded.
    pub fn close(self) {
        let cart_items = self.cart.close().len();
        drop(self.wishlist.close());
        info!(discarded_cart_items = cart_items, "Storefront session closed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mercato_core::promo::PromoInputError;
    use mercato_core::wishlist::WishlistItem;
    use mercato_core::{NewCartItem, ProductId};

    use super::*;
    use crate::error::StorefrontError;

    fn config(data_dir: &std::path::Path) -> StorefrontConfig {
        let dir = data_dir.to_string_lossy().into_owned();
        StorefrontConfig::from_lookup(move |key| match key {
            // Nothing listens on the discard port, so backend calls fail fast.
            "MERCATO_API_URL" => Some("http://127.0.0.1:9/api".to_string()),
            "MERCATO_DATA_DIR" => Some(dir.clone()),
            _ => None,
        })
        .unwrap()
    }

    fn temp_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mercato-session-{}", uuid::Uuid::new_v4()))
    }

    /// Sessions only create the data dir once something is written.
    fn remove_temp_dir(dir: &std::path::Path) {
        if dir.exists() {
            std::fs::remove_dir_all(dir).unwrap();
        }
    }

    fn saved(id: &str) -> WishlistItem {
        WishlistItem {
            id: ProductId::new(id),
            name: "Icon Pack".to_string(),
            price: Decimal::new(999, 0),
            image: "/images/icons.png".to_string(),
            slug: "icon-pack".to_string(),
        }
    }

    #[test]
    fn test_wishlist_persists_across_sessions() {
        let dir = temp_dir();

        let mut session = StorefrontSession::open(config(&dir)).unwrap();
        assert!(session.wishlist().is_empty());
        session.wishlist_mut().add_item(saved("p1"));
        session.close();

        let session = StorefrontSession::open(config(&dir)).unwrap();
        assert!(session.wishlist().is_in_wishlist(&ProductId::new("p1")));
        session.close();

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cart_totals_without_promo() {
        let dir = temp_dir();
        let mut session = StorefrontSession::open(config(&dir)).unwrap();

        for _ in 0..3 {
            session.cart_mut().add_item(NewCartItem {
                id: ProductId::new("p1"),
                name: "Font Bundle".to_string(),
                price: Decimal::new(100, 0),
                image: String::new(),
            });
        }

        assert_eq!(session.subtotal(), Decimal::new(300, 0));
        assert_eq!(session.discount(), Decimal::ZERO);
        assert_eq!(session.total(), Decimal::new(300, 0));

        remove_temp_dir(&dir);
    }

    #[tokio::test]
    async fn test_empty_promo_never_reaches_backend() {
        let dir = temp_dir();
        let mut session = StorefrontSession::open(config(&dir)).unwrap();

        let state = session.apply_promo("   ").await;
        assert_eq!(state, &PromoInputState::Error(PromoInputError::EmptyCode));

        remove_temp_dir(&dir);
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_promo_validation() {
        let dir = temp_dir();
        let mut session = StorefrontSession::open(config(&dir)).unwrap();

        let state = session.apply_promo("save20").await.clone();
        assert_eq!(state, PromoInputState::Error(PromoInputError::ValidationFailed));
        assert_eq!(session.promo().status_line(), "Failed to validate promo code");

        session.remove_promo();
        assert_eq!(session.promo().state(), &PromoInputState::Idle);

        remove_temp_dir(&dir);
    }

    #[tokio::test]
    async fn test_gift_form_checked_before_sending() {
        let dir = temp_dir();
        let mut session = StorefrontSession::open(config(&dir)).unwrap();

        let err = session
            .send_gift("icon-pack", GiftForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Gift(_)));

        remove_temp_dir(&dir);
    }

    #[tokio::test]
    async fn test_review_checked_before_sending() {
        let dir = temp_dir();
        let session = StorefrontSession::open(config(&dir)).unwrap();

        let err = session.submit_review("icon-pack", 0, "Nice").await.unwrap_err();
        assert!(matches!(err, StorefrontError::Review(_)));

        let err = session.submit_review("icon-pack", 5, "Nice").await.unwrap_err();
        assert!(matches!(err, StorefrontError::Api(_)));

        remove_temp_dir(&dir);
    }
}
