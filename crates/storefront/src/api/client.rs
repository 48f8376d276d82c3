//! `ApiClient` implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mercato_core::gift::GiftPurchase;
use mercato_core::promo::{PromoValidation, PromoValidationRequest, PromoValidator};
use mercato_core::review::{Review, ReviewSubmission};
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use crate::config::StorefrontConfig;

/// Characters of an error body kept for logs and errors.
const BODY_EXCERPT_LEN: usize = 200;

/// Client for the Mercato backend REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("authenticated", &self.inner.access_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Review listings come back either wrapped or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReviewsResponse {
    Wrapped { reviews: Vec<Review> },
    Bare(Vec<Review>),
}

impl From<ReviewsResponse> for Vec<Review> {
    fn from(response: ReviewsResponse) -> Self {
        match response {
            ReviewsResponse::Wrapped { reviews } | ReviewsResponse::Bare(reviews) => reviews,
        }
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api.base_url.as_str().trim_end_matches('/').to_string(),
                access_token: config.bearer_token().map(str::to_string),
                cache,
            }),
        })
    }

    /// Full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    fn product_path(slug: &str, resource: &str) -> String {
        format!("products/{}/{resource}", urlencoding::encode(slug))
    }

    /// Send a request, mapping failure statuses to [`ApiError`] and
    /// returning the response body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let request = match &self.inner.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let retry_after = response.headers().get("Retry-After").cloned();
        let body = response.text().await?;

        check_status(status, retry_after.as_ref(), body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Promo Methods
    // =========================================================================

    /// Ask the backend whether `code` is redeemable.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the verdict cannot be parsed.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn validate_promo(&self, code: &str) -> Result<PromoValidation, ApiError> {
        let body = PromoValidationRequest {
            code: code.to_string(),
        };
        let request = self
            .inner
            .client
            .post(self.url("promo-codes/validate"))
            .json(&body);
        self.send_json(request).await
    }

    // =========================================================================
    // Gift Methods
    // =========================================================================

    /// Record a gift purchase of the product `slug`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, purchase), fields(slug = %slug, gift_code = %purchase.gift_code))]
    pub async fn purchase_gift(&self, slug: &str, purchase: &GiftPurchase) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(&Self::product_path(slug, "gift")))
            .json(purchase);
        self.send(request).await.map(|_| ())
    }

    // =========================================================================
    // Review Methods
    // =========================================================================

    /// Reviews for the product `slug`, newest first as the backend orders them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn list_reviews(&self, slug: &str) -> Result<Arc<Vec<Review>>, ApiError> {
        let cache_key = CacheKey::Reviews(slug.to_string());

        if let Some(CacheValue::Reviews(reviews)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for reviews");
            return Ok(reviews);
        }

        let request = self
            .inner
            .client
            .get(self.url(&Self::product_path(slug, "reviews")));
        let response: ReviewsResponse = self.send_json(request).await?;
        let reviews = Arc::new(Vec::from(response));

        self.inner
            .cache
            .insert(cache_key, CacheValue::Reviews(Arc::clone(&reviews)))
            .await;

        Ok(reviews)
    }

    /// Submit a review for the product `slug`.
    ///
    /// Drops the cached listing so the next read sees the new review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, submission), fields(slug = %slug, rating = submission.rating.stars()))]
    pub async fn submit_review(
        &self,
        slug: &str,
        submission: &ReviewSubmission,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(&Self::product_path(slug, "reviews")))
            .json(submission);
        self.send(request).await?;

        self.inner
            .cache
            .invalidate(&CacheKey::Reviews(slug.to_string()))
            .await;
        Ok(())
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

#[async_trait]
impl PromoValidator for ApiClient {
    type Error = ApiError;

    async fn validate(&self, code: &str) -> Result<PromoValidation, Self::Error> {
        self.validate_promo(code).await
    }
}

/// Map a response status to an error, passing the body through on success.
fn check_status(
    status: StatusCode,
    retry_after: Option<&HeaderValue>,
    body: String,
) -> Result<String, ApiError> {
    if status.is_success() {
        return Ok(body);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(excerpt(&body))),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = retry_after
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            Err(ApiError::RateLimited(retry_after))
        }
        _ => {
            tracing::error!(
                status = %status,
                body = %excerpt(&body),
                "API returned non-success status"
            );
            Err(ApiError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            })
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LEN).collect()
}
