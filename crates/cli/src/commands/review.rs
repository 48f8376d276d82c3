//! Product reviews.

use mercato_core::review::ReviewSummary;
use mercato_storefront::{StorefrontConfig, StorefrontSession};

/// Print a product's reviews with a summary line.
///
/// # Errors
///
/// Returns an error if the reviews cannot be fetched.
pub async fn list(config: StorefrontConfig, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let session = StorefrontSession::open(config)?;
    let reviews = match session.reviews(slug).await {
        Ok(reviews) => reviews,
        Err(e) => {
            e.report();
            return Err(e.user_message().into());
        }
    };

    if reviews.is_empty() {
        println!("No reviews yet. Be the first to review this product!");
        return Ok(());
    }

    println!("{}", ReviewSummary::from_reviews(&reviews).headline());
    for review in reviews.iter() {
        let stars = "★".repeat(usize::from(review.rating));
        let verified = if review.verified_purchase {
            " (verified purchase)"
        } else {
            ""
        };
        println!(
            "\n{stars} {}{verified} - {}\n{}",
            review.user_name,
            review.created_at.format("%Y-%m-%d"),
            review.comment
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the review is invalid or the backend rejects it.
pub async fn submit(
    config: StorefrontConfig,
    slug: &str,
    rating: u8,
    comment: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = StorefrontSession::open(config)?;
    match session.submit_review(slug, rating, comment).await {
        Ok(()) => {
            println!("Review submitted. Thanks for your feedback!");
            Ok(())
        }
        Err(e) => {
            e.report();
            Err(e.user_message().into())
        }
    }
}
