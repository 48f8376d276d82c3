//! Mercato CLI - Codes, wishlist and checkout tools.
//!
//! # Usage
//!
//! ```bash
//! # Generate five license keys from the OS random source
//! mercato codes generate license --count 5 --secure
//!
//! # Check a promo code's format
//! mercato codes validate-promo SAVE-AB12CD
//!
//! # Save a product to the local wishlist
//! mercato wishlist add p1 "Icon Pack" 499 icon-pack
//!
//! # Validate a promo code against the backend for a 1000.00 subtotal
//! mercato promo apply save20 --subtotal 1000
//!
//! # Gift a product
//! mercato gift icon-pack --email friend@example.com --message "Enjoy!"
//! ```
//!
//! # Commands
//!
//! - `codes` - Generate and validate license, gift, promo and affiliate codes
//! - `wishlist` - Manage the wishlist stored in `MERCATO_DATA_DIR`
//! - `promo` - Apply promo codes and draft new ones
//! - `gift` - Send a product as a gift
//! - `review` - List and submit product reviews
//! - `license` - Issue a license record for a purchase

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command results are printed; logs go to stderr through tracing.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use mercato_core::codes::CodeKind;
use mercato_core::license::LicenseType;
use mercato_core::DiscountType;
use mercato_storefront::StorefrontConfig;
use mercato_storefront::config::ConfigError;
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mercato")]
#[command(author, version, about = "Mercato marketplace CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and validate codes
    Codes {
        #[command(subcommand)]
        action: CodesAction,
    },
    /// Manage the local wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Apply or draft promo codes
    Promo {
        #[command(subcommand)]
        action: PromoAction,
    },
    /// Send a product as a gift
    Gift {
        /// Product slug
        slug: String,

        /// Recipient email address
        #[arg(short, long)]
        email: String,

        /// Recipient name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Personal message for the recipient
        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// List and submit product reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Issue license records
    License {
        #[command(subcommand)]
        action: LicenseAction,
    },
}

#[derive(Subcommand)]
enum CodesAction {
    /// Generate one or more codes
    Generate {
        /// Kind of code to generate
        kind: CodeKindArg,

        /// Prefix for promo codes (default: PROMO)
        #[arg(short, long)]
        prefix: Option<String>,

        /// Number of codes to generate
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Draw from the OS random source instead of the fast generator
        #[arg(long)]
        secure: bool,
    },
    /// Check a license key's format
    ValidateLicense { key: String },
    /// Check a promo code's format
    ValidatePromo { code: String },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    List,
    /// Save a product
    Add(WishlistItemArgs),
    /// Remove a product by ID
    Remove { id: String },
    /// Save a product, or remove it if already saved
    Toggle(WishlistItemArgs),
    /// Remove every saved product
    Clear,
}

#[derive(clap::Args)]
struct WishlistItemArgs {
    /// Product ID
    id: String,
    /// Product name
    name: String,
    /// Unit price
    price: Decimal,
    /// Product page slug
    slug: String,
    /// Image URL
    #[arg(long, default_value = "")]
    image: String,
}

#[derive(Subcommand)]
enum PromoAction {
    /// Validate a code against the backend and show the discount
    Apply {
        code: String,

        /// Cart subtotal to apply the discount to
        #[arg(short, long, default_value = "0")]
        subtotal: Decimal,
    },
    /// Draft a new seller promo code
    Create {
        /// Code prefix (default: PROMO)
        #[arg(short, long)]
        prefix: Option<String>,

        /// Discount type
        #[arg(short = 't', long, default_value = "percentage")]
        discount_type: DiscountTypeArg,

        /// Discount value (percent or fixed amount)
        #[arg(short, long)]
        discount: Decimal,

        /// Maximum number of redemptions
        #[arg(long)]
        max_uses: Option<u32>,

        /// Last day the code can be used (YYYY-MM-DD)
        #[arg(long)]
        valid_until: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Show a product's reviews
    List { slug: String },
    /// Submit a review
    Submit {
        slug: String,

        /// Star rating, 1 to 5
        #[arg(short, long)]
        rating: u8,

        /// Review text
        #[arg(short, long)]
        comment: String,
    },
}

#[derive(Subcommand)]
enum LicenseAction {
    /// Issue a license for a purchase and print it as JSON
    Issue {
        #[arg(long)]
        buyer_name: String,
        #[arg(long)]
        buyer_email: String,
        #[arg(long)]
        product_title: String,
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        order_id: String,
        #[arg(short = 't', long, default_value = "standard")]
        license_type: LicenseTypeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CodeKindArg {
    License,
    Gift,
    Affiliate,
    Promo,
}

impl From<CodeKindArg> for CodeKind {
    fn from(arg: CodeKindArg) -> Self {
        match arg {
            CodeKindArg::License => Self::License,
            CodeKindArg::Gift => Self::Gift,
            CodeKindArg::Affiliate => Self::Affiliate,
            CodeKindArg::Promo => Self::Promo,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DiscountTypeArg {
    Percentage,
    Fixed,
}

impl From<DiscountTypeArg> for DiscountType {
    fn from(arg: DiscountTypeArg) -> Self {
        match arg {
            DiscountTypeArg::Percentage => Self::Percentage,
            DiscountTypeArg::Fixed => Self::Fixed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LicenseTypeArg {
    Standard,
    Extended,
}

impl From<LicenseTypeArg> for LicenseType {
    fn from(arg: LicenseTypeArg) -> Self {
        match arg {
            LicenseTypeArg::Standard => Self::Standard,
            LicenseTypeArg::Extended => Self::Extended,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Errors and warnings become Sentry events; info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Logs go to stderr so command output can be piped
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mercato_cli=info,mercato_storefront=info,mercato_core=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(
    cli: Cli,
    config: Result<StorefrontConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Codes { action } => match action {
            CodesAction::Generate {
                kind,
                prefix,
                count,
                secure,
            } => commands::codes::generate(kind.into(), prefix.as_deref(), count, secure)?,
            CodesAction::ValidateLicense { key } => commands::codes::validate_license(&key)?,
            CodesAction::ValidatePromo { code } => commands::codes::validate_promo(&code)?,
        },
        Commands::Wishlist { action } => {
            let config = config?;
            match action {
                WishlistAction::List => commands::wishlist::list(&config),
                WishlistAction::Add(item) => commands::wishlist::add(&config, item.into()),
                WishlistAction::Remove { id } => commands::wishlist::remove(&config, &id),
                WishlistAction::Toggle(item) => commands::wishlist::toggle(&config, item.into()),
                WishlistAction::Clear => commands::wishlist::clear(&config),
            }
        }
        Commands::Promo { action } => match action {
            PromoAction::Apply { code, subtotal } => {
                commands::promo::apply(config?, &code, subtotal).await?;
            }
            PromoAction::Create {
                prefix,
                discount_type,
                discount,
                max_uses,
                valid_until,
            } => commands::promo::create(commands::promo::CreateArgs {
                prefix,
                discount_type: discount_type.into(),
                discount,
                max_uses,
                valid_until,
            })?,
        },
        Commands::Gift {
            slug,
            email,
            name,
            message,
        } => commands::gift::send(config?, &slug, email, name, message).await?,
        Commands::Review { action } => match action {
            ReviewAction::List { slug } => commands::review::list(config?, &slug).await?,
            ReviewAction::Submit {
                slug,
                rating,
                comment,
            } => commands::review::submit(config?, &slug, rating, &comment).await?,
        },
        Commands::License { action } => match action {
            LicenseAction::Issue {
                buyer_name,
                buyer_email,
                product_title,
                product_id,
                order_id,
                license_type,
            } => commands::license::issue(commands::license::IssueArgs {
                buyer_name,
                buyer_email,
                product_title,
                product_id,
                order_id,
                license_type: license_type.into(),
            })?,
        },
    }
    Ok(())
}

impl From<WishlistItemArgs> for mercato_core::WishlistItem {
    fn from(args: WishlistItemArgs) -> Self {
        Self {
            id: mercato_core::ProductId::new(args.id),
            name: args.name,
            price: args.price,
            image: args.image,
            slug: args.slug,
        }
    }
}
