//! Code generation.
//!
//! | Kind      | Shape                | Alphabet    |
//! |-----------|----------------------|-------------|
//! | License   | `M94-XXXX-XXXX-XXXX` | `[A-Z0-9]`  |
//! | Gift      | `GIFT-XXXXXXXX`      | `[A-Z0-9]`  |
//! | Affiliate | `ref_xxxxxxxx`       | `[a-z0-9]`  |
//! | Promo     | `<PREFIX>-XXXXXX`    | `[A-Z0-9]`  |
//!
//! Nothing here checks codes against ones already issued; collisions are the
//! backend's problem.

use super::entropy::{EntropySource, FastEntropy};

/// Uppercase letters followed by digits.
pub const UPPER_ALPHANUMERIC: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Lowercase letters followed by digits.
pub const LOWER_ALPHANUMERIC: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const LICENSE_PREFIX: &str = "M94";
pub const LICENSE_GROUPS: usize = 3;
pub const LICENSE_GROUP_LEN: usize = 4;
pub const GIFT_PREFIX: &str = "GIFT-";
pub const GIFT_LEN: usize = 8;
pub const AFFILIATE_PREFIX: &str = "ref_";
pub const AFFILIATE_LEN: usize = 8;
pub const DEFAULT_PROMO_PREFIX: &str = "PROMO";
pub const PROMO_SUFFIX_LEN: usize = 6;

/// The four kinds of code the marketplace issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    License,
    Gift,
    Affiliate,
    Promo,
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::License => write!(f, "license"),
            Self::Gift => write!(f, "gift"),
            Self::Affiliate => write!(f, "affiliate"),
            Self::Promo => write!(f, "promo"),
        }
    }
}

/// Generates codes from an injected [`EntropySource`].
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator<E = FastEntropy> {
    entropy: E,
}

impl<E: EntropySource> CodeGenerator<E> {
    /// Create a generator drawing from `entropy`.
    #[must_use]
    pub const fn new(entropy: E) -> Self {
        Self { entropy }
    }

    /// Consume the generator and hand back its entropy source.
    pub fn into_entropy(self) -> E {
        self.entropy
    }

    /// `M94-` followed by three dash-separated groups of four.
    pub fn license_key(&mut self) -> String {
        let mut key = String::with_capacity(
            LICENSE_PREFIX.len() + LICENSE_GROUPS * (LICENSE_GROUP_LEN + 1),
        );
        key.push_str(LICENSE_PREFIX);
        for _ in 0..LICENSE_GROUPS {
            key.push('-');
            self.push_random(&mut key, UPPER_ALPHANUMERIC, LICENSE_GROUP_LEN);
        }
        key
    }

    /// `GIFT-` followed by eight uppercase alphanumerics.
    pub fn gift_code(&mut self) -> String {
        self.prefixed(GIFT_PREFIX, UPPER_ALPHANUMERIC, GIFT_LEN)
    }

    /// `ref_` followed by eight lowercase alphanumerics.
    pub fn affiliate_code(&mut self) -> String {
        self.prefixed(AFFILIATE_PREFIX, LOWER_ALPHANUMERIC, AFFILIATE_LEN)
    }

    /// Uppercased `prefix`, a dash, then six uppercase alphanumerics.
    ///
    /// The prefix is only case-folded. An empty or punctuated prefix produces
    /// a code that [`validate_promo_code`](super::validate_promo_code) rejects.
    pub fn promo_code(&mut self, prefix: &str) -> String {
        let head = format!("{}-", prefix.to_uppercase());
        self.prefixed(&head, UPPER_ALPHANUMERIC, PROMO_SUFFIX_LEN)
    }

    /// Promo code with the default `PROMO` prefix.
    pub fn default_promo_code(&mut self) -> String {
        self.promo_code(DEFAULT_PROMO_PREFIX)
    }

    /// Generate a code of the given kind. Promo codes use the default prefix.
    pub fn generate(&mut self, kind: CodeKind) -> String {
        match kind {
            CodeKind::License => self.license_key(),
            CodeKind::Gift => self.gift_code(),
            CodeKind::Affiliate => self.affiliate_code(),
            CodeKind::Promo => self.default_promo_code(),
        }
    }

    fn prefixed(&mut self, prefix: &str, charset: &[u8], len: usize) -> String {
        let mut code = String::with_capacity(prefix.len() + len);
        code.push_str(prefix);
        self.push_random(&mut code, charset, len);
        code
    }

    fn push_random(&mut self, out: &mut String, charset: &[u8], len: usize) {
        for _ in 0..len {
            let idx = self.entropy.next_index(charset.len()) % charset.len();
            out.push(charset.get(idx).map_or('0', |&b| char::from(b)));
        }
    }
}

impl CodeGenerator<FastEntropy> {
    /// Generator over a freshly seeded [`FastEntropy`].
    #[must_use]
    pub fn fast() -> Self {
        Self::new(FastEntropy::new())
    }
}

/// Generate a license key with the default entropy source.
#[must_use]
pub fn generate_license_key() -> String {
    CodeGenerator::fast().license_key()
}

/// Generate a gift code with the default entropy source.
#[must_use]
pub fn generate_gift_code() -> String {
    CodeGenerator::fast().gift_code()
}

/// Generate an affiliate code with the default entropy source.
#[must_use]
pub fn generate_affiliate_code() -> String {
    CodeGenerator::fast().affiliate_code()
}

/// Generate a promo code with the default entropy source.
#[must_use]
pub fn generate_promo_code(prefix: &str) -> String {
    CodeGenerator::fast().promo_code(prefix)
}
