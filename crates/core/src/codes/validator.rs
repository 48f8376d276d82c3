//! Format-only code validation.
//!
//! These checks say nothing about whether a code was ever issued. They are
//! case-sensitive: normalize input to the generator's casing first.

use std::sync::LazyLock;

use regex::Regex;

static LICENSE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M94-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}$").expect("Invalid regex")
});

/// Any alphanumeric prefix and a 4-8 character suffix, so hand-entered and
/// legacy codes pass alongside generated ones.
static PROMO_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+-[A-Z0-9]{4,8}$").expect("Invalid regex"));

/// `true` iff `key` has the shape `M94-XXXX-XXXX-XXXX` with `X` in `[A-Z0-9]`.
#[must_use]
pub fn validate_license_key(key: &str) -> bool {
    LICENSE_KEY_RE.is_match(key)
}

/// `true` iff `code` is `PREFIX-SUFFIX` with an alphanumeric prefix and a
/// 4-8 character alphanumeric suffix.
#[must_use]
pub fn validate_promo_code(code: &str) -> bool {
    PROMO_CODE_RE.is_match(code)
}
