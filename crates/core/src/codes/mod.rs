//! License, gift, promo and affiliate codes.
//!
//! Generation lives in [`generator`], format checks in [`validator`], and the
//! randomness behind both in [`entropy`].

pub mod entropy;
pub mod generator;
pub mod validator;

pub use entropy::{EntropySource, FastEntropy, SecureEntropy, SeededEntropy};
pub use generator::{
    CodeGenerator, CodeKind, generate_affiliate_code, generate_gift_code, generate_license_key,
    generate_promo_code,
};
pub use validator::{validate_license_key, validate_promo_code};
