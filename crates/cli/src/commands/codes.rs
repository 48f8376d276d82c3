//! Code generation and format checks.

use mercato_core::codes::{
    CodeGenerator, CodeKind, EntropySource, FastEntropy, SecureEntropy, validate_license_key,
    validate_promo_code,
};
use tracing::{info, warn};

/// Print `count` codes of `kind`, one per line.
///
/// # Errors
///
/// Returns an error if `count` is zero.
pub fn generate(
    kind: CodeKind,
    prefix: Option<&str>,
    count: usize,
    secure: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if count == 0 {
        return Err("--count must be at least 1".into());
    }
    if prefix.is_some() && kind != CodeKind::Promo {
        warn!(%kind, "--prefix only applies to promo codes, ignoring");
    }

    let codes = if secure {
        emit(&mut CodeGenerator::new(SecureEntropy::new()), kind, prefix, count)
    } else {
        emit(&mut CodeGenerator::new(FastEntropy::new()), kind, prefix, count)
    };

    for code in &codes {
        println!("{code}");
    }
    info!(%kind, count, secure, "Generated codes");
    Ok(())
}

fn emit<E: EntropySource>(
    generator: &mut CodeGenerator<E>,
    kind: CodeKind,
    prefix: Option<&str>,
    count: usize,
) -> Vec<String> {
    (0..count)
        .map(|_| match (kind, prefix) {
            (CodeKind::Promo, Some(prefix)) => generator.promo_code(prefix),
            _ => generator.generate(kind),
        })
        .inspect(|code| {
            if kind == CodeKind::Promo && !validate_promo_code(code) {
                warn!(code = %code, "Prefix produces codes the promo validator rejects");
            }
        })
        .collect()
}

/// # Errors
///
/// Returns an error if `key` is not a well-formed license key.
pub fn validate_license(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    if validate_license_key(key) {
        println!("valid");
        Ok(())
    } else {
        Err(format!("Invalid license key: {key}").into())
    }
}

/// # Errors
///
/// Returns an error if `code` is not a well-formed promo code.
pub fn validate_promo(code: &str) -> Result<(), Box<dyn std::error::Error>> {
    if validate_promo_code(code) {
        println!("valid");
        Ok(())
    } else {
        Err(format!("Invalid promo code: {code}").into())
    }
}
