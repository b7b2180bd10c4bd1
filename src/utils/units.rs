use alloy::primitives::{
    U256,
    utils::{format_units, parse_units},
};
use anyhow::{Context, Result, anyhow};

/// Formats a raw token amount with `decimals` places, trimming trailing zeros.
pub fn format_token(value: U256, decimals: u8) -> String {
    match format_units(value, decimals) {
        Ok(formatted) if formatted.contains('.') => formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned(),
        Ok(formatted) => formatted,
        Err(_) => value.to_string(),
    }
}

/// Parses a human amount such as `"12.5"` into smallest units.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(amount.trim(), decimals)
        .with_context(|| format!("Invalid token amount '{amount}'"))?;
    if parsed.is_negative() {
        return Err(anyhow!("Token amount must not be negative"));
    }
    Ok(parsed.get_absolute())
}

/// Lossy float view of a token amount, for display-only fields.
pub fn token_to_f64(value: U256, decimals: u8) -> f64 {
    format_token(value, decimals).parse().unwrap_or(f64::NAN)
}
