// Copyright (C) 2025 Agostinho Junior
// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversions between base units (wei) and human readable decimal amounts.

use anyhow::{Context, Result, bail, format_err};
use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigUint;
use std::str::FromStr;

pub const ETHER_DECIMALS: u32 = 18;

/// Formats a wei amount as ether, e.g. `1000000000000000000` as `"1.0"`.
pub fn format_ether(wei: &BigUint) -> String {
    format_units(wei, ETHER_DECIMALS)
}

/// Parses an ether amount into wei, e.g. `"1.0"` into `1000000000000000000`.
pub fn parse_ether(ether: &str) -> Result<BigUint> {
    parse_units(ether, ETHER_DECIMALS)
}

/// Formats `value` as a decimal number with `decimals` fractional digits.
///
/// Trailing fractional zeros are trimmed, but at least one fractional digit is always kept.
pub fn format_units(value: &BigUint, decimals: u32) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    let (whole, fraction) = if digits.len() > decimals {
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        (whole.to_string(), fraction.to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    };
    let fraction = match fraction.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    format!("{whole}.{fraction}")
}

/// Parses a decimal number into an integer amount of `10^-decimals` units.
///
/// Only the plain `digits[.digits]` form is accepted, exponent notation is rejected.
pub fn parse_units(value: &str, decimals: u32) -> Result<BigUint> {
    let trimmed = value.trim();
    if trimmed.starts_with('-') {
        bail!("Negative amount {value}");
    }
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if !is_digits(whole) || !is_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
        bail!("Invalid decimal amount {value}");
    }
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    let amount = BigDecimal::from_str(&format!("{whole}.{fraction}"))
        .with_context(|| format!("Invalid decimal amount {value}"))?;
    let (mantissa, scale) = amount.normalized().into_bigint_and_exponent();
    if scale > i64::from(decimals) {
        bail!("Amount {value} has more than {decimals} fractional digits");
    }
    let exponent = u32::try_from(i64::from(decimals) - scale)
        .with_context(|| format!("Amount {value} is out of range"))?;
    let mantissa = mantissa
        .to_biguint()
        .ok_or_else(|| format_err!("Negative amount {value}"))?;
    Ok(mantissa * BigUint::from(10u32).pow(exponent))
}

fn is_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}
