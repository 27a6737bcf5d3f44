//! Checked decimal helpers shared by the calculators.
//!
//! `Decimal` panics on division by zero and on overflow, so every division
//! and every power goes through these helpers and surfaces a
//! [`CalculationError`] instead.

use rust_decimal::prelude::*;

use super::error::CalculationError;

/// Decimal places used for currency amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places used for percentages and rates.
pub const RATE_DP: u32 = 4;

/// Divides `lhs` by `rhs`.
pub(crate) fn div(
    lhs: Decimal,
    rhs: Decimal,
    context: &'static str,
) -> Result<Decimal, CalculationError> {
    if rhs.is_zero() {
        return Err(CalculationError::DivisionByZero { context });
    }
    lhs.checked_div(rhs)
        .ok_or(CalculationError::Overflow { context })
}

/// Multiplies `lhs` by `rhs`.
pub(crate) fn mul(
    lhs: Decimal,
    rhs: Decimal,
    context: &'static str,
) -> Result<Decimal, CalculationError> {
    lhs.checked_mul(rhs)
        .ok_or(CalculationError::Overflow { context })
}

/// Adds `rhs` to `lhs`.
pub(crate) fn add(
    lhs: Decimal,
    rhs: Decimal,
    context: &'static str,
) -> Result<Decimal, CalculationError> {
    lhs.checked_add(rhs)
        .ok_or(CalculationError::Overflow { context })
}

/// Subtracts `rhs` from `lhs`.
pub(crate) fn sub(
    lhs: Decimal,
    rhs: Decimal,
    context: &'static str,
) -> Result<Decimal, CalculationError> {
    lhs.checked_sub(rhs)
        .ok_or(CalculationError::Overflow { context })
}

/// Raises `base` to `exponent`.
///
/// Integral exponents use exact repeated multiplication; fractional ones
/// fall back to the series approximation of `powd`, which is only defined
/// for a non-negative base.
pub(crate) fn pow(
    base: Decimal,
    exponent: Decimal,
    context: &'static str,
) -> Result<Decimal, CalculationError> {
    let result = if exponent.fract().is_zero() {
        let exponent = exponent
            .to_i64()
            .ok_or(CalculationError::Overflow { context })?;
        if exponent < 0 && base.is_zero() {
            return Err(CalculationError::DivisionByZero { context });
        }
        base.checked_powi(exponent)
    } else {
        if base.is_sign_negative() && !base.is_zero() {
            return Err(CalculationError::NonReal { context });
        }
        base.checked_powd(exponent)
    };
    result.ok_or(CalculationError::Overflow { context })
}

/// Rounds a currency amount to cents.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Rounds a percentage or rate.
#[must_use]
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointNearestEven)
}

/// Formats an amount as Brazilian currency, e.g. `R$ 1.234,56`.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    let text = format!("{:.2}", round_money(amount).abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !round_money(amount).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{frac_part}")
}

/// Formats a percentage with two decimals and a comma, e.g. `6,00%`.
#[must_use]
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", round_money(rate)).replace('.', ",")
}

/// Splits `total` by percentages using the Largest Remainder Method.
///
/// The returned shares are rounded to `decimal_places` and always sum to
/// `total` rounded to the same precision. Negative totals are split by
/// magnitude and the sign is restored afterwards.
#[must_use]
pub fn allocate_by_percentages(
    total: Decimal,
    percentages: &[Decimal],
    decimal_places: u32,
) -> Vec<Decimal> {
    if percentages.is_empty() {
        return vec![];
    }
    if total.is_sign_negative() {
        return allocate_by_percentages(-total, percentages, decimal_places)
            .into_iter()
            .map(|share| -share)
            .collect();
    }

    let unit = Decimal::new(1, decimal_places);
    let total_rounded =
        total.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);

    let exact: Vec<Decimal> = percentages
        .iter()
        .map(|p| total_rounded * *p / Decimal::ONE_HUNDRED)
        .collect();

    let mut rounded: Vec<Decimal> = exact
        .iter()
        .map(|a| a.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero))
        .collect();

    let remainder = total_rounded - rounded.iter().copied().sum::<Decimal>();
    let units = (remainder / unit)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_usize()
        .unwrap_or(0);

    if units == 0 {
        return rounded;
    }

    let mut remainders: Vec<(usize, Decimal)> = exact
        .iter()
        .zip(rounded.iter())
        .enumerate()
        .map(|(i, (e, r))| (i, *e - *r))
        .collect();

    // Stable sort keeps display order among equal remainders.
    remainders.sort_by(|a, b| b.1.cmp(&a.1));

    for (idx, _) in remainders.iter().take(units) {
        rounded[*idx] += unit;
    }

    rounded
}
