// Formatação de valores monetários para o wire format da Payop

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{PayopError, Result};

pub const AMOUNT_SCALE: u32 = 3;

fn to_wire_scale(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

/// Fixed-point rendering with exactly three fractional digits, `.` separator,
/// no grouping. Midpoints round away from zero. Amounts rejected by
/// [`ensure_valid_amount`] render with fewer digits.
pub fn format_amount(amount: Decimal) -> String {
    to_wire_scale(amount).to_string()
}

/// Rejects negative amounts and amounts too large to carry three fractional
/// digits (more than 25 integer digits).
pub fn ensure_valid_amount(amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PayopError::InvalidAmount(format!("{} is negative", amount)));
    }
    if to_wire_scale(amount).scale() != AMOUNT_SCALE {
        return Err(PayopError::InvalidAmount(format!("{} has too many integer digits", amount)));
    }
    Ok(amount)
}
