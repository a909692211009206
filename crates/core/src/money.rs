//! # Money Module
//!
//! The single rounding rule of Minibank lives here.
//!
//! - Money values carry at most two decimal places (kopecks).
//! - Operation inputs with more precision are rejected, never rounded.
//! - Derived values (interest, amortization lines, yield projections) are
//!   computed at full `Decimal` precision and rounded with [`round_money`]
//!   only when reported.
//! - Rounding is half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// The one currency the bank operates in.
pub const CURRENCY_CODE: &str = "RUB";

/// Display symbol for [`CURRENCY_CODE`].
pub const CURRENCY_SYMBOL: &str = "₽";

/// Number of decimal places a money value may carry.
pub const MONEY_SCALE: u32 = 2;

/// Rounding strategy used for every reported money value.
pub const MONEY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Round a value to money precision.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, MONEY_ROUNDING)
}

/// True if the value has no digits below the smallest currency unit.
pub fn is_cent_exact(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

/// Format with thousands separators and two decimals: `-1,234.50`.
pub fn format_money(value: Decimal) -> String {
    let rounded = round_money(value);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Like [`format_money`] but positive values get an explicit `+`.
pub fn format_signed(value: Decimal) -> String {
    if round_money(value) > Decimal::ZERO {
        format!("+{}", format_money(value))
    } else {
        format_money(value)
    }
}
