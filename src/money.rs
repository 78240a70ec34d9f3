//! Monetary arithmetic. All amounts are `Decimal` with exactly two places.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub const SCALE: u32 = 2;

/// Largest amount a `decimal(10, 2)` money column can hold.
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);

/// Rounds half away from zero to two places and pins the scale, so `100`
/// renders as `"100.00"`.
pub fn to_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    to_money(unit_price * Decimal::from(quantity))
}

/// Whether `amount` fits the money columns.
pub fn is_storable(amount: Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}

/// Sum of `unit_price * quantity` over `lines`.
pub fn total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    to_money(
        lines
            .into_iter()
            .map(|(price, quantity)| line_total(price, quantity))
            .sum(),
    )
}
