//! Quantity Calculator
//!
//! Converts the fixed USDT order size into a base-asset quantity.

use rust_decimal::Decimal;
use thiserror::Error;

/// Default decimal places for order quantities
pub const DEFAULT_QUANTITY_PRECISION: u32 = 3;

#[derive(Debug, Error, PartialEq)]
pub enum QuantityError {
    #[error("Price must be positive, got {0}")]
    InvalidPrice(Decimal),
    #[error("Order size must be positive, got {0}")]
    InvalidNominal(Decimal),
    #[error("Quantity for {nominal} at price {price} is out of range")]
    Overflow { nominal: Decimal, price: Decimal },
}

/// `nominal / price`, rounded half-to-even to `precision` decimal places.
///
/// The result may round down to zero for very expensive instruments; callers
/// reject that case instead of submitting an empty order. A price so small
/// that the quotient does not fit in a `Decimal` is `Overflow`.
pub fn calculate_quantity(
    nominal: Decimal,
    price: Decimal,
    precision: u32,
) -> Result<Decimal, QuantityError> {
    if price <= Decimal::ZERO {
        return Err(QuantityError::InvalidPrice(price));
    }
    if nominal <= Decimal::ZERO {
        return Err(QuantityError::InvalidNominal(nominal));
    }
    nominal
        .checked_div(price)
        .map(|qty| qty.round_dp(precision))
        .ok_or(QuantityError::Overflow { nominal, price })
}
