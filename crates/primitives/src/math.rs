//! Widened fixed-point arithmetic
//!
//! Every ratio in the system (lock multipliers, escrow portions, pool
//! weights) is an integer scaled by a known base. Products are formed at
//! unbounded width so the intermediate `a * b` never overflows before the
//! division scales it back down.

use crate::constants::BASE;
use crate::errors::{Result, StakingError};
use crate::units::Amount;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// `n * mul / div`, truncating, narrowed back to `u128`.
///
/// Fails when `div == 0` or the quotient does not fit in `u128`.
pub fn mul_div(n: u128, mul: u128, div: u128) -> Result<u128> {
    if div == 0 {
        return Err(StakingError::ArithmeticOverflow("division by zero"));
    }
    if let Some(product) = n.checked_mul(mul) {
        return Ok(product / div);
    }

    let wide = BigUint::from(n) * BigUint::from(mul) / BigUint::from(div);
    wide.to_u128()
        .ok_or(StakingError::ArithmeticOverflow("mul_div quotient exceeds u128"))
}

/// Apply a `BASE`-scaled fraction to `amount`.
#[inline]
pub fn apply_fraction(amount: Amount, fraction: u128) -> Result<Amount> {
    mul_div(amount, fraction, BASE)
}
