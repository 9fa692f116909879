//! Swap Simulator
//!
//! Prices a hypothetical trade against one pool using the
//! constant-product formula with the fee debited up front:
//!
//! ```text
//! amount_after_fee = amount_in * (1 - fee_rate)
//! amount_out = (amount_after_fee * reserve_out) / (reserve_in + amount_after_fee)
//! ```
//!
//! Pure function, no state. All arithmetic is `Decimal` - three chained
//! swaps compound rounding, so binary floats are off the table.

use rust_decimal::Decimal;

use crate::pools::Pool;

/// Output amount for swapping `amount_in` of `input_mint` against `pool`.
///
/// Returns zero (never an error) when:
/// - `input_mint` is on neither side of the pool (no route through it)
/// - both the input reserve and the fee-adjusted input are zero (inert pool)
pub fn simulate_swap(amount_in: Decimal, pool: &Pool, input_mint: &str) -> Decimal {
    let (reserve_in, reserve_out) = if input_mint == pool.mint_a {
        (pool.reserve_a, pool.reserve_b)
    } else if input_mint == pool.mint_b {
        (pool.reserve_b, pool.reserve_a)
    } else {
        return Decimal::ZERO;
    };

    let amount_after_fee = amount_in * (Decimal::ONE - pool.fee_rate);

    // Zero denominator only when reserve_in and the adjusted input are both
    // zero; everything else divides cleanly.
    let denominator = reserve_in + amount_after_fee;
    if denominator.is_zero() {
        return Decimal::ZERO;
    }

    (amount_after_fee * reserve_out) / denominator
}
