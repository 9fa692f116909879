//! Pool Model
//!
//! A fixed-shape, validated record of one liquidity venue. Producers
//! (the Raydium and Lifinity fetchers) construct pools through `Pool::new`
//! and drop anything it rejects, so the search engine never has to
//! re-validate what it iterates.

use eyre::{eyre, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================
// POOL SOURCE
// ============================================

/// Which venue produced a pool record. Informational only - pricing never
/// looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolSource {
    Raydium,
    Lifinity,
}

impl std::fmt::Display for PoolSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolSource::Raydium => write!(f, "Raydium"),
            PoolSource::Lifinity => write!(f, "Lifinity"),
        }
    }
}

// ============================================
// POOL
// ============================================

/// A liquidity pool trading exactly two assets under constant-product
/// pricing.
///
/// Invariants (enforced by `new`):
/// - `mint_a != mint_b`
/// - both reserves are non-negative (zero reserves leave the pool inert,
///   never a divide-by-zero)
/// - `fee_rate` is in `[0, 1)`
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    /// Canonical mint address of side A
    pub mint_a: String,

    /// Canonical mint address of side B
    pub mint_b: String,

    /// Current holdings of side A
    pub reserve_a: Decimal,

    /// Current holdings of side B
    pub reserve_b: Decimal,

    /// Fraction of input taken as fee on every swap
    pub fee_rate: Decimal,

    /// Venue that produced this record
    pub source: PoolSource,
}

impl Pool {
    /// Build a pool, rejecting malformed records at the boundary.
    pub fn new(
        mint_a: String,
        mint_b: String,
        reserve_a: Decimal,
        reserve_b: Decimal,
        fee_rate: Decimal,
        source: PoolSource,
    ) -> Result<Self> {
        if mint_a == mint_b {
            return Err(eyre!("pool trades {} against itself", mint_a));
        }
        if reserve_a < Decimal::ZERO || reserve_b < Decimal::ZERO {
            return Err(eyre!(
                "negative reserves: {} / {}",
                reserve_a,
                reserve_b
            ));
        }
        if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
            return Err(eyre!("fee rate {} outside [0, 1)", fee_rate));
        }

        Ok(Self {
            mint_a,
            mint_b,
            reserve_a,
            reserve_b,
            fee_rate,
            source,
        })
    }

    /// Does this pool trade the given mint on either side?
    pub fn touches(&self, mint: &str) -> bool {
        mint == self.mint_a || mint == self.mint_b
    }

    /// The mint on the opposite side from `mint`, or `None` if the pool
    /// doesn't trade it.
    pub fn counter_mint(&self, mint: &str) -> Option<&str> {
        if mint == self.mint_a {
            Some(&self.mint_b)
        } else if mint == self.mint_b {
            Some(&self.mint_a)
        } else {
            None
        }
    }
}

// ============================================
// TESTS
// ============================================
