//! Cycle Search
//!
//! Enumerates every 3-hop cycle (base → X → Y → base) over a pool snapshot,
//! chaining the swap simulator across the hops, and keeps the cycles whose
//! final output beats the input by at least the profit threshold.
//!
//! The search returns EVERY qualifying cycle in pool iteration order -
//! no dedup, no best-of-K. Two parallel pools over the same pair each
//! produce their own result, and the caller decides what to do with them.
//! Each hop prices against the snapshot's reserves independently; earlier
//! hops never mutate what later hops see.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use super::swap::simulate_swap;
use crate::pools::Pool;

// ============================================
// OPPORTUNITY
// ============================================

/// A detected profitable cycle. Immutable value object, rebuilt from
/// scratch every scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    /// The four mints traversed; first and last are the base asset.
    pub path: [String; 4],

    /// Input amount the simulation used
    pub amount_in: Decimal,

    /// Output after three chained swaps
    pub amount_out: Decimal,

    /// `amount_out - amount_in`, at least `min_profit` by construction
    pub profit: Decimal,
}

impl Opportunity {
    /// Profit as a percentage of the input.
    pub fn profit_pct(&self) -> Decimal {
        if self.amount_in.is_zero() {
            return Decimal::ZERO;
        }
        self.profit / self.amount_in * Decimal::ONE_HUNDRED
    }

    /// Raw mint path joined for logging.
    pub fn route(&self) -> String {
        self.path.join(" → ")
    }
}

// ============================================
// POOL INDEX
// ============================================

/// Adjacency index: mint → every pool trading that mint on either side.
///
/// Per-mint lists keep snapshot order, and the search only ever does keyed
/// lookups (never iterates the map itself), so results are deterministic
/// for a deterministic input list.
pub struct PoolIndex<'a> {
    by_mint: HashMap<&'a str, Vec<&'a Pool>>,
}

impl<'a> PoolIndex<'a> {
    pub fn build(pools: &'a [Pool]) -> Self {
        let mut by_mint: HashMap<&'a str, Vec<&'a Pool>> = HashMap::new();
        for pool in pools {
            by_mint.entry(pool.mint_a.as_str()).or_default().push(pool);
            by_mint.entry(pool.mint_b.as_str()).or_default().push(pool);
        }
        Self { by_mint }
    }

    /// Pools trading `mint`, in snapshot order. Empty for unknown mints.
    pub fn pools_for(&self, mint: &str) -> &[&'a Pool] {
        self.by_mint.get(mint).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn mint_count(&self) -> usize {
        self.by_mint.len()
    }
}

// ============================================
// SEARCH
// ============================================

/// Find every 3-hop cycle through `pools` that starts and ends at
/// `base_mint` and returns at least `min_profit` more than `amount_in`.
///
/// Pure and synchronous: same snapshot in, same opportunities out, in the
/// same order.
pub fn find_opportunities(
    pools: &[Pool],
    base_mint: &str,
    amount_in: Decimal,
    min_profit: Decimal,
) -> Vec<Opportunity> {
    let index = PoolIndex::build(pools);
    let mut opportunities = Vec::new();

    for &p1 in index.pools_for(base_mint) {
        let Some(tok1) = p1.counter_mint(base_mint) else {
            continue;
        };
        let amt1 = simulate_swap(amount_in, p1, base_mint);
        if amt1 <= Decimal::ZERO {
            continue;
        }

        for &p2 in index.pools_for(tok1) {
            let Some(tok2) = p2.counter_mint(tok1) else {
                continue;
            };
            // A hop straight back to base is a 2-hop cycle, not ours.
            if tok2 == base_mint {
                continue;
            }
            let amt2 = simulate_swap(amt1, p2, tok1);
            if amt2 <= Decimal::ZERO {
                continue;
            }

            for &p3 in index.pools_for(tok2) {
                // The last hop has to land back on base.
                if !p3.touches(base_mint) {
                    continue;
                }
                let amt3 = simulate_swap(amt2, p3, tok2);
                let profit = amt3 - amount_in;
                if profit >= min_profit {
                    opportunities.push(Opportunity {
                        path: [
                            base_mint.to_string(),
                            tok1.to_string(),
                            tok2.to_string(),
                            base_mint.to_string(),
                        ],
                        amount_in,
                        amount_out: amt3,
                        profit,
                    });
                }
            }
        }
    }

    debug!(
        "Scanned {} pools across {} mints: {} qualifying cycles",
        pools.len(),
        index.mint_count(),
        opportunities.len()
    );

    opportunities
}

// ============================================
// TESTS
// ============================================
