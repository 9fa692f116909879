//! The Engine
//!
//! Responsible for:
//! - Pricing a single swap against a constant-product pool (pure math)
//! - Enumerating 3-hop cycles (base → X → Y → base) over a pool snapshot

mod search;
mod swap;

pub use search::{find_opportunities, Opportunity, PoolIndex};
pub use swap::simulate_swap;
