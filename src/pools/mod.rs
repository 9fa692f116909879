//! Pool Ingest
//!
//! Everything that turns remote venue data into a `Vec<Pool>` snapshot:
//! - Raydium's V2 SDK liquidity file over HTTP
//! - Lifinity pool accounts over Solana JSON-RPC
//!
//! Sources are fetched concurrently and a failed source degrades to an
//! empty contribution - one venue being down never blanks the whole scan.

mod lifinity;
mod pool;
mod raydium;

pub use lifinity::{decode_pool_account, LifinityFetcher, POOL_ACCOUNT_LEN};
pub use pool::{Pool, PoolSource};
pub use raydium::RaydiumFetcher;

use futures::future;
use tracing::{error, info};

use crate::config::Config;

/// Assembles one pool snapshot per tick from the enabled venues.
pub struct SnapshotSource {
    raydium: RaydiumFetcher,
    lifinity: Option<LifinityFetcher>,
}

impl SnapshotSource {
    /// Raydium is always on; Lifinity only when a program id is configured.
    pub fn from_config(config: &Config) -> Self {
        let raydium = RaydiumFetcher::new(config.raydium_url.clone());
        let lifinity = config
            .lifinity_program_id
            .as_ref()
            .map(|program_id| LifinityFetcher::new(config.rpc_url.clone(), program_id.clone()));

        Self { raydium, lifinity }
    }

    pub fn lifinity_enabled(&self) -> bool {
        self.lifinity.is_some()
    }

    /// Fetch all enabled sources concurrently and concatenate the results,
    /// Raydium first. The concatenation order is what keeps engine output
    /// deterministic from one run to the next.
    pub async fn fetch_snapshot(&self) -> Vec<Pool> {
        let raydium_fut = self.raydium.fetch_pools();
        let lifinity_fut = async {
            match &self.lifinity {
                Some(fetcher) => fetcher.fetch_pools().await,
                None => Ok(Vec::new()),
            }
        };

        let (raydium, lifinity) = future::join(raydium_fut, lifinity_fut).await;

        let raydium = raydium.unwrap_or_else(|e| {
            error!("Raydium fetch failed, contributing no pools: {}", e);
            Vec::new()
        });
        let lifinity = lifinity.unwrap_or_else(|e| {
            error!("Lifinity fetch failed, contributing no pools: {}", e);
            Vec::new()
        });

        info!(
            "Snapshot assembled: {} Raydium + {} Lifinity pools",
            raydium.len(),
            lifinity.len()
        );

        let mut pools = raydium;
        pools.extend(lifinity);
        pools
    }
}

// ============================================
// TESTS
// ============================================
