//! Lifinity On-Chain Ingest
//!
//! Lifinity pools are read straight from the chain: a `getProgramAccounts`
//! JSON-RPC call returns every account owned by the program, and each
//! account's raw data is decoded from a fixed 88-byte layout:
//!
//! ```text
//! offset  0..32   token A mint (raw bytes, hex-encoded here)
//! offset 32..64   token B mint
//! offset 64..72   reserve A (u64, little-endian)
//! offset 72..80   reserve B (u64, little-endian)
//! offset 80..88   fee in parts-per-million (u64, little-endian)
//! ```
//!
//! Accounts that do not fit the layout (or fail pool validation) are
//! skipped individually, same policy as the Raydium ingest.

use base64::{engine::general_purpose::STANDARD, Engine};
use eyre::{eyre, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::pool::{Pool, PoolSource};

/// Fixed size of a Lifinity pool account
pub const POOL_ACCOUNT_LEN: usize = 88;

/// Timeout for the getProgramAccounts call
const RPC_TIMEOUT_SECS: u64 = 15;

/// Fee field denominator: the account stores parts-per-million
const FEE_DENOMINATOR: u64 = 1_000_000;

// ============================================
// ACCOUNT DECODING
// ============================================

/// Decode one raw pool account into a validated `Pool`.
///
/// Garbage accounts mostly reject themselves: all-zero data produces two
/// identical mints, and an oversized fee field lands outside [0, 1).
pub fn decode_pool_account(data: &[u8]) -> Result<Pool> {
    if data.len() < POOL_ACCOUNT_LEN {
        return Err(eyre!(
            "pool account holds {} bytes, expected {}",
            data.len(),
            POOL_ACCOUNT_LEN
        ));
    }

    let mint_a = hex::encode(&data[0..32]);
    let mint_b = hex::encode(&data[32..64]);

    let reserve_a = u64::from_le_bytes(data[64..72].try_into()?);
    let reserve_b = u64::from_le_bytes(data[72..80].try_into()?);
    let fee_raw = u64::from_le_bytes(data[80..88].try_into()?);

    let fee_rate = Decimal::from(fee_raw) / Decimal::from(FEE_DENOMINATOR);

    Pool::new(
        mint_a,
        mint_b,
        Decimal::from(reserve_a),
        Decimal::from(reserve_b),
        fee_rate,
        PoolSource::Lifinity,
    )
}

/// Pull the base64 payload out of one RPC account entry and decode it.
fn decode_account_entry(entry: &Value) -> Result<Pool> {
    let encoded = entry
        .get("account")
        .and_then(|account| account.get("data"))
        .and_then(|data| data.get(0))
        .and_then(Value::as_str)
        .ok_or_else(|| eyre!("account entry carries no base64 data"))?;

    let data = STANDARD.decode(encoded)?;
    decode_pool_account(&data)
}

// ============================================
// FETCHER
// ============================================

pub struct LifinityFetcher {
    http_client: Client,
    rpc_url: String,
    program_id: String,
}

impl LifinityFetcher {
    pub fn new(rpc_url: impl Into<String>, program_id: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(RPC_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            rpc_url: rpc_url.into(),
            program_id: program_id.into(),
        }
    }

    /// Fetch every program account and decode the ones shaped like pools.
    pub async fn fetch_pools(&self) -> Result<Vec<Pool>> {
        debug!(
            "Fetching Lifinity program accounts for {} via {}",
            self.program_id, self.rpc_url
        );

        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getProgramAccounts",
            "params": [
                self.program_id,
                { "encoding": "base64" }
            ]
        });

        let response: Value = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.get("error") {
            return Err(eyre!("getProgramAccounts failed: {}", error));
        }

        let accounts = response
            .get("result")
            .and_then(Value::as_array)
            .ok_or_else(|| eyre!("getProgramAccounts response has no result array"))?;

        let mut pools = Vec::new();
        let mut skipped = 0usize;

        for account in accounts {
            match decode_account_entry(account) {
                Ok(pool) => pools.push(pool),
                Err(e) => {
                    skipped += 1;
                    trace!("Skipping Lifinity account: {}", e);
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} undecodable Lifinity accounts", skipped);
        }

        Ok(pools)
    }
}

// ============================================
// TESTS
// ============================================
