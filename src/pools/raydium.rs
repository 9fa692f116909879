//! Raydium Liquidity Ingest
//!
//! Downloads the Raydium V2 SDK liquidity file - one large JSON document
//! with `official` and `unOfficial` pool arrays - and converts each entry
//! into a validated `Pool`. Entries are decoded individually so one
//! malformed record never sinks the batch; it gets skipped and counted.

use eyre::Result;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::pool::{Pool, PoolSource};

/// Timeout for the liquidity file download (tens of MB on mainnet)
const FETCH_TIMEOUT_SECS: u64 = 30;

// ============================================
// API RESPONSE TYPES
// ============================================

#[derive(Debug, Deserialize)]
struct LiquidityFile {
    #[serde(default)]
    official: Vec<Value>,

    #[serde(default, rename = "unOfficial")]
    unofficial: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiquidityEntry {
    base_mint: String,
    quote_mint: String,
    base_reserve: Decimal,
    quote_reserve: Decimal,
    #[serde(default)]
    lp_fee_rate: Option<Decimal>,
}

impl LiquidityEntry {
    fn into_pool(self) -> Result<Pool> {
        // lpFeeRate ships as a percentage; pricing wants a fraction.
        let fee_rate = self.lp_fee_rate.unwrap_or(Decimal::ZERO) / Decimal::ONE_HUNDRED;

        Pool::new(
            self.base_mint,
            self.quote_mint,
            self.base_reserve,
            self.quote_reserve,
            fee_rate,
            PoolSource::Raydium,
        )
    }
}

// ============================================
// FETCHER
// ============================================

pub struct RaydiumFetcher {
    http_client: Client,
    url: String,
}

impl RaydiumFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            url: url.into(),
        }
    }

    /// Download and parse the liquidity file.
    ///
    /// HTTP failures and a malformed top-level document are errors;
    /// individual bad entries are skipped inside `parse_liquidity_file`.
    pub async fn fetch_pools(&self) -> Result<Vec<Pool>> {
        debug!("Fetching Raydium liquidity file from {}", self.url);

        let file: LiquidityFile = self
            .http_client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_liquidity_file(file))
    }
}

/// Convert both arrays into validated pools, official entries first.
fn parse_liquidity_file(file: LiquidityFile) -> Vec<Pool> {
    let mut pools = Vec::new();
    let mut skipped = 0usize;

    for entry in file.official.into_iter().chain(file.unofficial) {
        let parsed: LiquidityEntry = match serde_json::from_value(entry) {
            Ok(parsed) => parsed,
            Err(e) => {
                skipped += 1;
                trace!("Unparsable Raydium entry: {}", e);
                continue;
            }
        };

        match parsed.into_pool() {
            Ok(pool) => pools.push(pool),
            Err(e) => {
                skipped += 1;
                trace!("Rejected Raydium pool: {}", e);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} unusable Raydium pool entries", skipped);
    }

    pools
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_official_entries_come_first() {
        let file = LiquidityFile {
            official: vec![json!({
                "baseMint": "SolMint", "quoteMint": "UsdcMint",
                "baseReserve": "1000", "quoteReserve": "150000",
                "lpFeeRate": "0.25"
            })],
            unofficial: vec![json!({
                "baseMint": "RayMint", "quoteMint": "SolMint",
                "baseReserve": "500", "quoteReserve": "80",
                "lpFeeRate": "0.25"
            })],
        };

        let pools = parse_liquidity_file(file);
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].mint_a, "SolMint");
        assert_eq!(pools[1].mint_a, "RayMint");
        assert_eq!(pools[0].source, PoolSource::Raydium);
    }

    #[test]
    fn test_fee_percentage_becomes_fraction() {
        let file = LiquidityFile {
            official: vec![json!({
                "baseMint": "A", "quoteMint": "B",
                "baseReserve": "1", "quoteReserve": "1",
                "lpFeeRate": "0.25"
            })],
            unofficial: vec![],
        };

        let pools = parse_liquidity_file(file);
        assert_eq!(pools[0].fee_rate, dec("0.0025"));
    }

    #[test]
    fn test_missing_fee_defaults_to_zero() {
        let file = LiquidityFile {
            official: vec![json!({
                "baseMint": "A", "quoteMint": "B",
                "baseReserve": "10", "quoteReserve": "10"
            })],
            unofficial: vec![],
        };

        let pools = parse_liquidity_file(file);
        assert_eq!(pools[0].fee_rate, Decimal::ZERO);
    }

    #[test]
    fn test_bad_entries_skipped_not_fatal() {
        let file = LiquidityFile {
            official: vec![
                // missing quoteMint
                json!({ "baseMint": "A", "baseReserve": "1", "quoteReserve": "1" }),
                // self-trading pair, rejected by Pool::new
                json!({
                    "baseMint": "A", "quoteMint": "A",
                    "baseReserve": "1", "quoteReserve": "1"
                }),
                json!({
                    "baseMint": "A", "quoteMint": "B",
                    "baseReserve": "1", "quoteReserve": "1"
                }),
            ],
            unofficial: vec![],
        };

        let pools = parse_liquidity_file(file);
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].mint_b, "B");
    }

    #[test]
    fn test_reserves_accept_strings_and_numbers() {
        let file = LiquidityFile {
            official: vec![json!({
                "baseMint": "A", "quoteMint": "B",
                "baseReserve": 1000, "quoteReserve": "2500.75"
            })],
            unofficial: vec![],
        };

        let pools = parse_liquidity_file(file);
        assert_eq!(pools[0].reserve_a, Decimal::from(1000));
        assert_eq!(pools[0].reserve_b, dec("2500.75"));
    }

    #[test]
    fn test_wrapper_field_names_match_api() {
        let raw = r#"{
            "official": [],
            "unOfficial": [{
                "baseMint": "A", "quoteMint": "B",
                "baseReserve": "5", "quoteReserve": "5"
            }]
        }"#;

        let file: LiquidityFile = serde_json::from_str(raw).unwrap();
        let pools = parse_liquidity_file(file);
        assert_eq!(pools.len(), 1);
    }
}
