//! Symbol → Mint Directory
//!
//! Operators name the base asset by ticker ("SOL"); pools speak mint
//! addresses. The book maps one to the other using the Solana Labs token
//! list, cached on disk with a TTL so restarts don't re-download it.
//!
//! Loading is layered: fresh cache → network → stale cache → empty book.
//! `resolve` never fails - an unknown symbol passes through unchanged, so
//! a raw mint address is always a valid base token.

use eyre::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Timeout for the token list download
const FETCH_TIMEOUT_SECS: u64 = 20;

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ============================================
// CACHE FILE
// ============================================

/// On-disk shape: `{ "timestamp": <unix secs>, "token_mints": { symbol: mint } }`.
/// Wall-clock timestamp, not a monotonic instant - the cache outlives the
/// process.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    timestamp: u64,
    token_mints: HashMap<String, String>,
}

impl CacheFile {
    fn is_fresh(&self, ttl: Duration) -> bool {
        now_unix().saturating_sub(self.timestamp) < ttl.as_secs()
    }
}

// ============================================
// TOKEN LIST RESPONSE
// ============================================

#[derive(Debug, Deserialize)]
struct TokenList {
    tokens: Vec<TokenListEntry>,
}

#[derive(Debug, Deserialize)]
struct TokenListEntry {
    symbol: String,
    address: String,
}

// ============================================
// MINT BOOK
// ============================================

pub struct MintBook {
    http_client: Client,
    token_list_url: String,
    cache_path: PathBuf,
    cache_ttl: Duration,
    by_symbol: HashMap<String, String>,
}

impl MintBook {
    pub fn new(
        token_list_url: impl Into<String>,
        cache_path: impl Into<PathBuf>,
        cache_ttl_secs: u64,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            token_list_url: token_list_url.into(),
            cache_path: cache_path.into(),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            by_symbol: HashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.token_list_url.clone(),
            config.mint_cache_path.clone(),
            config.mint_cache_ttl_secs,
        )
    }

    /// Populate the book: fresh cache wins, otherwise refresh over the
    /// network, otherwise fall back to a stale cache, otherwise stay empty.
    /// Never an error - an empty book still resolves via passthrough.
    pub async fn load(&mut self) {
        let mut stale: Option<HashMap<String, String>> = None;

        match self.read_cache() {
            Ok(cache) if cache.is_fresh(self.cache_ttl) => {
                debug!(
                    "Mint cache is fresh: {} symbols from {}",
                    cache.token_mints.len(),
                    self.cache_path.display()
                );
                self.by_symbol = cache.token_mints;
                return;
            }
            Ok(cache) => {
                debug!("Mint cache expired, refreshing");
                stale = Some(cache.token_mints);
            }
            Err(e) => debug!("No usable mint cache ({}), refreshing", e),
        }

        match self.refresh().await {
            Ok(count) => info!("Token list refreshed: {} symbols", count),
            Err(e) => {
                warn!("Token list fetch failed: {}", e);
                match stale {
                    Some(map) => {
                        warn!("Falling back to stale mint cache ({} symbols)", map.len());
                        self.by_symbol = map;
                    }
                    None => warn!("No mint directory available; pass mint addresses directly"),
                }
            }
        }
    }

    /// Fetch the token list and rewrite the cache file. Failing to WRITE
    /// the cache is a warning, not an error - the in-memory book is fine.
    pub async fn refresh(&mut self) -> Result<usize> {
        debug!("Fetching token list from {}", self.token_list_url);

        let list: TokenList = self
            .http_client
            .get(&self.token_list_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.by_symbol = list
            .tokens
            .into_iter()
            .map(|token| (token.symbol, token.address))
            .collect();

        if let Err(e) = self.write_cache() {
            warn!(
                "Could not write mint cache to {}: {}",
                self.cache_path.display(),
                e
            );
        }

        Ok(self.by_symbol.len())
    }

    /// Known symbol → its mint; anything else → the query unchanged.
    pub fn resolve(&self, query: &str) -> String {
        self.by_symbol
            .get(query)
            .cloned()
            .unwrap_or_else(|| query.to_string())
    }

    /// Reverse lookup for display. Linear scan; only the report path uses it.
    pub fn symbol_for(&self, mint: &str) -> Option<&str> {
        self.by_symbol
            .iter()
            .find(|(_, known)| known.as_str() == mint)
            .map(|(symbol, _)| symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    fn read_cache(&self) -> Result<CacheFile> {
        let raw = fs::read_to_string(&self.cache_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_cache(&self) -> Result<()> {
        let cache = CacheFile {
            timestamp: now_unix(),
            token_mints: self.by_symbol.clone(),
        };
        fs::write(&self.cache_path, serde_json::to_string(&cache)?)?;
        Ok(())
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("trident_mints_{}_{}.json", tag, std::process::id()))
    }

    fn offline_book(cache_path: PathBuf) -> MintBook {
        // The .invalid TLD never resolves, so any accidental network hit
        // fails loudly instead of silently succeeding.
        MintBook::new("http://token-list.invalid/solana.json", cache_path, 3600)
    }

    #[test]
    fn test_resolve_known_symbol_and_passthrough() {
        let mut book = offline_book(temp_cache("resolve"));
        book.by_symbol.insert(
            "SOL".to_string(),
            "So11111111111111111111111111111111111111112".to_string(),
        );

        assert_eq!(
            book.resolve("SOL"),
            "So11111111111111111111111111111111111111112"
        );
        // Unknown symbols pass through so raw mints work as-is.
        assert_eq!(book.resolve("NotAToken"), "NotAToken");
        assert_eq!(book.len(), 1);
        assert!(!book.is_empty());
    }

    #[test]
    fn test_symbol_for_reverse_lookup() {
        let mut book = offline_book(temp_cache("reverse"));
        book.by_symbol
            .insert("RAY".to_string(), "RayMintAddress".to_string());

        assert_eq!(book.symbol_for("RayMintAddress"), Some("RAY"));
        assert_eq!(book.symbol_for("UnknownMint"), None);
    }

    #[test]
    fn test_cache_freshness_window() {
        let fresh = CacheFile {
            timestamp: now_unix(),
            token_mints: HashMap::new(),
        };
        let ancient = CacheFile {
            timestamp: 0,
            token_mints: HashMap::new(),
        };

        let ttl = Duration::from_secs(24 * 60 * 60);
        assert!(fresh.is_fresh(ttl));
        assert!(!ancient.is_fresh(ttl));
    }

    #[test]
    fn test_cache_file_round_trip() {
        let path = temp_cache("roundtrip");

        let mut writer = offline_book(path.clone());
        writer
            .by_symbol
            .insert("USDC".to_string(), "UsdcMintAddress".to_string());
        writer.write_cache().unwrap();

        let reader = offline_book(path.clone());
        let cache = reader.read_cache().unwrap();
        assert_eq!(
            cache.token_mints.get("USDC").map(String::as_str),
            Some("UsdcMintAddress")
        );
        assert!(cache.is_fresh(Duration::from_secs(60)));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_serves_fresh_cache_without_network() {
        let path = temp_cache("fresh_load");

        let mut writer = offline_book(path.clone());
        writer
            .by_symbol
            .insert("SOL".to_string(), "SolMintAddress".to_string());
        writer.write_cache().unwrap();

        // The unreachable URL proves load() never leaves the disk when the
        // cache is inside its TTL.
        let mut book = offline_book(path.clone());
        tokio_test::block_on(book.load());
        assert_eq!(book.resolve("SOL"), "SolMintAddress");

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_token_list_document_parses() {
        let raw = r#"{
            "name": "Solana Token List",
            "tokens": [
                { "chainId": 101, "address": "MintOne", "symbol": "ONE", "decimals": 9 },
                { "chainId": 101, "address": "MintTwo", "symbol": "TWO", "decimals": 6 }
            ]
        }"#;

        let list: TokenList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.tokens.len(), 2);
        assert_eq!(list.tokens[0].symbol, "ONE");
        assert_eq!(list.tokens[1].address, "MintTwo");
    }
}
