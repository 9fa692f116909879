//! Scanner Configuration
//!
//! Environment variables (plus a `.env` file) with sane defaults for every
//! knob. `main` applies CLI overrides on top and calls `validate()` before
//! the poll loop starts, so the loop can assume a well-formed setup.

use eyre::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================
// EXECUTION MODE
// ============================================

/// Execution mode determines what happens to a detected opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Finds and reports opportunities but never touches a wallet.
    /// Safe for monitoring.
    Simulation,

    /// Loads the keypair and routes the best opportunity to the executor.
    /// CAUTION: intended for live submission once the builder is wired up.
    Production,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Simulation
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Simulation => write!(f, "SIMULATION"),
            ExecutionMode::Production => write!(f, "PRODUCTION"),
        }
    }
}

// ============================================
// MAIN CONFIGURATION
// ============================================

/// Main configuration for the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// Solana JSON-RPC endpoint (used by the Lifinity fetcher)
    pub rpc_url: String,

    // ========== Scan Settings ==========
    /// Base asset the cycles start and end in; ticker or raw mint address
    pub base_token: String,

    /// Input amount (in base asset units) each simulation trades
    pub amount_in: Decimal,

    /// Minimum profit (in base asset units) for a cycle to qualify
    pub min_profit: Decimal,

    /// Seconds between scan ticks
    pub poll_interval_secs: u64,

    // ========== Execution Settings ==========
    /// Current execution mode
    pub execution_mode: ExecutionMode,

    /// Solana CLI keypair file (JSON array of 64 bytes)
    pub keypair_path: String,

    // ========== Pool Sources ==========
    /// Raydium V2 SDK liquidity file URL
    pub raydium_url: String,

    /// Lifinity program id; unset leaves the source disabled
    pub lifinity_program_id: Option<String>,

    // ========== Symbol Resolution ==========
    /// Solana Labs token list URL
    pub token_list_url: String,

    /// On-disk mint cache location
    pub mint_cache_path: String,

    /// Mint cache time-to-live in seconds
    pub mint_cache_ttl_secs: u64,

    // ========== Reporting ==========
    /// Append detected opportunities to a JSON-lines audit file
    pub audit_log: bool,

    /// Audit file location
    pub audit_log_path: String,
}

impl Config {
    /// Load configuration from environment variables and a `.env` file.
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            // Network
            rpc_url: env::var("SOLANA_RPC_URL")
                .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string()),

            // Scan
            base_token: env::var("BASE_TOKEN").unwrap_or_else(|_| "SOL".to_string()),
            amount_in: env::var("AMOUNT_IN")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(Decimal::TEN),
            min_profit: env::var("MIN_PROFIT")
                .unwrap_or_else(|_| "0.01".to_string())
                .parse()
                .unwrap_or_else(|_| Decimal::new(1, 2)),
            poll_interval_secs: env::var("POLL_INTERVAL")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            // Execution
            execution_mode: match env::var("EXECUTION_MODE")
                .unwrap_or_else(|_| "simulation".to_string())
                .to_lowercase()
                .as_str()
            {
                "production" => ExecutionMode::Production,
                _ => ExecutionMode::Simulation,
            },
            keypair_path: env::var("PRIVATE_KEY_PATH")
                .unwrap_or_else(|_| "~/.config/solana/id.json".to_string()),

            // Pool sources
            raydium_url: env::var("RAYDIUM_LIQUIDITY_URL").unwrap_or_else(|_| {
                "https://api.raydium.io/v2/sdk/liquidity/mainnet.json".to_string()
            }),
            lifinity_program_id: env::var("LIFINITY_PROGRAM_ID")
                .ok()
                .filter(|id| !id.is_empty()),

            // Symbol resolution
            token_list_url: env::var("TOKEN_LIST_URL").unwrap_or_else(|_| {
                "https://raw.githubusercontent.com/solana-labs/token-list/main/src/tokens/solana.tokenlist.json"
                    .to_string()
            }),
            mint_cache_path: env::var("MINT_CACHE_PATH")
                .unwrap_or_else(|_| "token_mints_cache.json".to_string()),
            mint_cache_ttl_secs: env::var("MINT_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86_400),

            // Reporting
            audit_log: env::var("AUDIT_LOG")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            audit_log_path: env::var("AUDIT_LOG_PATH")
                .unwrap_or_else(|_| "./logs/opportunities.log".to_string()),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration before the scan loop starts
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(eyre::eyre!("SOLANA_RPC_URL must not be empty"));
        }

        if self.amount_in <= Decimal::ZERO {
            return Err(eyre::eyre!(
                "AMOUNT_IN must be positive (currently {})",
                self.amount_in
            ));
        }

        // Production needs a loadable keypair; fail before the loop, not
        // at submission time.
        if self.execution_mode == ExecutionMode::Production
            && !expand_home(&self.keypair_path).exists()
        {
            return Err(eyre::eyre!(
                "Production mode requires a keypair file at {} (set PRIVATE_KEY_PATH)",
                self.keypair_path
            ));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║                 TRIDENT - CONFIGURATION                    ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Execution Mode:    {:^40} ║", self.execution_mode.to_string());
        println!("║ RPC URL:           {:^40} ║", fit(&self.rpc_url, 40));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ SCAN                                                       ║");
        println!("║ • Base Token:      {:^40} ║", fit(&self.base_token, 40));
        println!("║ • Amount In:       {:^40} ║", self.amount_in.to_string());
        println!("║ • Min Profit:      {:^40} ║", self.min_profit.to_string());
        println!("║ • Interval:        {:^40} ║", format!("{}s", self.poll_interval_secs));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ POOL SOURCES                                               ║");
        println!("║ • Raydium:         {:^40} ║", "✓ Enabled");
        println!(
            "║ • Lifinity:        {:^40} ║",
            match &self.lifinity_program_id {
                Some(id) => fit(id, 40),
                None => "✗ Disabled".to_string(),
            }
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ REPORTING                                                  ║");
        println!(
            "║ • Audit Log:       {:^40} ║",
            if self.audit_log {
                fit(&self.audit_log_path, 40)
            } else {
                "✗ Disabled".to_string()
            }
        );
        println!(
            "║ • Mint Cache TTL:  {:^40} ║",
            format!("{}h", self.mint_cache_ttl_secs / 3600)
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            base_token: "SOL".to_string(),
            amount_in: Decimal::TEN,
            min_profit: Decimal::new(1, 2),
            poll_interval_secs: 5,
            execution_mode: ExecutionMode::Simulation,
            keypair_path: "~/.config/solana/id.json".to_string(),
            raydium_url: "https://api.raydium.io/v2/sdk/liquidity/mainnet.json".to_string(),
            lifinity_program_id: None,
            token_list_url:
                "https://raw.githubusercontent.com/solana-labs/token-list/main/src/tokens/solana.tokenlist.json"
                    .to_string(),
            mint_cache_path: "token_mints_cache.json".to_string(),
            mint_cache_ttl_secs: 86_400,
            audit_log: true,
            audit_log_path: "./logs/opportunities.log".to_string(),
        }
    }
}

/// Clip long values (URLs, paths) so they fit a summary column.
fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let clipped: String = value.chars().take(width - 1).collect();
        format!("{}…", clipped)
    }
}

/// Expand a leading `~/` to the home directory. Paths without the prefix
/// (or environments without `HOME`) come back unchanged.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = env::var("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(path)
}

// ============================================
// OPPORTUNITY LOGGER
// ============================================

use chrono::{DateTime, Utc};
use std::io::Write;

/// One detected opportunity, as appended to the JSON-lines audit file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityLog {
    pub timestamp: DateTime<Utc>,
    pub path: [String; 4],
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub profit: Decimal,
}

impl OpportunityLog {
    /// Append this record to a file
    pub fn append_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let json = serde_json::to_string(self)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.execution_mode, ExecutionMode::Simulation);
        assert_eq!(config.amount_in, Decimal::TEN);
        assert_eq!(config.min_profit, "0.01".parse().unwrap());
        assert!(config.lifinity_program_id.is_none());
        assert!(config.audit_log);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nonpositive_amount() {
        let mut config = Config::default();

        config.amount_in = Decimal::ZERO;
        assert!(config.validate().is_err());

        config.amount_in = Decimal::from(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_rpc_url() {
        let mut config = Config::default();
        config.rpc_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_production_requires_keypair_file() {
        let mut config = Config::default();
        config.execution_mode = ExecutionMode::Production;
        config.keypair_path = "/definitely/not/here/id.json".to_string();
        assert!(config.validate().is_err());

        let path = std::env::temp_dir().join(format!(
            "trident_config_keypair_{}.json",
            std::process::id()
        ));
        fs::write(&path, "[]").unwrap();
        config.keypair_path = path.to_str().unwrap().to_string();
        assert!(config.validate().is_ok());

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ExecutionMode::Simulation.to_string(), "SIMULATION");
        assert_eq!(ExecutionMode::Production.to_string(), "PRODUCTION");
        assert_eq!(ExecutionMode::default(), ExecutionMode::Simulation);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "trident_config_{}.toml",
            std::process::id()
        ));

        let mut config = Config::default();
        config.base_token = "USDC".to_string();
        config.amount_in = "2.5".parse().unwrap();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.base_token, "USDC");
        assert_eq!(loaded.amount_in, "2.5".parse().unwrap());
        assert_eq!(loaded.execution_mode, ExecutionMode::Simulation);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_opportunity_log_appends_json_lines() {
        let path = std::env::temp_dir().join(format!(
            "trident_log_{}.jsonl",
            std::process::id()
        ));
        fs::remove_file(&path).ok();

        let record = OpportunityLog {
            timestamp: Utc::now(),
            path: [
                "BASE".to_string(),
                "AAA".to_string(),
                "BBB".to_string(),
                "BASE".to_string(),
            ],
            amount_in: Decimal::TEN,
            amount_out: "19.41".parse().unwrap(),
            profit: "9.41".parse().unwrap(),
        };

        record.append_to_file(&path).unwrap();
        record.append_to_file(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: OpportunityLog = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.path[1], "AAA");
        assert_eq!(parsed.amount_out, "19.41".parse().unwrap());

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("/absolute/path.json"),
            PathBuf::from("/absolute/path.json")
        );

        if let Ok(home) = env::var("HOME") {
            assert_eq!(
                expand_home("~/keys/id.json"),
                Path::new(&home).join("keys/id.json")
            );
        }
    }

    #[test]
    fn test_fit_clips_long_values() {
        assert_eq!(fit("short", 40), "short");
        let long = "x".repeat(50);
        let clipped = fit(&long, 40);
        assert_eq!(clipped.chars().count(), 40);
        assert!(clipped.ends_with('…'));
    }
}
