//! Preflight tool - Check scanner setup before the first run
//!
//! Run with: cargo run --bin diagnose

use std::env;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = env::var("HOME") {
            return format!("{}/{}", home, rest);
        }
    }
    path.to_string()
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let prefix: String = value.chars().take(width - 3).collect();
        format!("{}...", prefix)
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() {
    println!("🔍 TRIDENT PREFLIGHT CHECK\n");

    // Load .env
    let env_file = dotenvy::dotenv().is_ok();

    let mut passed = 0u32;
    let mut warnings = 0u32;
    let mut failures = 0u32;

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    if env_file {
        println!("  .env file: found\n");
    } else {
        println!("  .env file: not found (defaults and shell env apply)\n");
    }

    // Key settings
    let checks = [
        ("EXECUTION_MODE", "simulation", "What mode are we in?"),
        ("BASE_TOKEN", "SOL", "Asset the cycles start and end in"),
        ("AMOUNT_IN", "10", "Input amount per simulated cycle"),
        ("MIN_PROFIT", "0.01", "Minimum profit threshold"),
        ("POLL_INTERVAL", "5", "Seconds between scan ticks"),
        ("AUDIT_LOG", "true", "Log detected opportunities?"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let is_default = env::var(key).is_err();
        let marker = if is_default { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    // RPC check
    let rpc = env::var("SOLANA_RPC_URL")
        .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string());
    println!("  SOLANA_RPC_URL: {}", clip(&rpc, 50));
    if rpc.starts_with("http://") || rpc.starts_with("https://") {
        println!("    └─ ✅ Looks like a URL\n");
        passed += 1;
    } else {
        println!("    └─ ❌ Does not look like a URL\n");
        failures += 1;
    }

    let mode = env::var("EXECUTION_MODE").unwrap_or_else(|_| "simulation".to_string());
    let is_production = mode.to_lowercase() == "production";

    // Wallet check
    println!("═══════════════════════════════════════════════════");
    println!("                      WALLET                        ");
    println!("═══════════════════════════════════════════════════\n");

    let keypair_path = env::var("PRIVATE_KEY_PATH")
        .unwrap_or_else(|_| "~/.config/solana/id.json".to_string());
    let expanded = expand_home(&keypair_path);
    println!("  PRIVATE_KEY_PATH: {}", keypair_path);

    match fs::read_to_string(&expanded) {
        Ok(contents) => match serde_json::from_str::<serde_json::Value>(&contents) {
            Ok(serde_json::Value::Array(items)) if items.len() == 64 => {
                println!("    └─ ✅ Keypair file is a 64-byte JSON array\n");
                passed += 1;
            }
            Ok(serde_json::Value::Array(items)) => {
                println!(
                    "    └─ ❌ Keypair array has {} entries, expected 64\n",
                    items.len()
                );
                failures += 1;
            }
            Ok(_) => {
                println!("    └─ ❌ Keypair file is not a JSON array\n");
                failures += 1;
            }
            Err(e) => {
                println!("    └─ ❌ Keypair file is not valid JSON: {}\n", e);
                failures += 1;
            }
        },
        Err(_) => {
            if is_production {
                println!("    └─ ❌ File not found - production mode cannot start\n");
                failures += 1;
            } else {
                println!("    └─ ⚠️  File not found (fine in simulation mode)\n");
                warnings += 1;
            }
        }
    }

    // Mint cache check
    println!("═══════════════════════════════════════════════════");
    println!("                    MINT CACHE                      ");
    println!("═══════════════════════════════════════════════════\n");

    let cache_path = env::var("MINT_CACHE_PATH")
        .unwrap_or_else(|_| "token_mints_cache.json".to_string());
    let ttl_secs: u64 = env::var("MINT_CACHE_TTL_SECS")
        .unwrap_or_else(|_| "86400".to_string())
        .parse()
        .unwrap_or(86_400);

    println!("  MINT_CACHE_PATH: {}", cache_path);
    if Path::new(&cache_path).exists() {
        let timestamp = fs::read_to_string(&cache_path)
            .ok()
            .and_then(|contents| serde_json::from_str::<serde_json::Value>(&contents).ok())
            .and_then(|value| value.get("timestamp").and_then(|t| t.as_u64()));

        match timestamp {
            Some(timestamp) => {
                let age = now_unix().saturating_sub(timestamp);
                if age < ttl_secs {
                    println!("    └─ ✅ Cache is fresh ({}h old, TTL {}h)\n", age / 3600, ttl_secs / 3600);
                    passed += 1;
                } else {
                    println!("    └─ ⚠️  Cache is stale ({}h old) - next run refetches\n", age / 3600);
                    warnings += 1;
                }
            }
            None => {
                println!("    └─ ⚠️  Cache exists but has no timestamp - next run refetches\n");
                warnings += 1;
            }
        }
    } else {
        println!("    └─ ⚠️  No cache yet - first run fetches the token list\n");
        warnings += 1;
    }

    // Mode status
    println!("═══════════════════════════════════════════════════");
    println!("                     STATUS                         ");
    println!("═══════════════════════════════════════════════════\n");

    match mode.to_lowercase().as_str() {
        "simulation" => {
            println!("  📋 SIMULATION MODE");
            println!("     → Scanner reports opportunities but does NOT execute");
            println!("     → Wallet: NOT loaded");
            println!("     → Your money: SAFE");
        }
        "production" => {
            println!("  🚀 PRODUCTION MODE");
            println!("     → Scanner routes the best cycle to the executor!");
            println!("     → Wallet: loaded at startup");
            println!("     → Your money: AT RISK once submission is wired up");
        }
        _ => {
            println!("  ❓ Unknown mode: {} (treated as simulation)", mode);
        }
    }

    // Summary
    println!("\n═══════════════════════════════════════════════════");
    println!("                     SUMMARY                        ");
    println!("═══════════════════════════════════════════════════\n");

    println!("  ✅ Passed:   {}", passed);
    println!("  ⚠️  Warnings: {}", warnings);
    println!("  ❌ Failures: {}", failures);

    if failures > 0 {
        println!("\n❌ Preflight failed - fix the items above before running.\n");
        std::process::exit(1);
    }

    println!("\n✅ Preflight complete!\n");
}
