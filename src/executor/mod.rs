//! The Executor
//!
//! Takes a detected opportunity and decides what "acting on it" means for
//! the configured mode:
//! - Simulation: log the route and append it to the audit trail. Safe.
//! - Production: verify a signer is present, then abort - route submission
//!   needs a swap-program transaction builder that is not wired up yet.
//!
//! ⚠️  Production mode is a scaffold on purpose. The abort is explicit so
//! nobody mistakes it for a working submission path.

mod signer;

pub use signer::Keypair;

use chrono::Utc;
use eyre::Result;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::config::{Config, ExecutionMode, OpportunityLog};
use crate::engine::Opportunity;

pub struct Executor {
    config: Config,
}

impl Executor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Act on one opportunity according to the configured execution mode.
    pub async fn execute(
        &self,
        opportunity: &Opportunity,
        signer: Option<&Keypair>,
    ) -> Result<ExecutionOutcome> {
        match self.config.execution_mode {
            ExecutionMode::Simulation => {
                info!(
                    "SIMULATION: {} | in {} out {} | profit {}",
                    opportunity.route(),
                    opportunity.amount_in,
                    opportunity.amount_out,
                    opportunity.profit
                );

                if self.config.audit_log {
                    self.append_audit_record(opportunity);
                }

                Ok(ExecutionOutcome::Simulated {
                    expected_profit: opportunity.profit,
                })
            }

            ExecutionMode::Production => {
                let Some(signer) = signer else {
                    return Ok(ExecutionOutcome::Aborted {
                        reason: "no keypair loaded".to_string(),
                    });
                };

                info!(
                    "PRODUCTION: would submit {} from signer {}",
                    opportunity.route(),
                    signer.pubkey_hex()
                );
                error!("Route submission requires a swap-program transaction builder");

                Ok(ExecutionOutcome::Aborted {
                    reason: "swap-program transaction builder not wired up - safety abort"
                        .to_string(),
                })
            }
        }
    }

    /// One JSON line per opportunity. A failed write is a warning - the
    /// audit trail is best-effort, the scan is not.
    fn append_audit_record(&self, opportunity: &Opportunity) {
        let record = OpportunityLog {
            timestamp: Utc::now(),
            path: opportunity.path.clone(),
            amount_in: opportunity.amount_in,
            amount_out: opportunity.amount_out,
            profit: opportunity.profit,
        };

        if let Err(e) = record.append_to_file(&self.config.audit_log_path) {
            warn!("Failed to append audit log: {}", e);
        }
    }
}

// ============================================
// OUTCOME
// ============================================

/// Result of one execution attempt.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// Simulation mode: logged, never submitted
    Simulated { expected_profit: Decimal },

    /// Reserved for when the transaction builder lands
    Submitted { signature: String },

    /// Stopped before submission (missing signer, unbuilt path)
    Aborted { reason: String },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Simulated { .. } | ExecutionOutcome::Submitted { .. }
        )
    }
}

// ============================================
// TESTS
// ============================================
