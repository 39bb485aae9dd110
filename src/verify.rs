//! Explorer source verification for deployed contracts.
//!
//! Verification replays the exact constructor arguments recorded at deploy
//! time; the explorer rejects a submission whose arguments differ from the
//! ones on chain. Submission and status polling both run under a bounded
//! exponential backoff rather than a single fixed delay.

use std::time::Duration;

use ethers::etherscan::{verify::VerifyContract, Client};
use tokio::time::sleep;
use tracing::info;

use crate::{
    constants::{
        ALREADY_VERIFIED_MARKER, NOT_YET_INDEXED_MARKER, OPTIMIZER_ENABLED, OPTIMIZER_RUNS,
        SOLC_VERSION, VERIFICATION_PASS_STATUS, VERIFICATION_PENDING_STATUS,
    },
    errors::ScriptError,
    ledger::LedgerEntry,
    types::ContractKind,
};

/// Bounded exponential backoff between explorer polling attempts
#[derive(Copy, Clone, Debug)]
pub struct RetryPolicy {
    /// Maximum number of attempts before giving up
    pub max_attempts: u32,
    /// Delay before the first retry, in seconds
    pub min_delay_secs: u64,
    /// Multiplicative factor applied to the delay on each attempt
    pub backoff_factor: u32,
    /// Ceiling on the delay, in seconds
    pub max_delay_secs: u64,
}

impl RetryPolicy {
    /// The delay preceding the given zero-indexed attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = (self.backoff_factor as u64).saturating_pow(attempt);
        let secs = self
            .min_delay_secs
            .saturating_mul(factor)
            .min(self.max_delay_secs);

        Duration::from_secs(secs)
    }
}

/// Submit a contract for verification and poll the explorer until it
/// reports a terminal result
pub async fn verify_contract(
    explorer: &Client,
    contract: ContractKind,
    entry: &LedgerEntry,
    source: String,
    policy: RetryPolicy,
) -> Result<(), ScriptError> {
    let guid = match submit_with_retry(explorer, contract, entry, source, policy).await? {
        Some(guid) => guid,
        // Nothing to poll, the explorer had the source from an earlier run
        None => {
            info!("{} source already verified", contract);
            return Ok(());
        }
    };

    await_verification(explorer, contract, &guid, policy).await
}

/// Submit the verification request, retrying while the explorer has not yet
/// indexed the deployment.
///
/// Returns the polling GUID, or `None` if the source was already verified.
async fn submit_with_retry(
    explorer: &Client,
    contract: ContractKind,
    entry: &LedgerEntry,
    source: String,
    policy: RetryPolicy,
) -> Result<Option<String>, ScriptError> {
    let constructor_args = if entry.constructor_args.is_empty() {
        None
    } else {
        Some(entry.constructor_args.clone())
    };

    let request = VerifyContract::new(
        entry.address,
        contract.solidity_name().to_string(),
        source,
        SOLC_VERSION.to_string(),
    )
    .constructor_arguments(constructor_args)
    .optimization(OPTIMIZER_ENABLED)
    .runs(OPTIMIZER_RUNS);

    for attempt in 0..policy.max_attempts {
        match explorer.submit_contract_verification(&request).await {
            Ok(resp) if resp.result.contains(ALREADY_VERIFIED_MARKER) => return Ok(None),
            Ok(resp) if resp.result.contains(NOT_YET_INDEXED_MARKER) => {}
            Ok(resp) if resp.status == "1" => return Ok(Some(resp.result)),
            Ok(resp) => {
                return Err(ScriptError::Verification(format!(
                    "explorer rejected {} submission: {}",
                    contract, resp.result,
                )))
            }
            Err(e) => {
                let msg = e.to_string();
                if msg.contains(ALREADY_VERIFIED_MARKER) {
                    return Ok(None);
                }
                if !msg.contains(NOT_YET_INDEXED_MARKER) {
                    return Err(ScriptError::Verification(msg));
                }
            }
        }

        info!(
            "{} bytecode not indexed yet, retrying submission",
            contract
        );
        sleep(policy.delay(attempt)).await;
    }

    Err(ScriptError::Verification(format!(
        "{} submission not accepted after {} attempts",
        contract, policy.max_attempts,
    )))
}

/// Poll the explorer for the result of a submitted verification
async fn await_verification(
    explorer: &Client,
    contract: ContractKind,
    guid: &str,
    policy: RetryPolicy,
) -> Result<(), ScriptError> {
    for attempt in 0..policy.max_attempts {
        sleep(policy.delay(attempt)).await;

        match explorer.check_contract_verification_status(guid).await {
            Ok(resp) if resp.result == VERIFICATION_PASS_STATUS => {
                info!("{} source verified", contract);
                return Ok(());
            }
            Ok(resp) if resp.result.starts_with("Fail") => {
                return Err(ScriptError::Verification(format!(
                    "explorer rejected {}: {}",
                    contract, resp.result,
                )))
            }
            Ok(resp) => {
                info!("{} verification status: {}", contract, resp.result);
            }
            Err(e) => {
                let msg = e.to_string();
                if !msg.contains(VERIFICATION_PENDING_STATUS) {
                    return Err(ScriptError::Verification(msg));
                }
                info!("{} verification pending", contract);
            }
        }
    }

    Err(ScriptError::Verification(format!(
        "{} verification still pending after {} attempts",
        contract, policy.max_attempts,
    )))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RetryPolicy;

    /// The policy exercised by the schedule tests
    const POLICY: RetryPolicy = RetryPolicy {
        max_attempts: 10,
        min_delay_secs: 5,
        backoff_factor: 2,
        max_delay_secs: 60,
    };

    #[test]
    fn first_delay_is_the_minimum() {
        assert_eq!(POLICY.delay(0), Duration::from_secs(5));
    }

    #[test]
    fn delays_grow_by_the_backoff_factor() {
        assert_eq!(POLICY.delay(1), Duration::from_secs(10));
        assert_eq!(POLICY.delay(2), Duration::from_secs(20));
        assert_eq!(POLICY.delay(3), Duration::from_secs(40));
    }

    #[test]
    fn delays_are_capped_at_the_maximum() {
        assert_eq!(POLICY.delay(4), Duration::from_secs(60));
        assert_eq!(POLICY.delay(63), Duration::from_secs(60));
        // Large exponents must not overflow the schedule
        assert_eq!(POLICY.delay(u32::MAX), Duration::from_secs(60));
    }
}
