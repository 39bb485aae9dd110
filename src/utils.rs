//! Utilities for the deploy scripts.

use std::{
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TransactionReceipt, H256},
};
use tokio::time::sleep;

use crate::{
    constants::{CONFIRMATION_TIMEOUT_SECS, RECEIPT_POLL_INTERVAL_MS},
    errors::ScriptError,
};

/// Sets up the client with which all transactions are signed and submitted,
/// reading in the private key and RPC url from the CLI.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<Arc<impl Middleware>, ScriptError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = LocalWallet::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    let client = Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id),
    ));

    Ok(client)
}

/// Fetch the chain id the client is connected to
pub async fn chain_id(client: &Arc<impl Middleware>) -> Result<u64, ScriptError> {
    Ok(client
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64())
}

/// Parse a hex string into a chain address
pub fn parse_address(addr: &str) -> Result<Address, ScriptError> {
    Address::from_str(addr).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Poll the chain until the given transaction has reached the requested
/// confirmation depth, bounded by [`CONFIRMATION_TIMEOUT_SECS`].
///
/// This replaces guessing at block propagation with an observable condition:
/// the receipt must exist and the head must have advanced past its block.
pub async fn wait_for_confirmations(
    client: Arc<impl Middleware>,
    tx_hash: H256,
    confirmations: u64,
) -> Result<TransactionReceipt, ScriptError> {
    let deadline = Instant::now() + Duration::from_secs(CONFIRMATION_TIMEOUT_SECS);

    loop {
        let receipt = client
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if let Some(receipt) = receipt {
            if let Some(mined_in) = receipt.block_number {
                let head = client
                    .get_block_number()
                    .await
                    .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

                if head.as_u64().saturating_sub(mined_in.as_u64()) + 1 >= confirmations {
                    return Ok(receipt);
                }
            }
        }

        if Instant::now() >= deadline {
            return Err(ScriptError::ConfirmationTimeout(format!(
                "transaction {tx_hash:#x} not confirmed after {CONFIRMATION_TIMEOUT_SECS}s",
            )));
        }

        sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::parse_address;

    #[test]
    fn parse_address_accepts_prefixed_hex() {
        let addr = parse_address("0x00000000219ab540356cbb839cbe05303d7705fa").unwrap();
        assert_eq!(addr.as_bytes()[2], 0x00);
        assert_eq!(addr.as_bytes()[19], 0xfa);
    }

    #[test]
    fn parse_address_rejects_malformed_input() {
        assert!(parse_address("not-an-address").is_err());
        assert!(parse_address("0x1234").is_err());
    }
}
