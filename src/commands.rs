//! Implementations of the deploy and verify commands.
//!
//! Each deploy command covers one contract group and calls its factories in
//! strict dependency order; a dependent contract's factory always receives
//! the addresses produced by its predecessors, never a placeholder. The
//! first failure aborts the remaining sequence.

use std::{fs, path::Path, sync::Arc};

use ethers::{
    etherscan::Client as EtherscanClient,
    providers::Middleware,
    types::{Chain, I256},
};
use tracing::info;

use crate::{
    cli::{DeployCoreArgs, DeployMocksArgs, DeployOptionsArgs, VerifyArgs},
    errors::ScriptError,
    factories,
    ledger::Ledger,
    mocks,
    types::{ContractKind, ContractStatus, VERIFIABLE_CONTRACTS},
    utils::{chain_id, parse_address, wait_for_confirmations},
    verify::{verify_contract, RetryPolicy},
};

/// Deploy the core token group: Token, then its Treasurer, then the yield
/// module over both
pub async fn deploy_core(
    args: DeployCoreArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain = chain_id(&client).await?;
    let mut ledger = Ledger::load(deployments_path, chain)?;

    let token = ledger
        .get_or_deploy(deployments_path, ContractKind::Token, || {
            factories::deploy_token(
                client.clone(),
                args.token_name.clone(),
                args.token_symbol.clone(),
            )
        })
        .await?;

    let treasurer = ledger
        .get_or_deploy(deployments_path, ContractKind::Treasurer, || async {
            let deployed = factories::deploy_treasurer(client.clone(), token).await?;
            // The token must know its treasurer before any reserves move
            factories::set_token_treasurer(client.clone(), token, deployed.address).await?;
            Ok(deployed)
        })
        .await?;

    let yield_module = ledger
        .get_or_deploy(deployments_path, ContractKind::Yield, || async {
            let deployed =
                factories::deploy_yield_module(client.clone(), token, treasurer).await?;
            factories::set_treasurer_yield_module(client.clone(), treasurer, deployed.address)
                .await?;
            Ok(deployed)
        })
        .await?;

    info!(
        "core group deployed: token={:#x} treasurer={:#x} yield={:#x}",
        token, treasurer, yield_module,
    );

    Ok(())
}

/// Deploy the stock option group: AccessRoles, then the option manager over
/// the core token, then the option contract itself.
///
/// The core group must already be deployed on the target network.
pub async fn deploy_options(
    args: DeployOptionsArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain = chain_id(&client).await?;
    let mut ledger = Ledger::load(deployments_path, chain)?;

    let token = match &args.token {
        Some(addr) => parse_address(addr)?,
        None => ledger.require(ContractKind::Token)?,
    };

    let roles = ledger
        .get_or_deploy(deployments_path, ContractKind::AccessRoles, || {
            factories::deploy_access_roles(client.clone())
        })
        .await?;

    let manager = ledger
        .get_or_deploy(
            deployments_path,
            ContractKind::StockOptionManager,
            || async {
                let deployed =
                    factories::deploy_stock_option_manager(client.clone(), token, roles).await?;
                factories::add_roles_manager(client.clone(), roles, deployed.address).await?;
                Ok(deployed)
            },
        )
        .await?;

    let option = ledger
        .get_or_deploy(deployments_path, ContractKind::StockOption, || {
            factories::deploy_stock_option(client.clone(), manager, token)
        })
        .await?;

    info!(
        "options group deployed: roles={:#x} manager={:#x} option={:#x}",
        roles, manager, option,
    );

    Ok(())
}

/// Deploy and program the mock contracts used on isolated test networks
pub async fn deploy_mocks(
    args: DeployMocksArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain = chain_id(&client).await?;
    let mut ledger = Ledger::load(deployments_path, chain)?;

    let price_feed = ledger
        .get_or_deploy(deployments_path, ContractKind::PriceFeedMock, || {
            mocks::deploy_price_feed_mock(client.clone())
        })
        .await?;
    // Programming the response is a separate step from deployment; it must
    // complete before any dependent contract reads the feed
    mocks::set_latest_answer(client.clone(), price_feed, I256::from(args.initial_answer)).await?;

    let badge_checker = ledger
        .get_or_deploy(deployments_path, ContractKind::BadgeCheckerMock, || {
            mocks::deploy_badge_checker_mock(client.clone())
        })
        .await?;
    mocks::set_badge_result(client.clone(), badge_checker, args.badge_result).await?;

    info!(
        "mocks deployed: price-feed={:#x} badge-checker={:#x}",
        price_feed, badge_checker,
    );

    Ok(())
}

/// Verify deployed contracts' source on the chain explorer
pub async fn verify(
    args: VerifyArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let chain = chain_id(&client).await?;
    let mut ledger = Ledger::load(deployments_path, chain)?;

    let explorer_chain =
        Chain::try_from(chain).map_err(|e| ScriptError::Verification(e.to_string()))?;
    let explorer = EtherscanClient::new(explorer_chain, args.api_key.clone())
        .map_err(|e| ScriptError::Verification(e.to_string()))?;

    let policy = RetryPolicy {
        max_attempts: args.max_attempts,
        min_delay_secs: args.min_retry_delay,
        backoff_factor: args.backoff_factor,
        max_delay_secs: args.max_retry_delay,
    };

    let targets: Vec<ContractKind> = match args.contract {
        Some(contract) => vec![contract],
        None => VERIFIABLE_CONTRACTS.to_vec(),
    };

    for contract in targets {
        if contract.is_mock() {
            return Err(ScriptError::Verification(format!(
                "{} is a test-only mock and is never verified",
                contract,
            )));
        }

        let entry = match ledger.get(contract) {
            Some(entry) => entry.clone(),
            None if args.contract.is_some() => {
                return Err(ScriptError::DependencyResolution(format!(
                    "{} is not deployed on chain {}",
                    contract, chain,
                )))
            }
            None => continue,
        };

        if entry.status == ContractStatus::Verified {
            info!("{} already verified, skipping", contract);
            continue;
        }

        // The explorer cannot index a deployment before it is confirmed
        wait_for_confirmations(client.clone(), entry.tx_hash, args.confirmations).await?;

        let source_path =
            Path::new(&args.sources_dir).join(format!("{}.sol", contract.solidity_name()));
        let source = fs::read_to_string(&source_path).map_err(|e| {
            ScriptError::Verification(format!("reading {}: {}", source_path.display(), e))
        })?;

        verify_contract(&explorer, contract, &entry, source, policy).await?;

        ledger.mark_verified(contract)?;
        ledger.save(deployments_path)?;
    }

    Ok(())
}
