//! Factories for the stand-in contracts used on isolated test networks.
//!
//! A mock is deployed with no constructor arguments; programming its
//! responses is a separate, explicit step that must complete before any
//! dependent contract exercises the mock. The programmed value is returned
//! unchanged on every subsequent read.

use std::sync::Arc;

use ethers::{
    providers::Middleware,
    types::{Address, I256},
};
use tracing::log::warn;

use crate::{
    abis::{BadgeCheckerMockContract, PriceFeedMockContract},
    constants::{
        BADGE_CHECKER_MOCK_ABI, BADGE_CHECKER_MOCK_BYTECODE, PRICE_FEED_MOCK_ABI,
        PRICE_FEED_MOCK_BYTECODE,
    },
    errors::ScriptError,
    factories::deploy_from_artifacts,
    types::{ContractKind, DeployedContract},
};

/// Deploy a mock contract from its artifact.
///
/// A malformed ABI or an unreachable test network surfaces as a
/// [`ScriptError::MockSetup`].
async fn deploy_mock(
    client: Arc<impl Middleware>,
    contract: ContractKind,
    abi_json: &str,
    bytecode_hex: &str,
) -> Result<DeployedContract, ScriptError> {
    warn!(
        "Deploying `{}` - THIS SHOULD ONLY BE DONE FOR TESTING",
        contract
    );

    deploy_from_artifacts(client, contract, abi_json, bytecode_hex, vec![])
        .await
        .map_err(|e| ScriptError::MockSetup(e.to_string()))
}

/// Deploy the price feed oracle mock
pub async fn deploy_price_feed_mock(
    client: Arc<impl Middleware>,
) -> Result<DeployedContract, ScriptError> {
    deploy_mock(
        client,
        ContractKind::PriceFeedMock,
        PRICE_FEED_MOCK_ABI,
        PRICE_FEED_MOCK_BYTECODE,
    )
    .await
}

/// Deploy the badge checker mock
pub async fn deploy_badge_checker_mock(
    client: Arc<impl Middleware>,
) -> Result<DeployedContract, ScriptError> {
    deploy_mock(
        client,
        ContractKind::BadgeCheckerMock,
        BADGE_CHECKER_MOCK_ABI,
        BADGE_CHECKER_MOCK_BYTECODE,
    )
    .await
}

/// Program the answer the price feed mock returns from `latestAnswer`
pub async fn set_latest_answer(
    client: Arc<impl Middleware>,
    feed: Address,
    answer: I256,
) -> Result<(), ScriptError> {
    let feed = PriceFeedMockContract::new(feed, client);

    feed.set_latest_answer(answer)
        .send()
        .await
        .map_err(|e| ScriptError::MockSetup(e.to_string()))?
        .await
        .map_err(|e| ScriptError::MockSetup(e.to_string()))?;

    Ok(())
}

/// Program the result the badge checker mock returns from `isBadgeHolder`
pub async fn set_badge_result(
    client: Arc<impl Middleware>,
    checker: Address,
    result: bool,
) -> Result<(), ScriptError> {
    let checker = BadgeCheckerMockContract::new(checker, client);

    checker
        .set_badge_result(result)
        .send()
        .await
        .map_err(|e| ScriptError::MockSetup(e.to_string()))?
        .await
        .map_err(|e| ScriptError::MockSetup(e.to_string()))?;

    Ok(())
}
