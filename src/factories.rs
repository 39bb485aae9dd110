//! Factories for deploying the suite's contracts from their compiled artifacts.
//!
//! Each factory submits exactly one contract-creation transaction and fails
//! fast: no retry is performed here, and calling a factory twice deploys two
//! independent instances. Idempotence across runs lives in the ledger.

use std::sync::Arc;

use ethers::{
    abi::{self, Contract, Token},
    contract::ContractFactory,
    providers::Middleware,
    types::{Address, Bytes},
    utils::hex::FromHex,
};

use crate::{
    abis::{AccessRolesContract, TokenContract, TreasurerContract},
    constants::{
        ACCESS_ROLES_ABI, ACCESS_ROLES_BYTECODE, NUM_DEPLOY_CONFIRMATIONS, STOCK_OPTION_ABI,
        STOCK_OPTION_BYTECODE, STOCK_OPTION_MANAGER_ABI, STOCK_OPTION_MANAGER_BYTECODE, TOKEN_ABI,
        TOKEN_BYTECODE, TREASURER_ABI, TREASURER_BYTECODE, YIELD_MODULE_ABI, YIELD_MODULE_BYTECODE,
    },
    errors::ScriptError,
    types::{ContractKind, DeployedContract},
};

/// Deploy a contract from its compiled artifact with the given constructor
/// arguments, waiting on the deployment transaction's receipt.
///
/// The encoded constructor arguments are recorded on the returned handle so
/// verification can replay them byte-for-byte.
pub(crate) async fn deploy_from_artifacts(
    client: Arc<impl Middleware>,
    contract: ContractKind,
    abi_json: &str,
    bytecode_hex: &str,
    args: Vec<Token>,
) -> Result<DeployedContract, ScriptError> {
    let abi: Contract =
        serde_json::from_str(abi_json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode = Bytes::from_hex(bytecode_hex.trim())
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let factory = ContractFactory::new(abi, bytecode, client);
    let constructor_args = hex::encode(abi::encode(&args));

    let (instance, receipt) = factory
        .deploy_tokens(args)
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send_with_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    Ok(DeployedContract {
        contract,
        address: instance.address(),
        tx_hash: receipt.transaction_hash,
        deployer: receipt.from,
        constructor_args,
    })
}

/// Deploy the equity token
pub async fn deploy_token(
    client: Arc<impl Middleware>,
    name: String,
    symbol: String,
) -> Result<DeployedContract, ScriptError> {
    let args = vec![Token::String(name), Token::String(symbol)];
    deploy_from_artifacts(client, ContractKind::Token, TOKEN_ABI, TOKEN_BYTECODE, args).await
}

/// Deploy the treasurer for the given token
pub async fn deploy_treasurer(
    client: Arc<impl Middleware>,
    token: Address,
) -> Result<DeployedContract, ScriptError> {
    let args = vec![Token::Address(token)];
    deploy_from_artifacts(
        client,
        ContractKind::Treasurer,
        TREASURER_ABI,
        TREASURER_BYTECODE,
        args,
    )
    .await
}

/// Deploy the yield module over the given token and treasurer
pub async fn deploy_yield_module(
    client: Arc<impl Middleware>,
    token: Address,
    treasurer: Address,
) -> Result<DeployedContract, ScriptError> {
    let args = vec![Token::Address(token), Token::Address(treasurer)];
    deploy_from_artifacts(
        client,
        ContractKind::Yield,
        YIELD_MODULE_ABI,
        YIELD_MODULE_BYTECODE,
        args,
    )
    .await
}

/// Deploy the access roles contract; the deployer becomes its admin
pub async fn deploy_access_roles(
    client: Arc<impl Middleware>,
) -> Result<DeployedContract, ScriptError> {
    deploy_from_artifacts(
        client,
        ContractKind::AccessRoles,
        ACCESS_ROLES_ABI,
        ACCESS_ROLES_BYTECODE,
        vec![],
    )
    .await
}

/// Deploy the stock option manager over the given token and roles contract
pub async fn deploy_stock_option_manager(
    client: Arc<impl Middleware>,
    token: Address,
    roles: Address,
) -> Result<DeployedContract, ScriptError> {
    let args = vec![Token::Address(token), Token::Address(roles)];
    deploy_from_artifacts(
        client,
        ContractKind::StockOptionManager,
        STOCK_OPTION_MANAGER_ABI,
        STOCK_OPTION_MANAGER_BYTECODE,
        args,
    )
    .await
}

/// Deploy the stock option contract under the given manager
pub async fn deploy_stock_option(
    client: Arc<impl Middleware>,
    manager: Address,
    token: Address,
) -> Result<DeployedContract, ScriptError> {
    let args = vec![Token::Address(manager), Token::Address(token)];
    deploy_from_artifacts(
        client,
        ContractKind::StockOption,
        STOCK_OPTION_ABI,
        STOCK_OPTION_BYTECODE,
        args,
    )
    .await
}

/// Point the token at its treasurer
pub async fn set_token_treasurer(
    client: Arc<impl Middleware>,
    token: Address,
    treasurer: Address,
) -> Result<(), ScriptError> {
    let token = TokenContract::new(token, client);

    token
        .set_treasurer(treasurer)
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(())
}

/// Point the treasurer at its yield module
pub async fn set_treasurer_yield_module(
    client: Arc<impl Middleware>,
    treasurer: Address,
    yield_module: Address,
) -> Result<(), ScriptError> {
    let treasurer = TreasurerContract::new(treasurer, client);

    treasurer
        .set_yield_module(yield_module)
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(())
}

/// Register the stock option manager with the roles contract
pub async fn add_roles_manager(
    client: Arc<impl Middleware>,
    roles: Address,
    manager: Address,
) -> Result<(), ScriptError> {
    let roles = AccessRolesContract::new(roles, client);

    roles
        .add_manager(manager)
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use ethers::abi::Contract;

    use crate::constants::{
        ACCESS_ROLES_ABI, ACCESS_ROLES_BYTECODE, BADGE_CHECKER_MOCK_ABI,
        BADGE_CHECKER_MOCK_BYTECODE, PRICE_FEED_MOCK_ABI, PRICE_FEED_MOCK_BYTECODE,
        STOCK_OPTION_ABI, STOCK_OPTION_BYTECODE, STOCK_OPTION_MANAGER_ABI,
        STOCK_OPTION_MANAGER_BYTECODE, TOKEN_ABI, TOKEN_BYTECODE, TREASURER_ABI,
        TREASURER_BYTECODE, YIELD_MODULE_ABI, YIELD_MODULE_BYTECODE,
    };

    /// Every artifact pair the factories deploy from
    const ARTIFACTS: [(&str, &str); 8] = [
        (TOKEN_ABI, TOKEN_BYTECODE),
        (TREASURER_ABI, TREASURER_BYTECODE),
        (YIELD_MODULE_ABI, YIELD_MODULE_BYTECODE),
        (ACCESS_ROLES_ABI, ACCESS_ROLES_BYTECODE),
        (STOCK_OPTION_MANAGER_ABI, STOCK_OPTION_MANAGER_BYTECODE),
        (STOCK_OPTION_ABI, STOCK_OPTION_BYTECODE),
        (PRICE_FEED_MOCK_ABI, PRICE_FEED_MOCK_BYTECODE),
        (BADGE_CHECKER_MOCK_ABI, BADGE_CHECKER_MOCK_BYTECODE),
    ];

    #[test]
    fn artifacts_parse() {
        for (abi_json, bytecode_hex) in ARTIFACTS {
            let abi: Contract = serde_json::from_str(abi_json).unwrap();
            assert!(abi.constructor.is_some());
            assert!(!hex::decode(bytecode_hex.trim()).unwrap().is_empty());
        }
    }
}
