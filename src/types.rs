//! Type definitions used throughout the deploy scripts

use std::fmt::{self, Display};

use clap::ValueEnum;
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

/// The contracts that the scripts know how to deploy
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// The equity token contract
    Token,
    /// The treasurer contract, custodian of the token's reserves
    Treasurer,
    /// The yield module contract
    Yield,
    /// The access roles contract
    AccessRoles,
    /// The stock option manager contract
    StockOptionManager,
    /// An individual stock option contract
    StockOption,
    /// The price feed oracle mock, for test networks only
    PriceFeedMock,
    /// The badge checker mock, for test networks only
    BadgeCheckerMock,
}

impl ContractKind {
    /// The name of the contract in its Solidity source, used for artifact
    /// lookup and explorer verification
    pub fn solidity_name(&self) -> &'static str {
        match self {
            ContractKind::Token => "Token",
            ContractKind::Treasurer => "Treasurer",
            ContractKind::Yield => "YieldModule",
            ContractKind::AccessRoles => "AccessRoles",
            ContractKind::StockOptionManager => "StockOptionManager",
            ContractKind::StockOption => "StockOption",
            ContractKind::PriceFeedMock => "PriceFeedMock",
            ContractKind::BadgeCheckerMock => "BadgeCheckerMock",
        }
    }

    /// Whether the contract is a test-only mock
    pub fn is_mock(&self) -> bool {
        matches!(
            self,
            ContractKind::PriceFeedMock | ContractKind::BadgeCheckerMock
        )
    }
}

impl Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Token => write!(f, "token"),
            ContractKind::Treasurer => write!(f, "treasurer"),
            ContractKind::Yield => write!(f, "yield"),
            ContractKind::AccessRoles => write!(f, "access-roles"),
            ContractKind::StockOptionManager => write!(f, "stock-option-manager"),
            ContractKind::StockOption => write!(f, "stock-option"),
            ContractKind::PriceFeedMock => write!(f, "price-feed-mock"),
            ContractKind::BadgeCheckerMock => write!(f, "badge-checker-mock"),
        }
    }
}

/// The contracts submitted for explorer verification, in the order in which
/// the deploy commands produce them. Mocks are deliberately absent.
pub const VERIFIABLE_CONTRACTS: [ContractKind; 6] = [
    ContractKind::Token,
    ContractKind::Treasurer,
    ContractKind::Yield,
    ContractKind::AccessRoles,
    ContractKind::StockOptionManager,
    ContractKind::StockOption,
];

/// A contract deployed by one of the factories.
///
/// Produced once per factory call and immutable afterwards; the on-chain
/// instance outlives the process.
#[derive(Clone, Debug)]
pub struct DeployedContract {
    /// Which contract was deployed
    pub contract: ContractKind,
    /// The address of the deployed instance
    pub address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: H256,
    /// The address of the deployer account
    pub deployer: Address,
    /// The ABI-encoded constructor arguments, hex without a `0x` prefix.
    ///
    /// Stored exactly as encoded at deploy time so verification can replay
    /// the same bytes.
    pub constructor_args: String,
}

/// The verification lifecycle status of a deployed contract
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// The deployment transaction has been mined
    Deployed,
    /// The contract's source has been verified on the explorer
    Verified,
}

#[cfg(test)]
mod tests {
    use super::{ContractKind, VERIFIABLE_CONTRACTS};

    #[test]
    fn mocks_are_not_verifiable() {
        assert!(ContractKind::PriceFeedMock.is_mock());
        assert!(ContractKind::BadgeCheckerMock.is_mock());
        assert!(VERIFIABLE_CONTRACTS.iter().all(|c| !c.is_mock()));
    }
}
