//! Constants used in the deploy scripts

/// The ABI of the Token contract
pub const TOKEN_ABI: &str = include_str!("../artifacts/Token.abi");

/// The bytecode of the Token contract
pub const TOKEN_BYTECODE: &str = include_str!("../artifacts/Token.bin");

/// The ABI of the Treasurer contract
pub const TREASURER_ABI: &str = include_str!("../artifacts/Treasurer.abi");

/// The bytecode of the Treasurer contract
pub const TREASURER_BYTECODE: &str = include_str!("../artifacts/Treasurer.bin");

/// The ABI of the YieldModule contract
pub const YIELD_MODULE_ABI: &str = include_str!("../artifacts/YieldModule.abi");

/// The bytecode of the YieldModule contract
pub const YIELD_MODULE_BYTECODE: &str = include_str!("../artifacts/YieldModule.bin");

/// The ABI of the AccessRoles contract
pub const ACCESS_ROLES_ABI: &str = include_str!("../artifacts/AccessRoles.abi");

/// The bytecode of the AccessRoles contract
pub const ACCESS_ROLES_BYTECODE: &str = include_str!("../artifacts/AccessRoles.bin");

/// The ABI of the StockOptionManager contract
pub const STOCK_OPTION_MANAGER_ABI: &str = include_str!("../artifacts/StockOptionManager.abi");

/// The bytecode of the StockOptionManager contract
pub const STOCK_OPTION_MANAGER_BYTECODE: &str =
    include_str!("../artifacts/StockOptionManager.bin");

/// The ABI of the StockOption contract
pub const STOCK_OPTION_ABI: &str = include_str!("../artifacts/StockOption.abi");

/// The bytecode of the StockOption contract
pub const STOCK_OPTION_BYTECODE: &str = include_str!("../artifacts/StockOption.bin");

/// The ABI of the PriceFeedMock contract
pub const PRICE_FEED_MOCK_ABI: &str = include_str!("../artifacts/PriceFeedMock.abi");

/// The bytecode of the PriceFeedMock contract
pub const PRICE_FEED_MOCK_BYTECODE: &str = include_str!("../artifacts/PriceFeedMock.bin");

/// The ABI of the BadgeCheckerMock contract
pub const BADGE_CHECKER_MOCK_ABI: &str = include_str!("../artifacts/BadgeCheckerMock.abi");

/// The bytecode of the BadgeCheckerMock contract
pub const BADGE_CHECKER_MOCK_BYTECODE: &str = include_str!("../artifacts/BadgeCheckerMock.bin");

/// The number of confirmations to wait for when sending a deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 1;

/// The default number of confirmations a deployment transaction must have
/// before its contract is submitted for verification
pub const DEFAULT_VERIFICATION_CONFIRMATIONS: u64 = 5;

/// The interval, in milliseconds, at which the chain is polled while waiting
/// for deployment confirmations
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1000;

/// The maximum time, in seconds, to wait for a deployment transaction to
/// reach the required confirmation depth
pub const CONFIRMATION_TIMEOUT_SECS: u64 = 300;

/// The default maximum number of attempts when polling the explorer for a
/// verification result
pub const DEFAULT_MAX_VERIFY_ATTEMPTS: u32 = 10;

/// The default minimum delay, in seconds, between explorer polling attempts
pub const DEFAULT_MIN_RETRY_DELAY_SECS: u64 = 5;

/// The default multiplicative backoff factor between explorer polling attempts
pub const DEFAULT_BACKOFF_FACTOR: u32 = 2;

/// The default maximum delay, in seconds, between explorer polling attempts
pub const DEFAULT_MAX_RETRY_DELAY_SECS: u64 = 60;

/// The solc version the shipped artifacts were compiled with, in the long
/// form the explorer expects
pub const SOLC_VERSION: &str = "v0.8.21+commit.d9974bed";

/// Whether the shipped artifacts were compiled with the optimizer enabled
pub const OPTIMIZER_ENABLED: bool = true;

/// The optimizer runs setting the shipped artifacts were compiled with
pub const OPTIMIZER_RUNS: u32 = 200;

/// The explorer verification status returned while a submission is queued
pub const VERIFICATION_PENDING_STATUS: &str = "Pending in queue";

/// The explorer verification status returned once a submission has passed
pub const VERIFICATION_PASS_STATUS: &str = "Pass - Verified";

/// The marker in explorer responses indicating the source was verified earlier
pub const ALREADY_VERIFIED_MARKER: &str = "already verified";

/// The marker in explorer responses indicating the deployment has not been
/// indexed yet, so submission should be retried
pub const NOT_YET_INDEXED_MARKER: &str = "Unable to locate ContractCode";
