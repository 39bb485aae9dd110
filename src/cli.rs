//! Definitions of CLI arguments and commands for the deploy scripts

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use ethers::providers::Middleware;

use crate::{
    commands::{deploy_core, deploy_mocks, deploy_options, verify},
    constants::{
        DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRY_DELAY_SECS, DEFAULT_MAX_VERIFY_ATTEMPTS,
        DEFAULT_MIN_RETRY_DELAY_SECS, DEFAULT_VERIFICATION_CONFIRMATIONS,
    },
    errors::ScriptError,
    types::ContractKind,
};

/// The deploy scripts CLI
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long, env = "DEPLOYER_PRIV_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path to the deployments ledger for the target network
    #[arg(short, long, default_value = "deployments.json")]
    pub deployments_path: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The supported commands, one per contract group plus verification
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the core token group (token, treasurer, yield module)
    DeployCore(DeployCoreArgs),
    /// Deploy the stock option group (access roles, option manager, option)
    /// over an already-deployed core group
    DeployOptions(DeployOptionsArgs),
    /// Deploy and program the test-network mocks
    DeployMocks(DeployMocksArgs),
    /// Verify deployed contracts' source on the chain explorer
    Verify(VerifyArgs),
}

impl Command {
    /// Dispatch the parsed command
    pub async fn run(
        self,
        client: Arc<impl Middleware>,
        deployments_path: &str,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployCore(args) => deploy_core(args, client, deployments_path).await,
            Command::DeployOptions(args) => deploy_options(args, client, deployments_path).await,
            Command::DeployMocks(args) => deploy_mocks(args, client, deployments_path).await,
            Command::Verify(args) => verify(args, client, deployments_path).await,
        }
    }
}

/// Arguments to the core group deployment
#[derive(Args)]
pub struct DeployCoreArgs {
    /// Human-readable name of the token
    #[arg(long, default_value = "Equity Token")]
    pub token_name: String,

    /// Ticker symbol of the token
    #[arg(long, default_value = "EQT")]
    pub token_symbol: String,
}

/// Arguments to the options group deployment
#[derive(Args)]
pub struct DeployOptionsArgs {
    /// Address, in hex, of the token to bind the options to, overriding the
    /// ledger entry from the core group
    #[arg(short, long)]
    pub token: Option<String>,
}

/// Arguments to the mock deployment
#[derive(Args)]
pub struct DeployMocksArgs {
    /// The answer the price feed mock returns, in the feed's decimals
    #[arg(long, default_value_t = 200_000_000_000)]
    pub initial_answer: i64,

    /// Whether the badge checker mock reports every account as a holder
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub badge_result: bool,
}

/// Arguments to explorer verification
#[derive(Args)]
pub struct VerifyArgs {
    /// Explorer API key
    #[arg(short, long, env = "ETHERSCAN_API_KEY")]
    pub api_key: String,

    /// Directory containing one flattened `<Name>.sol` per contract
    #[arg(short, long, default_value = "sources")]
    pub sources_dir: String,

    /// Verify a single contract instead of every deployed one
    #[arg(short, long)]
    pub contract: Option<ContractKind>,

    /// Confirmations the deployment transaction must have before submission
    #[arg(long, default_value_t = DEFAULT_VERIFICATION_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Maximum number of explorer polling attempts
    #[arg(long, default_value_t = DEFAULT_MAX_VERIFY_ATTEMPTS)]
    pub max_attempts: u32,

    /// Minimum delay between polling attempts, in seconds
    #[arg(long, default_value_t = DEFAULT_MIN_RETRY_DELAY_SECS)]
    pub min_retry_delay: u64,

    /// Multiplicative backoff factor between polling attempts
    #[arg(long, default_value_t = DEFAULT_BACKOFF_FACTOR)]
    pub backoff_factor: u32,

    /// Maximum delay between polling attempts, in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_RETRY_DELAY_SECS)]
    pub max_retry_delay: u64,
}
