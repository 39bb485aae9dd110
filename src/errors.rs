//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error deploying or programming a mock contract
    MockSetup(String),
    /// Error resolving the address of a dependency contract
    DependencyResolution(String),
    /// Error reading the deployments ledger
    ReadDeployments(String),
    /// Error writing the deployments ledger
    WriteDeployments(String),
    /// Timed out waiting for a deployment transaction to be confirmed
    ConfirmationTimeout(String),
    /// Error verifying a contract's source on the explorer
    Verification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::MockSetup(s) => write!(f, "error setting up mock contract: {}", s),
            ScriptError::DependencyResolution(s) => {
                write!(f, "error resolving dependency: {}", s)
            }
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ConfirmationTimeout(s) => {
                write!(f, "error awaiting confirmations: {}", s)
            }
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
        }
    }
}

impl Error for ScriptError {}
