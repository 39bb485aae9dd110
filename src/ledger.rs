//! The persisted record of which contracts have been deployed on a network.
//!
//! The ledger is what makes re-running a deploy command safe: every
//! successful factory call is recorded and persisted before the next step
//! begins, so a re-run after a partial failure skips the contracts that are
//! already on chain. Per contract the lifecycle is
//! `absent -> deployed -> verified`.

use std::{collections::BTreeMap, fs, future::Future, path::Path};

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    errors::ScriptError,
    types::{ContractKind, ContractStatus, DeployedContract},
};

/// A single deployed contract as recorded in the ledger
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LedgerEntry {
    /// The address of the deployed instance
    pub address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: H256,
    /// The address of the deployer account
    pub deployer: Address,
    /// The ABI-encoded constructor arguments, hex without a `0x` prefix
    pub constructor_args: String,
    /// Where the contract is in the deploy/verify lifecycle
    pub status: ContractStatus,
}

/// The deployments ledger for a single network
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Ledger {
    /// The chain the recorded contracts live on
    pub chain_id: u64,
    /// The recorded contracts, keyed by contract name
    pub contracts: BTreeMap<String, LedgerEntry>,
}

impl Ledger {
    /// Load the ledger at the given path, or start an empty one if the file
    /// does not exist yet.
    ///
    /// A ledger written for a different chain is rejected: addresses are
    /// only meaningful on the network that produced them.
    pub fn load(path: &str, chain_id: u64) -> Result<Self, ScriptError> {
        if !Path::new(path).exists() {
            return Ok(Ledger {
                chain_id,
                contracts: BTreeMap::new(),
            });
        }

        let contents =
            fs::read_to_string(path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
        let ledger: Ledger = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

        if ledger.chain_id != chain_id {
            return Err(ScriptError::ReadDeployments(format!(
                "ledger at {} was written for chain {}, but the client is connected to chain {}",
                path, ledger.chain_id, chain_id,
            )));
        }

        Ok(ledger)
    }

    /// Write the ledger to the given path, creating the file if necessary
    pub fn save(&self, path: &str) -> Result<(), ScriptError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
    }

    /// Look up the ledger entry for a contract
    pub fn get(&self, contract: ContractKind) -> Option<&LedgerEntry> {
        self.contracts.get(&contract.to_string())
    }

    /// Resolve the address of a contract that must already be deployed on
    /// this network
    pub fn require(&self, contract: ContractKind) -> Result<Address, ScriptError> {
        self.get(contract)
            .map(|entry| entry.address)
            .ok_or_else(|| {
                ScriptError::DependencyResolution(format!(
                    "{} is not deployed on chain {}",
                    contract, self.chain_id,
                ))
            })
    }

    /// Record a freshly deployed contract
    pub fn record(&mut self, deployed: &DeployedContract) {
        self.contracts.insert(
            deployed.contract.to_string(),
            LedgerEntry {
                address: deployed.address,
                tx_hash: deployed.tx_hash,
                deployer: deployed.deployer,
                constructor_args: deployed.constructor_args.clone(),
                status: ContractStatus::Deployed,
            },
        );
    }

    /// Mark a recorded contract as verified on the explorer
    pub fn mark_verified(&mut self, contract: ContractKind) -> Result<(), ScriptError> {
        let entry = self
            .contracts
            .get_mut(&contract.to_string())
            .ok_or_else(|| {
                ScriptError::WriteDeployments(format!(
                    "{} has no ledger entry to mark verified",
                    contract,
                ))
            })?;

        entry.status = ContractStatus::Verified;
        Ok(())
    }

    /// Run one step of a deployment sequence: reuse the recorded address if
    /// the contract is already on this network, otherwise invoke the factory
    /// and persist the result before returning.
    ///
    /// The factory closure is only invoked when there is no recorded entry,
    /// so a re-run never submits a duplicate creation transaction.
    pub async fn get_or_deploy<F, Fut>(
        &mut self,
        path: &str,
        contract: ContractKind,
        deploy: F,
    ) -> Result<Address, ScriptError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<DeployedContract, ScriptError>>,
    {
        if let Some(entry) = self.get(contract) {
            info!("{} already deployed at {:#x}, skipping", contract, entry.address);
            return Ok(entry.address);
        }

        let deployed = deploy().await?;
        info!("{} deployed at {:#x}", contract, deployed.address);

        self.record(&deployed);
        self.save(path)?;

        Ok(deployed.address)
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, H256};
    use tempdir::TempDir;

    use super::Ledger;
    use crate::types::{ContractKind, ContractStatus, DeployedContract};

    /// The chain id used throughout the tests
    const CHAIN_ID: u64 = 31337;

    /// Build a deployed-contract record with a recognizable address
    fn stub_deployed(contract: ContractKind, addr_byte: u8) -> DeployedContract {
        DeployedContract {
            contract,
            address: Address::repeat_byte(addr_byte),
            tx_hash: H256::repeat_byte(addr_byte),
            deployer: Address::repeat_byte(0xaa),
            constructor_args: String::new(),
        }
    }

    /// A ledger path inside a fresh temporary directory
    fn ledger_path(dir: &TempDir) -> String {
        dir.path()
            .join("deployments.json")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn load_starts_empty_when_missing() {
        let dir = TempDir::new("ledger").unwrap();
        let ledger = Ledger::load(&ledger_path(&dir), CHAIN_ID).unwrap();

        assert_eq!(ledger.chain_id, CHAIN_ID);
        assert!(ledger.contracts.is_empty());
    }

    #[test]
    fn record_save_reload_round_trip() {
        let dir = TempDir::new("ledger").unwrap();
        let path = ledger_path(&dir);

        let mut ledger = Ledger::load(&path, CHAIN_ID).unwrap();
        let deployed = stub_deployed(ContractKind::Token, 0x11);
        ledger.record(&deployed);
        ledger.save(&path).unwrap();

        let reloaded = Ledger::load(&path, CHAIN_ID).unwrap();
        let entry = reloaded.get(ContractKind::Token).unwrap();
        assert_eq!(entry.address, deployed.address);
        assert_eq!(entry.tx_hash, deployed.tx_hash);
        assert_eq!(entry.status, ContractStatus::Deployed);
    }

    #[test]
    fn chain_mismatch_is_rejected() {
        let dir = TempDir::new("ledger").unwrap();
        let path = ledger_path(&dir);

        let mut ledger = Ledger::load(&path, CHAIN_ID).unwrap();
        ledger.record(&stub_deployed(ContractKind::Token, 0x11));
        ledger.save(&path).unwrap();

        assert!(Ledger::load(&path, CHAIN_ID + 1).is_err());
    }

    #[test]
    fn require_resolves_only_recorded_contracts() {
        let dir = TempDir::new("ledger").unwrap();
        let path = ledger_path(&dir);

        let mut ledger = Ledger::load(&path, CHAIN_ID).unwrap();
        assert!(ledger.require(ContractKind::Token).is_err());

        let deployed = stub_deployed(ContractKind::Token, 0x11);
        ledger.record(&deployed);
        assert_eq!(ledger.require(ContractKind::Token).unwrap(), deployed.address);
    }

    #[test]
    fn mark_verified_transitions_status() {
        let dir = TempDir::new("ledger").unwrap();
        let path = ledger_path(&dir);

        let mut ledger = Ledger::load(&path, CHAIN_ID).unwrap();
        assert!(ledger.mark_verified(ContractKind::Token).is_err());

        ledger.record(&stub_deployed(ContractKind::Token, 0x11));
        ledger.mark_verified(ContractKind::Token).unwrap();
        ledger.save(&path).unwrap();

        let reloaded = Ledger::load(&path, CHAIN_ID).unwrap();
        assert_eq!(
            reloaded.get(ContractKind::Token).unwrap().status,
            ContractStatus::Verified,
        );
    }
}
