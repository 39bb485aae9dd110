//! Orchestration properties of the ledger-driven deployment sequence,
//! exercised with stub factories so no network is required.

use std::cell::Cell;

use deploy_scripts::{
    errors::ScriptError,
    ledger::Ledger,
    types::{ContractKind, DeployedContract},
};
use ethers::abi::{self, ParamType, Token as AbiToken};
use ethers::types::{Address, H256};
use tempdir::TempDir;

/// The chain id used throughout the tests
const CHAIN_ID: u64 = 31337;

/// Build a deployed-contract record the way a factory would, with the given
/// constructor arguments encoded for replay
fn stub_deployed(contract: ContractKind, address: Address, args: &[AbiToken]) -> DeployedContract {
    DeployedContract {
        contract,
        address,
        tx_hash: H256::repeat_byte(address.as_bytes()[0]),
        deployer: Address::repeat_byte(0xaa),
        constructor_args: hex::encode(abi::encode(args)),
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

#[tokio::test]
async fn recorded_contracts_are_not_redeployed() {
    let dir = TempDir::new("orchestration").unwrap();
    let path = ledger_path(&dir);
    let mut ledger = Ledger::load(&path, CHAIN_ID).unwrap();

    let first = ledger
        .get_or_deploy(&path, ContractKind::Token, || async {
            Ok(stub_deployed(
                ContractKind::Token,
                Address::repeat_byte(0x11),
                &[],
            ))
        })
        .await
        .unwrap();

    // A second run must reuse the recorded address without invoking the factory
    let second = ledger
        .get_or_deploy(&path, ContractKind::Token, || async {
            panic!("factory invoked for an already-recorded contract")
        })
        .await
        .unwrap();

    assert_eq!(first, second);

    // The same holds after reloading the ledger from disk
    let mut reloaded = Ledger::load(&path, CHAIN_ID).unwrap();
    let third = reloaded
        .get_or_deploy(&path, ContractKind::Token, || async {
            panic!("factory invoked after reload")
        })
        .await
        .unwrap();

    assert_eq!(first, third);
}

#[tokio::test]
async fn second_step_failure_stops_the_third_step() {
    let dir = TempDir::new("orchestration").unwrap();
    let path = ledger_path(&dir);
    let mut ledger = Ledger::load(&path, CHAIN_ID).unwrap();

    let third_invoked = Cell::new(false);

    let result = async {
        ledger
            .get_or_deploy(&path, ContractKind::Token, || async {
                Ok(stub_deployed(
                    ContractKind::Token,
                    Address::repeat_byte(0x11),
                    &[],
                ))
            })
            .await?;

        ledger
            .get_or_deploy(&path, ContractKind::Treasurer, || async {
                Err(ScriptError::ContractDeployment(
                    "insufficient funds".to_string(),
                ))
            })
            .await?;

        ledger
            .get_or_deploy(&path, ContractKind::Yield, || async {
                third_invoked.set(true);
                Ok(stub_deployed(
                    ContractKind::Yield,
                    Address::repeat_byte(0x33),
                    &[],
                ))
            })
            .await?;

        Ok::<(), ScriptError>(())
    }
    .await;

    // The third factory must never run, and the second factory's error must
    // surface unchanged
    assert!(!third_invoked.get());
    match result {
        Err(ScriptError::ContractDeployment(msg)) => assert_eq!(msg, "insufficient funds"),
        other => panic!("unexpected result: {other:?}"),
    }

    // Only the completed step is recorded
    let reloaded = Ledger::load(&path, CHAIN_ID).unwrap();
    assert!(reloaded.get(ContractKind::Token).is_some());
    assert!(reloaded.get(ContractKind::Treasurer).is_none());
    assert!(reloaded.get(ContractKind::Yield).is_none());
}

#[tokio::test]
async fn dependency_addresses_thread_through_the_group() {
    let dir = TempDir::new("orchestration").unwrap();
    let path = ledger_path(&dir);
    let mut ledger = Ledger::load(&path, CHAIN_ID).unwrap();

    let token = ledger
        .get_or_deploy(&path, ContractKind::Token, || async {
            Ok(stub_deployed(
                ContractKind::Token,
                Address::repeat_byte(0x11),
                &[],
            ))
        })
        .await
        .unwrap();

    let treasurer = ledger
        .get_or_deploy(&path, ContractKind::Treasurer, || async {
            Ok(stub_deployed(
                ContractKind::Treasurer,
                Address::repeat_byte(0x22),
                &[AbiToken::Address(token)],
            ))
        })
        .await
        .unwrap();

    ledger
        .get_or_deploy(&path, ContractKind::Yield, || async {
            Ok(stub_deployed(
                ContractKind::Yield,
                Address::repeat_byte(0x33),
                &[AbiToken::Address(token), AbiToken::Address(treasurer)],
            ))
        })
        .await
        .unwrap();

    // The treasurer's recorded arguments reference the token
    let entry = ledger.get(ContractKind::Treasurer).unwrap();
    let raw = hex::decode(&entry.constructor_args).unwrap();
    let decoded = abi::decode(&[ParamType::Address], &raw).unwrap();
    assert_eq!(decoded, vec![AbiToken::Address(token)]);

    // The yield module's recorded arguments are exactly the two prior
    // outputs, in order
    let entry = ledger.get(ContractKind::Yield).unwrap();
    let raw = hex::decode(&entry.constructor_args).unwrap();
    let decoded = abi::decode(&[ParamType::Address, ParamType::Address], &raw).unwrap();
    assert_eq!(
        decoded,
        vec![AbiToken::Address(token), AbiToken::Address(treasurer)],
    );
}
