//! Scripts for deploying and verifying the equity suite contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod abis;
pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod factories;
pub mod ledger;
pub mod mocks;
pub mod types;
pub mod utils;
pub mod verify;
