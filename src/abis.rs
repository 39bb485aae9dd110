//! Typed contract bindings generated from the shipped artifacts.
//!
//! Only the contracts the scripts call into after deployment get a binding;
//! deployment itself goes through [`ContractFactory`](ethers::contract::ContractFactory).

use ethers::contract::abigen;

abigen!(TokenContract, "./artifacts/Token.abi");
abigen!(TreasurerContract, "./artifacts/Treasurer.abi");
abigen!(AccessRolesContract, "./artifacts/AccessRoles.abi");
abigen!(PriceFeedMockContract, "./artifacts/PriceFeedMock.abi");
abigen!(BadgeCheckerMockContract, "./artifacts/BadgeCheckerMock.abi");
