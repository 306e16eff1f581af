//! Ledger-writing steps. Each function loads the signer's account, builds one
//! transaction, signs it with that single keypair and submits it.

pub mod issue_asset;
pub mod liquidity;
pub mod manage_data;
pub mod submit_operations;
pub mod swap;
pub mod trustline;

pub use submit_operations::{SubmitSettings, submit_operations};
