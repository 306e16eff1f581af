pub mod aurora;
pub mod backend;
pub mod error;
pub mod friendbot;
pub mod pinata;
pub mod responses;
pub mod testutils;

pub use backend::{Faucet, FundingOutcome, LedgerRpc, PinningService};
pub use error::ClientError;
