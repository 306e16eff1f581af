//! Wire-level types for the Diamante ledger: keys, assets, operations and
//! transactions, built as typed wrappers over the `stellar-xdr` wire types.

pub mod amount;
pub mod asset;
pub mod error;
pub mod keypair;
pub mod network;
pub mod operation;
pub mod transaction;

pub use amount::Price;
pub use asset::{Asset, ChangeTrustAsset, LiquidityPoolAsset, PoolId};
pub use error::{Error, Result};
pub use keypair::{AccountId, DecoratedSignature, Keypair};
pub use network::Network;
pub use operation::{Operation, OperationBody, OperationType};
pub use transaction::{Account, BASE_FEE, TimeBounds, Transaction, TransactionBuilder};

pub use stellar_xdr::curr as xdr;
