use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building ledger objects locally, before anything
/// reaches the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid strkey '{0}'")]
    InvalidStrKey(String),

    #[error("invalid asset code '{0}': expected 1-12 ASCII alphanumeric characters")]
    InvalidAssetCode(String),

    #[error("invalid amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("invalid price {n}/{d}")]
    InvalidPrice { n: i32, d: i32 },

    #[error("pool assets are not in lexicographic order: {a} must sort before {b}")]
    AssetsOutOfOrder { a: String, b: String },

    #[error("unsupported liquidity pool fee {0}")]
    InvalidPoolFee(i32),

    #[error("invalid liquidity pool id '{0}'")]
    InvalidPoolId(String),

    #[error("data entry {field} is {len} bytes, the ledger allows at most 64")]
    DataEntryTooLong { field: &'static str, len: usize },

    #[error("the native asset cannot be used as a trustline")]
    NativeTrustline,

    #[error("a path payment path holds at most 5 assets, got {0}")]
    PathTooLong(usize),

    #[error("transaction has no operations")]
    NoOperations,

    #[error("transaction timeout must be set before building")]
    MissingTimeout,

    #[error("xdr encoding failed: {0}")]
    Xdr(String),
}

impl From<stellar_xdr::curr::Error> for Error {
    fn from(e: stellar_xdr::curr::Error) -> Self {
        Error::Xdr(e.to_string())
    }
}
