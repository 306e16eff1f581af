use std::fmt;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("transaction {hash} rejected: {title} ({result_codes})")]
    TransactionRejected {
        hash: String,
        status: u16,
        title: String,
        result_codes: ResultCodes,
    },

    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("invalid sequence number '{0}'")]
    InvalidSequence(String),

    #[error("pinning service error: {0}")]
    Pinning(String),

    #[error(transparent)]
    Ledger(#[from] ledger_api::Error),
}

impl ClientError {
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        ClientError::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// HTTP status carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } | ClientError::TransactionRejected { status, .. } => {
                Some(*status)
            }
            ClientError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result codes reported by Aurora for a failed submission, e.g.
/// `tx_failed` with `["op_no_trust"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResultCodes {
    #[serde(default)]
    pub transaction: String,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl fmt::Display for ResultCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            write!(f, "{}", self.transaction)
        } else {
            write!(f, "{}: [{}]", self.transaction, self.operations.join(", "))
        }
    }
}
