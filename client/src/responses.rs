//! JSON bodies returned by the Aurora server and the pinning service.

use serde::{Deserialize, Serialize};

use crate::error::ResultCodes;

#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    /// int64 carried as a string
    pub sequence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub hash: String,
    #[serde(default)]
    pub ledger: u32,
    #[serde(default = "default_successful")]
    pub successful: bool,
}

fn default_successful() -> bool {
    true
}

/// RFC 7807 problem document used for every Aurora error.
#[derive(Debug, Clone, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub extras: Option<ProblemExtras>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProblemExtras {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserve {
    pub asset: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolRecord {
    pub id: String,
    #[serde(default)]
    pub fee_bp: u32,
    #[serde(rename = "type", default)]
    pub pool_type: String,
    #[serde(default)]
    pub total_trustlines: String,
    #[serde(default)]
    pub total_shares: String,
    #[serde(default)]
    pub reserves: Vec<Reserve>,
}

/// Pinata's answer to a file pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: u64,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
    #[serde(rename = "isDuplicate", default)]
    pub is_duplicate: Option<bool>,
}
