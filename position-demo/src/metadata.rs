use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use ledger_api::{AccountId, PoolId};
use serde::Serialize;
use submit::liquidity::DepositTerms;

/// JSON document pinned to IPFS for a liquidity position. Its CID is what the
/// depositor's account records on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionMetadata {
    pub name: String,
    pub description: String,
    pub pool_id: String,
    pub user_public_key: String,
    pub position_details: DepositTerms,
    pub timestamp: String,
}

impl PositionMetadata {
    pub fn new(pool_id: &PoolId, user: &AccountId, position_details: DepositTerms, now: DateTime<Utc>) -> Self {
        PositionMetadata {
            name: format!("Position NFT for Pool {}", pool_id),
            description: "This NFT represents a position in a liquidity pool.".to_string(),
            pool_id: pool_id.to_hex(),
            user_public_key: user.to_strkey(),
            position_details,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).context("failed to serialize position metadata")
    }
}

pub fn metadata_file_name(now: DateTime<Utc>) -> String {
    format!("metadata_{}.json", now.timestamp_millis())
}

/// Code of the position NFT: `NFT` plus the last four characters of the holder's key.
pub fn position_nft_code(holder: &AccountId) -> String {
    let key = holder.to_strkey();
    format!("NFT{}", &key[key.len() - 4..])
}
