use anyhow::Result;
use client::LedgerRpc;
use ledger_api::{Keypair, Operation};
use tracing::info;

use crate::submit_operations::{SubmitSettings, submit_operations};

const MAX_KEY_LEN: usize = 64;

/// The first 64 characters of `name`, stopping early if a multi-byte
/// character would push the key past the ledger's 64-byte limit.
pub fn data_entry_key(name: &str) -> &str {
    let mut end = 0;
    for (count, (idx, ch)) in name.char_indices().enumerate() {
        if count == MAX_KEY_LEN || idx + ch.len_utf8() > MAX_KEY_LEN {
            break;
        }
        end = idx + ch.len_utf8();
    }
    &name[..end]
}

/// Writes `value` as a data entry on `account`, keyed by the truncated `name`.
/// Returns the key actually written and the transaction hash.
pub async fn store_metadata_on_chain<L: LedgerRpc>(
    ledger: &L,
    settings: &SubmitSettings,
    account: &Keypair,
    name: &str,
    value: &str,
) -> Result<(String, String)> {
    let key = data_entry_key(name);
    let operation = Operation::manage_data(key, Some(value.as_bytes()))?;
    let response = submit_operations(ledger, settings, account, vec![operation]).await?;
    info!(
        "Metadata stored on-chain with key (NFT Asset Name): {} {}",
        key, response.hash
    );
    Ok((key.to_string(), response.hash))
}
