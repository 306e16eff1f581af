use anyhow::Result;
use client::LedgerRpc;
use ledger_api::{ChangeTrustAsset, Keypair, Operation};
use tracing::info;

use crate::submit_operations::{SubmitSettings, submit_operations};

/// Opens a trustline from `account` to an asset or a pool share, with the
/// maximum limit. Returns the transaction hash.
pub async fn establish_trustline<L: LedgerRpc>(
    ledger: &L,
    settings: &SubmitSettings,
    account: &Keypair,
    asset: impl Into<ChangeTrustAsset>,
) -> Result<String> {
    let line = asset.into();
    info!("Establishing trustline for {} to {}", account.public_key(), line);
    let operation = Operation::change_trust(line, None)?;
    let response = submit_operations(ledger, settings, account, vec![operation]).await?;
    info!(
        "Trustline established for {}: {}",
        account.public_key(),
        response.hash
    );
    Ok(response.hash)
}
