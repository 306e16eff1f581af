use anyhow::Result;
use client::LedgerRpc;
use ledger_api::{AccountId, Asset, Keypair, Operation};
use tracing::info;

use crate::submit_operations::{SubmitSettings, submit_operations};

/// Mints `amount` of the issuer's asset by paying it to `distributor`.
pub async fn issue_asset<L: LedgerRpc>(
    ledger: &L,
    settings: &SubmitSettings,
    issuer: &Keypair,
    distributor: &AccountId,
    asset: &Asset,
    amount: &str,
) -> Result<String> {
    let operation = Operation::payment(distributor, asset.clone(), amount)?;
    let response = submit_operations(ledger, settings, issuer, vec![operation]).await?;
    info!("Asset issued successfully: {}", response.hash);
    Ok(response.hash)
}
