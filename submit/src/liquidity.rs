use anyhow::Result;
use client::LedgerRpc;
use ledger_api::{Asset, Keypair, Operation, PoolId, Price};
use serde::Serialize;
use tracing::info;

use crate::submit_operations::{SubmitSettings, submit_operations};

/// Bounds of a pool deposit. Serialized as the `positionDetails` of the
/// position metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositTerms {
    pub max_amount_a: String,
    pub max_amount_b: String,
    pub min_price: Price,
    pub max_price: Price,
}

impl Default for DepositTerms {
    fn default() -> Self {
        DepositTerms {
            max_amount_a: "10".to_string(),
            max_amount_b: "20".to_string(),
            min_price: Price { n: 1, d: 2 },
            max_price: Price { n: 2, d: 1 },
        }
    }
}

/// Deposits into the pool and, in the same transaction, pays one unit of the
/// position NFT to the depositing account.
pub async fn deposit_liquidity<L: LedgerRpc>(
    ledger: &L,
    settings: &SubmitSettings,
    account: &Keypair,
    pool_id: &PoolId,
    terms: &DepositTerms,
    position_nft: &Asset,
) -> Result<String> {
    let deposit = Operation::liquidity_pool_deposit(
        *pool_id,
        &terms.max_amount_a,
        &terms.max_amount_b,
        terms.min_price,
        terms.max_price,
    )?;
    let nft_payment = Operation::payment(&account.account_id(), position_nft.clone(), "1")?;
    let response = submit_operations(ledger, settings, account, vec![deposit, nft_payment]).await?;
    info!(
        "Liquidity provided successfully and NFT issued: {}",
        response.hash
    );
    Ok(response.hash)
}
