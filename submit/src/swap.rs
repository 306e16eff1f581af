use anyhow::Result;
use client::LedgerRpc;
use ledger_api::{AccountId, Asset, Keypair, Operation};
use tracing::info;

use crate::submit_operations::{SubmitSettings, submit_operations};

/// A direct strict-send swap: exactly `send_amount` goes out, at least
/// `dest_min` must arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub send_asset: Asset,
    pub send_amount: String,
    pub destination: AccountId,
    pub dest_asset: Asset,
    pub dest_min: String,
}

pub async fn perform_swap<L: LedgerRpc>(
    ledger: &L,
    settings: &SubmitSettings,
    account: &Keypair,
    swap: &SwapRequest,
) -> Result<String> {
    let operation = Operation::path_payment_strict_send(
        swap.send_asset.clone(),
        &swap.send_amount,
        &swap.destination,
        swap.dest_asset.clone(),
        &swap.dest_min,
        Vec::new(),
    )?;
    let response = submit_operations(ledger, settings, account, vec![operation]).await?;
    info!("Swap executed successfully: {}", response.hash);
    Ok(response.hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::testutils::MockLedger;
    use ledger_api::{OperationBody, OperationType};
    use tracing_subscriber::EnvFilter;

    #[tokio::test]
    async fn test_strict_send_with_empty_path() -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .try_init()
            .ok();
        let ledger = MockLedger::new();
        let issuer = Keypair::random();
        let buyer = Keypair::random();
        let distributor = Keypair::random();
        let custom = Asset::new("TradeToken", &issuer.account_id())?;
        let swap = SwapRequest {
            send_asset: Asset::native(),
            send_amount: "10".to_string(),
            destination: distributor.account_id(),
            dest_asset: custom.clone(),
            dest_min: "5".to_string(),
        };

        perform_swap(&ledger, &SubmitSettings::default(), &buyer, &swap).await?;

        let tx = &ledger.submitted()[0];
        assert!(tx.is_signed_by(&buyer.account_id()));
        assert_eq!(tx.operations()[0].operation_type(), OperationType::PathPaymentStrictSend);
        assert_eq!(
            tx.operations()[0].body,
            OperationBody::PathPaymentStrictSend {
                send_asset: Asset::native(),
                send_amount: 100_000_000,
                destination: distributor.account_id(),
                dest_asset: custom,
                dest_min: 50_000_000,
                path: vec![],
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_swap_is_an_error() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .try_init()
            .ok();
        let ledger = MockLedger::rejecting(OperationType::PathPaymentStrictSend);
        let buyer = Keypair::random();
        let swap = SwapRequest {
            send_asset: Asset::native(),
            send_amount: "10".to_string(),
            destination: Keypair::random().account_id(),
            dest_asset: Asset::new("TradeToken", &Keypair::random().account_id()).unwrap(),
            dest_min: "5".to_string(),
        };
        let err = perform_swap(&ledger, &SubmitSettings::default(), &buyer, &swap)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<client::ClientError>().is_some());
    }
}
