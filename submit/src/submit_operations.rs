use anyhow::{Context, Result};
use client::LedgerRpc;
use client::responses::SubmitResponse;
use ledger_api::{BASE_FEE, Keypair, Network, Operation, TransactionBuilder};
use tracing::{debug, error};

/// Fee, network and validity window applied to every transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSettings {
    pub network: Network,
    pub base_fee: u32,
    pub timeout_secs: u64,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        SubmitSettings {
            network: Network::testnet(),
            base_fee: BASE_FEE,
            timeout_secs: 30,
        }
    }
}

pub async fn submit_operations<L: LedgerRpc>(
    ledger: &L,
    settings: &SubmitSettings,
    signer: &Keypair,
    operations: Vec<Operation>,
) -> Result<SubmitResponse> {
    let mut account = ledger
        .load_account(&signer.account_id())
        .await
        .with_context(|| format!("Failed to load account {}", signer.public_key()))?;

    let mut builder = TransactionBuilder::new(&mut account, settings.base_fee, settings.network.clone());
    for operation in operations {
        builder = builder.add_operation(operation);
    }
    let mut transaction = builder.set_timeout(settings.timeout_secs).build()?;
    transaction.sign(signer);
    debug!(
        "Built transaction {} for {} at sequence {}: {:#?}",
        transaction.hash_hex(),
        signer.public_key(),
        transaction.sequence(),
        transaction.operations()
    );

    match ledger.submit_transaction(&transaction).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!("Error at {}:{} - {:?}", file!(), line!(), e);
            Err(e.into())
        }
    }
}
