use anyhow::{Context, Result, bail};
use chrono::Utc;
use client::responses::LiquidityPoolRecord;
use client::{Faucet, FundingOutcome, LedgerRpc, PinningService};
use ledger_api::{AccountId, Asset, Keypair, LiquidityPoolAsset, PoolId};
use submit::SubmitSettings;
use submit::issue_asset::issue_asset;
use submit::liquidity::{DepositTerms, deposit_liquidity};
use submit::manage_data::store_metadata_on_chain;
use submit::swap::{SwapRequest, perform_swap};
use submit::trustline::establish_trustline;
use tracing::{error, info, warn};

use crate::config::{AssetsConfig, Config, SwapConfig};
use crate::metadata::{PositionMetadata, metadata_file_name, position_nft_code};

/// The three accounts of a run. Generated fresh and never persisted.
#[derive(Debug, Clone)]
pub struct Participants {
    pub issuer: Keypair,
    pub distributor: Keypair,
    pub buyer: Keypair,
}

impl Participants {
    pub fn random() -> Self {
        Participants {
            issuer: Keypair::random(),
            distributor: Keypair::random(),
            buyer: Keypair::random(),
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub pool_id: String,
    pub metadata_cid: String,
    /// (step, transaction hash) in submission order
    pub transactions: Vec<(String, String)>,
    pub pool: Option<LiquidityPoolRecord>,
}

/// Runs the demo steps one after another against a ledger, a faucet and a
/// pinning service. The first failing step ends the run.
pub struct Workflow<L, F, P> {
    ledger: L,
    faucet: F,
    pinning: P,
    settings: SubmitSettings,
    require_funding: bool,
    assets: AssetsConfig,
    swap: SwapConfig,
}

impl<L, F, P> Workflow<L, F, P>
where
    L: LedgerRpc,
    F: Faucet,
    P: PinningService,
{
    pub fn new(ledger: L, faucet: F, pinning: P, config: &Config) -> Self {
        Workflow {
            ledger,
            faucet,
            pinning,
            settings: config.submit_settings(),
            require_funding: config.ledger.require_funding,
            assets: config.assets.clone(),
            swap: config.swap.clone(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn faucet(&self) -> &F {
        &self.faucet
    }

    pub fn pinning(&self) -> &P {
        &self.pinning
    }

    /// Asks the faucet once for test funds. A refusal is logged and
    /// returned, never retried.
    pub async fn fund_account(&self, keypair: &Keypair) -> Result<FundingOutcome> {
        self.fund_account_id(&keypair.account_id()).await
    }

    pub async fn fund_account_id(&self, account: &AccountId) -> Result<FundingOutcome> {
        let outcome = self
            .faucet
            .fund(account)
            .await
            .with_context(|| format!("Failed to reach faucet for {}", account))?;
        match &outcome {
            FundingOutcome::Funded => info!("Account {} funded.", account),
            FundingOutcome::Rejected { status, body } => {
                warn!("Faucet did not fund {}: status {}: {}", account, status, body)
            }
        }
        Ok(outcome)
    }

    /// Pins the metadata JSON and returns its CID.
    pub async fn upload_metadata(&self, metadata: &PositionMetadata) -> Result<String> {
        let bytes = metadata.to_json_bytes()?;
        let file_name = metadata_file_name(Utc::now());
        match self.pinning.upload_file(bytes, &file_name).await {
            Ok(upload) => {
                info!("Metadata uploaded to IPFS: {:?}", upload);
                if let Some(link) = self.pinning.gateway_url(&upload.ipfs_hash) {
                    info!("Metadata available at {}", link);
                }
                Ok(upload.ipfs_hash)
            }
            Err(e) => {
                error!("Error uploading metadata to IPFS: {}", e);
                Err(anyhow::Error::new(e).context("Failed to upload metadata"))
            }
        }
    }

    /// Uploads the position metadata, then records its CID on the holder's
    /// account under the NFT name.
    pub async fn create_and_push_metadata(
        &self,
        holder: &Keypair,
        pool_id: &PoolId,
        position_details: DepositTerms,
        nft_name: &str,
    ) -> Result<(String, String)> {
        let metadata = PositionMetadata::new(pool_id, &holder.account_id(), position_details, Utc::now());
        let cid = self.upload_metadata(&metadata).await?;
        let (_, hash) = store_metadata_on_chain(&self.ledger, &self.settings, holder, nft_name, &cid).await?;
        Ok((cid, hash))
    }

    /// Read-only pool lookup; failures are logged and yield `None`.
    pub async fn query_liquidity_pool_details(&self, pool_id: &PoolId) -> Option<LiquidityPoolRecord> {
        match self.ledger.liquidity_pool(pool_id).await {
            Ok(record) => {
                info!("Liquidity Pool Details: {:#?}", record);
                Some(record)
            }
            Err(e) => {
                error!("Error querying liquidity pool details: {}", e);
                None
            }
        }
    }

    pub async fn run(&self, participants: &Participants) -> Result<RunReport> {
        let Participants {
            issuer,
            distributor,
            buyer,
        } = participants;
        info!("NFT Issuer Public Key: {}", issuer.public_key());
        info!("Distributor Public Key: {}", distributor.public_key());
        info!("Buyer Public Key: {}", buyer.public_key());

        let mut report = RunReport::default();

        for (role, keypair) in [("issuer", issuer), ("distributor", distributor), ("buyer", buyer)] {
            let outcome = self.fund_account(keypair).await?;
            if let FundingOutcome::Rejected { status, .. } = outcome {
                if self.require_funding {
                    bail!(
                        "Faucet refused to fund the {} account {} (status {})",
                        role,
                        keypair.public_key(),
                        status
                    );
                }
            }
        }

        let custom_asset = Asset::new(&self.assets.custom_asset_code, &issuer.account_id())?;

        for holder in [distributor, buyer] {
            let hash = establish_trustline(&self.ledger, &self.settings, holder, custom_asset.clone()).await?;
            report.transactions.push(("trustline".to_string(), hash));
        }

        let hash = issue_asset(
            &self.ledger,
            &self.settings,
            issuer,
            &distributor.account_id(),
            &custom_asset,
            &self.assets.issue_amount,
        )
        .await?;
        report.transactions.push(("issue".to_string(), hash));

        let pool_asset = LiquidityPoolAsset::new(Asset::native(), custom_asset.clone(), self.assets.pool_fee)?;
        let pool_id = pool_asset.pool_id();
        info!("Liquidity Pool ID: {}", pool_id);
        report.pool_id = pool_id.to_hex();

        let hash = establish_trustline(&self.ledger, &self.settings, distributor, pool_asset).await?;
        report.transactions.push(("pool trustline".to_string(), hash));

        let nft_name = position_nft_code(&distributor.account_id());
        let position_nft = Asset::new(&nft_name, &issuer.account_id())?;
        let hash = establish_trustline(&self.ledger, &self.settings, distributor, position_nft.clone()).await?;
        report.transactions.push(("nft trustline".to_string(), hash));

        let terms = DepositTerms::default();
        let (cid, hash) = self
            .create_and_push_metadata(distributor, &pool_id, terms.clone(), &nft_name)
            .await?;
        report.metadata_cid = cid;
        report.transactions.push(("metadata".to_string(), hash));

        let hash = deposit_liquidity(
            &self.ledger,
            &self.settings,
            distributor,
            &pool_id,
            &terms,
            &position_nft,
        )
        .await?;
        report.transactions.push(("deposit".to_string(), hash));

        report.pool = self.query_liquidity_pool_details(&pool_id).await;

        let swap = SwapRequest {
            send_asset: Asset::native(),
            send_amount: self.swap.send_amount.clone(),
            destination: distributor.account_id(),
            dest_asset: custom_asset,
            dest_min: self.swap.dest_min.clone(),
        };
        let hash = perform_swap(&self.ledger, &self.settings, buyer, &swap).await?;
        report.transactions.push(("swap".to_string(), hash));

        info!("All operations completed successfully.");
        Ok(report)
    }
}
