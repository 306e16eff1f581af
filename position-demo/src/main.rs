use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::aurora::AuroraServer;
use client::friendbot::Friendbot;
use client::pinata::PinataClient;
use ledger_api::{AccountId, Asset, Keypair, LiquidityPoolAsset};
use position_demo::config;
use position_demo::logging::init_logging;
use position_demo::workflow::{Participants, Workflow};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "position-demo")]
#[command(about = "Issues an asset, opens a liquidity position backed by IPFS metadata and swaps against the pool")]
struct Cli {
    /// Path to a TOML config file (default: ./config/config.toml, else built-in testnet settings)
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the whole workflow with three fresh accounts
    Run,
    /// Print the pool id of the native asset paired with CODE:ISSUER
    PoolId {
        #[arg(long)]
        asset: String,
        #[arg(long, default_value_t = 30)]
        fee: i32,
    },
    /// Fund one account from the faucet
    Fund {
        #[arg(long)]
        address: String,
    },
    /// Generate a keypair
    Keygen,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config_file.as_deref())?;
    init_logging(&cfg.logging.level)?;

    match cli.command {
        Commands::Run => {
            for name in cfg.missing_secrets() {
                warn!("{} is not set; pinning requests will not be authenticated", name);
            }
            let ledger = AuroraServer::new(&cfg.ledger.aurora_url);
            let faucet = Friendbot::new(&cfg.ledger.friendbot_url);
            let pinning = PinataClient::new(
                &cfg.pinata.api_url,
                cfg.pinata.jwt.as_deref().unwrap_or_default(),
                cfg.pinata.gateway_url.as_deref(),
            );
            info!("Using Aurora server {}", ledger.base_url());

            let workflow = Workflow::new(ledger, faucet, pinning, &cfg);
            let report = workflow.run(&Participants::random()).await?;
            info!("Pool {} metadata CID {}", report.pool_id, report.metadata_cid);
            for (step, hash) in &report.transactions {
                info!("  {}: {}", step, hash);
            }
            Ok(())
        }
        Commands::PoolId { asset, fee } => {
            let asset: Asset = asset
                .parse()
                .with_context(|| format!("expected CODE:ISSUER, got '{}'", asset))?;
            let pool = LiquidityPoolAsset::new(Asset::native(), asset, fee)?;
            info!("Liquidity Pool ID: {}", pool.pool_id());
            Ok(())
        }
        Commands::Fund { address } => {
            let account: AccountId = address.parse()?;
            let workflow = Workflow::new(
                AuroraServer::new(&cfg.ledger.aurora_url),
                Friendbot::new(&cfg.ledger.friendbot_url),
                PinataClient::new(&cfg.pinata.api_url, "", None),
                &cfg,
            );
            let outcome = workflow.fund_account_id(&account).await?;
            if !outcome.is_funded() {
                bail!("Faucet did not fund {}", account);
            }
            Ok(())
        }
        Commands::Keygen => {
            let keypair = Keypair::random();
            info!("Public key: {}", keypair.public_key());
            info!("Secret key: {}", keypair.secret());
            Ok(())
        }
    }
}
