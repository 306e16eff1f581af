use anyhow::{Context, Result};
use client::aurora::TESTNET_URL;
use client::friendbot::TESTNET_FRIENDBOT_URL;
use client::pinata::PINATA_API_URL;
use ledger_api::network::TESTNET_PASSPHRASE;
use ledger_api::{BASE_FEE, Network};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use submit::SubmitSettings;

pub const PINATA_JWT_VAR: &str = "PINATA_JWT";
pub const GATEWAY_URL_VAR: &str = "GATEWAY_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub pinata: PinataConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub swap: SwapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub aurora_url: String,
    pub friendbot_url: String,
    pub network_passphrase: String,
    pub base_fee: u32,
    /// Validity window of each transaction, in seconds
    pub tx_timeout_secs: u64,
    /// Abort the run when the faucet refuses to fund an account
    pub require_funding: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            aurora_url: TESTNET_URL.to_string(),
            friendbot_url: TESTNET_FRIENDBOT_URL.to_string(),
            network_passphrase: TESTNET_PASSPHRASE.to_string(),
            base_fee: BASE_FEE,
            tx_timeout_secs: 30,
            require_funding: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PinataConfig {
    pub api_url: String,
    /// Read from `PINATA_JWT`, never from the file.
    #[serde(skip)]
    pub jwt: Option<String>,
    /// Read from `GATEWAY_URL`, never from the file.
    #[serde(skip)]
    pub gateway_url: Option<String>,
}

impl Default for PinataConfig {
    fn default() -> Self {
        PinataConfig {
            api_url: PINATA_API_URL.to_string(),
            jwt: None,
            gateway_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub custom_asset_code: String,
    pub issue_amount: String,
    pub pool_fee: i32,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            custom_asset_code: "TradeToken".to_string(),
            issue_amount: "100".to_string(),
            pool_fee: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    pub send_amount: String,
    pub dest_min: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        SwapConfig {
            send_amount: "10".to_string(),
            dest_min: "5".to_string(),
        }
    }
}

impl Config {
    pub fn submit_settings(&self) -> SubmitSettings {
        SubmitSettings {
            network: Network::new(self.ledger.network_passphrase.clone()),
            base_fee: self.ledger.base_fee,
            timeout_secs: self.ledger.tx_timeout_secs,
        }
    }

    /// Fills the pinning secrets from a variable lookup (the process
    /// environment in production).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.pinata.jwt = lookup(PINATA_JWT_VAR).filter(|v| !v.is_empty());
        self.pinata.gateway_url = lookup(GATEWAY_URL_VAR).filter(|v| !v.is_empty());
    }

    /// Names of the environment variables that were not provided.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pinata.jwt.is_none() {
            missing.push(PINATA_JWT_VAR);
        }
        if self.pinata.gateway_url.is_none() {
            missing.push(GATEWAY_URL_VAR);
        }
        missing
    }
}

pub fn read_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let s = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file '{}'", path.as_ref().display()))?;
    let cfg: Config = toml::from_str(&s).context("failed to parse TOML config")?;
    Ok(cfg)
}

/// Looks for `./config/config.toml`, then `CARGO_MANIFEST_DIR/config/config.toml`,
/// and falls back to the built-in testnet defaults.
pub fn read_config_from_toml() -> Result<Config> {
    let cwd_config = PathBuf::from("config").join("config.toml");
    if cwd_config.exists() {
        return read_config(&cwd_config);
    }

    if let Ok(crate_root) = std::env::var("CARGO_MANIFEST_DIR") {
        let cargo_config = PathBuf::from(&crate_root).join("config").join("config.toml");
        if cargo_config.exists() {
            return read_config(&cargo_config);
        }
    }

    Ok(Config::default())
}

/// Loads the file configuration and the secrets from the environment
/// (a `.env` file in the working directory is honoured).
pub fn load(config_file: Option<&Path>) -> Result<Config> {
    dotenv::dotenv().ok();
    let mut cfg = match config_file {
        Some(path) => read_config(path)?,
        None => read_config_from_toml()?,
    };
    cfg.apply_env(|name| std::env::var(name).ok());
    Ok(cfg)
}
