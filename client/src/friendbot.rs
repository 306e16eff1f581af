use ledger_api::AccountId;
use tracing::debug;

use crate::backend::{Faucet, FundingOutcome};
use crate::error::ClientError;

pub const TESTNET_FRIENDBOT_URL: &str = "https://friendbot.diamcircle.io";

/// Test-network faucet: one GET per account, `?addr=<public key>`.
#[derive(Debug, Clone)]
pub struct Friendbot {
    url: String,
    http: reqwest::Client,
}

impl Friendbot {
    pub fn new(url: &str) -> Self {
        Friendbot {
            url: url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn funding_url(&self, account_id: &AccountId) -> String {
        format!("{}?addr={}", self.url, account_id)
    }
}

impl Faucet for Friendbot {
    async fn fund(&self, account_id: &AccountId) -> Result<FundingOutcome, ClientError> {
        let url = self.funding_url(account_id);
        debug!("Requesting funds from {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::transport(&url, e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(FundingOutcome::Funded);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        debug!("Faucet answered {} for {}: {}", status, account_id, body);
        Ok(FundingOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
