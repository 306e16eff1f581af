use ledger_api::{Account, AccountId, PoolId, Transaction};
use tracing::{debug, info};

use crate::backend::LedgerRpc;
use crate::error::ClientError;
use crate::responses::{AccountResponse, LiquidityPoolRecord, Problem, SubmitResponse};

pub const TESTNET_URL: &str = "https://diamtestnet.diamcircle.io/";

/// REST client for an Aurora (Horizon-compatible) ledger server.
#[derive(Debug, Clone)]
pub struct AuroraServer {
    base_url: String,
    http: reqwest::Client,
}

impl AuroraServer {
    pub fn new(base_url: &str) -> Self {
        AuroraServer {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn account_url(&self, account_id: &AccountId) -> String {
        format!("{}/accounts/{}", self.base_url, account_id)
    }

    pub(crate) fn transactions_url(&self) -> String {
        format!("{}/transactions", self.base_url)
    }

    pub(crate) fn liquidity_pool_url(&self, pool_id: &PoolId) -> String {
        format!("{}/liquidity_pools/{}", self.base_url, pool_id)
    }
}

impl LedgerRpc for AuroraServer {
    async fn load_account(&self, account_id: &AccountId) -> Result<Account, ClientError> {
        let url = self.account_url(account_id);
        debug!("Loading account from {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::transport(&url, e))?;
        if !response.status().is_success() {
            return Err(status_error(&url, response).await);
        }
        let body: AccountResponse = response.json().await.map_err(|e| ClientError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        let sequence = body
            .sequence
            .parse::<i64>()
            .map_err(|_| ClientError::InvalidSequence(body.sequence.clone()))?;
        debug!("Account {} at sequence {}", body.id, sequence);
        Ok(Account::new(*account_id, sequence))
    }

    async fn submit_transaction(&self, transaction: &Transaction) -> Result<SubmitResponse, ClientError> {
        let url = self.transactions_url();
        let hash = transaction.hash_hex();
        let envelope = transaction.to_envelope_base64()?;
        info!(
            "Submitting transaction {} with {} operation(s) from {}",
            hash,
            transaction.operations().len(),
            transaction.source()
        );
        debug!("Envelope: {}", envelope);
        let response = self
            .http
            .post(&url)
            .form(&[("tx", envelope.as_str())])
            .send()
            .await
            .map_err(|e| ClientError::transport(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(&url, e))?;
        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| ClientError::Decode {
                url,
                reason: e.to_string(),
            });
        }
        Err(rejection(&url, &hash, status.as_u16(), body))
    }

    async fn liquidity_pool(&self, pool_id: &PoolId) -> Result<LiquidityPoolRecord, ClientError> {
        let url = self.liquidity_pool_url(pool_id);
        debug!("Querying liquidity pool at {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::transport(&url, e))?;
        if !response.status().is_success() {
            return Err(status_error(&url, response).await);
        }
        response.json().await.map_err(|e| ClientError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

pub(crate) async fn status_error(url: &str, response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    ClientError::Status {
        url: url.to_string(),
        status,
        body,
    }
}

/// Turns a failed submission body into a typed rejection when it carries
/// result codes, and a plain status error otherwise.
fn rejection(url: &str, hash: &str, status: u16, body: String) -> ClientError {
    match serde_json::from_str::<Problem>(&body) {
        Ok(problem) => {
            let extras = problem.extras.unwrap_or_default();
            match extras.result_codes {
                Some(result_codes) => ClientError::TransactionRejected {
                    hash: extras.hash.unwrap_or_else(|| hash.to_string()),
                    status,
                    title: problem.title,
                    result_codes,
                },
                None => ClientError::Status {
                    url: url.to_string(),
                    status,
                    body: if problem.detail.is_empty() { body } else { problem.detail },
                },
            }
        }
        Err(_) => ClientError::Status {
            url: url.to_string(),
            status,
            body,
        },
    }
}
