//! The three remote services a workflow talks to. Production code uses the
//! HTTP clients in this crate; tests swap in the recorders from `testutils`.

use std::future::Future;

use ledger_api::{Account, AccountId, PoolId, Transaction};

use crate::error::ClientError;
use crate::responses::{LiquidityPoolRecord, PinResponse, SubmitResponse};

pub trait LedgerRpc {
    fn load_account(
        &self,
        account_id: &AccountId,
    ) -> impl Future<Output = Result<Account, ClientError>> + Send;

    fn submit_transaction(
        &self,
        transaction: &Transaction,
    ) -> impl Future<Output = Result<SubmitResponse, ClientError>> + Send;

    fn liquidity_pool(
        &self,
        pool_id: &PoolId,
    ) -> impl Future<Output = Result<LiquidityPoolRecord, ClientError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingOutcome {
    Funded,
    /// The faucet answered with a non-success status.
    Rejected { status: u16, body: String },
}

impl FundingOutcome {
    pub fn is_funded(&self) -> bool {
        matches!(self, FundingOutcome::Funded)
    }
}

pub trait Faucet {
    fn fund(
        &self,
        account_id: &AccountId,
    ) -> impl Future<Output = Result<FundingOutcome, ClientError>> + Send;
}

pub trait PinningService {
    fn upload_file(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> impl Future<Output = Result<PinResponse, ClientError>> + Send;

    /// Public retrieval link for a pinned CID, if a gateway is configured.
    fn gateway_url(&self, _cid: &str) -> Option<String> {
        None
    }
}
