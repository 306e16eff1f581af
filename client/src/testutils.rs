//! In-memory stand-ins for the ledger, faucet and pinning service. Each one
//! records every call so tests can assert on what a workflow sent.

use std::collections::HashMap;
use std::sync::Mutex;

use ledger_api::{Account, AccountId, OperationType, PoolId, Transaction};

use crate::backend::{Faucet, FundingOutcome, LedgerRpc, PinningService};
use crate::error::{ClientError, ResultCodes};
use crate::responses::{LiquidityPoolRecord, PinResponse, SubmitResponse};

pub const INITIAL_SEQUENCE: i64 = 4_294_967_296;
pub const MOCK_CID: &str = "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku";

#[derive(Debug, Default)]
pub struct MockLedger {
    sequences: Mutex<HashMap<AccountId, i64>>,
    loads: Mutex<Vec<AccountId>>,
    submitted: Mutex<Vec<Transaction>>,
    reject: Option<OperationType>,
    pool: Option<LiquidityPoolRecord>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any transaction containing an operation of this type.
    pub fn rejecting(operation_type: OperationType) -> Self {
        MockLedger {
            reject: Some(operation_type),
            ..Self::default()
        }
    }

    pub fn with_pool(mut self, record: LiquidityPoolRecord) -> Self {
        self.pool = Some(record);
        self
    }

    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn loaded_accounts(&self) -> Vec<AccountId> {
        self.loads.lock().unwrap().clone()
    }
}

impl LedgerRpc for MockLedger {
    async fn load_account(&self, account_id: &AccountId) -> Result<Account, ClientError> {
        self.loads.lock().unwrap().push(*account_id);
        let sequence = *self
            .sequences
            .lock()
            .unwrap()
            .entry(*account_id)
            .or_insert(INITIAL_SEQUENCE);
        Ok(Account::new(*account_id, sequence))
    }

    async fn submit_transaction(&self, transaction: &Transaction) -> Result<SubmitResponse, ClientError> {
        if let Some(rejected) = self.reject {
            if transaction.operations().iter().any(|op| op.operation_type() == rejected) {
                return Err(ClientError::TransactionRejected {
                    hash: transaction.hash_hex(),
                    status: 400,
                    title: "Transaction Failed".to_string(),
                    result_codes: ResultCodes {
                        transaction: "tx_failed".to_string(),
                        operations: vec!["op_malformed".to_string()],
                    },
                });
            }
        }
        self.sequences
            .lock()
            .unwrap()
            .insert(transaction.source(), transaction.sequence());
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(transaction.clone());
        Ok(SubmitResponse {
            hash: transaction.hash_hex(),
            ledger: submitted.len() as u32,
            successful: true,
        })
    }

    async fn liquidity_pool(&self, pool_id: &PoolId) -> Result<LiquidityPoolRecord, ClientError> {
        match &self.pool {
            Some(record) => Ok(record.clone()),
            None => Err(ClientError::Status {
                url: format!("mock://liquidity_pools/{}", pool_id),
                status: 404,
                body: "Resource Missing".to_string(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct MockFaucet {
    outcome: FundingOutcome,
    requests: Mutex<Vec<AccountId>>,
}

impl MockFaucet {
    pub fn new() -> Self {
        MockFaucet {
            outcome: FundingOutcome::Funded,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        MockFaucet {
            outcome: FundingOutcome::Rejected {
                status,
                body: "faucet unavailable".to_string(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<AccountId> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockFaucet {
    fn default() -> Self {
        Self::new()
    }
}

impl Faucet for MockFaucet {
    async fn fund(&self, account_id: &AccountId) -> Result<FundingOutcome, ClientError> {
        self.requests.lock().unwrap().push(*account_id);
        Ok(self.outcome.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MockPinning {
    fail: bool,
    uploads: Mutex<Vec<Upload>>,
}

impl MockPinning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        MockPinning {
            fail: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

impl PinningService for MockPinning {
    async fn upload_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<PinResponse, ClientError> {
        self.uploads.lock().unwrap().push(Upload {
            file_name: file_name.to_string(),
            bytes: bytes.clone(),
        });
        if self.fail {
            return Err(ClientError::Status {
                url: "mock://pinning/pinFileToIPFS".to_string(),
                status: 401,
                body: "Unauthorized".to_string(),
            });
        }
        Ok(PinResponse {
            ipfs_hash: MOCK_CID.to_string(),
            pin_size: bytes.len() as u64,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            is_duplicate: None,
        })
    }

    fn gateway_url(&self, cid: &str) -> Option<String> {
        Some(format!("https://gateway.test/ipfs/{}", cid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_api::{Asset, Keypair, Network, Operation, TransactionBuilder, BASE_FEE};

    #[tokio::test]
    async fn test_mock_ledger_tracks_sequence() {
        let ledger = MockLedger::new();
        let kp = Keypair::random();
        let mut account = ledger.load_account(&kp.account_id()).await.unwrap();
        assert_eq!(account.sequence(), INITIAL_SEQUENCE);
        let mut tx = TransactionBuilder::new(&mut account, BASE_FEE, Network::testnet())
            .add_operation(Operation::payment(&kp.account_id(), Asset::native(), "1").unwrap())
            .set_timeout(30)
            .build()
            .unwrap();
        tx.sign(&kp);
        ledger.submit_transaction(&tx).await.unwrap();
        let reloaded = ledger.load_account(&kp.account_id()).await.unwrap();
        assert_eq!(reloaded.sequence(), INITIAL_SEQUENCE + 1);
        assert_eq!(ledger.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_ledger_rejects_configured_operation() {
        let ledger = MockLedger::rejecting(OperationType::Payment);
        let kp = Keypair::random();
        let mut account = ledger.load_account(&kp.account_id()).await.unwrap();
        let tx = TransactionBuilder::new(&mut account, BASE_FEE, Network::testnet())
            .add_operation(Operation::payment(&kp.account_id(), Asset::native(), "1").unwrap())
            .set_timeout(30)
            .build()
            .unwrap();
        let err = ledger.submit_transaction(&tx).await.unwrap_err();
        assert!(matches!(err, ClientError::TransactionRejected { .. }));
        assert!(ledger.submitted().is_empty());
    }
}
