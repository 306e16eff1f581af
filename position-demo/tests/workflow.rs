use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use client::FundingOutcome;
use client::responses::{LiquidityPoolRecord, Reserve};
use client::testutils::{MOCK_CID, MockFaucet, MockLedger, MockPinning};
use ledger_api::{Asset, ChangeTrustAsset, LiquidityPoolAsset, OperationBody, OperationType};
use position_demo::config::Config;
use position_demo::workflow::{Participants, Workflow};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Log sink shared between a scoped subscriber and the test body.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn pool_record(id: &str) -> LiquidityPoolRecord {
    LiquidityPoolRecord {
        id: id.to_string(),
        fee_bp: 30,
        pool_type: "constant_product".to_string(),
        total_trustlines: "1".to_string(),
        total_shares: "14.1421356".to_string(),
        reserves: vec![
            Reserve {
                asset: "native".to_string(),
                amount: "10.0000000".to_string(),
            },
            Reserve {
                asset: "TradeToken".to_string(),
                amount: "20.0000000".to_string(),
            },
        ],
    }
}

#[tokio::test]
async fn test_full_run_submits_steps_in_order() -> Result<()> {
    init_tracing();
    let participants = Participants::random();
    let custom = Asset::new("TradeToken", &participants.issuer.account_id())?;
    let pool_id = LiquidityPoolAsset::new(Asset::native(), custom.clone(), 30)?.pool_id();

    let workflow = Workflow::new(
        MockLedger::new().with_pool(pool_record(&pool_id.to_hex())),
        MockFaucet::new(),
        MockPinning::new(),
        &Config::default(),
    );
    let report = workflow.run(&participants).await?;

    assert_eq!(
        workflow.faucet().requests(),
        vec![
            participants.issuer.account_id(),
            participants.distributor.account_id(),
            participants.buyer.account_id(),
        ]
    );

    let submitted = workflow.ledger().submitted();
    let shapes: Vec<(_, Vec<OperationType>)> = submitted
        .iter()
        .map(|tx| (tx.source(), tx.operations().iter().map(|op| op.operation_type()).collect()))
        .collect();
    let distributor = participants.distributor.account_id();
    let buyer = participants.buyer.account_id();
    let issuer = participants.issuer.account_id();
    assert_eq!(
        shapes,
        vec![
            (distributor, vec![OperationType::ChangeTrust]),
            (buyer, vec![OperationType::ChangeTrust]),
            (issuer, vec![OperationType::Payment]),
            (distributor, vec![OperationType::ChangeTrust]),
            (distributor, vec![OperationType::ChangeTrust]),
            (distributor, vec![OperationType::ManageData]),
            (
                distributor,
                vec![OperationType::LiquidityPoolDeposit, OperationType::Payment]
            ),
            (buyer, vec![OperationType::PathPaymentStrictSend]),
        ]
    );
    for tx in &submitted {
        assert!(tx.is_signed_by(&tx.source()));
        assert_eq!(tx.signatures().len(), 1);
    }

    assert_eq!(report.pool_id, pool_id.to_hex());
    assert_eq!(report.metadata_cid, MOCK_CID);
    assert_eq!(report.transactions.len(), submitted.len());
    assert_eq!(report.pool, Some(pool_record(&pool_id.to_hex())));
    Ok(())
}

#[tokio::test]
async fn test_pool_trustline_and_metadata_pointer() -> Result<()> {
    init_tracing();
    let participants = Participants::random();
    let workflow = Workflow::new(MockLedger::new(), MockFaucet::new(), MockPinning::new(), &Config::default());
    workflow.run(&participants).await?;

    let submitted = workflow.ledger().submitted();
    let custom = Asset::new("TradeToken", &participants.issuer.account_id())?;
    let pool = LiquidityPoolAsset::new(Asset::native(), custom, 30)?;
    assert_eq!(
        submitted[3].operations()[0].body,
        OperationBody::ChangeTrust {
            line: ChangeTrustAsset::PoolShare(pool),
            limit: i64::MAX,
        }
    );

    let distributor_key = participants.distributor.public_key();
    let nft_name = format!("NFT{}", &distributor_key[distributor_key.len() - 4..]);
    assert_eq!(
        submitted[5].operations()[0].body,
        OperationBody::ManageData {
            name: nft_name,
            value: Some(MOCK_CID.as_bytes().to_vec()),
        }
    );

    let uploads = workflow.pinning().uploads();
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].file_name.starts_with("metadata_"));
    assert!(uploads[0].file_name.ends_with(".json"));
    let metadata: serde_json::Value = serde_json::from_slice(&uploads[0].bytes)?;
    assert_eq!(metadata["userPublicKey"], distributor_key);
    Ok(())
}

#[tokio::test]
async fn test_fund_account_makes_one_request() -> Result<()> {
    let workflow = Workflow::new(MockLedger::new(), MockFaucet::new(), MockPinning::new(), &Config::default());
    let participants = Participants::random();
    let outcome = workflow.fund_account(&participants.buyer).await?;
    assert_eq!(outcome, FundingOutcome::Funded);
    assert_eq!(workflow.faucet().requests(), vec![participants.buyer.account_id()]);
    Ok(())
}

#[tokio::test]
async fn test_faucet_refusal_is_reported_not_raised() -> Result<()> {
    let workflow = Workflow::new(
        MockLedger::new(),
        MockFaucet::rejecting(503),
        MockPinning::new(),
        &Config::default(),
    );
    let participants = Participants::random();
    let outcome = workflow.fund_account(&participants.issuer).await?;
    assert!(matches!(outcome, FundingOutcome::Rejected { status: 503, .. }));
    assert_eq!(workflow.faucet().requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_run_stops_when_funding_is_refused() {
    init_tracing();
    let workflow = Workflow::new(
        MockLedger::new(),
        MockFaucet::rejecting(400),
        MockPinning::new(),
        &Config::default(),
    );
    let result = workflow.run(&Participants::random()).await;
    assert!(result.is_err());
    assert_eq!(workflow.faucet().requests().len(), 1);
    assert!(workflow.ledger().submitted().is_empty());
}

#[tokio::test]
async fn test_run_continues_past_refused_funding_when_allowed() -> Result<()> {
    init_tracing();
    let mut config = Config::default();
    config.ledger.require_funding = false;
    let workflow = Workflow::new(MockLedger::new(), MockFaucet::rejecting(400), MockPinning::new(), &config);
    workflow.run(&Participants::random()).await?;
    assert_eq!(workflow.faucet().requests().len(), 3);
    assert_eq!(workflow.ledger().submitted().len(), 8);
    Ok(())
}

#[tokio::test]
async fn test_upload_failure_skips_on_chain_pointer() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let workflow = Workflow::new(MockLedger::new(), MockFaucet::new(), MockPinning::failing(), &Config::default());
    let result = workflow.run(&Participants::random()).await;

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to upload metadata"));
    assert_eq!(workflow.pinning().uploads().len(), 1);
    let submitted = workflow.ledger().submitted();
    assert!(submitted.iter().all(|tx| {
        tx.operations().iter().all(|op| {
            op.operation_type() != OperationType::ManageData
                && op.operation_type() != OperationType::LiquidityPoolDeposit
        })
    }));
    assert_eq!(submitted.len(), 5);
    assert!(logs.contents().contains("Error uploading metadata to IPFS"));
}

#[tokio::test]
async fn test_pool_query_failure_does_not_stop_run() -> Result<()> {
    init_tracing();
    let workflow = Workflow::new(MockLedger::new(), MockFaucet::new(), MockPinning::new(), &Config::default());
    let report = workflow.run(&Participants::random()).await?;
    assert_eq!(report.pool, None);
    let last = workflow.ledger().submitted().pop().unwrap();
    assert_eq!(last.operations()[0].operation_type(), OperationType::PathPaymentStrictSend);
    Ok(())
}

#[tokio::test]
async fn test_ledger_rejection_ends_run() {
    init_tracing();
    let workflow = Workflow::new(
        MockLedger::rejecting(OperationType::ChangeTrust),
        MockFaucet::new(),
        MockPinning::new(),
        &Config::default(),
    );
    let result = workflow.run(&Participants::random()).await;
    let err = result.unwrap_err();
    assert!(err.downcast_ref::<client::ClientError>().is_some());
    assert!(workflow.ledger().submitted().is_empty());
    assert!(workflow.pinning().uploads().is_empty());
}
