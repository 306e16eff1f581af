use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use stellar_xdr::curr::{self as xdr, Limits, WriteXdr};

use crate::error::{Error, Result};
use crate::keypair::{self, AccountId, DecoratedSignature, Keypair};
use crate::network::Network;
use crate::operation::Operation;

/// Fee per operation, in stroops.
pub const BASE_FEE: u32 = 100;

/// Source account as loaded from the ledger. Building a transaction consumes
/// the next sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    account_id: AccountId,
    sequence: i64,
}

impl Account {
    pub fn new(account_id: AccountId, sequence: i64) -> Self {
        Account {
            account_id,
            sequence,
        }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub min_time: u64,
    /// Zero means no upper bound.
    pub max_time: u64,
}

pub struct TransactionBuilder<'a> {
    source: &'a mut Account,
    base_fee: u32,
    network: Network,
    operations: Vec<Operation>,
    timeout_secs: Option<u64>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(source: &'a mut Account, base_fee: u32, network: Network) -> Self {
        TransactionBuilder {
            source,
            base_fee,
            network,
            operations: Vec::new(),
            timeout_secs: None,
        }
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Validity window from now; `0` means the transaction never expires.
    pub fn set_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = Some(seconds);
        self
    }

    /// Encodes the transaction and fixes its hash. The account's sequence is
    /// only advanced when the build succeeds.
    pub fn build(self) -> Result<Transaction> {
        if self.operations.is_empty() {
            return Err(Error::NoOperations);
        }
        let timeout = self.timeout_secs.ok_or(Error::MissingTimeout)?;
        let max_time = if timeout == 0 {
            0
        } else {
            unix_now() + timeout
        };
        let time_bounds = TimeBounds {
            min_time: 0,
            max_time,
        };
        let fee = self.base_fee.saturating_mul(self.operations.len() as u32);
        let sequence = self.source.sequence + 1;

        let operations = self
            .operations
            .iter()
            .map(xdr::Operation::try_from)
            .collect::<Result<Vec<_>>>()?;
        let envelope_tx = xdr::Transaction {
            source_account: self.source.account_id.into(),
            fee,
            seq_num: xdr::SequenceNumber(sequence),
            cond: xdr::Preconditions::Time(xdr::TimeBounds {
                min_time: xdr::TimePoint(time_bounds.min_time),
                max_time: xdr::TimePoint(time_bounds.max_time),
            }),
            memo: xdr::Memo::None,
            operations: operations.try_into()?,
            ext: xdr::TransactionExt::V0,
        };
        let hash = signature_hash(&self.network, &envelope_tx)?;

        self.source.sequence = sequence;
        Ok(Transaction {
            source: self.source.account_id,
            fee,
            sequence,
            time_bounds,
            operations: self.operations,
            network: self.network,
            envelope_tx,
            hash,
            signatures: Vec::new(),
        })
    }
}

/// SHA-256 of the signature payload: network id, envelope type, transaction.
fn signature_hash(network: &Network, tx: &xdr::Transaction) -> Result<[u8; 32]> {
    let payload = xdr::TransactionSignaturePayload {
        network_id: xdr::Hash(network.id()),
        tagged_transaction: xdr::TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    };
    Ok(Sha256::digest(payload.to_xdr(Limits::none())?).into())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// A built transaction. Its content is fixed; only signatures can be added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    source: AccountId,
    fee: u32,
    sequence: i64,
    time_bounds: TimeBounds,
    operations: Vec<Operation>,
    network: Network,
    envelope_tx: xdr::Transaction,
    hash: [u8; 32],
    signatures: Vec<DecoratedSignature>,
}

impl Transaction {
    pub fn source(&self) -> AccountId {
        self.source
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn time_bounds(&self) -> TimeBounds {
        self.time_bounds
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    /// The unsigned transaction as it goes on the wire.
    pub fn as_xdr(&self) -> &xdr::Transaction {
        &self.envelope_tx
    }

    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn sign(&mut self, keypair: &Keypair) {
        self.signatures.push(keypair.sign_decorated(&self.hash));
    }

    /// True when some attached signature was made by `account` over this transaction.
    pub fn is_signed_by(&self, account: &AccountId) -> bool {
        let hint = account.signature_hint();
        self.signatures
            .iter()
            .any(|s| s.hint == hint && keypair::verify(account, &self.hash, &s.signature))
    }

    pub fn to_envelope(&self) -> Result<xdr::TransactionEnvelope> {
        let signatures = self
            .signatures
            .iter()
            .map(xdr::DecoratedSignature::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
            tx: self.envelope_tx.clone(),
            signatures: signatures.try_into()?,
        }))
    }

    pub fn to_envelope_xdr(&self) -> Result<Vec<u8>> {
        Ok(self.to_envelope()?.to_xdr(Limits::none())?)
    }

    pub fn to_envelope_base64(&self) -> Result<String> {
        Ok(self.to_envelope()?.to_xdr_base64(Limits::none())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Price;
    use crate::asset::{Asset, LiquidityPoolAsset};
    use stellar_xdr::curr::ReadXdr;

    fn build_payment(account: &mut Account, to: &AccountId) -> Transaction {
        TransactionBuilder::new(account, BASE_FEE, Network::testnet())
            .add_operation(Operation::payment(to, Asset::native(), "1").unwrap())
            .set_timeout(30)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_consumes_next_sequence() {
        let kp = Keypair::random();
        let mut account = Account::new(kp.account_id(), 41);
        let tx = build_payment(&mut account, &kp.account_id());
        assert_eq!(tx.sequence(), 42);
        assert_eq!(tx.as_xdr().seq_num, xdr::SequenceNumber(42));
        assert_eq!(account.sequence(), 42);
        let next = build_payment(&mut account, &kp.account_id());
        assert_eq!(next.sequence(), 43);
    }

    #[test]
    fn test_fee_scales_with_operation_count() {
        let kp = Keypair::random();
        let mut account = Account::new(kp.account_id(), 1);
        let op = Operation::manage_data("k", Some(b"v")).unwrap();
        let tx = TransactionBuilder::new(&mut account, BASE_FEE, Network::testnet())
            .add_operation(op.clone())
            .add_operation(op)
            .set_timeout(30)
            .build()
            .unwrap();
        assert_eq!(tx.fee(), 200);
        assert_eq!(tx.as_xdr().fee, 200);
        assert_eq!(tx.as_xdr().operations.len(), 2);
    }

    #[test]
    fn test_time_bounds_follow_timeout() {
        let kp = Keypair::random();
        let mut account = Account::new(kp.account_id(), 1);
        let before = unix_now();
        let tx = build_payment(&mut account, &kp.account_id());
        assert_eq!(tx.time_bounds().min_time, 0);
        assert!(tx.time_bounds().max_time >= before + 30);
        assert!(tx.time_bounds().max_time <= unix_now() + 30);
        match &tx.as_xdr().cond {
            xdr::Preconditions::Time(bounds) => assert_eq!(bounds.max_time.0, tx.time_bounds().max_time),
            other => panic!("expected time bounds, got {:?}", other),
        }
        assert_eq!(tx.as_xdr().memo, xdr::Memo::None);
    }

    #[test]
    fn test_build_requires_operations_and_timeout() {
        let kp = Keypair::random();
        let mut account = Account::new(kp.account_id(), 1);
        let empty = TransactionBuilder::new(&mut account, BASE_FEE, Network::testnet())
            .set_timeout(30)
            .build();
        assert_eq!(empty, Err(Error::NoOperations));
        let no_timeout = TransactionBuilder::new(&mut account, BASE_FEE, Network::testnet())
            .add_operation(Operation::manage_data("k", None).unwrap())
            .build();
        assert_eq!(no_timeout, Err(Error::MissingTimeout));
        assert_eq!(account.sequence(), 1);
    }

    #[test]
    fn test_signature_verifies_against_signer_only() {
        let kp = Keypair::random();
        let other = Keypair::random();
        let mut account = Account::new(kp.account_id(), 1);
        let mut tx = build_payment(&mut account, &other.account_id());
        assert!(!tx.is_signed_by(&kp.account_id()));
        tx.sign(&kp);
        assert_eq!(tx.signatures().len(), 1);
        assert!(tx.is_signed_by(&kp.account_id()));
        assert!(!tx.is_signed_by(&other.account_id()));
    }

    #[test]
    fn test_hash_depends_on_network() {
        let kp = Keypair::random();
        let mut a = Account::new(kp.account_id(), 1);
        let mut b = Account::new(kp.account_id(), 1);
        let op = Operation::manage_data("k", None).unwrap();
        let on_test = TransactionBuilder::new(&mut a, BASE_FEE, Network::testnet())
            .add_operation(op.clone())
            .set_timeout(0)
            .build()
            .unwrap();
        let elsewhere = TransactionBuilder::new(&mut b, BASE_FEE, Network::new("Elsewhere"))
            .add_operation(op)
            .set_timeout(0)
            .build()
            .unwrap();
        assert_eq!(on_test.as_xdr(), elsewhere.as_xdr());
        assert_ne!(on_test.hash(), elsewhere.hash());
    }

    #[test]
    fn test_hash_covers_network_id_and_envelope_type() {
        let kp = Keypair::random();
        let mut account = Account::new(kp.account_id(), 7);
        let tx = build_payment(&mut account, &kp.account_id());

        let mut payload = Network::testnet().id().to_vec();
        payload.extend_from_slice(&2u32.to_be_bytes());
        payload.extend(tx.as_xdr().to_xdr(Limits::none()).unwrap());
        let expected: [u8; 32] = Sha256::digest(payload).into();
        assert_eq!(tx.hash(), expected);
    }

    #[test]
    fn test_signed_envelope_decodes_back() {
        let issuer = Keypair::random();
        let holder = Keypair::random();
        let custom = Asset::new("TradeToken", &issuer.account_id()).unwrap();
        let pool = LiquidityPoolAsset::new(Asset::native(), custom.clone(), 30).unwrap();
        let mut account = Account::new(holder.account_id(), 100);
        let mut tx = TransactionBuilder::new(&mut account, BASE_FEE, Network::testnet())
            .add_operation(Operation::change_trust(pool.clone(), None).unwrap())
            .add_operation(Operation::manage_data("NFTABCD", Some(b"bafkreiexample")).unwrap())
            .add_operation(
                Operation::liquidity_pool_deposit(pool.pool_id(), "10", "20", Price { n: 1, d: 2 }, Price { n: 2, d: 1 })
                    .unwrap(),
            )
            .add_operation(Operation::payment(&holder.account_id(), custom.clone(), "1").unwrap())
            .add_operation(
                Operation::path_payment_strict_send(
                    Asset::native(),
                    "10",
                    &issuer.account_id(),
                    custom,
                    "5",
                    vec![],
                )
                .unwrap(),
            )
            .set_timeout(30)
            .build()
            .unwrap();
        tx.sign(&holder);

        let encoded = tx.to_envelope_base64().unwrap();
        let decoded = xdr::TransactionEnvelope::from_xdr_base64(&encoded, Limits::none()).unwrap();
        assert_eq!(decoded.to_xdr(Limits::none()).unwrap(), tx.to_envelope_xdr().unwrap());
        match decoded {
            xdr::TransactionEnvelope::Tx(envelope) => {
                assert_eq!(&envelope.tx, tx.as_xdr());
                assert_eq!(envelope.tx.operations.len(), 5);
                assert_eq!(envelope.tx.fee, 500);
                assert_eq!(envelope.tx.source_account.clone().account_id().to_string(), holder.public_key());
                assert_eq!(envelope.signatures.len(), 1);
                assert_eq!(envelope.signatures[0].hint.0, holder.account_id().signature_hint());
                let signature: [u8; 64] = envelope.signatures[0].signature.0.as_slice().try_into().unwrap();
                assert!(holder.verify(&tx.hash(), &signature));
            }
            other => panic!("expected a v1 envelope, got {:?}", other),
        }
    }
}
