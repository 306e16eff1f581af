use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;
use stellar_strkey::ed25519;
use stellar_xdr::curr as xdr;

use crate::error::{Error, Result};

/// An ed25519 account identifier, displayed as a `G...` strkey.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 32]);

impl AccountId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_strkey(&self) -> String {
        ed25519::PublicKey(self.0).to_string()
    }

    /// Last four bytes of the key, used to tag signatures.
    pub fn signature_hint(&self) -> [u8; 4] {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.0[28..]);
        hint
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ed25519::PublicKey::from_string(s)
            .map(|key| AccountId(key.0))
            .map_err(|_| Error::InvalidStrKey(s.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_strkey())
    }
}

impl From<AccountId> for xdr::AccountId {
    fn from(account: AccountId) -> Self {
        xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(account.0)))
    }
}

impl From<AccountId> for xdr::MuxedAccount {
    fn from(account: AccountId) -> Self {
        xdr::MuxedAccount::Ed25519(xdr::Uint256(account.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: [u8; 64],
}

impl TryFrom<&DecoratedSignature> for xdr::DecoratedSignature {
    type Error = Error;

    fn try_from(sig: &DecoratedSignature) -> Result<Self> {
        Ok(xdr::DecoratedSignature {
            hint: xdr::SignatureHint(sig.hint),
            signature: xdr::Signature(sig.signature.to_vec().try_into()?),
        })
    }
}

/// Signing key pair for a ledger account.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a keypair from 32 bytes of OS randomness.
    pub fn random() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Keypair {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parses an `S...` secret seed.
    pub fn from_secret(secret: &str) -> Result<Self> {
        let seed = ed25519::PrivateKey::from_string(secret)
            .map_err(|_| Error::InvalidStrKey("secret seed".to_string()))?;
        Ok(Self::from_seed(&seed.0))
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(self.signing_key.verifying_key().to_bytes())
    }

    pub fn public_key(&self) -> String {
        self.account_id().to_strkey()
    }

    pub fn secret(&self) -> String {
        ed25519::PrivateKey(self.signing_key.to_bytes()).to_string()
    }

    pub fn sign(&self, data: &[u8]) -> [u8; 64] {
        self.signing_key.sign(data).to_bytes()
    }

    pub fn sign_decorated(&self, data: &[u8]) -> DecoratedSignature {
        DecoratedSignature {
            hint: self.account_id().signature_hint(),
            signature: self.sign(data),
        }
    }

    pub fn verify(&self, data: &[u8], signature: &[u8; 64]) -> bool {
        verify(&self.account_id(), data, signature)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Checks an ed25519 signature against an account's public key.
pub fn verify(account: &AccountId, data: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(account.as_bytes()) else {
        return false;
    };
    key.verify(data, &Signature::from_bytes(signature)).is_ok()
}
