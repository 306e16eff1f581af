use sha2::{Digest, Sha256};

/// Passphrase of the public Diamante test network.
pub const TESTNET_PASSPHRASE: &str = "Diamante Testnet 2024";

/// A network is identified by the SHA-256 of its passphrase; the id is mixed
/// into every transaction hash so signatures cannot be replayed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    passphrase: String,
}

impl Network {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Network {
            passphrase: passphrase.into(),
        }
    }

    pub fn testnet() -> Self {
        Self::new(TESTNET_PASSPHRASE)
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn id(&self) -> [u8; 32] {
        Sha256::digest(self.passphrase.as_bytes()).into()
    }
}
