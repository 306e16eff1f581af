use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};
use stellar_xdr::curr::{self as xdr, Limits, WriteXdr};

use crate::error::{Error, Result};
use crate::keypair::AccountId;

/// The only fee the ledger accepts for constant-product pools, in basis points.
pub const LIQUIDITY_POOL_FEE_V18: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    Native,
    Credit { code: String, issuer: AccountId },
}

impl Asset {
    pub fn native() -> Self {
        Asset::Native
    }

    pub fn new(code: &str, issuer: &AccountId) -> Result<Self> {
        let valid = !code.is_empty() && code.len() <= 12 && code.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(Error::InvalidAssetCode(code.to_string()));
        }
        Ok(Asset::Credit {
            code: code.to_string(),
            issuer: *issuer,
        })
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    pub fn code(&self) -> &str {
        match self {
            Asset::Native => "DIAM",
            Asset::Credit { code, .. } => code,
        }
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Asset::Native => None,
            Asset::Credit { issuer, .. } => Some(issuer),
        }
    }
}

/// Codes up to four characters travel as alphanum4, longer ones as alphanum12,
/// both zero-padded.
impl From<&Asset> for xdr::Asset {
    fn from(asset: &Asset) -> Self {
        match asset {
            Asset::Native => xdr::Asset::Native,
            Asset::Credit { code, issuer } if code.len() <= 4 => {
                let mut padded = [0u8; 4];
                padded[..code.len()].copy_from_slice(code.as_bytes());
                xdr::Asset::CreditAlphanum4(xdr::AlphaNum4 {
                    asset_code: xdr::AssetCode4(padded),
                    issuer: (*issuer).into(),
                })
            }
            Asset::Credit { code, issuer } => {
                let mut padded = [0u8; 12];
                padded[..code.len()].copy_from_slice(code.as_bytes());
                xdr::Asset::CreditAlphanum12(xdr::AlphaNum12 {
                    asset_code: xdr::AssetCode12(padded),
                    issuer: (*issuer).into(),
                })
            }
        }
    }
}

/// Ledger ordering: native first, then alphanum4, then alphanum12; within a
/// type by padded code, then by issuer key.
impl Ord for Asset {
    fn cmp(&self, other: &Self) -> Ordering {
        xdr::Asset::from(self).cmp(&xdr::Asset::from(other))
    }
}

impl PartialOrd for Asset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `native` or `CODE:ISSUER`, the format Aurora uses in pool reserves.
impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => f.write_str("native"),
            Asset::Credit { code, issuer } => write!(f, "{}:{}", code, issuer),
        }
    }
}

impl FromStr for Asset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "native" {
            return Ok(Asset::Native);
        }
        let (code, issuer) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidAssetCode(s.to_string()))?;
        Asset::new(code, &issuer.parse()?)
    }
}

/// Share asset of a constant-product pool over an ordered asset pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiquidityPoolAsset {
    asset_a: Asset,
    asset_b: Asset,
    fee: i32,
    pool_id: PoolId,
}

impl LiquidityPoolAsset {
    pub fn new(asset_a: Asset, asset_b: Asset, fee: i32) -> Result<Self> {
        if asset_a >= asset_b {
            return Err(Error::AssetsOutOfOrder {
                a: asset_a.to_string(),
                b: asset_b.to_string(),
            });
        }
        if fee != LIQUIDITY_POOL_FEE_V18 {
            return Err(Error::InvalidPoolFee(fee));
        }
        let params = constant_product(&asset_a, &asset_b, fee);
        let pool_id = PoolId(Sha256::digest(params.to_xdr(Limits::none())?).into());
        Ok(LiquidityPoolAsset {
            asset_a,
            asset_b,
            fee,
            pool_id,
        })
    }

    pub fn asset_a(&self) -> &Asset {
        &self.asset_a
    }

    pub fn asset_b(&self) -> &Asset {
        &self.asset_b
    }

    pub fn fee(&self) -> i32 {
        self.fee
    }

    /// SHA-256 of the XDR-encoded pool parameters.
    pub fn pool_id(&self) -> PoolId {
        self.pool_id
    }
}

fn constant_product(asset_a: &Asset, asset_b: &Asset, fee: i32) -> xdr::LiquidityPoolParameters {
    xdr::LiquidityPoolParameters::LiquidityPoolConstantProduct(xdr::LiquidityPoolConstantProductParameters {
        asset_a: asset_a.into(),
        asset_b: asset_b.into(),
        fee,
    })
}

impl From<&LiquidityPoolAsset> for xdr::LiquidityPoolParameters {
    fn from(pool: &LiquidityPoolAsset) -> Self {
        constant_product(&pool.asset_a, &pool.asset_b, pool.fee)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId([u8; 32]);

impl PoolId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        PoolId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for PoolId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidPoolId(s.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidPoolId(s.to_string()))?;
        Ok(PoolId(bytes))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolId({})", self.to_hex())
    }
}

impl From<PoolId> for xdr::PoolId {
    fn from(id: PoolId) -> Self {
        xdr::PoolId(xdr::Hash(id.0))
    }
}

/// What a change-trust operation can point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeTrustAsset {
    Asset(Asset),
    PoolShare(LiquidityPoolAsset),
}

impl From<Asset> for ChangeTrustAsset {
    fn from(asset: Asset) -> Self {
        ChangeTrustAsset::Asset(asset)
    }
}

impl From<LiquidityPoolAsset> for ChangeTrustAsset {
    fn from(pool: LiquidityPoolAsset) -> Self {
        ChangeTrustAsset::PoolShare(pool)
    }
}

impl fmt::Display for ChangeTrustAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeTrustAsset::Asset(asset) => asset.fmt(f),
            ChangeTrustAsset::PoolShare(pool) => write!(f, "pool:{}", pool.pool_id()),
        }
    }
}

impl From<&ChangeTrustAsset> for xdr::ChangeTrustAsset {
    fn from(line: &ChangeTrustAsset) -> Self {
        match line {
            ChangeTrustAsset::Asset(asset) => match xdr::Asset::from(asset) {
                xdr::Asset::Native => xdr::ChangeTrustAsset::Native,
                xdr::Asset::CreditAlphanum4(a) => xdr::ChangeTrustAsset::CreditAlphanum4(a),
                xdr::Asset::CreditAlphanum12(a) => xdr::ChangeTrustAsset::CreditAlphanum12(a),
            },
            ChangeTrustAsset::PoolShare(pool) => xdr::ChangeTrustAsset::PoolShare(pool.into()),
        }
    }
}
