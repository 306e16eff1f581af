use stellar_xdr::curr as xdr;

use crate::amount::{self, MAX_AMOUNT, Price};
use crate::asset::{Asset, ChangeTrustAsset, PoolId};
use crate::error::{Error, Result};
use crate::keypair::AccountId;

const MAX_DATA_ENTRY_BYTES: usize = 64;
const MAX_PATH_LEN: usize = 5;

/// The operations this crate can build, with their wire discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum OperationType {
    Payment = 1,
    ChangeTrust = 6,
    ManageData = 10,
    PathPaymentStrictSend = 13,
    LiquidityPoolDeposit = 22,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationBody {
    Payment {
        destination: AccountId,
        asset: Asset,
        amount: i64,
    },
    ChangeTrust {
        line: ChangeTrustAsset,
        limit: i64,
    },
    ManageData {
        name: String,
        value: Option<Vec<u8>>,
    },
    PathPaymentStrictSend {
        send_asset: Asset,
        send_amount: i64,
        destination: AccountId,
        dest_asset: Asset,
        dest_min: i64,
        path: Vec<Asset>,
    },
    LiquidityPoolDeposit {
        pool_id: PoolId,
        max_amount_a: i64,
        max_amount_b: i64,
        min_price: Price,
        max_price: Price,
    },
}

impl OperationBody {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::Payment { .. } => OperationType::Payment,
            OperationBody::ChangeTrust { .. } => OperationType::ChangeTrust,
            OperationBody::ManageData { .. } => OperationType::ManageData,
            OperationBody::PathPaymentStrictSend { .. } => OperationType::PathPaymentStrictSend,
            OperationBody::LiquidityPoolDeposit { .. } => OperationType::LiquidityPoolDeposit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Overrides the transaction source when set.
    pub source: Option<AccountId>,
    pub body: OperationBody,
}

impl Operation {
    fn new(body: OperationBody) -> Self {
        Operation { source: None, body }
    }

    pub fn with_source(mut self, source: AccountId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn operation_type(&self) -> OperationType {
        self.body.operation_type()
    }

    pub fn payment(destination: &AccountId, asset: Asset, amount: &str) -> Result<Self> {
        Ok(Self::new(OperationBody::Payment {
            destination: *destination,
            asset,
            amount: amount::to_stroops(amount)?,
        }))
    }

    /// Trustline to an asset or pool share. `limit` defaults to the maximum amount.
    pub fn change_trust(line: impl Into<ChangeTrustAsset>, limit: Option<&str>) -> Result<Self> {
        let line = line.into();
        if matches!(line, ChangeTrustAsset::Asset(Asset::Native)) {
            return Err(Error::NativeTrustline);
        }
        Ok(Self::new(OperationBody::ChangeTrust {
            line,
            limit: amount::to_stroops(limit.unwrap_or(MAX_AMOUNT))?,
        }))
    }

    /// Sets (or with `None` deletes) a data entry on the source account.
    pub fn manage_data(name: &str, value: Option<&[u8]>) -> Result<Self> {
        if name.is_empty() || name.len() > MAX_DATA_ENTRY_BYTES {
            return Err(Error::DataEntryTooLong {
                field: "name",
                len: name.len(),
            });
        }
        if let Some(v) = value {
            if v.len() > MAX_DATA_ENTRY_BYTES {
                return Err(Error::DataEntryTooLong {
                    field: "value",
                    len: v.len(),
                });
            }
        }
        Ok(Self::new(OperationBody::ManageData {
            name: name.to_string(),
            value: value.map(<[u8]>::to_vec),
        }))
    }

    pub fn path_payment_strict_send(
        send_asset: Asset,
        send_amount: &str,
        destination: &AccountId,
        dest_asset: Asset,
        dest_min: &str,
        path: Vec<Asset>,
    ) -> Result<Self> {
        if path.len() > MAX_PATH_LEN {
            return Err(Error::PathTooLong(path.len()));
        }
        Ok(Self::new(OperationBody::PathPaymentStrictSend {
            send_asset,
            send_amount: amount::to_stroops(send_amount)?,
            destination: *destination,
            dest_asset,
            dest_min: amount::to_stroops(dest_min)?,
            path,
        }))
    }

    pub fn liquidity_pool_deposit(
        pool_id: PoolId,
        max_amount_a: &str,
        max_amount_b: &str,
        min_price: Price,
        max_price: Price,
    ) -> Result<Self> {
        Ok(Self::new(OperationBody::LiquidityPoolDeposit {
            pool_id,
            max_amount_a: amount::to_stroops(max_amount_a)?,
            max_amount_b: amount::to_stroops(max_amount_b)?,
            min_price,
            max_price,
        }))
    }
}

impl TryFrom<&Operation> for xdr::Operation {
    type Error = Error;

    fn try_from(op: &Operation) -> Result<Self> {
        let body = match &op.body {
            OperationBody::Payment {
                destination,
                asset,
                amount,
            } => xdr::OperationBody::Payment(xdr::PaymentOp {
                destination: (*destination).into(),
                asset: asset.into(),
                amount: *amount,
            }),
            OperationBody::ChangeTrust { line, limit } => xdr::OperationBody::ChangeTrust(xdr::ChangeTrustOp {
                line: line.into(),
                limit: *limit,
            }),
            OperationBody::ManageData { name, value } => xdr::OperationBody::ManageData(xdr::ManageDataOp {
                data_name: xdr::String64(name.as_str().try_into()?),
                data_value: value
                    .as_ref()
                    .map(|v| v.clone().try_into().map(xdr::DataValue))
                    .transpose()?,
            }),
            OperationBody::PathPaymentStrictSend {
                send_asset,
                send_amount,
                destination,
                dest_asset,
                dest_min,
                path,
            } => xdr::OperationBody::PathPaymentStrictSend(xdr::PathPaymentStrictSendOp {
                send_asset: send_asset.into(),
                send_amount: *send_amount,
                destination: (*destination).into(),
                dest_asset: dest_asset.into(),
                dest_min: *dest_min,
                path: path.iter().map(xdr::Asset::from).collect::<Vec<_>>().try_into()?,
            }),
            OperationBody::LiquidityPoolDeposit {
                pool_id,
                max_amount_a,
                max_amount_b,
                min_price,
                max_price,
            } => xdr::OperationBody::LiquidityPoolDeposit(xdr::LiquidityPoolDepositOp {
                liquidity_pool_id: (*pool_id).into(),
                max_amount_a: *max_amount_a,
                max_amount_b: *max_amount_b,
                min_price: (*min_price).into(),
                max_price: (*max_price).into(),
            }),
        };
        Ok(xdr::Operation {
            source_account: op.source.map(Into::into),
            body,
        })
    }
}
