use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use stellar_xdr::curr as xdr;

use crate::error::{Error, Result};

/// Amounts on the wire are int64 counts of 10^-7 units.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;
const MAX_DECIMALS: u32 = 7;

/// Largest representable amount, used as the default trustline limit.
pub const MAX_AMOUNT: &str = "922337203685.4775807";

/// Parses a decimal amount string ("10", "0.5") into stroops.
/// Zero and negative amounts are rejected.
pub fn to_stroops(amount: &str) -> Result<i64> {
    let invalid = |reason: &str| Error::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.to_string(),
    };
    let value = Decimal::from_str(amount.trim()).map_err(|_| invalid("not a decimal number"))?;
    if value <= Decimal::ZERO {
        return Err(invalid("must be positive"));
    }
    if value.normalize().scale() > MAX_DECIMALS {
        return Err(invalid("more than 7 decimal places"));
    }
    value
        .checked_mul(Decimal::from(STROOPS_PER_UNIT))
        .and_then(|stroops| stroops.to_i64())
        .ok_or_else(|| invalid("exceeds int64 range"))
}

pub fn from_stroops(stroops: i64) -> String {
    Decimal::new(stroops, MAX_DECIMALS).normalize().to_string()
}

/// Rational price `n / d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

impl Price {
    pub fn new(n: i32, d: i32) -> Result<Self> {
        if n <= 0 || d <= 0 {
            return Err(Error::InvalidPrice { n, d });
        }
        Ok(Price { n, d })
    }
}

impl From<Price> for xdr::Price {
    fn from(price: Price) -> Self {
        xdr::Price {
            n: price.n,
            d: price.d,
        }
    }
}
