use anchor_lang::prelude::*;

use std::{convert::TryFrom, fmt};

use crate::{consts::BPS_DENOMINATOR, errors::FlashLoanError};

/// A flat fee levied on every flash loan, expressed in basis points
/// of the borrowed amount.
///
/// Invariants:
///  - bps <= BPS_DENOMINATOR (fee cannot exceed 100% of the principal)
#[derive(Debug, PartialEq, Eq, Clone, Copy, AnchorSerialize, AnchorDeserialize)]
pub struct FeeRate {
    pub bps: u16,
}

impl FeeRate {
    pub fn validate(&self) -> Result<()> {
        if u64::from(self.bps) > BPS_DENOMINATOR {
            return Err(FlashLoanError::InvalidFee.into());
        }
        Ok(())
    }

    /// Computes `floor(amount * bps / 10_000)`.
    ///
    /// The multiplication is widened to u128 before dividing so that the
    /// intermediate product never wraps; inputs whose fee would not fit
    /// back into a u64 error with [`FlashLoanError::Overflow`] instead of
    /// truncating.
    pub fn apply(&self, amount: u64) -> Result<u64> {
        let widened = u128::from(amount)
            .checked_mul(u128::from(self.bps))
            .ok_or(FlashLoanError::Overflow)?;
        u64::try_from(widened / u128::from(BPS_DENOMINATOR))
            .map_err(|_| FlashLoanError::Overflow.into())
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} bps", self.bps)
    }
}
