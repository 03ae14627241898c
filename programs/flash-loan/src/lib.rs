use anchor_lang::prelude::*;

#[cfg(feature = "local-testing")]
declare_id!("G4okn2QahHgpjdFEC9UBxUZhjWN1YiizAeVWj8ZGTBR7");

#[cfg(not(feature = "local-testing"))]
declare_id!("BxkfU44GdLTBR9LFUDSeK7QtidYN8qiPydbEoiNFfeFM");

pub mod anchor_len;
pub mod consts;
pub mod errors;
pub mod instructions;
pub mod introspection;
pub mod state;

use instructions::*;
use state::*;

#[program]
pub mod flash_loan {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, fee_rate: FeeRate) -> Result<()> {
        Initialize::validate(&fee_rate)?;
        Initialize::run(ctx, fee_rate)
    }

    pub fn borrow(ctx: Context<Borrow>, amount: u64) -> Result<()> {
        Borrow::run(ctx, amount)
    }

    pub fn repay(ctx: Context<Repay>) -> Result<()> {
        Repay::run(ctx)
    }
}
