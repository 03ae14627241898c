use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{
    anchor_len::AnchorLen,
    errors::FlashLoanError,
    state::{FeeRate, Protocol, PROTOCOL_SEED},
};

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// pubkey paying for new accounts' rent
    #[account(mut)]
    pub payer: Signer<'info>,

    /// protocol account to be created
    #[account(
        init,
        payer = payer,
        space = Protocol::LEN,
        seeds = [PROTOCOL_SEED],
        bump,
    )]
    pub protocol: Account<'info, Protocol>,

    /// mint of the token the pool lends out
    pub mint: Account<'info, Mint>,

    /// pool token account to be created, authority is the protocol PDA
    #[account(
        init,
        payer = payer,
        associated_token::mint = mint,
        associated_token::authority = protocol,
    )]
    pub pool_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    #[inline(always)]
    pub fn validate(fee_rate: &FeeRate) -> Result<()> {
        fee_rate.validate()
    }

    #[inline(always)]
    pub fn run(ctx: Context<Self>, fee_rate: FeeRate) -> Result<()> {
        let protocol = &mut ctx.accounts.protocol;

        protocol.bump = *ctx
            .bumps
            .get("protocol")
            .ok_or(FlashLoanError::PdaBumpNotCached)?;
        protocol.fee_rate = fee_rate;
        msg!("protocol initialized, fee rate {}", protocol.fee_rate);
        Ok(())
    }
}
