use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{transfer, Mint, Token, TokenAccount, Transfer},
};

use crate::{
    errors::FlashLoanError,
    introspection::{
        instruction_discriminator, is_matching_loan_instruction, TransactionIntrospector,
    },
    state::{Protocol, PROTOCOL_SEED},
};

/// DO NOT CHANGE THE ORDER OF ACCOUNTS IN THIS STRUCT,
/// ELSE UPDATE THE ACCOUNT INDEX CONSTANTS IN `introspection`:
/// repay recovers the borrowed amount by positional decode of this
/// instruction, and this instruction locates its repay the same way
#[derive(Accounts)]
pub struct Borrow<'info> {
    #[account(mut)]
    pub borrower: Signer<'info>,

    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump,
    )]
    pub protocol: Account<'info, Protocol>,

    /// mint of the token the pool lends out
    pub mint: Account<'info, Mint>,

    /// borrower's token account, created on first borrow if needed
    #[account(
        init_if_needed,
        payer = borrower,
        associated_token::mint = mint,
        associated_token::authority = borrower,
    )]
    pub borrower_token_account: Account<'info, TokenAccount>,

    /// pool's liquidity
    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = protocol,
    )]
    pub pool_token_account: Account<'info, TokenAccount>,

    /// Solana Instructions Sysvar
    /// CHECK: checked using address
    #[account(address = sysvar::instructions::ID @ FlashLoanError::InvalidInstructionsSysvar)]
    pub instructions: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Borrow<'info> {
    #[inline(always)]
    pub fn run(ctx: Context<Self>, amount: u64) -> Result<()> {
        let borrower = &ctx.accounts.borrower;
        let protocol = &ctx.accounts.protocol;
        let borrower_token_account = &ctx.accounts.borrower_token_account;
        let pool_token_account = &ctx.accounts.pool_token_account;
        let instructions = &ctx.accounts.instructions;
        let token_program = &ctx.accounts.token_program;

        require!(amount > 0, FlashLoanError::InvalidAmount);

        let ixs = instructions.to_account_info();
        let introspector = TransactionIntrospector::new(&ixs);

        // borrow must be the first instruction of the transaction, which
        // pins the instruction repay reads the amount back out of
        let current_index = introspector.current_index()?;
        require_eq!(current_index, 0u16, FlashLoanError::InvalidInstruction);

        // a repay for the same borrower / protocol / pool triple must
        // occur later in this same transaction
        let repay_discriminator = instruction_discriminator("repay");
        introspector
            .find_matching(1, |ix| {
                is_matching_loan_instruction(
                    ix,
                    repay_discriminator,
                    &borrower.key(),
                    &protocol.key(),
                    &pool_token_account.key(),
                )
            })?
            .ok_or(FlashLoanError::MissingRepayInstruction)?;

        let seeds: &[&[u8]] = &[PROTOCOL_SEED, &[protocol.bump]];
        transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                Transfer {
                    from: pool_token_account.to_account_info(),
                    to: borrower_token_account.to_account_info(),
                    authority: protocol.to_account_info(),
                },
                &[seeds],
            ),
            amount,
        )
    }
}
