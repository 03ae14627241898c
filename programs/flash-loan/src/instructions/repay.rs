use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token::{transfer, Mint, Token, TokenAccount, Transfer};

use crate::{
    errors::FlashLoanError,
    introspection::{
        decode_borrow_amount, instruction_discriminator, is_matching_loan_instruction,
        TransactionIntrospector,
    },
    state::{Protocol, PROTOCOL_SEED},
};

/// DO NOT CHANGE THE ORDER OF ACCOUNTS IN THIS STRUCT,
/// ELSE UPDATE THE ACCOUNT INDEX CONSTANTS IN `introspection`:
/// the first five accounts mirror `Borrow` so borrow can match this
/// instruction positionally
#[derive(Accounts)]
pub struct Repay<'info> {
    #[account(mut)]
    pub borrower: Signer<'info>,

    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump,
    )]
    pub protocol: Account<'info, Protocol>,

    /// mint of the token the pool lends out
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
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
}

impl<'info> Repay<'info> {
    #[inline(always)]
    pub fn run(ctx: Context<Self>) -> Result<()> {
        let borrower = &ctx.accounts.borrower;
        let protocol = &ctx.accounts.protocol;
        let borrower_token_account = &ctx.accounts.borrower_token_account;
        let pool_token_account = &ctx.accounts.pool_token_account;
        let instructions = &ctx.accounts.instructions;
        let token_program = &ctx.accounts.token_program;

        let ixs = instructions.to_account_info();
        let introspector = TransactionIntrospector::new(&ixs);

        // the paired borrow sits at index 0, the position its own
        // validation forces it into
        let borrow_ix = introspector.instruction_at(0)?;
        require!(
            is_matching_loan_instruction(
                &borrow_ix,
                instruction_discriminator("borrow"),
                &borrower.key(),
                &protocol.key(),
                &pool_token_account.key(),
            ),
            FlashLoanError::InvalidInstruction
        );
        let borrowed_amount = decode_borrow_amount(&borrow_ix)?;

        let fee = protocol.fee_rate.apply(borrowed_amount)?;
        let repay_amount = borrowed_amount
            .checked_add(fee)
            .ok_or(FlashLoanError::Overflow)?;

        transfer(
            CpiContext::new(
                token_program.to_account_info(),
                Transfer {
                    from: borrower_token_account.to_account_info(),
                    to: pool_token_account.to_account_info(),
                    authority: borrower.to_account_info(),
                },
            ),
            repay_amount,
        )
    }
}
