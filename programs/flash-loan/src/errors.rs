use anchor_lang::prelude::*;

#[error_code]
pub enum FlashLoanError {
    #[msg("Borrow amount must be greater than zero")]
    InvalidAmount, // 0x1770

    #[msg("Unexpected instruction position or malformed sibling instruction")]
    InvalidInstruction, // 0x1771

    #[msg("No matching repay instruction found later in the transaction")]
    MissingRepayInstruction, // 0x1772

    #[msg("Fee calculation overflowed")]
    Overflow, // 0x1773

    #[msg("The provided fee rate is invalid")]
    InvalidFee, // 0x1774

    #[msg("Could not find PDA bump")]
    PdaBumpNotCached, // 0x1775

    #[msg("The provided instructions sysvar is invalid")]
    InvalidInstructionsSysvar, // 0x1776
}
