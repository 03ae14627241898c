//! Read access to the instruction list of the currently executing
//! transaction, via the instructions sysvar.
//!
//! The loan has no account of its own; borrow and repay each prove the
//! other leg exists by decoding sibling instructions from this list.

use anchor_lang::{
    prelude::*,
    solana_program::{
        hash::hash,
        instruction::Instruction,
        sysvar::instructions::{load_current_index_checked, load_instruction_at_checked},
    },
};

use crate::errors::FlashLoanError;

pub const BORROWER_ACCOUNT_IDX: usize = 0;
pub const PROTOCOL_ACCOUNT_IDX: usize = 1;
pub const BORROWER_TOKEN_ACCOUNT_IDX: usize = 3;
pub const POOL_TOKEN_ACCOUNT_IDX: usize = 4;

/// Byte range of the `amount` argument in a borrow instruction's data,
/// immediately after the 8-byte discriminator
pub const BORROW_AMOUNT_RANGE: std::ops::Range<usize> = 8..16;

/// Reader over the instructions sysvar of the enclosing transaction.
pub struct TransactionIntrospector<'a, 'info> {
    instructions_sysvar: &'a AccountInfo<'info>,
}

impl<'a, 'info> TransactionIntrospector<'a, 'info> {
    pub fn new(instructions_sysvar: &'a AccountInfo<'info>) -> Self {
        Self {
            instructions_sysvar,
        }
    }

    /// Position of the instruction presently executing.
    pub fn current_index(&self) -> Result<u16> {
        Ok(load_current_index_checked(self.instructions_sysvar)?)
    }

    /// Decoded instruction at `index`, foreign programs included.
    /// Errors with `InvalidInstruction` if `index` is out of range.
    pub fn instruction_at(&self, index: usize) -> Result<Instruction> {
        load_instruction_at_checked(index, self.instructions_sysvar)
            .map_err(|_| FlashLoanError::InvalidInstruction.into())
    }

    /// Total number of instructions in the transaction: the leading
    /// u16 LE of the sysvar data.
    pub fn num_instructions(&self) -> Result<usize> {
        let data = self.instructions_sysvar.try_borrow_data()?;
        let count = data
            .get(..2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .ok_or(FlashLoanError::InvalidInstruction)?;
        Ok(count as usize)
    }

    /// Scans forward from `from_index`, returning the first instruction
    /// the predicate accepts. Instructions the predicate rejects are
    /// skipped, never treated as an error.
    pub fn find_matching(
        &self,
        from_index: usize,
        predicate: impl Fn(&Instruction) -> bool,
    ) -> Result<Option<(usize, Instruction)>> {
        for index in from_index..self.num_instructions()? {
            let ix = self.instruction_at(index)?;
            if predicate(&ix) {
                return Ok(Some((index, ix)));
            }
        }
        Ok(None)
    }
}

/// Anchor's 8-byte instruction discriminator: sha256("global:<name>")[..8]
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(format!("global:{}", name).as_bytes()).to_bytes()[..8]);
    discriminator
}

/// Whether `ix` is this program's loan instruction carrying `discriminator`
/// and naming the same borrower / protocol / pool token account triple.
pub fn is_matching_loan_instruction(
    ix: &Instruction,
    discriminator: [u8; 8],
    borrower: &Pubkey,
    protocol: &Pubkey,
    pool_token_account: &Pubkey,
) -> bool {
    if ix.program_id != crate::ID {
        return false;
    }
    if !ix.data.get(..8).map_or(false, |d| d == discriminator) {
        return false;
    }
    let account_at = |idx: usize| ix.accounts.get(idx).map(|meta| meta.pubkey);
    account_at(BORROWER_ACCOUNT_IDX) == Some(*borrower)
        && account_at(PROTOCOL_ACCOUNT_IDX) == Some(*protocol)
        && account_at(POOL_TOKEN_ACCOUNT_IDX) == Some(*pool_token_account)
}

/// Recovers the `amount` argument from a borrow instruction's data.
pub fn decode_borrow_amount(ix: &Instruction) -> Result<u64> {
    let bytes: [u8; 8] = ix
        .data
        .get(BORROW_AMOUNT_RANGE)
        .and_then(|b| b.try_into().ok())
        .ok_or(FlashLoanError::InvalidInstruction)?;
    Ok(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::instruction::AccountMeta;

    fn loan_instruction_data(name: &str, amount: Option<u64>) -> Vec<u8> {
        let mut data = instruction_discriminator(name).to_vec();
        if let Some(amount) = amount {
            data.extend_from_slice(&amount.to_le_bytes());
        }
        data
    }

    fn loan_instruction(
        program_id: Pubkey,
        name: &str,
        amount: Option<u64>,
        borrower: Pubkey,
        protocol: Pubkey,
        pool_token_account: Pubkey,
    ) -> Instruction {
        Instruction {
            program_id,
            accounts: vec![
                AccountMeta::new(borrower, true),
                AccountMeta::new_readonly(protocol, false),
                AccountMeta::new_readonly(Pubkey::new_unique(), false), // mint
                AccountMeta::new(Pubkey::new_unique(), false),          // borrower ata
                AccountMeta::new(pool_token_account, false),
            ],
            data: loan_instruction_data(name, amount),
        }
    }

    #[test]
    fn matches_repay_with_same_triple() {
        let borrower = Pubkey::new_unique();
        let protocol = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let ix = loan_instruction(crate::ID, "repay", None, borrower, protocol, pool);
        assert!(is_matching_loan_instruction(
            &ix,
            instruction_discriminator("repay"),
            &borrower,
            &protocol,
            &pool,
        ));
    }

    #[test]
    fn rejects_foreign_program() {
        let borrower = Pubkey::new_unique();
        let protocol = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let ix = loan_instruction(Pubkey::new_unique(), "repay", None, borrower, protocol, pool);
        assert!(!is_matching_loan_instruction(
            &ix,
            instruction_discriminator("repay"),
            &borrower,
            &protocol,
            &pool,
        ));
    }

    #[test]
    fn rejects_wrong_discriminator() {
        let borrower = Pubkey::new_unique();
        let protocol = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let ix = loan_instruction(crate::ID, "borrow", Some(10_000), borrower, protocol, pool);
        assert!(!is_matching_loan_instruction(
            &ix,
            instruction_discriminator("repay"),
            &borrower,
            &protocol,
            &pool,
        ));
    }

    #[test]
    fn rejects_mismatched_pool_account() {
        let borrower = Pubkey::new_unique();
        let protocol = Pubkey::new_unique();
        let ix = loan_instruction(
            crate::ID,
            "repay",
            None,
            borrower,
            protocol,
            Pubkey::new_unique(),
        );
        assert!(!is_matching_loan_instruction(
            &ix,
            instruction_discriminator("repay"),
            &borrower,
            &protocol,
            &Pubkey::new_unique(),
        ));
    }

    #[test]
    fn rejects_truncated_account_list() {
        let ix = Instruction {
            program_id: crate::ID,
            accounts: vec![AccountMeta::new(Pubkey::new_unique(), true)],
            data: loan_instruction_data("repay", None),
        };
        assert!(!is_matching_loan_instruction(
            &ix,
            instruction_discriminator("repay"),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
        ));
    }

    #[test]
    fn decodes_borrow_amount() {
        let ix = loan_instruction(
            crate::ID,
            "borrow",
            Some(123_456),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        assert_eq!(decode_borrow_amount(&ix).unwrap(), 123_456);
    }

    #[test]
    fn short_borrow_data_is_invalid() {
        let mut ix = loan_instruction(
            crate::ID,
            "borrow",
            Some(123_456),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        ix.data.truncate(12);
        assert!(decode_borrow_amount(&ix).is_err());
    }
}
