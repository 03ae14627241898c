use anchor_lang::prelude::*;

use crate::state::FeeRate;

#[constant]
pub const PROTOCOL_SEED: &[u8] = b"protocol";

/// The protocol's only durable state.
///
/// The PDA derived from [`PROTOCOL_SEED`] is the sole authority over the
/// pool's token account; liquidity can only leave the pool under a
/// signature derived with the cached bump.
#[account]
#[derive(Debug)]
pub struct Protocol {
    /// PDA bump cached at initialization
    pub bump: u8,

    /// The fee charged on every flash loan, fixed at initialization
    pub fee_rate: FeeRate,
}
