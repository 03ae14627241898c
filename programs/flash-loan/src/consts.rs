/// Denominator for fee rates expressed in basis points:
/// 1 bps = 0.01%, so a full 100% is 10_000 bps
pub const BPS_DENOMINATOR: u64 = 10_000;
