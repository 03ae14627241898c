mod fee_rate;
mod protocol;

pub use fee_rate::*;
pub use protocol::*;
