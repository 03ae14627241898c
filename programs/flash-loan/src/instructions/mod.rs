mod borrow;
mod initialize;
mod repay;

pub use borrow::*;
pub use initialize::*;
pub use repay::*;
