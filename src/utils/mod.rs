pub mod money;
pub mod signature;

pub use money::format_amount;
pub use signature::sign;
