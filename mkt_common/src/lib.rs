mod money;

pub mod helpers;
pub mod op;
mod secret;

pub use money::{Money, MoneyError, CURRENCY_CODE, CURRENCY_SYMBOL};
pub use secret::Secret;
