use mkt_common::Money;
use thiserror::Error;

use crate::checkout_types::VoucherApplication;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoucherError {
    #[error("Voucher '{0}' does not exist or has expired")]
    InvalidCode(String),
    #[error("Voucher '{code}' is not applicable: {reason}")]
    NotApplicable { code: String, reason: String },
    #[error("Voucher '{code}' would discount {discount}, which is more than the order total of {order_total}")]
    ExceedsOrderTotal { code: String, discount: Money, order_total: Money },
    #[error("You need to sign in again before using a voucher. {0}")]
    Unauthenticated(String),
    #[error("Could not apply the voucher: {0}")]
    Backend(String),
}

#[allow(async_fn_in_trait)]
pub trait VoucherGateway {
    /// Prices the voucher against the whole, pre-split order total. Called once per checkout.
    async fn apply_voucher(&self, code: &str, order_total: Money) -> Result<VoucherApplication, VoucherError>;
}
