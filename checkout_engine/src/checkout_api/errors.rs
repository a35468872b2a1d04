use mkt_common::MoneyError;
use thiserror::Error;

use crate::{
    address::ResolutionError,
    allocation::AllocationError,
    cart::CartError,
    checkout_types::{DeliveryInfoError, VendorId},
    shipping::ShippingError,
    submission::SubmissionError,
    traits::{SnapshotError, VoucherError},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Cart(#[from] CartError),
    #[error("Cannot compute shipping: the delivery address '{0}' could not be matched to a district")]
    BuyerAddressUnresolved(String),
    #[error("Cannot compute shipping for {vendor}. {error}")]
    VendorShipping { vendor: VendorId, error: ShippingError },
    #[error("{0}")]
    Shipping(#[from] ShippingError),
    #[error("{0}")]
    Allocation(#[from] AllocationError),
    #[error("{0}")]
    Voucher(#[from] VoucherError),
    #[error("{0}")]
    InvalidDelivery(#[from] DeliveryInfoError),
    #[error("{0}")]
    Submission(#[from] SubmissionError),
    #[error("{0}")]
    Snapshot(#[from] SnapshotError),
    #[error("The address tables are invalid. {0}")]
    Resolution(#[from] ResolutionError),
    #[error("{0}")]
    Money(#[from] MoneyError),
    #[error("There is no pending checkout to resume. It may have expired.")]
    NoPendingCheckout,
    #[error("The payment reference '{received}' does not match the pending checkout ('{expected}')")]
    GatewayReferenceMismatch { expected: String, received: String },
    #[error("Only gateway payments can be parked for a payment redirect")]
    NotAGatewayPayment,
}
