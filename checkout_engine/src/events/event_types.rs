use chrono::{DateTime, Utc};
use mkt_common::Money;
use serde::{Deserialize, Serialize};

use crate::{
    checkout_types::{ExternalOrderId, VendorId},
    submission::{FailureReason, SubmissionReport},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubOrderConfirmedEvent {
    pub vendor_id: VendorId,
    pub order_id: ExternalOrderId,
    pub total: Money,
    /// `cod`, or the payment gateway provider
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubOrderFailedEvent {
    pub vendor_id: VendorId,
    pub reason: FailureReason,
}

/// Published once per checkout, after submission, compensation and cart clean-up have all finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCompletedEvent {
    pub timestamp: DateTime<Utc>,
    pub report: SubmissionReport,
}

impl CheckoutCompletedEvent {
    pub fn new(report: SubmissionReport) -> Self {
        Self { timestamp: Utc::now(), report }
    }

    pub fn all_confirmed(&self) -> bool {
        self.report.all_confirmed()
    }
}
