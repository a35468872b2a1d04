use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    checkout_types::{ExternalOrderId, VendorId},
    submission::SubOrder,
    traits::{OrderGatewayError, SubmissionFailureKind},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub kind: SubmissionFailureKind,
    /// Human-readable message, suitable for showing to the buyer
    pub message: String,
}

impl FailureReason {
    pub fn new<S: Into<String>>(kind: SubmissionFailureKind, message: S) -> Self {
        Self { kind, message: message.into() }
    }
}

impl From<&OrderGatewayError> for FailureReason {
    fn from(e: &OrderGatewayError) -> Self {
        Self { kind: e.kind(), message: e.to_string() }
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSubOrder {
    pub vendor_id: VendorId,
    pub reason: FailureReason,
}

/// Why the coordinator stopped before submitting every sub-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    Unauthenticated,
    /// The caller raised the stop signal
    Stopped,
    /// A sub-order failed and confirmed sub-orders are being rolled back
    RollingBack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelledSubOrder {
    pub vendor_id: VendorId,
    pub order_id: ExternalOrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationFailure {
    pub vendor_id: VendorId,
    pub order_id: ExternalOrderId,
    pub reason: FailureReason,
}

/// The outcome of rolling back confirmed sub-orders after a partial failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationReport {
    /// Sub-orders that were cancelled, most recent first
    pub cancelled: Vec<CancelledSubOrder>,
    /// Sub-orders that could not be cancelled and are still live in the order service
    pub failures: Vec<CancellationFailure>,
}

impl CompensationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-vendor outcome of a checkout submission. Every failure is listed here. Nothing is only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Sub-orders the order service accepted and that are still live, in submission order
    pub confirmed: Vec<SubOrder>,
    /// Sub-orders that were confirmed and then cancelled by compensation, most recent first
    #[serde(default)]
    pub rolled_back: Vec<SubOrder>,
    pub failed: Vec<FailedSubOrder>,
    /// Vendors whose sub-order was never sent because the batch was aborted
    pub not_attempted: Vec<VendorId>,
    pub aborted: Option<AbortReason>,
    pub compensation: Option<CompensationReport>,
    pub cart_cleared: bool,
    /// Set when every sub-order confirmed but clearing the cart failed
    pub cleanup_error: Option<String>,
}

impl SubmissionReport {
    pub fn all_confirmed(&self) -> bool {
        self.failed.is_empty() && self.not_attempted.is_empty() && self.aborted.is_none()
    }

    /// The cart may only be cleared when every sub-order was confirmed and none was rolled back.
    pub fn should_clear_cart(&self) -> bool {
        self.all_confirmed() && self.compensation.as_ref().map_or(true, |c| c.cancelled.is_empty())
    }

    /// True if the failure list includes an authentication failure.
    pub fn requires_reauthentication(&self) -> bool {
        self.failed.iter().any(|f| f.reason.kind == SubmissionFailureKind::Unauthenticated)
    }

    /// Vendors the buyer still has to order from: failed, never attempted, or rolled back.
    pub fn pending_vendors(&self) -> Vec<VendorId> {
        let mut vendors = self.failed.iter().map(|f| f.vendor_id.clone()).collect::<Vec<_>>();
        vendors.extend(self.not_attempted.iter().cloned());
        if let Some(c) = &self.compensation {
            vendors.extend(c.cancelled.iter().map(|c| c.vendor_id.clone()));
        }
        vendors.sort();
        vendors.dedup();
        vendors
    }

    pub fn confirmed_order_ids(&self) -> Vec<ExternalOrderId> {
        self.confirmed.iter().filter_map(|o| o.order_id().cloned()).collect()
    }

    /// A one-paragraph summary for the buyer.
    pub fn user_message(&self) -> String {
        if self.all_confirmed() {
            return format!("All {} orders were placed successfully.", self.confirmed.len());
        }
        if self.requires_reauthentication() {
            return "Your session has expired. Please sign in again and retry the checkout.".to_string();
        }
        let pending = self.pending_vendors().iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        let mut msg = format!(
            "{} of {} orders were placed. Orders from {pending} were not placed and are still in your cart.",
            self.confirmed.len(),
            self.confirmed.len() + self.rolled_back.len() + self.failed.len() + self.not_attempted.len()
        );
        if let Some(c) = self.compensation.as_ref().filter(|c| !c.cancelled.is_empty()) {
            msg.push_str(&format!(" {} confirmed orders were cancelled.", c.cancelled.len()));
        }
        if let Some(c) = self.compensation.as_ref().filter(|c| !c.is_complete()) {
            msg.push_str(&format!(" {} orders could not be cancelled; please contact support.", c.failures.len()));
        }
        msg
    }
}
