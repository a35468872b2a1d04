//! Sequential submission of sub-orders, one per vendor, with optional compensation.
mod coordinator;
mod report;
mod sub_order;

use std::{fmt::Display, str::FromStr};

pub use coordinator::OrderSubmissionCoordinator;
pub use report::{
    AbortReason,
    CancellationFailure,
    CancelledSubOrder,
    CompensationReport,
    FailedSubOrder,
    FailureReason,
    SubmissionReport,
};
use serde::{Deserialize, Serialize};
pub use sub_order::{SubOrder, SubOrderState};
use thiserror::Error;

use crate::checkout_types::{DeliveryInfoError, VendorId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("There are no sub-orders to submit")]
    NothingToSubmit,
    #[error("Invalid delivery details. {0}")]
    InvalidDelivery(#[from] DeliveryInfoError),
    #[error("Sub-order for {vendor} cannot move from {from} to {to}")]
    InvalidTransition { vendor: VendorId, from: &'static str, to: &'static str },
}

/// What to do with already-confirmed sub-orders when a later one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationPolicy {
    /// Confirmed sub-orders stay in place and the buyer retries the rest.
    #[default]
    Retain,
    /// Cancel every confirmed sub-order, most recent first.
    CancelConfirmed,
}

impl FromStr for CompensationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "cancel" | "cancel_confirmed" => Ok(Self::CancelConfirmed),
            _ => Err(format!("Invalid compensation policy: {s}. Use 'retain' or 'cancel'")),
        }
    }
}

impl Display for CompensationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompensationPolicy::Retain => write!(f, "retain"),
            CompensationPolicy::CancelConfirmed => write!(f, "cancel"),
        }
    }
}
