use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    checkout_types::{ExternalOrderId, VendorId},
    submission::{FailureReason, SubmissionError},
    traits::SubOrderRequest,
};

/// Lifecycle of a single sub-order during submission.
///
/// | from        | to          | when                                  |
/// |-------------|-------------|---------------------------------------|
/// | `Pending`   | `Submitted` | the create request is sent            |
/// | `Submitted` | `Confirmed` | the order service returned an id      |
/// | `Submitted` | `Failed`    | the order service returned an error   |
/// | `Confirmed` | `Cancelled` | the order was rolled back             |
///
/// `Failed` and `Cancelled` are final. A sub-order that is never sent stays `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubOrderState {
    Pending,
    Submitted,
    Confirmed { order_id: ExternalOrderId },
    Failed { reason: FailureReason },
    Cancelled { order_id: ExternalOrderId },
}

impl SubOrderState {
    fn name(&self) -> &'static str {
        match self {
            SubOrderState::Pending => "Pending",
            SubOrderState::Submitted => "Submitted",
            SubOrderState::Confirmed { .. } => "Confirmed",
            SubOrderState::Failed { .. } => "Failed",
            SubOrderState::Cancelled { .. } => "Cancelled",
        }
    }
}

impl Display for SubOrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One vendor's order, as submitted to the order service. The request is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubOrder {
    request: SubOrderRequest,
    state: SubOrderState,
}

impl SubOrder {
    pub fn new(request: SubOrderRequest) -> Self {
        Self { request, state: SubOrderState::Pending }
    }

    pub fn request(&self) -> &SubOrderRequest {
        &self.request
    }

    pub fn vendor_id(&self) -> &VendorId {
        &self.request.vendor_id
    }

    pub fn state(&self) -> &SubOrderState {
        &self.state
    }

    /// The id assigned by the order service, once confirmed. Rolled-back orders keep their id.
    pub fn order_id(&self) -> Option<&ExternalOrderId> {
        match &self.state {
            SubOrderState::Confirmed { order_id } | SubOrderState::Cancelled { order_id } => Some(order_id),
            _ => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, SubOrderState::Confirmed { .. })
    }

    pub fn mark_submitted(&mut self) -> Result<(), SubmissionError> {
        match self.state {
            SubOrderState::Pending => {
                self.state = SubOrderState::Submitted;
                Ok(())
            },
            _ => Err(self.invalid_transition("Submitted")),
        }
    }

    pub fn confirm(&mut self, order_id: ExternalOrderId) -> Result<(), SubmissionError> {
        match self.state {
            SubOrderState::Submitted => {
                self.state = SubOrderState::Confirmed { order_id };
                Ok(())
            },
            _ => Err(self.invalid_transition("Confirmed")),
        }
    }

    pub fn fail(&mut self, reason: FailureReason) -> Result<(), SubmissionError> {
        match self.state {
            SubOrderState::Submitted => {
                self.state = SubOrderState::Failed { reason };
                Ok(())
            },
            _ => Err(self.invalid_transition("Failed")),
        }
    }

    pub fn cancel(&mut self) -> Result<(), SubmissionError> {
        match &self.state {
            SubOrderState::Confirmed { order_id } => {
                self.state = SubOrderState::Cancelled { order_id: order_id.clone() };
                Ok(())
            },
            _ => Err(self.invalid_transition("Cancelled")),
        }
    }

    fn invalid_transition(&self, to: &'static str) -> SubmissionError {
        SubmissionError::InvalidTransition { vendor: self.vendor_id().clone(), from: self.state.name(), to }
    }
}
