use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{checkout_types::ExternalOrderId, traits::SubOrderRequest};

/// How a failed sub-order submission is reported back to the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionFailureKind {
    /// The session is not (or no longer) authenticated. Fatal to the whole batch.
    Unauthenticated,
    /// The order service rejected the request content.
    Validation,
    /// The order service failed. The same request can be retried.
    Server,
    Other,
}

impl SubmissionFailureKind {
    pub fn is_retry_safe(&self) -> bool {
        matches!(self, SubmissionFailureKind::Server)
    }

    pub fn aborts_batch(&self) -> bool {
        matches!(self, SubmissionFailureKind::Unauthenticated)
    }
}

impl Display for SubmissionFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionFailureKind::Unauthenticated => write!(f, "unauthenticated"),
            SubmissionFailureKind::Validation => write!(f, "validation"),
            SubmissionFailureKind::Server => write!(f, "server"),
            SubmissionFailureKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderGatewayError {
    #[error("You need to sign in again before placing this order. {0}")]
    Unauthenticated(String),
    #[error("The order was rejected: {0}")]
    Validation(String),
    #[error("The order service failed with status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Could not reach the order service: {0}")]
    Transport(String),
    #[error("Order service error: {0}")]
    Other(String),
}

impl OrderGatewayError {
    pub fn kind(&self) -> SubmissionFailureKind {
        match self {
            OrderGatewayError::Unauthenticated(_) => SubmissionFailureKind::Unauthenticated,
            OrderGatewayError::Validation(_) => SubmissionFailureKind::Validation,
            OrderGatewayError::Server { .. } => SubmissionFailureKind::Server,
            OrderGatewayError::Transport(_) | OrderGatewayError::Other(_) => SubmissionFailureKind::Other,
        }
    }
}

/// The external order service, as seen by the submission coordinator.
#[allow(async_fn_in_trait)]
pub trait OrderGateway {
    /// Creates one sub-order and returns the id the order service assigned to it.
    async fn create_order(&self, request: &SubOrderRequest) -> Result<ExternalOrderId, OrderGatewayError>;

    /// Cancels a previously created sub-order. Used to compensate a partially failed checkout.
    async fn cancel_order(&self, order_id: &ExternalOrderId, reason: &str) -> Result<(), OrderGatewayError>;
}
