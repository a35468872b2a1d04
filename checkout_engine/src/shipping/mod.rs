//! Distance-based delivery fees between districts.
mod calculator;
mod distance_table;

pub use calculator::{FeeBreakdown, ShippingFeeCalculator, ShippingQuote};
pub use distance_table::DistanceTable;
use mkt_common::MoneyError;
use thiserror::Error;

use crate::address::District;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShippingError {
    #[error("Cannot compute shipping: the delivery address could not be matched to a district")]
    UnresolvedDestination,
    #[error("The vendor address could not be resolved and no fallback origin district is configured")]
    MissingFallbackOrigin,
    #[error("The distance table has no entry for {from} -> {to}")]
    MissingDistance { from: District, to: District },
    #[error("The distance table has two entries for {from} -> {to}")]
    DuplicateDistance { from: District, to: District },
    #[error("Invalid distance {distance} km for {from} -> {to}")]
    InvalidDistance { from: District, to: District, distance: f64 },
    #[error("Invalid shipping rate: {0}")]
    InvalidRate(String),
    #[error("Shipping fee calculation overflowed. {0}")]
    Money(#[from] MoneyError),
}
