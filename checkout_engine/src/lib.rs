//! Multi-vendor checkout engine
//!
//! A marketplace cart can hold items from several independent vendors. At checkout, this library splits the cart into
//! one sub-order per vendor and prices each of them:
//!
//! 1. Address resolution ([`mod@address`]). Free-text addresses are matched to a district using street and district
//!    name tables. Matching ignores case and diacritics, and only ever matches whole words.
//! 2. Shipping ([`mod@shipping`]). Each vendor's delivery fee is a base fee plus a per-km rate over the distance between
//!    the vendor's district and the buyer's.
//! 3. Allocation ([`mod@allocation`]). The shipping total and the voucher discount are split over the vendors in
//!    proportion to their subtotals, so that the shares always add up to the totals exactly.
//! 4. Submission ([`mod@submission`]). Sub-orders are sent to the order service one at a time. Failures are classified
//!    and reported per vendor, and confirmed sub-orders can optionally be rolled back.
//!
//! The engine is backend-agnostic. Backends implement the traits in [`mod@traits`], and [`CheckoutApi`] ties the
//! stages together. The engine also publishes events that can be hooked into (see [`mod@events`]).
pub mod address;
pub mod allocation;
pub mod cart;
mod checkout_api;
pub mod checkout_types;
pub mod config;
pub mod events;
pub mod shipping;
pub mod snapshot;
pub mod submission;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use address::{District, DistrictResolver};
pub use checkout_api::{CheckoutApi, CheckoutError, CheckoutPlan, CheckoutPlanner, QuotedCart, VendorShipping};
pub use config::CheckoutConfig;
pub use shipping::{DistanceTable, ShippingFeeCalculator};
#[cfg(feature = "sqlite")]
pub use snapshot::SqliteSnapshotStorage;
pub use snapshot::{MemorySnapshotStorage, PendingCheckoutSlot};
pub use submission::{CompensationPolicy, OrderSubmissionCoordinator, SubmissionReport};
