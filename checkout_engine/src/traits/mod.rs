//! # Backend contracts
//!
//! The checkout engine never talks to the network or to a database directly. Everything outside the process is reached
//! through the traits in this module, so that any marketplace backend (a REST client, an in-memory test double) can
//! drive a checkout.
//!
//! * [`OrderGateway`] creates and cancels sub-orders in the external order service.
//! * [`VoucherGateway`] prices a voucher code against the whole pre-split order total.
//! * [`CartManagement`] clears the buyer's cart once every sub-order is confirmed.
//! * [`SnapshotStorage`] is a small durable key-value store used to park a pending checkout across a payment redirect.
mod cart_management;
mod data_objects;
mod order_gateway;
mod snapshot_storage;
mod voucher_gateway;

pub use cart_management::CartManagement;
pub use data_objects::{SubOrderLine, SubOrderRequest};
pub use order_gateway::{OrderGateway, OrderGatewayError, SubmissionFailureKind};
pub use snapshot_storage::{SnapshotError, SnapshotStorage, StoredSnapshot};
pub use voucher_gateway::{VoucherError, VoucherGateway};
