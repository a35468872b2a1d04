//! Durable storage for a checkout that is waiting on an external payment.
mod memory;
mod slot;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemorySnapshotStorage;
pub use slot::{PendingCheckout, PendingCheckoutSlot, PENDING_CHECKOUT_KEY};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSnapshotStorage;
