//! # Checkout API
//!
//! [`CheckoutApi`] is the entry point for a multi-vendor checkout. It is generic over a marketplace backend that
//! implements [`crate::traits::OrderGateway`], [`crate::traits::VoucherGateway`] and
//! [`crate::traits::CartManagement`], and over the [`crate::traits::SnapshotStorage`] used to park checkouts that wait
//! on an external payment.
//!
//! ```rust,ignore
//! let api = CheckoutApi::new(client, MemorySnapshotStorage::new(), CheckoutConfig::from_env_or_default(), producers)?;
//! let plan = api.plan_checkout(&cart, "12 Bạch Đằng, Hải Châu", &vendor_addresses, Some("TET2024")).await?;
//! let report = api.complete_checkout(&plan, &delivery, &PaymentMethod::CashOnDelivery).await?;
//! println!("{}", report.user_message());
//! ```
mod checkout_flow_api;
mod errors;
mod plan_objects;

pub use checkout_flow_api::CheckoutApi;
pub use errors::CheckoutError;
pub use plan_objects::{CheckoutPlan, CheckoutPlanner, QuotedCart, VendorShipping};
