//! A `reqwest` client for the marketplace's REST API.
//!
//! [`MarketplaceApi`] implements the checkout engine's backend contracts ([`checkout_engine::traits::OrderGateway`],
//! [`checkout_engine::traits::VoucherGateway`] and [`checkout_engine::traits::CartManagement`]), so it can be handed
//! straight to a [`checkout_engine::CheckoutApi`].
mod api;
mod config;
mod error;
mod helpers;

mod data_objects;

pub use api::MarketplaceApi;
pub use config::MarketplaceConfig;
pub use data_objects::{ApplyVoucherRequest, CancelOrderRequest, CreatedOrder, VoucherQuote};
pub use error::MarketplaceApiError;
pub use helpers::{classify_order_failure, classify_voucher_failure, error_message};
