use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use log::*;
use mkt_common::Money;
use tokio::sync::Mutex;

use crate::{
    checkout_types::{ExternalOrderId, VendorId, VoucherApplication},
    traits::{CartManagement, OrderGateway, OrderGatewayError, SubOrderRequest, VoucherError, VoucherGateway},
};

#[derive(Debug, Default)]
struct MarketplaceState {
    next_order_number: u64,
    create_failures: HashMap<VendorId, VecDeque<OrderGatewayError>>,
    cancel_failures: HashMap<VendorId, OrderGatewayError>,
    clear_cart_failure: Option<OrderGatewayError>,
    vouchers: HashMap<String, Money>,
    attempts: Vec<VendorId>,
    created: Vec<(ExternalOrderId, SubOrderRequest)>,
    cancelled: Vec<ExternalOrderId>,
    voucher_requests: Vec<(String, Money)>,
    cart_cleared: bool,
}

/// An in-memory marketplace backend whose failures are scripted per vendor.
///
/// Clones share state, so a test can keep a handle while the API owns another.
#[derive(Debug, Default, Clone)]
pub struct ScriptedMarketplace {
    state: Arc<Mutex<MarketplaceState>>,
}

impl ScriptedMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next order creation for `vendor` fails with `error`. Calls queue up.
    pub async fn fail_next_order(&self, vendor: &VendorId, error: OrderGatewayError) {
        self.state.lock().await.create_failures.entry(vendor.clone()).or_default().push_back(error);
    }

    pub async fn fail_cancellation(&self, vendor: &VendorId, error: OrderGatewayError) {
        self.state.lock().await.cancel_failures.insert(vendor.clone(), error);
    }

    pub async fn fail_clear_cart(&self, error: OrderGatewayError) {
        self.state.lock().await.clear_cart_failure = Some(error);
    }

    /// Registers a voucher worth a fixed `discount`. The discount is returned as-is, whatever the order total.
    pub async fn add_voucher(&self, code: &str, discount: Money) {
        self.state.lock().await.vouchers.insert(code.to_string(), discount);
    }

    /// Vendors a create request was received for, in order.
    pub async fn attempted_vendors(&self) -> Vec<VendorId> {
        self.state.lock().await.attempts.clone()
    }

    pub async fn created_orders(&self) -> Vec<(ExternalOrderId, SubOrderRequest)> {
        self.state.lock().await.created.clone()
    }

    pub async fn cancelled_orders(&self) -> Vec<ExternalOrderId> {
        self.state.lock().await.cancelled.clone()
    }

    pub async fn voucher_requests(&self) -> Vec<(String, Money)> {
        self.state.lock().await.voucher_requests.clone()
    }

    pub async fn cart_cleared(&self) -> bool {
        self.state.lock().await.cart_cleared
    }
}

impl OrderGateway for ScriptedMarketplace {
    async fn create_order(&self, request: &SubOrderRequest) -> Result<ExternalOrderId, OrderGatewayError> {
        let mut state = self.state.lock().await;
        state.attempts.push(request.vendor_id.clone());
        if let Some(e) = state.create_failures.get_mut(&request.vendor_id).and_then(|q| q.pop_front()) {
            trace!("🧪️ Scripted failure for {}: {e}", request.vendor_id);
            return Err(e);
        }
        state.next_order_number += 1;
        let id = ExternalOrderId::from(format!("{}", 1000 + state.next_order_number));
        state.created.push((id.clone(), request.clone()));
        Ok(id)
    }

    async fn cancel_order(&self, order_id: &ExternalOrderId, _reason: &str) -> Result<(), OrderGatewayError> {
        let mut state = self.state.lock().await;
        let vendor = state.created.iter().find(|(id, _)| id == order_id).map(|(_, r)| r.vendor_id.clone());
        let Some(vendor) = vendor else {
            return Err(OrderGatewayError::Validation(format!("Order {order_id} does not exist")));
        };
        if let Some(e) = state.cancel_failures.get(&vendor) {
            return Err(e.clone());
        }
        state.cancelled.push(order_id.clone());
        Ok(())
    }
}

impl VoucherGateway for ScriptedMarketplace {
    async fn apply_voucher(&self, code: &str, order_total: Money) -> Result<VoucherApplication, VoucherError> {
        let mut state = self.state.lock().await;
        state.voucher_requests.push((code.to_string(), order_total));
        let discount = state.vouchers.get(code).copied().ok_or_else(|| VoucherError::InvalidCode(code.to_string()))?;
        Ok(VoucherApplication::new(code, discount))
    }
}

impl CartManagement for ScriptedMarketplace {
    async fn clear_cart(&self) -> Result<(), OrderGatewayError> {
        let mut state = self.state.lock().await;
        if let Some(e) = state.clear_cart_failure.clone() {
            return Err(e);
        }
        state.cart_cleared = true;
        Ok(())
    }
}
