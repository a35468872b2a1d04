use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{atomic::AtomicBool, Arc},
};

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    address::DistrictResolver,
    checkout_api::{CheckoutError, CheckoutPlan, CheckoutPlanner},
    checkout_types::{CartLineItem, DeliveryInfo, PaymentMethod, VendorId},
    config::CheckoutConfig,
    events::{CheckoutCompletedEvent, EventProducers, SubOrderConfirmedEvent, SubOrderFailedEvent},
    shipping::{DistanceTable, ShippingFeeCalculator},
    snapshot::{PendingCheckout, PendingCheckoutSlot},
    submission::{OrderSubmissionCoordinator, SubmissionReport},
    traits::{CartManagement, OrderGateway, SnapshotStorage, VoucherGateway},
};

/// `CheckoutApi` turns a multi-vendor cart into one order per vendor.
///
/// A checkout happens in two steps. [`Self::plan_checkout`] prices everything (shipping per vendor, the voucher, and
/// each vendor's share of both) without creating any order. [`Self::complete_checkout`] then submits the sub-orders.
/// For gateway payments, the plan can be parked with [`Self::prepare_gateway_checkout`] before the buyer is sent to
/// the payment page, and finished with [`Self::resume_gateway_checkout`] when they come back.
pub struct CheckoutApi<B, S> {
    backend: B,
    resolver: DistrictResolver,
    calculator: ShippingFeeCalculator,
    config: CheckoutConfig,
    producers: EventProducers,
    slot: PendingCheckoutSlot<S>,
    stop_signal: Option<Arc<AtomicBool>>,
}

impl<B, S> Debug for CheckoutApi<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B, S> CheckoutApi<B, S>
where S: SnapshotStorage
{
    /// Creates an API for Đà Nẵng, using the built-in street and distance tables and the tariff in `config`.
    pub fn new(backend: B, storage: S, config: CheckoutConfig, producers: EventProducers) -> Result<Self, CheckoutError> {
        let resolver = DistrictResolver::da_nang()?;
        let calculator =
            ShippingFeeCalculator::new(DistanceTable::da_nang()?, config.shipping_base_fee, config.shipping_rate_per_km)?;
        let slot = PendingCheckoutSlot::new(storage, config.snapshot_ttl);
        Ok(Self { backend, resolver, calculator, config, producers, slot, stop_signal: None })
    }

    pub fn with_resolver(mut self, resolver: DistrictResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_calculator(mut self, calculator: ShippingFeeCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    /// Raising the signal stops a running checkout before its next sub-order is submitted.
    pub fn with_stop_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.stop_signal = Some(signal);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn resolver(&self) -> &DistrictResolver {
        &self.resolver
    }

    pub fn calculator(&self) -> &ShippingFeeCalculator {
        &self.calculator
    }

    pub fn pending_checkout_slot(&self) -> &PendingCheckoutSlot<S> {
        &self.slot
    }

    pub fn planner(&self) -> CheckoutPlanner<'_> {
        CheckoutPlanner::new(&self.resolver, &self.calculator, self.config.fallback_origin)
    }
}

impl<B, S> CheckoutApi<B, S>
where
    B: OrderGateway + VoucherGateway + CartManagement,
    S: SnapshotStorage,
{
    /// Prices a checkout without creating any orders.
    ///
    /// The cart is split by vendor, the buyer's and each vendor's district are resolved, shipping is quoted per vendor,
    /// the voucher (if any) is priced against the pre-split subtotal, and both totals are allocated over the vendors.
    /// An unresolvable buyer address or an over-sized voucher fails here, before any order is sent.
    pub async fn plan_checkout(
        &self,
        cart: &[CartLineItem],
        buyer_address: &str,
        vendor_addresses: &HashMap<VendorId, String>,
        voucher_code: Option<&str>,
    ) -> Result<CheckoutPlan, CheckoutError> {
        let quoted = self.planner().quote_cart(cart, buyer_address, vendor_addresses)?;
        let voucher = match voucher_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => {
                let application = self.backend.apply_voucher(code, quoted.grand_subtotal).await?;
                debug!("🧮️ Voucher '{code}' is worth {}", application.total_discount);
                Some(application)
            },
            None => None,
        };
        let plan = CheckoutPlanner::finalize(quoted, voucher)?;
        debug!(
            "🧮️ Checkout planned for {} vendors. Subtotal {}, shipping {}, discount {}, total {}",
            plan.allocations.len(),
            plan.grand_subtotal,
            plan.total_shipping_fee,
            plan.total_voucher_discount,
            plan.grand_total
        );
        Ok(plan)
    }

    /// Submits one sub-order per vendor in the plan.
    ///
    /// The cart is cleared only if every sub-order was confirmed. Otherwise the report says which vendors are still
    /// pending. If the compensation policy asks for it, confirmed sub-orders are cancelled after a failure.
    pub async fn complete_checkout(
        &self,
        plan: &CheckoutPlan,
        delivery: &DeliveryInfo,
        payment: &PaymentMethod,
    ) -> Result<SubmissionReport, CheckoutError> {
        let mut coordinator = OrderSubmissionCoordinator::new(&self.backend)
            .with_policy(self.config.compensation_policy)
            .with_voucher_code(plan.voucher_code());
        if let Some(signal) = &self.stop_signal {
            coordinator = coordinator.with_stop_signal(Arc::clone(signal));
        }
        let mut report = coordinator.submit_all(&plan.allocations, delivery, payment).await?;
        if report.should_clear_cart() {
            match self.backend.clear_cart().await {
                Ok(()) => report.cart_cleared = true,
                Err(e) => {
                    error!("📦️ Every sub-order was placed, but the cart could not be cleared. {e}");
                    report.cleanup_error = Some(e.to_string());
                },
            }
        } else {
            let pending = report.pending_vendors().iter().map(|v| v.to_string()).collect::<Vec<_>>();
            warn!("📦️ Checkout incomplete. The cart is kept. Pending vendors: {}", pending.join(", "));
        }
        self.publish_events(&report, payment).await;
        info!(
            "📦️ Checkout finished: {} of {} sub-orders confirmed",
            report.confirmed.len(),
            plan.allocations.len()
        );
        Ok(report)
    }

    /// Parks a planned checkout before the buyer is redirected to the payment page. Returns when the snapshot expires.
    pub async fn prepare_gateway_checkout(
        &self,
        plan: CheckoutPlan,
        delivery: DeliveryInfo,
        payment: PaymentMethod,
    ) -> Result<DateTime<Utc>, CheckoutError> {
        if payment.gateway_reference().is_none() {
            return Err(CheckoutError::NotAGatewayPayment);
        }
        delivery.validate()?;
        let pending = PendingCheckout::new(plan, delivery, payment);
        let expires_at = self.slot.put(&pending).await?;
        info!("🗃️ Checkout parked for payment {}", pending.payment);
        Ok(expires_at)
    }

    /// Finishes the parked checkout once the payment gateway has redirected back with `reference`.
    ///
    /// The snapshot is only consumed when the reference matches.
    pub async fn resume_gateway_checkout(&self, reference: &str) -> Result<SubmissionReport, CheckoutError> {
        let pending = self.slot.peek().await?.ok_or(CheckoutError::NoPendingCheckout)?;
        let expected = pending.payment.gateway_reference().unwrap_or_default();
        if expected != reference {
            warn!("🗃️ Payment reference {reference} does not match the pending checkout");
            return Err(CheckoutError::GatewayReferenceMismatch {
                expected: expected.to_string(),
                received: reference.to_string(),
            });
        }
        let pending = self.slot.take().await?.ok_or(CheckoutError::NoPendingCheckout)?;
        debug!("🗃️ Resuming checkout for payment {}", pending.payment);
        self.complete_checkout(&pending.plan, &pending.delivery, &pending.payment).await
    }

    /// Drops the parked checkout, e.g. when the buyer cancels on the payment page.
    pub async fn abandon_gateway_checkout(&self) -> Result<bool, CheckoutError> {
        Ok(self.slot.clear().await?)
    }

    async fn publish_events(&self, report: &SubmissionReport, payment: &PaymentMethod) {
        for emitter in &self.producers.sub_order_confirmed_producer {
            debug!("📬️ Notifying sub-order confirmed hook subscribers");
            // Rolled-back sub-orders are in `rolled_back`, never here
            for sub_order in report.confirmed.iter().filter(|o| o.is_confirmed()) {
                let Some(order_id) = sub_order.order_id() else { continue };
                let event = SubOrderConfirmedEvent {
                    vendor_id: sub_order.vendor_id().clone(),
                    order_id: order_id.clone(),
                    total: sub_order.request().total,
                    payment_method: payment.code().to_string(),
                };
                emitter.publish_event(event).await;
            }
        }
        for emitter in &self.producers.sub_order_failed_producer {
            debug!("📬️ Notifying sub-order failed hook subscribers");
            for failed in &report.failed {
                let event = SubOrderFailedEvent { vendor_id: failed.vendor_id.clone(), reason: failed.reason.clone() };
                emitter.publish_event(event).await;
            }
        }
        for emitter in &self.producers.checkout_completed_producer {
            debug!("📬️ Notifying checkout completed hook subscribers");
            emitter.publish_event(CheckoutCompletedEvent::new(report.clone())).await;
        }
    }
}
