use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::*;

use crate::{
    checkout_types::{DeliveryInfo, PaymentMethod, VendorAllocation},
    submission::{
        AbortReason,
        CancellationFailure,
        CancelledSubOrder,
        CompensationPolicy,
        CompensationReport,
        FailedSubOrder,
        FailureReason,
        SubOrder,
        SubmissionError,
        SubmissionReport,
    },
    traits::{OrderGateway, SubOrderRequest},
};

/// Submits one sub-order per vendor allocation through an [`OrderGateway`].
///
/// Requests are sent strictly one after the other: each completes before the next is issued. A request in flight is
/// never cancelled, but the coordinator checks the stop signal (if any) before starting each one.
///
/// Under [`CompensationPolicy::Retain`], validation, server and other failures are recorded and the batch carries on.
/// Under [`CompensationPolicy::CancelConfirmed`], the first failure stops the batch and the sub-orders confirmed so far
/// are cancelled. An authentication failure always aborts the batch. Vendors skipped by an abort are reported as not
/// attempted.
pub struct OrderSubmissionCoordinator<'a, G> {
    gateway: &'a G,
    policy: CompensationPolicy,
    voucher_code: Option<String>,
    stop_signal: Option<Arc<AtomicBool>>,
}

impl<'a, G> OrderSubmissionCoordinator<'a, G>
where G: OrderGateway
{
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway, policy: CompensationPolicy::default(), voucher_code: None, stop_signal: None }
    }

    pub fn with_policy(mut self, policy: CompensationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The voucher code to quote on every sub-order.
    pub fn with_voucher_code<S: Into<String>>(mut self, code: Option<S>) -> Self {
        self.voucher_code = code.map(Into::into);
        self
    }

    /// When the signal is raised, no further submissions are started.
    pub fn with_stop_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.stop_signal = Some(signal);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop_signal.as_ref().map_or(false, |s| s.load(Ordering::SeqCst))
    }

    /// Builds and submits a sub-order for every allocation, in the order given.
    ///
    /// Returns an error without contacting the order service if there is nothing to submit or if the delivery details
    /// are invalid. Otherwise, every outcome is in the returned report.
    pub async fn submit_all(
        &self,
        allocations: &[VendorAllocation],
        delivery: &DeliveryInfo,
        payment: &PaymentMethod,
    ) -> Result<SubmissionReport, SubmissionError> {
        if allocations.is_empty() {
            return Err(SubmissionError::NothingToSubmit);
        }
        let code = self.voucher_code.as_deref();
        let mut queue = allocations
            .iter()
            .map(|a| SubOrderRequest::new(a, delivery, payment, code).map(SubOrder::new))
            .collect::<Result<Vec<SubOrder>, _>>()?
            .into_iter();
        let mut report = SubmissionReport::default();
        while let Some(mut sub_order) = queue.next() {
            if self.stop_requested() {
                info!("📦️ Stop requested. {} submissions will not be started", queue.len() + 1);
                report.aborted = Some(AbortReason::Stopped);
                report.not_attempted.push(sub_order.vendor_id().clone());
                report.not_attempted.extend(queue.by_ref().map(|o| o.vendor_id().clone()));
                break;
            }
            sub_order.mark_submitted()?;
            trace!("📦️ Submitting sub-order for {}: {}", sub_order.vendor_id(), sub_order.request().total);
            match self.gateway.create_order(sub_order.request()).await {
                Ok(order_id) => {
                    debug!("📦️ Sub-order for {} confirmed as {order_id}", sub_order.vendor_id());
                    sub_order.confirm(order_id)?;
                    report.confirmed.push(sub_order);
                },
                Err(e) => {
                    let reason = FailureReason::from(&e);
                    error!("📦️ Sub-order for {} failed. {reason}", sub_order.vendor_id());
                    let vendor_id = sub_order.vendor_id().clone();
                    sub_order.fail(reason.clone())?;
                    report.failed.push(FailedSubOrder { vendor_id, reason });
                    if e.kind().aborts_batch() {
                        warn!("📦️ Authentication failed. Aborting the remaining {} submissions", queue.len());
                        report.aborted = Some(AbortReason::Unauthenticated);
                        report.not_attempted.extend(queue.by_ref().map(|o| o.vendor_id().clone()));
                        break;
                    }
                    if self.policy == CompensationPolicy::CancelConfirmed {
                        warn!("📦️ Rolling back. The remaining {} submissions will not be started", queue.len());
                        report.aborted = Some(AbortReason::RollingBack);
                        report.not_attempted.extend(queue.by_ref().map(|o| o.vendor_id().clone()));
                        break;
                    }
                },
            }
        }
        if !report.failed.is_empty() {
            report.compensation = self.compensate(&mut report).await?;
        }
        debug!(
            "📦️ Submission complete. {} confirmed, {} failed, {} not attempted",
            report.confirmed.len(),
            report.failed.len(),
            report.not_attempted.len()
        );
        Ok(report)
    }

    /// Cancels confirmed sub-orders, most recent first, if the policy asks for it.
    ///
    /// Cancelled sub-orders move from `confirmed` to `rolled_back`. Those that could not be cancelled are still live
    /// and stay in `confirmed`.
    async fn compensate(&self, report: &mut SubmissionReport) -> Result<Option<CompensationReport>, SubmissionError> {
        if self.policy == CompensationPolicy::Retain || report.confirmed.is_empty() {
            return Ok(None);
        }
        if report.requires_reauthentication() {
            warn!(
                "📦️ Skipping compensation: the session is not authenticated. {} confirmed sub-orders remain",
                report.confirmed.len()
            );
            return Ok(None);
        }
        let mut result = CompensationReport::default();
        let mut still_live = Vec::new();
        while let Some(mut sub_order) = report.confirmed.pop() {
            let Some(order_id) = sub_order.order_id().cloned() else {
                still_live.push(sub_order);
                continue;
            };
            let vendor_id = sub_order.vendor_id().clone();
            match self.gateway.cancel_order(&order_id, "Another part of this checkout failed").await {
                Ok(()) => {
                    info!("📦️ Cancelled sub-order {order_id} for {vendor_id}");
                    sub_order.cancel()?;
                    report.rolled_back.push(sub_order);
                    result.cancelled.push(CancelledSubOrder { vendor_id, order_id });
                },
                Err(e) => {
                    error!("📦️ Could not cancel sub-order {order_id} for {vendor_id}. {e}");
                    result.failures.push(CancellationFailure { vendor_id, order_id, reason: FailureReason::from(&e) });
                    still_live.push(sub_order);
                },
            }
        }
        still_live.reverse();
        report.confirmed = still_live;
        Ok(Some(result))
    }
}

#[cfg(test)]
mod test {
    use mkt_common::Money;

    use super::*;
    use crate::{
        checkout_types::{ExternalOrderId, VendorId},
        test_utils::ScriptedMarketplace,
        traits::{OrderGatewayError, SubmissionFailureKind},
    };

    fn allocation(vendor: &str, total: i64) -> VendorAllocation {
        VendorAllocation {
            vendor_id: VendorId::from(vendor),
            items: vec![],
            subtotal: Money::from(total),
            allocated_shipping_fee: Money::ZERO,
            allocated_voucher_discount: Money::ZERO,
            vendor_total: Money::from(total),
        }
    }

    fn allocations() -> Vec<VendorAllocation> {
        vec![allocation("A", 10_000), allocation("B", 20_000), allocation("C", 30_000)]
    }

    fn delivery() -> DeliveryInfo {
        DeliveryInfo::new("Lan", "0905123456", "12 Bạch Đằng")
    }

    #[tokio::test]
    async fn all_confirmed() {
        let market = ScriptedMarketplace::new();
        let report = OrderSubmissionCoordinator::new(&market)
            .submit_all(&allocations(), &delivery(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        assert!(report.all_confirmed());
        assert!(report.should_clear_cart());
        assert_eq!(report.confirmed_order_ids(), vec![
            ExternalOrderId::from("1001"),
            ExternalOrderId::from("1002"),
            ExternalOrderId::from("1003")
        ]);
        let vendors = market.attempted_vendors().await;
        assert_eq!(vendors, vec![VendorId::from("A"), VendorId::from("B"), VendorId::from("C")]);
    }

    #[tokio::test]
    async fn validation_failure_does_not_stop_the_batch() {
        let market = ScriptedMarketplace::new();
        market.fail_next_order(&VendorId::from("A"), OrderGatewayError::Validation("out of stock".into())).await;
        let report = OrderSubmissionCoordinator::new(&market)
            .submit_all(&allocations(), &delivery(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        assert_eq!(report.confirmed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].vendor_id, VendorId::from("A"));
        assert_eq!(report.failed[0].reason.kind, SubmissionFailureKind::Validation);
        assert!(!report.should_clear_cart());
        assert_eq!(report.pending_vendors(), vec![VendorId::from("A")]);
        assert_eq!(report.compensation, None);
    }

    #[tokio::test]
    async fn unauthenticated_aborts_the_batch() {
        let market = ScriptedMarketplace::new();
        market.fail_next_order(&VendorId::from("A"), OrderGatewayError::Unauthenticated("token expired".into())).await;
        let report = OrderSubmissionCoordinator::new(&market)
            .with_policy(CompensationPolicy::CancelConfirmed)
            .submit_all(&allocations(), &delivery(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        assert!(report.confirmed.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].reason.kind, SubmissionFailureKind::Unauthenticated);
        assert_eq!(report.not_attempted, vec![VendorId::from("B"), VendorId::from("C")]);
        assert_eq!(report.aborted, Some(AbortReason::Unauthenticated));
        assert_eq!(market.attempted_vendors().await, vec![VendorId::from("A")]);
        assert!(report.requires_reauthentication());
    }

    #[tokio::test]
    async fn cancel_policy_rolls_back_in_reverse_order() {
        let market = ScriptedMarketplace::new();
        market.fail_next_order(&VendorId::from("C"), OrderGatewayError::Server { status: 500, message: "db".into() }).await;
        let report = OrderSubmissionCoordinator::new(&market)
            .with_policy(CompensationPolicy::CancelConfirmed)
            .submit_all(&allocations(), &delivery(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        let compensation = report.compensation.clone().expect("compensation ran");
        assert!(compensation.is_complete());
        let cancelled = compensation.cancelled.iter().map(|c| c.vendor_id.as_str()).collect::<Vec<_>>();
        assert_eq!(cancelled, vec!["B", "A"]);
        assert_eq!(market.cancelled_orders().await, vec![ExternalOrderId::from("1002"), ExternalOrderId::from("1001")]);
        assert!(report.confirmed.is_empty());
        let rolled_back = report.rolled_back.iter().map(|o| o.state().to_string()).collect::<Vec<_>>();
        assert_eq!(rolled_back, vec!["Cancelled", "Cancelled"]);
        assert_eq!(report.pending_vendors(), vec![VendorId::from("A"), VendorId::from("B"), VendorId::from("C")]);
        assert!(!report.should_clear_cart());
        assert!(report.user_message().starts_with("0 of 3 orders were placed."));
    }

    #[tokio::test]
    async fn cancel_policy_stops_submitting_after_a_failure() {
        let market = ScriptedMarketplace::new();
        market.fail_next_order(&VendorId::from("A"), OrderGatewayError::Validation("out of stock".into())).await;
        let report = OrderSubmissionCoordinator::new(&market)
            .with_policy(CompensationPolicy::CancelConfirmed)
            .submit_all(&allocations(), &delivery(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        assert_eq!(market.attempted_vendors().await, vec![VendorId::from("A")]);
        assert!(market.created_orders().await.is_empty());
        assert!(market.cancelled_orders().await.is_empty());
        assert!(report.confirmed.is_empty());
        assert!(report.rolled_back.is_empty());
        assert_eq!(report.not_attempted, vec![VendorId::from("B"), VendorId::from("C")]);
        assert_eq!(report.aborted, Some(AbortReason::RollingBack));
        assert_eq!(report.compensation, None);
        assert!(!report.requires_reauthentication());
    }

    #[tokio::test]
    async fn failed_cancellations_are_reported() {
        let market = ScriptedMarketplace::new();
        market.fail_next_order(&VendorId::from("C"), OrderGatewayError::Validation("bad".into())).await;
        market.fail_cancellation(&VendorId::from("A"), OrderGatewayError::Other("already shipped".into())).await;
        let report = OrderSubmissionCoordinator::new(&market)
            .with_policy(CompensationPolicy::CancelConfirmed)
            .submit_all(&allocations(), &delivery(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        let compensation = report.compensation.clone().unwrap();
        assert_eq!(compensation.cancelled.len(), 1);
        assert_eq!(compensation.cancelled[0].vendor_id, VendorId::from("B"));
        assert_eq!(compensation.failures.len(), 1);
        assert_eq!(compensation.failures[0].vendor_id, VendorId::from("A"));
        // A is still live, so it is still reported as confirmed
        let confirmed = report.confirmed.iter().map(|o| o.vendor_id().as_str()).collect::<Vec<_>>();
        assert_eq!(confirmed, vec!["A"]);
        assert_eq!(report.rolled_back.len(), 1);
        assert!(report.user_message().contains("could not be cancelled"));
    }

    #[tokio::test]
    async fn stop_signal_prevents_new_submissions() {
        let market = ScriptedMarketplace::new();
        let signal = Arc::new(AtomicBool::new(true));
        let report = OrderSubmissionCoordinator::new(&market)
            .with_stop_signal(signal)
            .submit_all(&allocations(), &delivery(), &PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        assert_eq!(report.aborted, Some(AbortReason::Stopped));
        assert_eq!(report.not_attempted.len(), 3);
        assert!(market.attempted_vendors().await.is_empty());
    }

    #[tokio::test]
    async fn nothing_is_sent_for_invalid_input() {
        let market = ScriptedMarketplace::new();
        let coordinator = OrderSubmissionCoordinator::new(&market);
        let err = coordinator.submit_all(&[], &delivery(), &PaymentMethod::CashOnDelivery).await.unwrap_err();
        assert_eq!(err, SubmissionError::NothingToSubmit);
        let bad = DeliveryInfo::new("", "0905123456", "12 Bạch Đằng");
        let err = coordinator.submit_all(&allocations(), &bad, &PaymentMethod::CashOnDelivery).await.unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidDelivery(_)));
        assert!(market.attempted_vendors().await.is_empty());
    }

    #[tokio::test]
    async fn requests_carry_payment_and_voucher() {
        let market = ScriptedMarketplace::new();
        let payment = PaymentMethod::Gateway { provider: "vnpay".into(), reference: "VNP-7".into() };
        OrderSubmissionCoordinator::new(&market)
            .with_voucher_code(Some("TET"))
            .submit_all(&allocations()[..1], &delivery(), &payment)
            .await
            .unwrap();
        let created = market.created_orders().await;
        assert_eq!(created[0].1.payment_reference.as_deref(), Some("VNP-7"));
        assert_eq!(created[0].1.voucher_code.as_deref(), Some("TET"));
        assert_eq!(created[0].1.payment_method, "vnpay");
    }
}
