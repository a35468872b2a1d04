use chrono::{DateTime, Duration, Utc};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    checkout_api::CheckoutPlan,
    checkout_types::{DeliveryInfo, PaymentMethod},
    traits::{SnapshotError, SnapshotStorage},
};

/// The well-known key the pending checkout is stored under.
pub const PENDING_CHECKOUT_KEY: &str = "pending_checkout";

/// Everything needed to finish a checkout after the buyer returns from the payment page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCheckout {
    pub plan: CheckoutPlan,
    pub delivery: DeliveryInfo,
    pub payment: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl PendingCheckout {
    pub fn new(plan: CheckoutPlan, delivery: DeliveryInfo, payment: PaymentMethod) -> Self {
        Self { plan, delivery, payment, created_at: Utc::now() }
    }
}

/// A single-slot store for the one checkout that can be pending at a time.
///
/// Writing replaces whatever was in the slot. Snapshots older than the time-to-live are treated as absent, and are
/// removed the first time they are read.
#[derive(Debug, Clone)]
pub struct PendingCheckoutSlot<S> {
    storage: S,
    ttl: Duration,
}

impl<S> PendingCheckoutSlot<S>
where S: SnapshotStorage
{
    pub fn new(storage: S, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Saves the pending checkout and returns the time it expires.
    pub async fn put(&self, pending: &PendingCheckout) -> Result<DateTime<Utc>, SnapshotError> {
        let value = serde_json::to_string(pending)?;
        let expires_at = Utc::now() + self.ttl;
        self.storage.write(PENDING_CHECKOUT_KEY, &value, expires_at).await?;
        debug!("🗃️ Pending checkout saved. It expires at {expires_at}");
        Ok(expires_at)
    }

    /// Returns the pending checkout without removing it.
    pub async fn peek(&self) -> Result<Option<PendingCheckout>, SnapshotError> {
        let Some(stored) = self.storage.read(PENDING_CHECKOUT_KEY).await? else {
            return Ok(None);
        };
        if stored.is_expired_at(Utc::now()) {
            info!("🗃️ The pending checkout expired at {}. Discarding it.", stored.expires_at);
            self.storage.delete(PENDING_CHECKOUT_KEY).await?;
            return Ok(None);
        }
        let pending = serde_json::from_str::<PendingCheckout>(&stored.value)?;
        Ok(Some(pending))
    }

    /// Removes and returns the pending checkout.
    pub async fn take(&self) -> Result<Option<PendingCheckout>, SnapshotError> {
        let pending = self.peek().await?;
        if pending.is_some() {
            self.storage.delete(PENDING_CHECKOUT_KEY).await?;
            debug!("🗃️ Pending checkout taken from the slot");
        }
        Ok(pending)
    }

    /// Empties the slot. Returns `true` if it held a snapshot, expired or not.
    pub async fn clear(&self) -> Result<bool, SnapshotError> {
        self.storage.delete(PENDING_CHECKOUT_KEY).await
    }
}

#[cfg(test)]
mod test {
    use mkt_common::Money;

    use super::*;
    use crate::{checkout_types::VendorAllocation, snapshot::MemorySnapshotStorage};

    fn pending() -> PendingCheckout {
        let allocation = VendorAllocation {
            vendor_id: "shop-a".into(),
            items: vec![],
            subtotal: Money::from(70_000),
            allocated_shipping_fee: Money::from(15_000),
            allocated_voucher_discount: Money::ZERO,
            vendor_total: Money::from(85_000),
        };
        let plan = CheckoutPlan::from_allocations(vec![allocation], None);
        let delivery = DeliveryInfo::new("Lan", "0905123456", "12 Bạch Đằng");
        let payment = PaymentMethod::Gateway { provider: "vnpay".into(), reference: "VNP-1".into() };
        PendingCheckout::new(plan, delivery, payment)
    }

    #[tokio::test]
    async fn put_peek_take() {
        let slot = PendingCheckoutSlot::new(MemorySnapshotStorage::new(), Duration::minutes(30));
        assert_eq!(slot.peek().await.unwrap(), None);
        let p = pending();
        slot.put(&p).await.unwrap();
        assert_eq!(slot.peek().await.unwrap(), Some(p.clone()));
        assert_eq!(slot.take().await.unwrap(), Some(p));
        assert_eq!(slot.take().await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces() {
        let slot = PendingCheckoutSlot::new(MemorySnapshotStorage::new(), Duration::minutes(30));
        slot.put(&pending()).await.unwrap();
        let mut second = pending();
        second.delivery.recipient_name = "Minh".into();
        slot.put(&second).await.unwrap();
        assert_eq!(slot.take().await.unwrap().map(|p| p.delivery.recipient_name), Some("Minh".to_string()));
    }

    #[tokio::test]
    async fn expired_snapshots_are_discarded() {
        let storage = MemorySnapshotStorage::new();
        let slot = PendingCheckoutSlot::new(storage.clone(), Duration::zero());
        slot.put(&pending()).await.unwrap();
        assert_eq!(slot.peek().await.unwrap(), None);
        assert_eq!(storage.read(PENDING_CHECKOUT_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_empties_the_slot() {
        let slot = PendingCheckoutSlot::new(MemorySnapshotStorage::new(), Duration::minutes(1));
        assert!(!slot.clear().await.unwrap());
        slot.put(&pending()).await.unwrap();
        assert!(slot.clear().await.unwrap());
        assert_eq!(slot.peek().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_snapshots_are_reported() {
        let storage = MemorySnapshotStorage::new();
        storage.write(PENDING_CHECKOUT_KEY, "not json", Utc::now() + Duration::minutes(1)).await.unwrap();
        let slot = PendingCheckoutSlot::new(storage, Duration::minutes(1));
        assert!(matches!(slot.peek().await, Err(SnapshotError::Serialization(_))));
    }
}
