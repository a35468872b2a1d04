use std::collections::HashMap;

use checkout_engine::{
    checkout_types::{CartLineItem, DeliveryInfo, VendorAllocation, VendorGroup, VendorId},
    test_utils::ScriptedMarketplace,
    CheckoutApi,
    CheckoutConfig,
    CheckoutError,
    CheckoutPlan,
    CompensationPolicy,
    District,
    DistrictResolver,
    MemorySnapshotStorage,
    SubmissionReport,
};
use cucumber::World;
use mkt_common::Money;

#[derive(Debug, Default, World)]
pub struct CheckoutWorld {
    pub market: ScriptedMarketplace,
    pub snapshots: MemorySnapshotStorage,
    pub policy: CompensationPolicy,
    pub fallback_origin: Option<District>,
    pub resolver: Option<DistrictResolver>,
    pub resolved: Option<District>,
    pub groups: Vec<VendorGroup>,
    pub allocations: Vec<VendorAllocation>,
    pub cart: Vec<CartLineItem>,
    pub buyer_address: String,
    pub vendor_addresses: HashMap<VendorId, String>,
    pub voucher_code: Option<String>,
    pub plan: Option<CheckoutPlan>,
    pub report: Option<SubmissionReport>,
    pub error: Option<CheckoutError>,
}

impl CheckoutWorld {
    pub fn api(&self) -> CheckoutApi<ScriptedMarketplace, MemorySnapshotStorage> {
        let config = CheckoutConfig::default()
            .with_compensation_policy(self.policy)
            .with_fallback_origin(self.fallback_origin);
        CheckoutApi::new(self.market.clone(), self.snapshots.clone(), config, Default::default())
            .expect("Error creating checkout API")
    }

    pub fn resolver(&self) -> DistrictResolver {
        match &self.resolver {
            Some(r) => r.clone(),
            None => DistrictResolver::da_nang().expect("Error loading address tables"),
        }
    }

    pub fn delivery(&self) -> DeliveryInfo {
        DeliveryInfo::new("Trần Thị Lan", "0905 123 456", self.buyer_address.as_str()).with_city("Đà Nẵng")
    }

    pub fn add_group(&mut self, vendor: &str, subtotal: i64) {
        self.groups.push(VendorGroup { vendor_id: VendorId::from(vendor), items: vec![], subtotal: Money::from(subtotal) });
    }

    pub fn allocation(&self, vendor: &str) -> &VendorAllocation {
        let allocations = match &self.plan {
            Some(plan) => &plan.allocations,
            None => &self.allocations,
        };
        allocations
            .iter()
            .find(|a| a.vendor_id.as_str() == vendor)
            .unwrap_or_else(|| panic!("No allocation for vendor {vendor}"))
    }

    pub fn report(&self) -> &SubmissionReport {
        self.report.as_ref().expect("No submission report. Did the checkout run?")
    }
}

/// Cucumber's `{string}` captures the surrounding quotes.
pub fn unquote(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'')
}
