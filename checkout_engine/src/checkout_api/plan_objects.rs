use std::collections::HashMap;

use log::*;
use mkt_common::{Money, MoneyError};
use serde::{Deserialize, Serialize};

use crate::{
    address::{District, DistrictResolver},
    allocation::allocate,
    cart::{grand_subtotal, partition_cart},
    checkout_api::CheckoutError,
    checkout_types::{CartLineItem, VendorAllocation, VendorGroup, VendorId, VoucherApplication},
    shipping::{ShippingFeeCalculator, ShippingQuote},
};

/// The shipping leg for one vendor: from the vendor's district to the buyer's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorShipping {
    pub vendor_id: VendorId,
    /// False when the vendor address did not resolve and the fallback origin was used
    pub origin_resolved: bool,
    pub quote: ShippingQuote,
}

/// A cart that has been split and quoted, but not yet priced against a voucher.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotedCart {
    pub groups: Vec<VendorGroup>,
    pub grand_subtotal: Money,
    pub buyer_district: District,
    pub vendor_shipping: Vec<VendorShipping>,
    pub total_shipping_fee: Money,
}

/// A fully priced checkout. No order has been created yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutPlan {
    pub buyer_district: Option<District>,
    pub vendor_shipping: Vec<VendorShipping>,
    pub voucher: Option<VoucherApplication>,
    pub grand_subtotal: Money,
    pub total_shipping_fee: Money,
    pub total_voucher_discount: Money,
    /// `grand_subtotal + total_shipping_fee - total_voucher_discount`
    pub grand_total: Money,
    /// One entry per vendor, in ascending vendor id order
    pub allocations: Vec<VendorAllocation>,
}

impl CheckoutPlan {
    /// Builds a plan around allocations that were computed elsewhere, deriving the totals from them.
    pub fn from_allocations(allocations: Vec<VendorAllocation>, voucher: Option<VoucherApplication>) -> Self {
        let sum = |f: fn(&VendorAllocation) -> Money| allocations.iter().map(f).sum::<Money>();
        Self {
            buyer_district: None,
            vendor_shipping: vec![],
            grand_subtotal: sum(|a| a.subtotal),
            total_shipping_fee: sum(|a| a.allocated_shipping_fee),
            total_voucher_discount: sum(|a| a.allocated_voucher_discount),
            grand_total: sum(|a| a.vendor_total),
            voucher,
            allocations,
        }
    }

    pub fn vendor_ids(&self) -> Vec<&VendorId> {
        self.allocations.iter().map(|a| &a.vendor_id).collect()
    }

    pub fn voucher_code(&self) -> Option<&str> {
        self.voucher.as_ref().map(|v| v.code.as_str())
    }
}

/// The pure part of planning a checkout: splitting, address resolution, shipping quotes and allocation.
///
/// Nothing here touches the network. The voucher is priced by the caller between [`Self::quote_cart`] and
/// [`Self::finalize`].
#[derive(Debug, Clone)]
pub struct CheckoutPlanner<'a> {
    resolver: &'a DistrictResolver,
    calculator: &'a ShippingFeeCalculator,
    fallback_origin: Option<District>,
}

impl<'a> CheckoutPlanner<'a> {
    pub fn new(
        resolver: &'a DistrictResolver,
        calculator: &'a ShippingFeeCalculator,
        fallback_origin: Option<District>,
    ) -> Self {
        Self { resolver, calculator, fallback_origin }
    }

    /// Splits the cart by vendor and quotes every vendor's shipping leg to the buyer.
    ///
    /// Vendors missing from `vendor_addresses`, or whose address does not resolve, ship from the fallback origin.
    /// An unresolvable buyer address blocks the checkout.
    pub fn quote_cart(
        &self,
        cart: &[CartLineItem],
        buyer_address: &str,
        vendor_addresses: &HashMap<VendorId, String>,
    ) -> Result<QuotedCart, CheckoutError> {
        let groups = partition_cart(cart)?;
        let grand_subtotal = grand_subtotal(&groups)?;
        let buyer_district = self.resolver.resolve_district(buyer_address).ok_or_else(|| {
            warn!("🚚️ Cannot compute shipping. The buyer address '{buyer_address}' did not resolve to a district");
            CheckoutError::BuyerAddressUnresolved(buyer_address.to_string())
        })?;
        let vendor_shipping = groups
            .iter()
            .map(|g| {
                let origin = vendor_addresses.get(&g.vendor_id).and_then(|a| self.resolver.resolve_district(a));
                let quote = self
                    .calculator
                    .quote_resolved(origin, Some(buyer_district), self.fallback_origin)
                    .map_err(|error| CheckoutError::VendorShipping { vendor: g.vendor_id.clone(), error })?;
                Ok(VendorShipping { vendor_id: g.vendor_id.clone(), origin_resolved: origin.is_some(), quote })
            })
            .collect::<Result<Vec<VendorShipping>, CheckoutError>>()?;
        let total_shipping_fee = Money::checked_sum(vendor_shipping.iter().map(|v| v.quote.fee))?;
        debug!(
            "🚚️ Shipping to {buyer_district} from {} vendors costs {total_shipping_fee} in total",
            vendor_shipping.len()
        );
        Ok(QuotedCart { groups, grand_subtotal, buyer_district, vendor_shipping, total_shipping_fee })
    }

    /// Allocates the shipping total and the voucher discount over the vendors.
    pub fn finalize(quoted: QuotedCart, voucher: Option<VoucherApplication>) -> Result<CheckoutPlan, CheckoutError> {
        let total_voucher_discount = voucher.as_ref().map_or(Money::ZERO, |v| v.total_discount);
        let allocations = allocate(&quoted.groups, quoted.total_shipping_fee, total_voucher_discount)?;
        let grand_total = grand_total(quoted.grand_subtotal, quoted.total_shipping_fee, total_voucher_discount)?;
        Ok(CheckoutPlan {
            buyer_district: Some(quoted.buyer_district),
            vendor_shipping: quoted.vendor_shipping,
            voucher,
            grand_subtotal: quoted.grand_subtotal,
            total_shipping_fee: quoted.total_shipping_fee,
            total_voucher_discount,
            grand_total,
            allocations,
        })
    }
}

fn grand_total(subtotal: Money, shipping: Money, discount: Money) -> Result<Money, MoneyError> {
    subtotal.checked_add(shipping)?.checked_sub(discount)
}
