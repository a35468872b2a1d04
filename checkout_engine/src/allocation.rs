//! Proportional allocation of cart-wide amounts over vendor groups.
//!
//! Each vendor except the last receives `round_half_up(subtotal / grand_subtotal * total)`. The last vendor (in vendor
//! id order) receives whatever is left, so the allocations always add up to the total exactly. Shipping and voucher
//! discount are allocated independently using the same rule.

use std::collections::HashSet;

use log::*;
use mkt_common::{Money, MoneyError};
use thiserror::Error;

use crate::checkout_types::{VendorAllocation, VendorGroup, VendorId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("There are no vendor groups to allocate over")]
    NoVendorGroups,
    #[error("{0} appears more than once in the vendor groups")]
    DuplicateVendor(VendorId),
    #[error("{vendor} has a negative subtotal ({subtotal})")]
    NegativeSubtotal { vendor: VendorId, subtotal: Money },
    #[error("Cannot allocate in proportion to a negative weight ({0})")]
    NegativeWeight(Money),
    #[error("Cannot allocate a negative total ({0})")]
    NegativeTotal(Money),
    #[error("The voucher discount ({discount}) exceeds the payable total ({payable})")]
    DiscountExceedsTotal { discount: Money, payable: Money },
    #[error("Allocation overflowed. {0}")]
    Money(#[from] MoneyError),
}

/// Splits `total` over `weights` in proportion, rounding half up, with the last weight taking the remainder.
///
/// When every weight is zero, the weights are treated as equal. A zero total yields all zeros.
pub fn allocate_proportionally(weights: &[Money], total: Money) -> Result<Vec<Money>, AllocationError> {
    if weights.is_empty() {
        return Err(AllocationError::NoVendorGroups);
    }
    if let Some(w) = weights.iter().find(|w| w.is_negative()) {
        return Err(AllocationError::NegativeWeight(*w));
    }
    if total.is_negative() {
        return Err(AllocationError::NegativeTotal(total));
    }
    if total.is_zero() {
        return Ok(vec![Money::ZERO; weights.len()]);
    }
    let t = i128::from(total.value());
    let weighted_sum = weights.iter().map(|w| i128::from(w.value())).sum::<i128>();
    let equal_weights = weighted_sum == 0;
    let grand = if equal_weights { weights.len() as i128 } else { weighted_sum };
    let (init, _) = weights.split_at(weights.len() - 1);
    let mut result = Vec::with_capacity(weights.len());
    let mut allocated_so_far = 0i128;
    for w in init {
        let s = if equal_weights { 1 } else { i128::from(w.value()) };
        let share = (2 * s * t + grand) / (2 * grand);
        allocated_so_far += share;
        result.push(Money::try_from(share)?);
    }
    result.push(Money::try_from(t - allocated_so_far)?);
    Ok(result)
}

/// Allocates the total shipping fee and the total voucher discount over the vendor groups.
///
/// Allocations are returned in ascending vendor id order, whatever the order of `groups`. For both amounts, the sum of
/// the allocations equals the total exactly.
pub fn allocate(
    groups: &[VendorGroup],
    total_shipping_fee: Money,
    total_voucher_discount: Money,
) -> Result<Vec<VendorAllocation>, AllocationError> {
    if groups.is_empty() {
        return Err(AllocationError::NoVendorGroups);
    }
    let mut sorted = groups.iter().collect::<Vec<&VendorGroup>>();
    sorted.sort_by(|a, b| a.vendor_id.cmp(&b.vendor_id));
    let mut seen = HashSet::new();
    for g in &sorted {
        if !seen.insert(&g.vendor_id) {
            return Err(AllocationError::DuplicateVendor(g.vendor_id.clone()));
        }
        if g.subtotal.is_negative() {
            return Err(AllocationError::NegativeSubtotal { vendor: g.vendor_id.clone(), subtotal: g.subtotal });
        }
    }
    if total_voucher_discount.is_negative() {
        return Err(AllocationError::NegativeTotal(total_voucher_discount));
    }
    let payable = Money::checked_sum(sorted.iter().map(|g| g.subtotal))?;
    if total_voucher_discount > payable {
        return Err(AllocationError::DiscountExceedsTotal { discount: total_voucher_discount, payable });
    }
    let weights = sorted.iter().map(|g| g.subtotal).collect::<Vec<Money>>();
    let shipping = allocate_proportionally(&weights, total_shipping_fee)?;
    let discounts = allocate_proportionally(&weights, total_voucher_discount)?;
    let allocations = sorted
        .into_iter()
        .zip(shipping.into_iter().zip(discounts))
        .map(|(group, (allocated_shipping_fee, allocated_voucher_discount))| {
            let vendor_total =
                group.subtotal.checked_add(allocated_shipping_fee)?.checked_sub(allocated_voucher_discount)?;
            let allocation = VendorAllocation {
                vendor_id: group.vendor_id.clone(),
                items: group.items.clone(),
                subtotal: group.subtotal,
                allocated_shipping_fee,
                allocated_voucher_discount,
                vendor_total,
            };
            if allocation.is_overdiscounted() {
                warn!(
                    "🧮️ {} absorbs a discount of {} on a subtotal of {}",
                    allocation.vendor_id, allocated_voucher_discount, allocation.subtotal
                );
            }
            trace!(
                "🧮️ {}: subtotal {}, shipping {}, discount {}, total {}",
                allocation.vendor_id,
                allocation.subtotal,
                allocated_shipping_fee,
                allocated_voucher_discount,
                vendor_total
            );
            Ok(allocation)
        })
        .collect::<Result<Vec<VendorAllocation>, AllocationError>>()?;
    debug!(
        "🧮️ Allocated shipping {total_shipping_fee} and discount {total_voucher_discount} over {} vendors",
        allocations.len()
    );
    Ok(allocations)
}
