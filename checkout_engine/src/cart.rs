//! Splits a cart into one [`VendorGroup`] per vendor.

use std::collections::BTreeMap;

use log::*;
use mkt_common::{Money, MoneyError};
use thiserror::Error;

use crate::checkout_types::{CartLineItem, ProductId, VendorGroup, VendorId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("The cart is empty")]
    EmptyCart,
    #[error("{product} from {vendor} has a quantity of zero")]
    ZeroQuantity { product: ProductId, vendor: VendorId },
    #[error("{product} from {vendor} has a negative unit price ({price})")]
    NegativePrice { product: ProductId, vendor: VendorId, price: Money },
    #[error("Cart subtotal could not be calculated. {0}")]
    Money(#[from] MoneyError),
}

/// Groups the line items by vendor and computes each vendor's subtotal.
///
/// Groups come back in ascending vendor id order. Items keep their relative cart order inside a group. The input is
/// not modified.
pub fn partition_cart(items: &[CartLineItem]) -> Result<Vec<VendorGroup>, CartError> {
    if items.is_empty() {
        return Err(CartError::EmptyCart);
    }
    let mut groups: BTreeMap<&VendorId, Vec<CartLineItem>> = BTreeMap::new();
    for item in items {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity { product: item.product_id.clone(), vendor: item.vendor_id.clone() });
        }
        if item.unit_price.is_negative() {
            return Err(CartError::NegativePrice {
                product: item.product_id.clone(),
                vendor: item.vendor_id.clone(),
                price: item.unit_price,
            });
        }
        groups.entry(&item.vendor_id).or_default().push(item.clone());
    }
    let groups = groups
        .into_iter()
        .map(|(vendor_id, items)| {
            let totals = items.iter().map(|i| i.line_total()).collect::<Result<Vec<Money>, MoneyError>>()?;
            let subtotal = Money::checked_sum(totals)?;
            trace!("🧮️ {vendor_id}: {} items, subtotal {subtotal}", items.len());
            Ok(VendorGroup { vendor_id: vendor_id.clone(), items, subtotal })
        })
        .collect::<Result<Vec<VendorGroup>, CartError>>()?;
    debug!("🧮️ Cart of {} items split into {} vendor groups", items.len(), groups.len());
    Ok(groups)
}

/// The sum of every group's subtotal.
pub fn grand_subtotal(groups: &[VendorGroup]) -> Result<Money, MoneyError> {
    Money::checked_sum(groups.iter().map(|g| g.subtotal))
}
