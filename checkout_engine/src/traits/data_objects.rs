use mkt_common::Money;
use serde::{Deserialize, Serialize};

use crate::checkout_types::{
    CartLineItem,
    DeliveryInfo,
    DeliveryInfoError,
    PaymentMethod,
    ProductId,
    SubOrderStatusFlag,
    VendorAllocation,
    VendorId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubOrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl From<&CartLineItem> for SubOrderLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Everything the order service needs to create one vendor's sub-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubOrderRequest {
    pub vendor_id: VendorId,
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<SubOrderLine>,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub voucher_discount: Money,
    pub total: Money,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub status: SubOrderStatusFlag,
    pub voucher_code: Option<String>,
}

impl SubOrderRequest {
    pub fn new(
        allocation: &VendorAllocation,
        delivery: &DeliveryInfo,
        payment: &PaymentMethod,
        voucher_code: Option<&str>,
    ) -> Result<Self, DeliveryInfoError> {
        delivery.validate()?;
        Ok(Self {
            vendor_id: allocation.vendor_id.clone(),
            recipient_name: delivery.recipient_name.trim().to_string(),
            phone: delivery.normalized_phone()?,
            address: delivery.composed_address(),
            items: allocation.items.iter().map(SubOrderLine::from).collect(),
            subtotal: allocation.subtotal,
            shipping_fee: allocation.allocated_shipping_fee,
            voucher_discount: allocation.allocated_voucher_discount,
            total: allocation.vendor_total,
            payment_method: payment.code().to_string(),
            payment_reference: payment.gateway_reference().map(String::from),
            status: payment.initial_status(),
            voucher_code: voucher_code.map(String::from),
        })
    }
}
