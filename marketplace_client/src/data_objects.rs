use checkout_engine::checkout_types::ExternalOrderId;
use mkt_common::Money;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `POST /orders`. Depending on the backend version the id is a number or a string.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    #[serde(alias = "order_id", alias = "orderId")]
    pub id: Value,
}

impl CreatedOrder {
    pub fn order_id(&self) -> Option<ExternalOrderId> {
        match &self.id {
            Value::String(s) if !s.trim().is_empty() => Some(ExternalOrderId::from(s.trim())),
            Value::Number(n) => Some(ExternalOrderId::from(n.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderRequest<'a> {
    pub reason: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyVoucherRequest<'a> {
    pub code: &'a str,
    pub order_total: Money,
}

/// Response body of `POST /vouchers/apply`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoucherQuote {
    #[serde(alias = "discount_amount")]
    pub discount: Money,
    #[serde(default)]
    pub code: Option<String>,
}
