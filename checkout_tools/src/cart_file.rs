use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use checkout_engine::checkout_types::{CartLineItem, DeliveryInfo, VendorId};
use serde::{Deserialize, Serialize};

/// The JSON document the CLI reads a cart from.
///
/// ```json
/// {
///   "items": [{"product_id": "p1", "vendor_id": "shop-a", "unit_price": 35000, "quantity": 2, "name": "Mì Quảng"}],
///   "vendors": {"shop-a": "45 Điện Biên Phủ, Thanh Khê"},
///   "delivery": {"recipient_name": "Lan", "phone": "0905123456", "street": "12 Bạch Đằng", "city": "Đà Nẵng"}
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartFile {
    pub items: Vec<CartLineItem>,
    /// Pickup address of each vendor
    #[serde(default)]
    pub vendors: HashMap<VendorId, String>,
    pub delivery: Option<DeliveryInfo>,
}

impl CartFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("{} is not a valid cart file", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// The address shipping is quoted to: the override if one is given, otherwise the delivery address.
    pub fn buyer_address(&self, over: Option<&str>) -> Option<String> {
        over.map(String::from).or_else(|| self.delivery.as_ref().map(|d| d.composed_address()))
    }
}
