use std::{fmt::Display, str::FromStr};

use mkt_common::{Money, MoneyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declares a lightweight string identifier newtype.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

//--------------------------------------     Identifiers      ---------------------------------------------------------
string_id!(
    /// The identifier of a vendor (shop). Vendor ids also define the deterministic processing order of a checkout:
    /// groups, allocations and submissions are always in ascending vendor id order.
    VendorId,
    "shop:"
);
string_id!(ProductId, "product:");
string_id!(
    /// The identifier the external order service assigns to a created sub-order.
    ExternalOrderId,
    "#"
);

//--------------------------------------     CartLineItem     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    /// Price of a single unit, in minor currency units
    pub unit_price: Money,
    pub quantity: u32,
    /// Display name, copied verbatim into the sub-order
    pub name: String,
}

impl CartLineItem {
    pub fn new<P, V, S>(product_id: P, vendor_id: V, unit_price: Money, quantity: u32, name: S) -> Self
    where
        P: Into<ProductId>,
        V: Into<VendorId>,
        S: Into<String>,
    {
        Self {
            product_id: product_id.into(),
            vendor_id: vendor_id.into(),
            unit_price,
            quantity,
            name: name.into(),
        }
    }

    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }
}

//--------------------------------------     VendorGroup      ---------------------------------------------------------
/// All the cart items sold by one vendor. Built by [`crate::cart::partition_cart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorGroup {
    pub vendor_id: VendorId,
    pub items: Vec<CartLineItem>,
    pub subtotal: Money,
}

//--------------------------------------   VendorAllocation   ---------------------------------------------------------
/// A vendor's share of the cart-wide shipping fee and voucher discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAllocation {
    pub vendor_id: VendorId,
    pub items: Vec<CartLineItem>,
    pub subtotal: Money,
    pub allocated_shipping_fee: Money,
    pub allocated_voucher_discount: Money,
    /// `subtotal + allocated_shipping_fee - allocated_voucher_discount`
    pub vendor_total: Money,
}

impl VendorAllocation {
    /// True when the rounding remainder pushed more discount onto this vendor than its own subtotal.
    pub fn is_overdiscounted(&self) -> bool {
        self.allocated_voucher_discount > self.subtotal
    }
}

//--------------------------------------  VoucherApplication  ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherApplication {
    pub code: String,
    pub total_discount: Money,
}

impl VoucherApplication {
    pub fn new<S: Into<String>>(code: S, total_discount: Money) -> Self {
        Self { code: code.into(), total_discount }
    }
}

//--------------------------------------     DeliveryInfo     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryInfoError {
    #[error("The recipient name is required")]
    MissingRecipient,
    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
    #[error("The delivery address is empty")]
    MissingAddress,
}

/// Where and to whom every sub-order of a checkout is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub recipient_name: String,
    pub phone: String,
    pub street: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
}

impl DeliveryInfo {
    pub fn new<S: Into<String>>(recipient_name: S, phone: S, street: S) -> Self {
        Self { recipient_name: recipient_name.into(), phone: phone.into(), street: street.into(), ..Default::default() }
    }

    pub fn with_ward<S: Into<String>>(mut self, ward: S) -> Self {
        self.ward = ward.into();
        self
    }

    pub fn with_district<S: Into<String>>(mut self, district: S) -> Self {
        self.district = district.into();
        self
    }

    pub fn with_city<S: Into<String>>(mut self, city: S) -> Self {
        self.city = city.into();
        self
    }

    /// The single-line address sent to the order service, e.g. `"12 Bạch Đằng, Thạch Thang, Hải Châu, Đà Nẵng"`.
    pub fn composed_address(&self) -> String {
        [&self.street, &self.ward, &self.district, &self.city]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<&str>>()
            .join(", ")
    }

    /// Returns the phone number in its canonical local form (`0xxxxxxxxx`).
    pub fn normalized_phone(&self) -> Result<String, DeliveryInfoError> {
        let digits = self.phone.chars().filter(|c| !c.is_whitespace() && *c != '.' && *c != '-').collect::<String>();
        let local = match digits.strip_prefix("+84") {
            Some(rest) => format!("0{rest}"),
            None => digits,
        };
        let valid = (9..=11).contains(&local.len()) && local.chars().all(|c| c.is_ascii_digit());
        if valid {
            Ok(local)
        } else {
            Err(DeliveryInfoError::InvalidPhone(self.phone.clone()))
        }
    }

    pub fn validate(&self) -> Result<(), DeliveryInfoError> {
        if self.recipient_name.trim().is_empty() {
            return Err(DeliveryInfoError::MissingRecipient);
        }
        if self.composed_address().is_empty() {
            return Err(DeliveryInfoError::MissingAddress);
        }
        self.normalized_phone().map(|_| ())
    }
}

//--------------------------------------    PaymentMethod     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    /// Paid through an external payment page. `reference` is the gateway's order reference, returned to us when the
    /// buyer comes back from the redirect.
    Gateway { provider: String, reference: String },
}

impl PaymentMethod {
    pub fn gateway_reference(&self) -> Option<&str> {
        match self {
            PaymentMethod::CashOnDelivery => None,
            PaymentMethod::Gateway { reference, .. } => Some(reference.as_str()),
        }
    }

    pub fn initial_status(&self) -> SubOrderStatusFlag {
        match self {
            PaymentMethod::CashOnDelivery => SubOrderStatusFlag::AwaitingFulfillment,
            PaymentMethod::Gateway { .. } => SubOrderStatusFlag::AwaitingPayment,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::Gateway { provider, .. } => provider.as_str(),
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::CashOnDelivery => write!(f, "Cash on delivery"),
            PaymentMethod::Gateway { provider, reference } => write!(f, "{provider} ({reference})"),
        }
    }
}

/// The status a sub-order is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubOrderStatusFlag {
    AwaitingPayment,
    AwaitingFulfillment,
}

impl Display for SubOrderStatusFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubOrderStatusFlag::AwaitingPayment => write!(f, "awaiting_payment"),
            SubOrderStatusFlag::AwaitingFulfillment => write!(f, "awaiting_fulfillment"),
        }
    }
}
