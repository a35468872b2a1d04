use chrono::Duration;
use log::*;
use mkt_common::{
    helpers::{parse_boolean_flag, parse_env_var},
    Money,
};

use crate::{address::District, submission::CompensationPolicy};

pub const DEFAULT_SHIPPING_BASE_FEE: i64 = 15_000;
pub const DEFAULT_SHIPPING_RATE_PER_KM: i64 = 5_000;
pub const DEFAULT_SNAPSHOT_TTL_MINUTES: i64 = 30;
const DEFAULT_SNAPSHOT_DATABASE_URL: &str = "sqlite://data/checkout_snapshot.db";

#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    pub shipping_base_fee: Money,
    pub shipping_rate_per_km: Money,
    /// Origin district for vendors whose address cannot be resolved. When `None`, such vendors block the checkout.
    pub fallback_origin: Option<District>,
    pub compensation_policy: CompensationPolicy,
    /// How long a checkout parked for an external payment stays resumable
    pub snapshot_ttl: Duration,
    pub snapshot_database_url: String,
    /// Keep the pending checkout in memory rather than in the snapshot database
    pub snapshot_in_memory: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            shipping_base_fee: Money::from(DEFAULT_SHIPPING_BASE_FEE),
            shipping_rate_per_km: Money::from(DEFAULT_SHIPPING_RATE_PER_KM),
            fallback_origin: None,
            compensation_policy: CompensationPolicy::default(),
            snapshot_ttl: Duration::minutes(DEFAULT_SNAPSHOT_TTL_MINUTES),
            snapshot_database_url: DEFAULT_SNAPSHOT_DATABASE_URL.to_string(),
            snapshot_in_memory: false,
        }
    }
}

impl CheckoutConfig {
    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        let shipping_base_fee = money_from_env("MKT_SHIPPING_BASE_FEE", defaults.shipping_base_fee);
        let shipping_rate_per_km = money_from_env("MKT_SHIPPING_RATE_PER_KM", defaults.shipping_rate_per_km);
        let fallback_origin = match parse_env_var::<District>("MKT_FALLBACK_ORIGIN_DISTRICT") {
            Some(Ok(d)) => {
                info!("🪛️ Vendors with unresolvable addresses will ship from {d}");
                Some(d)
            },
            Some(Err(s)) => {
                error!(
                    "🪛️ {s} is not a known district for MKT_FALLBACK_ORIGIN_DISTRICT. Vendors with unresolvable \
                     addresses will block checkout."
                );
                None
            },
            None => {
                warn!(
                    "🪛️ MKT_FALLBACK_ORIGIN_DISTRICT is not set. Vendors with unresolvable addresses will block \
                     checkout."
                );
                None
            },
        };
        let compensation_policy = match parse_env_var::<CompensationPolicy>("MKT_COMPENSATION_POLICY") {
            Some(Ok(p)) => p,
            Some(Err(s)) => {
                error!("🪛️ {s} is not a valid MKT_COMPENSATION_POLICY. Using the default, {}.", defaults.compensation_policy);
                defaults.compensation_policy
            },
            None => defaults.compensation_policy,
        };
        let snapshot_ttl = match parse_env_var::<i64>("MKT_SNAPSHOT_TTL_MINUTES") {
            Some(Ok(m)) if m > 0 => Duration::minutes(m),
            Some(_) => {
                error!(
                    "🪛️ MKT_SNAPSHOT_TTL_MINUTES must be a positive number of minutes. Using the default, \
                     {DEFAULT_SNAPSHOT_TTL_MINUTES}."
                );
                defaults.snapshot_ttl
            },
            None => defaults.snapshot_ttl,
        };
        let snapshot_database_url = std::env::var("MKT_SNAPSHOT_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ MKT_SNAPSHOT_DATABASE_URL is not set. Using the default, {DEFAULT_SNAPSHOT_DATABASE_URL}.");
            defaults.snapshot_database_url.clone()
        });
        let snapshot_in_memory = parse_boolean_flag(std::env::var("MKT_SNAPSHOT_IN_MEMORY").ok(), false);
        Self {
            shipping_base_fee,
            shipping_rate_per_km,
            fallback_origin,
            compensation_policy,
            snapshot_ttl,
            snapshot_database_url,
            snapshot_in_memory,
        }
    }

    pub fn with_fallback_origin(mut self, district: Option<District>) -> Self {
        self.fallback_origin = district;
        self
    }

    pub fn with_compensation_policy(mut self, policy: CompensationPolicy) -> Self {
        self.compensation_policy = policy;
        self
    }

    pub fn with_snapshot_ttl(mut self, ttl: Duration) -> Self {
        self.snapshot_ttl = ttl;
        self
    }
}

fn money_from_env(key: &str, default: Money) -> Money {
    match parse_env_var::<Money>(key) {
        Some(Ok(m)) if !m.is_negative() => m,
        Some(_) => {
            error!("🪛️ {key} must be a non-negative amount. Using the default, {default}.");
            default
        },
        None => {
            debug!("🪛️ {key} is not set. Using the default, {default}.");
            default
        },
    }
}
