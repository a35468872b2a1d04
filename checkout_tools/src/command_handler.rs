use anyhow::{anyhow, Context, Result};
use checkout_engine::{
    checkout_types::{DeliveryInfo, PaymentMethod, VoucherApplication},
    events::EventProducers,
    traits::SnapshotStorage,
    CheckoutApi,
    CheckoutConfig,
    CheckoutPlanner,
    District,
    DistanceTable,
    DistrictResolver,
    MemorySnapshotStorage,
    ShippingFeeCalculator,
    SqliteSnapshotStorage,
};
use log::*;
use marketplace_client::{MarketplaceApi, MarketplaceConfig};
use mkt_common::Money;

use crate::{
    cart_file::CartFile,
    formatting::{format_plan, format_quote, format_report, format_resolution},
    CheckoutParams,
    SplitParams,
};

fn calculator(config: &CheckoutConfig) -> Result<ShippingFeeCalculator> {
    Ok(ShippingFeeCalculator::new(DistanceTable::da_nang()?, config.shipping_base_fee, config.shipping_rate_per_km)?)
}

pub fn handle_resolve(address: &str) -> Result<()> {
    let resolver = DistrictResolver::da_nang()?;
    println!("{}", format_resolution(address, resolver.resolve(address).as_ref()));
    Ok(())
}

pub fn handle_quote(from: &str, to: &str) -> Result<()> {
    let config = CheckoutConfig::from_env_or_default();
    let from = from.parse::<District>()?;
    let to = to.parse::<District>()?;
    let quote = calculator(&config)?.quote(from, to)?;
    print!("{}", format_quote(&quote)?);
    Ok(())
}

/// Prices the cart without contacting the marketplace. The voucher is given as a discount amount.
pub fn handle_split(params: SplitParams) -> Result<()> {
    let config = CheckoutConfig::from_env_or_default();
    let cart = CartFile::load(&params.cart)?;
    let buyer = cart
        .buyer_address(params.buyer.as_deref())
        .ok_or_else(|| anyhow!("The cart file has no delivery address. Use --buyer to give one"))?;
    let voucher = match params.voucher {
        Some(amount) => {
            let discount = amount.parse::<Money>().with_context(|| format!("'{amount}' is not an amount of money"))?;
            Some(VoucherApplication::new("manual", discount))
        },
        None => None,
    };
    let resolver = DistrictResolver::da_nang()?;
    let calculator = calculator(&config)?;
    let planner = CheckoutPlanner::new(&resolver, &calculator, config.fallback_origin);
    let quoted = planner.quote_cart(&cart.items, &buyer, &cart.vendors)?;
    let plan = CheckoutPlanner::finalize(quoted, voucher)?;
    print!("{}", format_plan(&plan)?);
    Ok(())
}

pub async fn handle_checkout(params: CheckoutParams) -> Result<()> {
    let config = CheckoutConfig::from_env_or_default();
    if config.snapshot_in_memory {
        let api = new_checkout_api(MemorySnapshotStorage::new(), config)?;
        run_checkout(&api, params).await
    } else {
        let storage = SqliteSnapshotStorage::new_with_url(&config.snapshot_database_url, 1).await?;
        let api = new_checkout_api(storage, config)?;
        run_checkout(&api, params).await
    }
}

pub async fn handle_resume(reference: &str) -> Result<()> {
    let config = CheckoutConfig::from_env_or_default();
    if config.snapshot_in_memory {
        return Err(anyhow!("Parked checkouts are only kept across runs when MKT_SNAPSHOT_IN_MEMORY is off"));
    }
    let storage = SqliteSnapshotStorage::new_with_url(&config.snapshot_database_url, 1).await?;
    let api = new_checkout_api(storage, config)?;
    let report = api.resume_gateway_checkout(reference).await?;
    print!("{}", format_report(&report)?);
    Ok(())
}

fn new_checkout_api<S: SnapshotStorage>(storage: S, config: CheckoutConfig) -> Result<CheckoutApi<MarketplaceApi, S>> {
    let client = MarketplaceApi::new(MarketplaceConfig::new_from_env_or_default())?;
    Ok(CheckoutApi::new(client, storage, config, EventProducers::default())?)
}

async fn run_checkout<S: SnapshotStorage>(api: &CheckoutApi<MarketplaceApi, S>, params: CheckoutParams) -> Result<()> {
    let cart = CartFile::load(&params.cart)?;
    let delivery: DeliveryInfo =
        cart.delivery.clone().ok_or_else(|| anyhow!("The cart file has no delivery details"))?;
    delivery.validate()?;
    let buyer = delivery.composed_address();
    let plan = api.plan_checkout(&cart.items, &buyer, &cart.vendors, params.voucher.as_deref()).await?;
    print!("{}", format_plan(&plan)?);
    if params.dry_run {
        info!("Dry run. No orders were created");
        return Ok(());
    }
    let payment = match (params.gateway, params.reference) {
        (Some(provider), Some(reference)) => PaymentMethod::Gateway { provider, reference },
        _ => PaymentMethod::CashOnDelivery,
    };
    if let Some(reference) = payment.gateway_reference().map(String::from) {
        let expires_at = api.prepare_gateway_checkout(plan, delivery, payment).await?;
        println!(
            "Checkout parked until {}. Run `checkouttools resume {reference}` once the payment is complete.",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        return Ok(());
    }
    let report = api.complete_checkout(&plan, &delivery, &payment).await?;
    print!("{}", format_report(&report)?);
    Ok(())
}
