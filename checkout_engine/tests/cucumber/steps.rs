use checkout_engine::{
    allocation::allocate,
    checkout_types::{CartLineItem, PaymentMethod, VendorId},
    submission::AbortReason,
    traits::{OrderGatewayError, SubmissionFailureKind},
    CheckoutError,
    District,
};
use cucumber::{given, then, when};
use mkt_common::Money;

use crate::cucumber::{checkout_world::unquote, CheckoutWorld};

//--------------------------------------      Allocation      ---------------------------------------------------------
#[given(expr = "vendor {word} with a subtotal of {int}")]
async fn vendor_subtotal(world: &mut CheckoutWorld, vendor: String, subtotal: i64) {
    world.add_group(&vendor, subtotal);
}

#[when(expr = "I allocate a shipping fee of {int} and a voucher discount of {int}")]
async fn allocate_totals(world: &mut CheckoutWorld, shipping: i64, discount: i64) {
    match allocate(&world.groups, Money::from(shipping), Money::from(discount)) {
        Ok(allocations) => world.allocations = allocations,
        Err(e) => world.error = Some(e.into()),
    }
}

#[then(expr = "vendor {word} is allocated {int} shipping and {int} discount")]
async fn check_allocation(world: &mut CheckoutWorld, vendor: String, shipping: i64, discount: i64) {
    let allocation = world.allocation(&vendor);
    assert_eq!(allocation.allocated_shipping_fee, Money::from(shipping), "Shipping allocation for {vendor}");
    assert_eq!(allocation.allocated_voucher_discount, Money::from(discount), "Voucher allocation for {vendor}");
}

#[then(expr = "vendor {word} has a total of {int}")]
async fn check_vendor_total(world: &mut CheckoutWorld, vendor: String, total: i64) {
    assert_eq!(world.allocation(&vendor).vendor_total, Money::from(total));
}

#[then(expr = "the allocations add up to {int} shipping and {int} discount")]
async fn check_allocation_sums(world: &mut CheckoutWorld, shipping: i64, discount: i64) {
    let allocations = match &world.plan {
        Some(plan) => plan.allocations.clone(),
        None => world.allocations.clone(),
    };
    let total_shipping = allocations.iter().map(|a| a.allocated_shipping_fee).sum::<Money>();
    let total_discount = allocations.iter().map(|a| a.allocated_voucher_discount).sum::<Money>();
    assert_eq!(total_shipping, Money::from(shipping));
    assert_eq!(total_discount, Money::from(discount));
}

#[then("the allocation is rejected because the discount is too large")]
async fn check_discount_rejected(world: &mut CheckoutWorld) {
    let err = world.error.as_ref().expect("Expected an error");
    assert!(
        matches!(err, CheckoutError::Allocation(checkout_engine::allocation::AllocationError::DiscountExceedsTotal { .. })),
        "Unexpected error: {err}"
    );
}

//--------------------------------------  Address resolution  ---------------------------------------------------------
#[when(expr = "I resolve the address {string}")]
async fn resolve_address(world: &mut CheckoutWorld, address: String) {
    world.resolved = world.resolver().resolve_district(unquote(&address));
}

#[then(expr = "the district is {string}")]
async fn check_district(world: &mut CheckoutWorld, district: String) {
    let expected = unquote(&district).parse::<District>().expect("Not a known district");
    assert_eq!(world.resolved, Some(expected));
}

#[then("the address is not resolved")]
async fn check_unresolved(world: &mut CheckoutWorld) {
    assert_eq!(world.resolved, None);
}

//--------------------------------------        Cart          ---------------------------------------------------------
#[given(expr = "the cart has {int} x {word} from vendor {word} at {int}")]
async fn add_to_cart(world: &mut CheckoutWorld, quantity: u32, product: String, vendor: String, price: i64) {
    let name = format!("Product {product}");
    world.cart.push(CartLineItem::new(product.as_str(), vendor.as_str(), Money::from(price), quantity, name));
}

#[given(expr = "vendor {word} ships from {string}")]
async fn vendor_address(world: &mut CheckoutWorld, vendor: String, address: String) {
    world.vendor_addresses.insert(VendorId::from(vendor), unquote(&address).to_string());
}

#[given(expr = "the buyer lives at {string}")]
async fn buyer_address(world: &mut CheckoutWorld, address: String) {
    world.buyer_address = unquote(&address).to_string();
}

#[given(expr = "the buyer enters the voucher {word}")]
async fn enter_voucher(world: &mut CheckoutWorld, code: String) {
    world.voucher_code = Some(code);
}

//--------------------------------------      Checkout        ---------------------------------------------------------
#[when("I plan the checkout")]
async fn plan_checkout(world: &mut CheckoutWorld) {
    let api = world.api();
    let result =
        api.plan_checkout(&world.cart, &world.buyer_address, &world.vendor_addresses, world.voucher_code.as_deref()).await;
    match result {
        Ok(plan) => world.plan = Some(plan),
        Err(e) => world.error = Some(e),
    }
}

#[then(expr = "the total shipping fee is {int}")]
async fn check_total_shipping(world: &mut CheckoutWorld, fee: i64) {
    let plan = world.plan.as_ref().expect("No checkout plan");
    assert_eq!(plan.total_shipping_fee, Money::from(fee));
}

#[then(expr = "the grand total is {int}")]
async fn check_grand_total(world: &mut CheckoutWorld, total: i64) {
    let plan = world.plan.as_ref().expect("No checkout plan");
    assert_eq!(plan.grand_total, Money::from(total));
    let sum = plan.allocations.iter().map(|a| a.vendor_total).sum::<Money>();
    assert_eq!(sum, plan.grand_total);
}

#[then("the checkout is blocked because shipping cannot be computed")]
async fn check_blocked(world: &mut CheckoutWorld) {
    let err = world.error.as_ref().expect("Expected the checkout to fail");
    assert!(matches!(err, CheckoutError::BuyerAddressUnresolved(_)), "Unexpected error: {err}");
    assert!(world.market.attempted_vendors().await.is_empty());
}

#[given(expr = "the order service rejects vendor {word} as invalid")]
async fn reject_vendor(world: &mut CheckoutWorld, vendor: String) {
    let error = OrderGatewayError::Validation(format!("{vendor} cannot deliver to this address"));
    world.market.fail_next_order(&VendorId::from(vendor), error).await;
}

#[given(expr = "the order service fails for vendor {word}")]
async fn server_error_for_vendor(world: &mut CheckoutWorld, vendor: String) {
    let error = OrderGatewayError::Server { status: 503, message: "Service unavailable".into() };
    world.market.fail_next_order(&VendorId::from(vendor), error).await;
}

#[given(expr = "the session expires before vendor {word} is submitted")]
async fn session_expires(world: &mut CheckoutWorld, vendor: String) {
    let error = OrderGatewayError::Unauthenticated("The access token has expired".into());
    world.market.fail_next_order(&VendorId::from(vendor), error).await;
}

#[when("I complete the checkout with cash on delivery")]
async fn complete_cod(world: &mut CheckoutWorld) {
    complete(world, PaymentMethod::CashOnDelivery).await;
}

async fn complete(world: &mut CheckoutWorld, payment: PaymentMethod) {
    if world.plan.is_none() {
        plan_checkout(world).await;
    }
    let plan = world.plan.clone().expect("The checkout could not be planned");
    let api = world.api();
    match api.complete_checkout(&plan, &world.delivery(), &payment).await {
        Ok(report) => world.report = Some(report),
        Err(e) => world.error = Some(e),
    }
}

#[when(expr = "I park the checkout for payment {word} with {word}")]
async fn park_checkout(world: &mut CheckoutWorld, reference: String, provider: String) {
    if world.plan.is_none() {
        plan_checkout(world).await;
    }
    let plan = world.plan.clone().expect("The checkout could not be planned");
    let payment = PaymentMethod::Gateway { provider, reference };
    world.api().prepare_gateway_checkout(plan, world.delivery(), payment).await.expect("Error parking checkout");
}

#[when(expr = "the buyer returns from the payment page with reference {word}")]
async fn resume_checkout(world: &mut CheckoutWorld, reference: String) {
    match world.api().resume_gateway_checkout(&reference).await {
        Ok(report) => world.report = Some(report),
        Err(e) => world.error = Some(e),
    }
}

#[then("the resume is refused because the reference does not match")]
async fn check_reference_mismatch(world: &mut CheckoutWorld) {
    let err = world.error.take().expect("Expected an error");
    assert!(matches!(err, CheckoutError::GatewayReferenceMismatch { .. }), "Unexpected error: {err}");
}

#[then("there is no pending checkout to resume")]
async fn check_no_pending(world: &mut CheckoutWorld) {
    let err = world.api().resume_gateway_checkout("any").await.unwrap_err();
    assert_eq!(err, CheckoutError::NoPendingCheckout);
}

//--------------------------------------  Submission report   ---------------------------------------------------------
#[then(expr = "{int} sub-orders are confirmed")]
async fn check_confirmed_count(world: &mut CheckoutWorld, count: usize) {
    assert_eq!(world.report().confirmed.len(), count);
}

#[then(expr = "vendor {word} is confirmed")]
async fn check_vendor_confirmed(world: &mut CheckoutWorld, vendor: String) {
    let confirmed = world.report().confirmed.iter().any(|o| o.vendor_id().as_str() == vendor);
    assert!(confirmed, "{vendor} was not confirmed");
}

#[then(expr = "vendor {word} failed with a {word} error")]
async fn check_vendor_failed(world: &mut CheckoutWorld, vendor: String, kind: String) {
    let failure = world
        .report()
        .failed
        .iter()
        .find(|f| f.vendor_id.as_str() == vendor)
        .unwrap_or_else(|| panic!("{vendor} did not fail"));
    assert_eq!(failure.reason.kind.to_string(), kind);
}

#[then(expr = "only vendor {word} failed")]
async fn check_only_failure(world: &mut CheckoutWorld, vendor: String) {
    let failed = world.report().failed.iter().map(|f| f.vendor_id.as_str().to_string()).collect::<Vec<_>>();
    assert_eq!(failed, vec![vendor]);
}

#[then("the batch was aborted for re-authentication")]
async fn check_aborted(world: &mut CheckoutWorld) {
    let report = world.report();
    assert_eq!(report.aborted, Some(AbortReason::Unauthenticated));
    assert!(report.requires_reauthentication());
    assert_eq!(report.failed[0].reason.kind, SubmissionFailureKind::Unauthenticated);
}

#[then(expr = "{int} sub-orders were created")]
async fn check_created(world: &mut CheckoutWorld, count: usize) {
    assert_eq!(world.market.created_orders().await.len(), count);
}

#[then(expr = "{int} vendors were not attempted")]
async fn check_not_attempted(world: &mut CheckoutWorld, count: usize) {
    assert_eq!(world.report().not_attempted.len(), count);
}

#[then("the cart is cleared")]
async fn check_cart_cleared(world: &mut CheckoutWorld) {
    assert!(world.report().cart_cleared);
    assert!(world.market.cart_cleared().await);
}

#[then("the cart is kept")]
async fn check_cart_kept(world: &mut CheckoutWorld) {
    assert!(!world.report().cart_cleared);
    assert!(!world.market.cart_cleared().await);
}

#[then(expr = "{int} sub-orders were cancelled")]
async fn check_cancelled(world: &mut CheckoutWorld, count: usize) {
    let cancelled = world.report().compensation.as_ref().map_or(0, |c| c.cancelled.len());
    assert_eq!(cancelled, count);
    assert_eq!(world.market.cancelled_orders().await.len(), count);
}

#[then(expr = "every sub-order carries the payment reference {word}")]
async fn check_payment_reference(world: &mut CheckoutWorld, reference: String) {
    let created = world.market.created_orders().await;
    assert!(!created.is_empty());
    for (_, request) in created {
        assert_eq!(request.payment_reference.as_deref(), Some(reference.as_str()));
    }
}
