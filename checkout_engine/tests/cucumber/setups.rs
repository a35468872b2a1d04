use checkout_engine::{CompensationPolicy, District, DistrictResolver};
use cucumber::given;

use crate::cucumber::{checkout_world::unquote, CheckoutWorld};

#[given("a fresh marketplace")]
async fn fresh_marketplace(world: &mut CheckoutWorld) {
    *world = CheckoutWorld::default();
}

#[given(expr = "the compensation policy is {word}")]
async fn compensation_policy(world: &mut CheckoutWorld, policy: String) {
    world.policy = policy.parse::<CompensationPolicy>().expect("Not a valid policy");
}

#[given(expr = "the fallback origin district is {string}")]
async fn fallback_origin(world: &mut CheckoutWorld, district: String) {
    world.fallback_origin = Some(unquote(&district).parse::<District>().expect("Not a known district"));
}

#[given(expr = "a street table with {string} in district {string}")]
async fn custom_street_table(world: &mut CheckoutWorld, street: String, district: String) {
    let district = unquote(&district).parse::<District>().expect("Not a known district");
    let street = unquote(&street).to_string();
    let no_keywords: [(&str, District); 0] = [];
    let resolver = DistrictResolver::new([(street.as_str(), district)], no_keywords).expect("Invalid street table");
    world.resolver = Some(resolver);
}

#[given(expr = "the voucher {word} is worth {int}")]
async fn voucher_exists(world: &mut CheckoutWorld, code: String, discount: i64) {
    world.market.add_voucher(&code, discount.into()).await;
}
