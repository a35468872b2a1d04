pub mod prepare_env;
mod scripted_marketplace;

pub use scripted_marketplace::ScriptedMarketplace;
