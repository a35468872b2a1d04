mod cucumber;

use ::cucumber::{writer, World};
use log::*;
use tokio::runtime::Runtime;

use crate::cucumber::CheckoutWorld;

fn main() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let sys = Runtime::new().expect("Error starting the tokio runtime");
    sys.block_on(CheckoutWorld::cucumber().with_writer(writer::Libtest::or_basic()).run_and_exit("tests/features"));
    info!("🚀️ Tests complete");
}
