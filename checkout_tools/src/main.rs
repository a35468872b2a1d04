use clap::{Args, Parser, Subcommand};
use log::*;

mod cart_file;
mod command_handler;
mod formatting;

use crate::command_handler::{handle_checkout, handle_quote, handle_resolve, handle_resume, handle_split};

#[derive(Parser, Debug)]
#[command(version = "1.0.0", about = "Multi-vendor checkout tools")]
pub struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show which district a free-text address resolves to, and why
    Resolve {
        #[arg(required = true, index = 1)]
        address: String,
    },
    /// Quote the delivery fee between two districts, e.g. `quote "hai chau" "son tra"`
    Quote {
        #[arg(required = true, index = 1)]
        from: String,
        #[arg(required = true, index = 2)]
        to: String,
    },
    /// Split a cart file by vendor and show how shipping and the discount are shared. Works offline.
    Split(SplitParams),
    /// Place the sub-orders for a cart file against the marketplace API configured in the environment
    Checkout(CheckoutParams),
    /// Finish a checkout that was parked for a gateway payment
    Resume {
        /// The gateway's payment reference, as returned after the redirect
        #[arg(required = true, index = 1)]
        reference: String,
    },
}

#[derive(Debug, Args)]
pub struct SplitParams {
    /// Path to the cart file (JSON)
    #[arg(required = true, index = 1)]
    pub cart: String,
    /// A voucher discount amount to spread over the vendors
    #[arg(short, long)]
    pub voucher: Option<String>,
    /// The buyer's address. Overrides the one in the cart file
    #[arg(short, long)]
    pub buyer: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckoutParams {
    /// Path to the cart file (JSON)
    #[arg(required = true, index = 1)]
    pub cart: String,
    /// A voucher code to apply to the whole cart
    #[arg(short, long)]
    pub voucher: Option<String>,
    /// Pay through this gateway provider (e.g. vnpay) instead of cash on delivery
    #[arg(short, long, requires = "reference")]
    pub gateway: Option<String>,
    /// The gateway's payment reference
    #[arg(short, long, requires = "gateway")]
    pub reference: Option<String>,
    /// Only print the plan. No order is created
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    let result = match cli.command {
        Command::Resolve { address } => handle_resolve(&address),
        Command::Quote { from, to } => handle_quote(&from, &to),
        Command::Split(params) => handle_split(params),
        Command::Checkout(params) => handle_checkout(params).await,
        Command::Resume { reference } => handle_resume(&reference).await,
    };
    if let Err(e) = result {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
