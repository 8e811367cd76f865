// Proof-of-work ledger node - CLI

use clap::Parser;
use pow_ledger::{Cli, CliHandler};

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = CliHandler::handle(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
