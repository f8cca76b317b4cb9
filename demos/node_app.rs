//! Prints the node's coinbase and its balance.
//!
//! Reads `~/.exp/config.toml` when present; otherwise talks to
//! `http://localhost:8545`.

use anyhow::{Context, Result};
use exp_client::{Address, ClientConfig, ExpClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::load();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    tracing::info!(url = %config.rpc_url, "querying node");

    let client = ExpClient::from_config(&config).context("failed to create client")?;

    let coinbase = client.coinbase().await.context("failed to read coinbase")?;
    println!("{}", coinbase);

    let address = Address::from_hex(&coinbase).context("coinbase is not an address")?;
    let balance = client
        .get_balance(&address, None)
        .await
        .context("failed to read balance")?;
    println!("{}", balance);

    Ok(())
}
