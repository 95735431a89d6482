//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from the loaded configuration
//! - Build the RPC reader and (if keys are present) the wallet
//! - Assemble the controller
//!
//! # Design Decisions
//! - Fail fast on bad configuration or malformed keys
//! - A missing wallet is not an error; `connect` reports it to the user

use std::net::SocketAddr;

use crate::blockchain::{KeyWallet, RpcReader};
use crate::config::MinterConfig;
use crate::lifecycle::ShutdownSignal;
use crate::minter::{ClientSettings, View, WalletMintClient};
use crate::observability::{logging, metrics};

/// Controller wired to the production chain clients.
pub type RpcMintClient<V> = WalletMintClient<RpcReader, KeyWallet, V>;

/// Set up logging, then metrics when enabled.
pub fn init_observability(config: &MinterConfig) {
    logging::init_logging(&config.observability);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
}

/// Build the controller described by `config`.
pub async fn build_client<V: View>(
    config: &MinterConfig,
    view: V,
    shutdown: ShutdownSignal,
) -> Result<RpcMintClient<V>, Box<dyn std::error::Error>> {
    let settings = ClientSettings::from_config(config)?;
    let reader = RpcReader::new(&config.chain, settings.contract).await?;
    let wallet = KeyWallet::from_env(
        &config.wallet.private_keys_env,
        &config.chain.rpc_url,
        config.minting.poll_interval(),
    )?;

    tracing::info!(
        contract = %settings.contract,
        wallet_present = wallet.is_some(),
        confirmations = settings.confirmations,
        "Mint client ready"
    );

    Ok(WalletMintClient::new(reader, wallet, view, settings, shutdown))
}
