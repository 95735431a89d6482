//! mint-client
//!
//! Connect a wallet, read the minted supply and submit mint transactions
//! against the configured minter contract.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI command / REPL line
//!          │
//!          ▼
//!   ┌──────────────────┐      ┌──────────────┐      JSON-RPC
//!   │ WalletMintClient │─────▶│  RpcReader   │──────────────▶  node
//!   │   (controller)   │      └──────────────┘
//!   │                  │      ┌──────────────┐
//!   │                  │─────▶│  KeyWallet   │──── sign + send ─▶ node
//!   │                  │◀─────│ (accounts ch)│
//!   └────────┬─────────┘      └──────────────┘
//!            ▼
//!      TerminalView (stdout / alerts on stderr)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use alloy::primitives::TxHash;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use mint_client::config::load_or_default;
use mint_client::lifecycle::startup::{build_client, init_observability, RpcMintClient};
use mint_client::lifecycle::{signals, Shutdown};
use mint_client::minter::{MintError, MintResult, TerminalView};

#[derive(Parser)]
#[command(name = "mint-client")]
#[command(about = "Connect a wallet and mint tokens from the command line", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print query results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how many tokens have been minted
    Supply,
    /// Show the unit price, or the total for a quantity
    Price { quantity: Option<String> },
    /// Connect the wallet and mint QUANTITY tokens (1-255)
    Mint { quantity: String },
    /// Connect the wallet and submit a lady mint
    MintLady,
    /// Interactive session with account switching
    Interactive,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_observability(&config);

    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        contract = %config.contract.address,
        "mint-client v0.1.0 starting"
    );

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_ctrl_c_handler(shutdown.clone());

    let view = if cli.json {
        TerminalView::quiet()
    } else {
        TerminalView::new()
    };
    let mut client = build_client(&config, view, shutdown.signal()).await?;

    match cli.command {
        Commands::Supply => {
            let supply = match client.fetch_supply().await {
                Ok(supply) => supply,
                Err(e) => return Ok(query_failed(&e)),
            };
            if cli.json {
                let report = serde_json::json!({
                    "supply": supply.to_string(),
                    "max_supply": client.settings().max_supply,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Price { quantity } => {
            let total = match &quantity {
                Some(q) => client.quote(q).await,
                None => client.fetch_price().await,
            };
            let total = match total {
                Ok(total) => total,
                Err(e) => return Ok(query_failed(&e)),
            };
            if cli.json {
                let report = serde_json::json!({
                    "quantity": quantity,
                    "price_wei": total.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Mint { quantity } => {
            client.init().await;
            let result = match client.connect().await {
                Ok(_) => client.mint(&quantity).await,
                Err(e) => Err(e),
            };
            if !report_mint(result, "Minted") {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::MintLady => {
            client.init().await;
            let result = match client.connect().await {
                Ok(_) => client.mint_lady().await,
                Err(e) => Err(e),
            };
            if !report_mint(result, "Lady minted") {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Interactive => run_interactive(&mut client, &shutdown).await?,
    }

    tracing::info!("Done");
    Ok(ExitCode::SUCCESS)
}

fn query_failed(error: &MintError) -> ExitCode {
    eprintln!("{}", error);
    ExitCode::FAILURE
}

/// Print the hash of a confirmed mint and return whether it succeeded.
///
/// The client has already alerted any failure the user should see, so errors
/// are only logged here.
fn report_mint(result: MintResult<TxHash>, label: &str) -> bool {
    match result {
        Ok(tx_hash) => {
            println!("{} in transaction {}", label, tx_hash);
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "Mint command failed");
            false
        }
    }
}

const HELP: &str = "commands: connect | supply | price [N] | mint N | lady | account I | status | help | quit";

async fn run_interactive(
    client: &mut RpcMintClient<TerminalView>,
    shutdown: &Shutdown,
) -> std::io::Result<()> {
    client.init().await;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stop = shutdown.signal();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(client, line.trim()).await {
                    break;
                }
            }
            Some(accounts) = client.next_account_change() => {
                client.handle_account_change(&accounts);
            }
            _ = stop.recv() => break,
        }
    }

    Ok(())
}

/// Run one REPL command. Returns `false` to leave the session.
async fn dispatch(client: &mut RpcMintClient<TerminalView>, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return true;
    };
    let arg = words.next().unwrap_or("");

    let result: Result<(), MintError> = match command {
        "connect" => client.connect().await.map(drop),
        "supply" => client.fetch_supply().await.map(drop),
        "price" if arg.is_empty() => client.fetch_price().await.map(drop),
        "price" => client.quote(arg).await.map(drop),
        "mint" => {
            report_mint(client.mint(arg).await, "Minted");
            Ok(())
        }
        "lady" => {
            report_mint(client.mint_lady().await, "Lady minted");
            Ok(())
        }
        "account" => {
            match (client.wallet(), arg.parse::<usize>()) {
                (Some(wallet), Ok(index)) => {
                    if let Err(e) = wallet.select_account(index) {
                        eprintln!("{}", e);
                    }
                }
                (None, _) => eprintln!("No wallet configured"),
                (_, Err(_)) => eprintln!("usage: account INDEX"),
            }
            Ok(())
        }
        "status" => {
            println!("{:?}", client.state());
            Ok(())
        }
        "help" => {
            println!("{}", HELP);
            Ok(())
        }
        "quit" | "exit" => return false,
        other => {
            eprintln!("unknown command '{}'; {}", other, HELP);
            Ok(())
        }
    };

    if let Err(e) = result {
        // Mint paths alert on their own; plain queries report here.
        if matches!(command, "supply" | "price") {
            eprintln!("{}", e);
        }
        tracing::debug!(command, error = %e, "Command finished with error");
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_mint_succeeds() {
        assert!(report_mint(Ok(TxHash::with_last_byte(1)), "Minted"));
    }

    #[test]
    fn test_failed_mint_fails_without_success_line() {
        let invalid = MintError::InvalidQuantity {
            input: "0".to_string(),
        };
        assert!(!report_mint(Err(invalid), "Minted"));
        assert!(!report_mint(Err(MintError::NoWallet), "Lady minted"));
    }
}
