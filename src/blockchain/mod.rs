//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Reads:   client.rs (RpcReader, eth_call with timeouts + failover)
//!              → contract.rs (ABI encode / decode)
//!
//! Writes:  wallet.rs (KeyWallet, keys from environment)
//!              → KeySigner (sign + broadcast)
//!              → transaction.rs (receipt polling, confirmations)
//! ```
//!
//! `provider.rs` holds the traits the controller is written against.
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod provider;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::RpcReader;
pub use provider::{ReadProvider, TxSigner, WalletProvider};
pub use types::{ChainError, ChainId, ChainResult, ConfirmationStatus};
pub use wallet::{KeySigner, KeyWallet};
