//! Wallet-connected mint client library

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod minter;
pub mod observability;

pub use config::MinterConfig;
pub use lifecycle::Shutdown;
pub use minter::WalletMintClient;
