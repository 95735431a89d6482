//! Wallet connection and minting.
//!
//! # Data Flow
//! ```text
//! User action (CLI command)
//!     → controller.rs (WalletMintClient)
//!     → blockchain::ReadProvider / WalletProvider
//!     → await result
//!     → view.rs (render targets, alerts)
//! ```
//!
//! Connection state is `Disconnected` ↔ `Connected(address)`; it starts
//! disconnected and has no terminal state.

pub mod controller;
pub mod error;
pub mod quantity;
pub mod state;
pub mod view;

pub use controller::{ClientSettings, WalletMintClient};
pub use error::{MintError, MintResult};
pub use quantity::MintQuantity;
pub use state::{short_address, ConnectionState};
pub use view::{Display, Element, Panel, TerminalView, View};
