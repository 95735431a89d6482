//! Errors surfaced by the mint controller.

use alloy::primitives::U256;
use thiserror::Error;

use crate::blockchain::ChainError;

#[derive(Debug, Error)]
pub enum MintError {
    /// No wallet provider is available in this environment.
    #[error("No wallet available")]
    NoWallet,

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Invalid mint quantity '{input}': expected an integer from 1 to 255")]
    InvalidQuantity { input: String },

    #[error("Total price overflows: {quantity} x {unit_price} wei")]
    PriceOverflow { unit_price: U256, quantity: u8 },

    /// Shutdown was triggered while the operation was waiting.
    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Chain(#[from] ChainError),
}

pub type MintResult<T> = Result<T, MintError>;
