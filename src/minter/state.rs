//! Connection state and the per-session context around it.

use alloy::primitives::Address;
use tokio::sync::broadcast;

/// Whether a wallet account is connected, and which one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected {
        address: Address,
    },
}

impl ConnectionState {
    /// State for a wallet account list: first account wins, none disconnects.
    pub fn from_accounts(accounts: &[Address]) -> Self {
        match accounts.first() {
            Some(&address) => Self::Connected { address },
            None => Self::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Connected { address } => Some(*address),
            Self::Disconnected => None,
        }
    }
}

/// Display form of an address: `0x1234...abcd`, from its EIP-55 checksummed text.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Mutable session context owned by the controller.
///
/// Lives for one process; nothing here is persisted.
#[derive(Debug, Default)]
pub struct Session {
    pub state: ConnectionState,
    /// Account-change notifications, present once `connect` has run.
    pub account_events: Option<broadcast::Receiver<Vec<Address>>>,
}
