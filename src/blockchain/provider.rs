//! Capability traits for the two chain collaborators.
//!
//! The controller only sees these traits. `RpcReader` and `KeyWallet` are the
//! production implementations; tests substitute in-memory doubles.

use std::future::Future;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use tokio::sync::broadcast;

use crate::blockchain::types::{ChainResult, ConfirmationStatus};

/// Unauthenticated read access to the minter contract.
pub trait ReadProvider: Send + Sync {
    /// Number of tokens issued so far.
    fn total_supply(&self) -> impl Future<Output = ChainResult<U256>> + Send;

    /// Price of a single token in wei.
    fn mint_price(&self) -> impl Future<Output = ChainResult<U256>> + Send;
}

/// A user's wallet: account access, signers, account-change notifications.
pub trait WalletProvider: Send + Sync {
    type Signer: TxSigner;

    /// Ask the wallet for its accounts. The active account comes first.
    ///
    /// May wait on user approval for as long as the wallet takes.
    fn request_accounts(&self) -> impl Future<Output = ChainResult<Vec<Address>>> + Send;

    /// Receive the new account list whenever the active account changes.
    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>>;

    /// Signer able to submit transactions on behalf of `address`.
    fn signer(&self, address: Address) -> ChainResult<Self::Signer>;
}

/// Signs and submits transactions for one address.
pub trait TxSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Sign and broadcast, returning the transaction hash.
    fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = ChainResult<TxHash>> + Send;

    /// Wait until `tx_hash` has `confirmations` blocks on top of inclusion
    /// (inclusion itself counts as one).
    fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    ) -> impl Future<Output = ChainResult<ConfirmationStatus>> + Send;
}
