//! Local-key wallet provider and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::blockchain::provider::{TxSigner, WalletProvider};
use crate::blockchain::transaction;
use crate::blockchain::types::{ChainError, ChainResult, ConfirmationStatus};

/// Wallet holding one or more private keys, one of them active.
///
/// Plays the part of an injected browser wallet: it hands out accounts on
/// request and announces when the user switches the active one.
pub struct KeyWallet {
    signers: Vec<PrivateKeySigner>,
    /// Index into `signers` of the active account.
    active: AtomicUsize,
    events: broadcast::Sender<Vec<Address>>,
    rpc_url: url::Url,
    poll_interval: Duration,
}

impl KeyWallet {
    /// Create a wallet from comma-separated hex private keys.
    ///
    /// Keys may carry a `0x` prefix. An empty list yields a wallet with no
    /// accounts.
    pub fn from_private_keys(
        keys: &str,
        rpc_url: &str,
        poll_interval: Duration,
    ) -> ChainResult<Self> {
        let rpc_url: url::Url = rpc_url
            .parse()
            .map_err(|e| ChainError::Wallet(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let mut signers = Vec::new();
        for (i, key) in keys.split(',').map(str::trim).filter(|k| !k.is_empty()).enumerate() {
            let key_hex = key.strip_prefix("0x").unwrap_or(key);
            let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
                ChainError::Wallet(format!("Invalid private key format at position {}: {}", i, e))
            })?;
            signers.push(signer);
        }

        tracing::info!(
            accounts = signers.len(),
            active = ?signers.first().map(|s| s.address()),
            "Wallet initialized"
        );

        let (events, _) = broadcast::channel(16);
        Ok(Self {
            signers,
            active: AtomicUsize::new(0),
            events,
            rpc_url,
            poll_interval,
        })
    }

    /// Load the wallet from the environment variable `var`.
    ///
    /// Returns `Ok(None)` when the variable is unset: no wallet is available.
    pub fn from_env(
        var: &str,
        rpc_url: &str,
        poll_interval: Duration,
    ) -> ChainResult<Option<Self>> {
        match std::env::var(var) {
            Ok(keys) => Self::from_private_keys(&keys, rpc_url, poll_interval).map(Some),
            Err(std::env::VarError::NotPresent) => {
                tracing::debug!(var, "Wallet key variable not set");
                Ok(None)
            }
            Err(e) => Err(ChainError::Wallet(format!("Cannot read {}: {}", var, e))),
        }
    }

    /// All accounts, active one first.
    pub fn accounts(&self) -> Vec<Address> {
        let active = self.active.load(Ordering::SeqCst);
        let mut accounts = Vec::with_capacity(self.signers.len());
        if let Some(signer) = self.signers.get(active) {
            accounts.push(signer.address());
        }
        accounts.extend(
            self.signers
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != active)
                .map(|(_, s)| s.address()),
        );
        accounts
    }

    /// Make the account at `index` active and notify subscribers.
    pub fn select_account(&self, index: usize) -> ChainResult<Address> {
        let signer = self.signers.get(index).ok_or_else(|| {
            ChainError::Wallet(format!(
                "No account at index {} ({} available)",
                index,
                self.signers.len()
            ))
        })?;

        self.active.store(index, Ordering::SeqCst);
        let address = signer.address();
        tracing::info!(%address, index, "Active account changed");

        // No subscribers simply means nobody has connected yet.
        let _ = self.events.send(self.accounts());
        Ok(address)
    }
}

impl WalletProvider for KeyWallet {
    type Signer = KeySigner;

    async fn request_accounts(&self) -> ChainResult<Vec<Address>> {
        Ok(self.accounts())
    }

    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>> {
        self.events.subscribe()
    }

    fn signer(&self, address: Address) -> ChainResult<KeySigner> {
        let signer = self
            .signers
            .iter()
            .find(|s| s.address() == address)
            .ok_or_else(|| ChainError::Wallet(format!("Unknown account {}", address)))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(self.rpc_url.clone());

        Ok(KeySigner {
            address,
            provider: Arc::new(provider),
            poll_interval: self.poll_interval,
        })
    }
}

impl std::fmt::Debug for KeyWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyWallet")
            .field("accounts", &self.accounts())
            .field("rpc_url", &self.rpc_url.as_str())
            .finish()
    }
}

/// Signer bound to one wallet account.
#[derive(Clone)]
pub struct KeySigner {
    address: Address,
    provider: Arc<dyn Provider + Send + Sync>,
    poll_interval: Duration,
}

impl TxSigner for KeySigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    ) -> ChainResult<ConfirmationStatus> {
        transaction::wait_for_confirmation(
            self.provider.as_ref(),
            tx_hash,
            confirmations,
            self.poll_interval,
            timeout,
        )
        .await
    }
}

impl std::fmt::Debug for KeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySigner")
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private keys (Anvil's first two accounts)
    const KEY_0: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_1: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    const RPC: &str = "http://localhost:8545";

    fn wallet(keys: &str) -> KeyWallet {
        KeyWallet::from_private_keys(keys, RPC, Duration::from_millis(10)).unwrap()
    }

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = wallet(KEY_0);
        assert_eq!(
            wallet.accounts()[0].to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix_and_spaces() {
        let wallet = wallet(&format!(" 0x{} , {} ", KEY_0, KEY_1));
        let accounts = wallet.accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!(
            accounts[1].to_string().to_lowercase(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
    }

    #[test]
    fn test_empty_key_list_has_no_accounts() {
        assert!(wallet("").accounts().is_empty());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = KeyWallet::from_private_keys("invalid_key", RPC, Duration::from_secs(1));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid private key"));
    }

    #[tokio::test]
    async fn test_select_account_notifies_subscribers() {
        let wallet = wallet(&format!("{},{}", KEY_0, KEY_1));
        let mut rx = wallet.subscribe_accounts();

        let second = wallet.select_account(1).unwrap();
        let accounts = rx.recv().await.unwrap();
        assert_eq!(accounts[0], second);
        assert_eq!(wallet.request_accounts().await.unwrap()[0], second);
    }

    #[test]
    fn test_select_account_out_of_range() {
        let err = wallet(KEY_0).select_account(3).unwrap_err();
        assert!(err.to_string().contains("No account at index 3"));
    }

    #[test]
    fn test_signer_only_for_known_accounts() {
        let wallet = wallet(KEY_0);
        let address = wallet.accounts()[0];

        assert_eq!(wallet.signer(address).unwrap().address(), address);
        assert!(wallet.signer(Address::ZERO).is_err());
    }

    #[test]
    fn test_missing_env_means_no_wallet() {
        let result =
            KeyWallet::from_env("MINT_CLIENT_TEST_UNSET_VARIABLE", RPC, Duration::from_secs(1));
        assert!(result.unwrap().is_none());
    }
}
