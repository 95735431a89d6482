//! The wallet/mint controller.
//!
//! # Responsibilities
//! - Read-only chain queries (minted supply, unit price)
//! - Wallet connection lifecycle and account-change handling
//! - Mint submission (standard and lady) with confirmation waiting
//!
//! # Design Decisions
//! - All state lives in an owned `Session`; operations take `&mut self`, so
//!   one controller never has two operations in flight
//! - Every network await races the shutdown signal
//! - Transaction failures are reported through `View::alert`, query failures
//!   only when going through `refresh_supply`

use std::future::Future;
use std::time::Duration;

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use tokio::sync::broadcast::error::RecvError;
use tracing::Instrument;

use crate::blockchain::contract;
use crate::blockchain::{
    ChainError, ChainResult, ConfirmationStatus, ReadProvider, TxSigner, WalletProvider,
};
use crate::config::{ConfigError, MinterConfig, ValidationError};
use crate::lifecycle::ShutdownSignal;
use crate::minter::error::{MintError, MintResult};
use crate::minter::quantity::MintQuantity;
use crate::minter::state::{short_address, ConnectionState, Session};
use crate::minter::view::{Display, Element, Panel, View};
use crate::observability::metrics;

pub const NO_WALLET_ALERT: &str = "Please use a web3 wallet: no wallet keys are configured";
pub const LADY_NOT_CONNECTED_ALERT: &str = "Please connect your wallet, Milady";
pub const MINT_NOT_CONNECTED_ALERT: &str = "Please connect your wallet";

/// Controller settings derived from [`MinterConfig`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub contract: Address,
    pub max_supply: u64,
    pub confirmations: u64,
    pub confirmation_timeout: Duration,
    pub refresh_supply_after_lady_mint: bool,
}

impl ClientSettings {
    pub fn from_config(config: &MinterConfig) -> Result<Self, ConfigError> {
        let contract = config.contract.parsed_address().map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidAddress(e)])
        })?;

        Ok(Self {
            contract,
            max_supply: config.contract.max_supply,
            confirmations: config.minting.confirmations,
            confirmation_timeout: config.minting.confirmation_timeout(),
            refresh_supply_after_lady_mint: config.minting.refresh_supply_after_lady_mint,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MintKind {
    Standard,
    Lady,
}

impl MintKind {
    fn as_str(self) -> &'static str {
        match self {
            MintKind::Standard => "standard",
            MintKind::Lady => "lady",
        }
    }
}

/// Front-end controller for connecting a wallet and minting.
pub struct WalletMintClient<R, W, V> {
    reader: R,
    /// `None` when the environment offers no wallet.
    wallet: Option<W>,
    view: V,
    settings: ClientSettings,
    session: Session,
    supply: Option<U256>,
    shutdown: ShutdownSignal,
}

impl<R, W, V> WalletMintClient<R, W, V>
where
    R: ReadProvider,
    W: WalletProvider,
    V: View,
{
    pub fn new(
        reader: R,
        wallet: Option<W>,
        view: V,
        settings: ClientSettings,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            reader,
            wallet,
            view,
            settings,
            session: Session::default(),
            supply: None,
            shutdown,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.session.state
    }

    /// Last supply successfully read, if any.
    pub fn supply(&self) -> Option<U256> {
        self.supply
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn wallet(&self) -> Option<&W> {
        self.wallet.as_ref()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Initial render: disconnected panels plus a supply read.
    pub async fn init(&mut self) {
        self.render_connection();
        self.refresh_supply().await;
    }

    /// Read `totalSupply()` and render `"<n> / <max> minted"`.
    ///
    /// Errors propagate; see [`Self::refresh_supply`] for the reporting form.
    pub async fn fetch_supply(&mut self) -> MintResult<U256> {
        let supply = cancellable(&mut self.shutdown, self.reader.total_supply()).await?;

        self.supply = Some(supply);
        metrics::record_supply(supply);
        self.view.set_text(
            Element::Supply,
            &format!("{} / {} minted", supply, self.settings.max_supply),
        );
        Ok(supply)
    }

    /// [`Self::fetch_supply`], reporting failures instead of returning them.
    pub async fn refresh_supply(&mut self) -> Option<U256> {
        match self.fetch_supply().await {
            Ok(supply) => Some(supply),
            Err(MintError::Cancelled) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Supply query failed");
                metrics::record_query_failure("total_supply");
                self.view.alert(&format!("Could not read minted supply: {}", e));
                None
            }
        }
    }

    /// Read the unit price and render it.
    pub async fn fetch_price(&mut self) -> MintResult<U256> {
        let price = cancellable(&mut self.shutdown, self.reader.mint_price()).await?;
        self.view.set_text(
            Element::Price,
            &format!("{} ETH per token", format_ether(price)),
        );
        Ok(price)
    }

    /// Total price for `input` tokens at the current unit price.
    ///
    /// The quantity is validated before any query is made.
    pub async fn quote(&mut self, input: &str) -> MintResult<U256> {
        let quantity: MintQuantity = input.parse()?;
        let unit_price = cancellable(&mut self.shutdown, self.reader.mint_price()).await?;
        let total = quantity.total_price(unit_price)?;
        self.view.set_text(
            Element::Price,
            &format!(
                "{} x {} ETH = {} ETH",
                quantity,
                format_ether(unit_price),
                format_ether(total)
            ),
        );
        Ok(total)
    }

    /// Request account access from the wallet.
    ///
    /// Without a wallet the user is alerted and nothing changes. The
    /// account-change subscription is registered once per session.
    pub async fn connect(&mut self) -> MintResult<ConnectionState> {
        let Some(wallet) = self.wallet.as_ref() else {
            tracing::warn!("Connect requested but no wallet is available");
            self.view.alert(NO_WALLET_ALERT);
            return Err(MintError::NoWallet);
        };

        if self.session.account_events.is_none() {
            self.session.account_events = Some(wallet.subscribe_accounts());
        }

        let accounts = match cancellable(&mut self.shutdown, wallet.request_accounts()).await {
            Ok(accounts) => accounts,
            Err(e) => {
                if !matches!(e, MintError::Cancelled) {
                    tracing::warn!(error = %e, "Account request failed");
                    self.view.alert(&e.to_string());
                }
                return Err(e);
            }
        };

        self.apply_accounts(&accounts);
        tracing::info!(
            accounts = accounts.len(),
            connected = self.session.state.is_connected(),
            "Wallet connect finished"
        );
        Ok(self.session.state)
    }

    /// Wait for the next account-change notification from the wallet.
    ///
    /// Never completes before `connect` has subscribed. Returns `None` once
    /// the wallet stops sending.
    pub async fn next_account_change(&mut self) -> Option<Vec<Address>> {
        let Some(rx) = self.session.account_events.as_mut() else {
            return std::future::pending().await;
        };

        let next = loop {
            match rx.recv().await {
                Ok(accounts) => break Some(accounts),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed account-change notifications");
                }
                Err(RecvError::Closed) => break None,
            }
        };

        if next.is_none() {
            self.session.account_events = None;
        }
        next
    }

    /// Apply an account-change notification.
    pub fn handle_account_change(&mut self, accounts: &[Address]) {
        let previous = self.session.state.address();
        self.apply_accounts(accounts);
        tracing::info!(
            previous = ?previous,
            current = ?self.session.state.address(),
            "Wallet account changed"
        );
    }

    /// Submit the privileged `mintlady` call for the connected account.
    ///
    /// Supply is re-read afterwards only when
    /// `refresh_supply_after_lady_mint` is set.
    pub async fn mint_lady(&mut self) -> MintResult<TxHash> {
        let address = self.require_connected(LADY_NOT_CONNECTED_ALERT)?;
        let span = tracing::info_span!("mint_lady", op_id = %uuid::Uuid::new_v4(), %address);

        let tx = contract::mint_lady_request(self.settings.contract, address);
        let result = self.submit(address, tx, MintKind::Lady).instrument(span).await;
        self.report_failure(&result);

        if self.settings.refresh_supply_after_lady_mint && !self.shutdown.is_triggered() {
            self.refresh_supply().await;
        }
        result
    }

    /// Mint `input` tokens for the connected account, paying
    /// `MINT_PRICE() * quantity`.
    ///
    /// An unparsable or out-of-range quantity is rejected before any RPC call
    /// with a logged diagnostic only. Supply is re-read whether the
    /// transaction succeeded or not.
    pub async fn mint(&mut self, input: &str) -> MintResult<TxHash> {
        let address = self.require_connected(MINT_NOT_CONNECTED_ALERT)?;
        let quantity: MintQuantity = match input.parse() {
            Ok(quantity) => quantity,
            Err(e) => {
                tracing::error!(input, "Invalid mint quantity");
                return Err(e);
            }
        };

        let span = tracing::info_span!(
            "mint",
            op_id = %uuid::Uuid::new_v4(),
            %address,
            quantity = quantity.get()
        );
        let result = self.priced_mint(address, quantity).instrument(span).await;
        self.report_failure(&result);

        if !self.shutdown.is_triggered() {
            self.refresh_supply().await;
        }
        result
    }

    async fn priced_mint(
        &mut self,
        address: Address,
        quantity: MintQuantity,
    ) -> MintResult<TxHash> {
        let unit_price = cancellable(&mut self.shutdown, self.reader.mint_price()).await?;
        let value = quantity.total_price(unit_price)?;
        tracing::debug!(unit_price = %unit_price, value = %value, "Mint priced");

        let tx = contract::mint_request(self.settings.contract, address, quantity.get(), value);
        self.submit(address, tx, MintKind::Standard).await
    }

    /// Sign, broadcast and wait for confirmation.
    async fn submit(
        &mut self,
        address: Address,
        tx: TransactionRequest,
        kind: MintKind,
    ) -> MintResult<TxHash> {
        let signer = match self.wallet.as_ref() {
            Some(wallet) => wallet.signer(address).map_err(MintError::from),
            None => Err(MintError::NoWallet),
        };
        let result = match signer {
            Ok(signer) => self.send_and_confirm(&signer, tx, kind).await,
            Err(e) => Err(e),
        };

        let outcome = match &result {
            Ok(_) => "confirmed",
            Err(MintError::Cancelled) => "cancelled",
            Err(_) => "failed",
        };
        metrics::record_mint(kind.as_str(), outcome);
        result
    }

    async fn send_and_confirm(
        &mut self,
        signer: &W::Signer,
        tx: TransactionRequest,
        kind: MintKind,
    ) -> MintResult<TxHash> {
        let tx_hash = cancellable(&mut self.shutdown, signer.send_transaction(tx)).await?;
        tracing::info!(
            tx_hash = %tx_hash,
            from = %signer.address(),
            kind = kind.as_str(),
            "Mint transaction submitted"
        );

        let status = cancellable(
            &mut self.shutdown,
            signer.wait_for_confirmation(
                tx_hash,
                self.settings.confirmations,
                self.settings.confirmation_timeout,
            ),
        )
        .await?;

        match status {
            ConfirmationStatus::Confirmed { block_number } => {
                tracing::info!(tx_hash = %tx_hash, block_number, "Mint confirmed");
                Ok(tx_hash)
            }
            ConfirmationStatus::Failed(reason) => Err(ChainError::Reverted(reason).into()),
        }
    }

    fn require_connected(&mut self, alert: &str) -> MintResult<Address> {
        match self.session.state.address() {
            Some(address) => Ok(address),
            None => {
                tracing::warn!("Mint requested while disconnected");
                self.view.alert(alert);
                Err(MintError::NotConnected)
            }
        }
    }

    fn report_failure(&mut self, result: &MintResult<TxHash>) {
        match result {
            Ok(_) | Err(MintError::Cancelled) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Mint failed");
                self.view.alert(&e.to_string());
            }
        }
    }

    fn apply_accounts(&mut self, accounts: &[Address]) {
        self.session.state = ConnectionState::from_accounts(accounts);
        self.render_connection();
    }

    fn render_connection(&mut self) {
        match self.session.state {
            ConnectionState::Connected { address } => {
                self.view.set_display(Panel::Connect, Display::Hidden);
                self.view.set_text(
                    Element::Address,
                    &format!("connected as: {}", short_address(&address)),
                );
            }
            ConnectionState::Disconnected => {
                self.view.set_display(Panel::Connect, Display::Table);
                self.view.set_text(Element::Address, "not connected");
            }
        }
    }
}

/// Run `fut` unless shutdown fires first.
async fn cancellable<T, F>(shutdown: &mut ShutdownSignal, fut: F) -> MintResult<T>
where
    F: Future<Output = ChainResult<T>>,
{
    if shutdown.is_triggered() {
        return Err(MintError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = shutdown.recv() => {
            tracing::debug!("Operation cancelled by shutdown");
            Err(MintError::Cancelled)
        }
        result = fut => result.map_err(MintError::from),
    }
}
