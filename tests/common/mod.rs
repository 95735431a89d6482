//! Shared test doubles for controller tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{address, Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use tokio::sync::broadcast;

use mint_client::blockchain::{
    ChainError, ChainResult, ConfirmationStatus, ReadProvider, TxSigner, WalletProvider,
};
use mint_client::lifecycle::ShutdownSignal;
use mint_client::minter::{ClientSettings, Display, Element, Panel, View, WalletMintClient};

pub const CONTRACT: Address = address!("0xb381567590ea051380e32ca618e5eb8a4a3cc983");
pub const ALICE: Address = address!("0x1111111111111111111111111111111111112222");
pub const BOB: Address = address!("0x3333333333333333333333333333333333334444");

pub type TestClient = WalletMintClient<MockReader, MockWallet, RecordingView>;

pub fn settings() -> ClientSettings {
    ClientSettings {
        contract: CONTRACT,
        max_supply: 10_000,
        confirmations: 1,
        confirmation_timeout: Duration::from_secs(5),
        refresh_supply_after_lady_mint: false,
    }
}

pub fn client(reader: &MockReader, wallet: Option<&MockWallet>) -> TestClient {
    client_with(reader, wallet, settings(), ShutdownSignal::detached())
}

pub fn client_with(
    reader: &MockReader,
    wallet: Option<&MockWallet>,
    settings: ClientSettings,
    shutdown: ShutdownSignal,
) -> TestClient {
    WalletMintClient::new(
        reader.clone(),
        wallet.cloned(),
        RecordingView::default(),
        settings,
        shutdown,
    )
}

/// Connected client for `wallet`'s first account.
pub async fn connected_client(reader: &MockReader, wallet: &MockWallet) -> TestClient {
    let mut client = client(reader, Some(wallet));
    client.connect().await.unwrap();
    client
}

// ---------------------------------------------------------------------------

#[derive(Default)]
struct ReaderState {
    supply: Mutex<U256>,
    price: Mutex<U256>,
    fail_supply: AtomicBool,
    fail_price: AtomicBool,
    supply_calls: AtomicUsize,
    price_calls: AtomicUsize,
}

/// In-memory contract reads with call counting.
#[derive(Clone, Default)]
pub struct MockReader {
    state: Arc<ReaderState>,
}

impl MockReader {
    pub fn new(supply: u64, price: u64) -> Self {
        let reader = Self::default();
        reader.set_supply(U256::from(supply));
        reader.set_price(U256::from(price));
        reader
    }

    pub fn set_supply(&self, supply: U256) {
        *self.state.supply.lock().unwrap() = supply;
    }

    pub fn set_price(&self, price: U256) {
        *self.state.price.lock().unwrap() = price;
    }

    pub fn fail_supply(&self, fail: bool) {
        self.state.fail_supply.store(fail, Ordering::SeqCst);
    }

    pub fn fail_price(&self, fail: bool) {
        self.state.fail_price.store(fail, Ordering::SeqCst);
    }

    pub fn supply_calls(&self) -> usize {
        self.state.supply_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.state.price_calls.load(Ordering::SeqCst)
    }
}

impl ReadProvider for MockReader {
    async fn total_supply(&self) -> ChainResult<U256> {
        self.state.supply_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_supply.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(*self.state.supply.lock().unwrap())
    }

    async fn mint_price(&self) -> ChainResult<U256> {
        self.state.price_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_price.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(*self.state.price.lock().unwrap())
    }
}

// ---------------------------------------------------------------------------

struct WalletState {
    accounts: Mutex<Vec<Address>>,
    events: broadcast::Sender<Vec<Address>>,
    sent: Mutex<Vec<TransactionRequest>>,
    send_error: Mutex<Option<String>>,
    revert: AtomicBool,
}

/// Wallet double: fixed accounts, recorded transactions, scripted failures.
#[derive(Clone)]
pub struct MockWallet {
    state: Arc<WalletState>,
}

impl MockWallet {
    pub fn new(accounts: Vec<Address>) -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            state: Arc::new(WalletState {
                accounts: Mutex::new(accounts),
                events,
                sent: Mutex::new(Vec::new()),
                send_error: Mutex::new(None),
                revert: AtomicBool::new(false),
            }),
        }
    }

    /// Announce an account switch, as the wallet UI would.
    pub fn emit(&self, accounts: Vec<Address>) {
        *self.state.accounts.lock().unwrap() = accounts.clone();
        self.state.events.send(accounts).unwrap();
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.events.receiver_count()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.sent.lock().unwrap().clone()
    }

    /// Make every send fail with `message`.
    pub fn reject_sends(&self, message: &str) {
        *self.state.send_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn revert_all(&self) {
        self.state.revert.store(true, Ordering::SeqCst);
    }
}

impl WalletProvider for MockWallet {
    type Signer = MockSigner;

    async fn request_accounts(&self) -> ChainResult<Vec<Address>> {
        Ok(self.state.accounts.lock().unwrap().clone())
    }

    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>> {
        self.state.events.subscribe()
    }

    fn signer(&self, address: Address) -> ChainResult<MockSigner> {
        Ok(MockSigner {
            address,
            state: self.state.clone(),
        })
    }
}

pub struct MockSigner {
    address: Address,
    state: Arc<WalletState>,
}

impl TxSigner for MockSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash> {
        if let Some(message) = self.state.send_error.lock().unwrap().clone() {
            return Err(ChainError::Wallet(message));
        }
        let mut sent = self.state.sent.lock().unwrap();
        sent.push(tx);
        Ok(TxHash::with_last_byte(sent.len() as u8))
    }

    async fn wait_for_confirmation(
        &self,
        _tx_hash: TxHash,
        _confirmations: u64,
        _timeout: Duration,
    ) -> ChainResult<ConfirmationStatus> {
        if self.state.revert.load(Ordering::SeqCst) {
            return Ok(ConfirmationStatus::Failed("execution reverted".to_string()));
        }
        Ok(ConfirmationStatus::Confirmed { block_number: 1 })
    }
}

// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Text(Element, String),
    Display(Panel, Display),
    Alert(String),
}

/// View that records every render call.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    /// Latest text written to `element`.
    pub fn text(&self, element: Element) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Text(el, text) if *el == element => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn display(&self, panel: Panel) -> Option<Display> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Display(p, d) if *p == panel => Some(*d),
            _ => None,
        })
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl View for RecordingView {
    fn set_text(&mut self, element: Element, text: &str) {
        self.events.push(ViewEvent::Text(element, text.to_string()));
    }

    fn set_display(&mut self, panel: Panel, display: Display) {
        self.events.push(ViewEvent::Display(panel, display));
    }

    fn alert(&mut self, message: &str) {
        self.events.push(ViewEvent::Alert(message.to_string()));
    }
}
