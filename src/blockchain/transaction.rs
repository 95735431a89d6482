//! Transaction confirmation monitoring.
//!
//! # Responsibilities
//! - Poll for the receipt of a broadcast transaction
//! - Count confirmations against the current block
//! - Give up after a deadline

use alloy::network::ReceiptResponse;
use alloy::primitives::TxHash;
use alloy::providers::Provider;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::types::{ChainError, ChainResult, ConfirmationStatus};

/// Confirmations a transaction mined in `tx_block` has at `current_block`.
///
/// The inclusion block counts as the first confirmation.
pub fn confirmations_at(tx_block: u64, current_block: u64) -> u64 {
    if current_block < tx_block {
        return 0;
    }
    current_block - tx_block + 1
}

/// Wait for a transaction to be mined and reach `required` confirmations.
///
/// # Arguments
/// * `provider` - Provider used to poll receipts and block height
/// * `tx_hash` - Transaction hash to monitor
/// * `required` - Confirmations to wait for (inclusion counts as one)
/// * `poll_interval` - Delay between polls
/// * `deadline` - Maximum time to wait
pub async fn wait_for_confirmation(
    provider: &(dyn Provider + Send + Sync),
    tx_hash: TxHash,
    required: u64,
    poll_interval: Duration,
    deadline: Duration,
) -> ChainResult<ConfirmationStatus> {
    let result = timeout(deadline, async {
        let mut ticker = interval(poll_interval);

        loop {
            ticker.tick().await;

            let receipt = match provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(r)) => r,
                Ok(None) => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt query failed");
                    continue;
                }
            };

            if !receipt.status() {
                return Ok(ConfirmationStatus::Failed(format!(
                    "transaction {} reverted",
                    tx_hash
                )));
            }

            let current_block = provider
                .get_block_number()
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?;
            let tx_block = receipt.block_number.unwrap_or(current_block);
            let confirmations = confirmations_at(tx_block, current_block);

            if confirmations >= required {
                return Ok(ConfirmationStatus::Confirmed {
                    block_number: tx_block,
                });
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations = confirmations,
                required = required,
                "Waiting for confirmations"
            );
        }
    })
    .await;

    match result {
        Ok(status) => status,
        Err(_) => Err(ChainError::ConfirmationTimeout(deadline.as_secs())),
    }
}
