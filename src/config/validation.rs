//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, confirmations >= 1)
//! - Check that URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MinterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::MinterConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}' ({reason})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("contract.address: {0}")]
    InvalidAddress(String),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("observability.metrics_address: invalid socket address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("wallet.private_keys_env must name an environment variable")]
    EmptyKeyVariable,
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &MinterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url("chain.rpc_url", &config.chain.rpc_url, &mut errors);
    for url in &config.chain.failover_urls {
        check_url("chain.failover_urls", url, &mut errors);
    }

    if let Err(e) = config.contract.parsed_address() {
        errors.push(ValidationError::InvalidAddress(e));
    }

    let non_zero = [
        ("chain.chain_id", config.chain.chain_id),
        ("chain.rpc_timeout_secs", config.chain.rpc_timeout_secs),
        ("contract.max_supply", config.contract.max_supply),
        ("minting.confirmations", config.minting.confirmations),
        (
            "minting.confirmation_timeout_secs",
            config.minting.confirmation_timeout_secs,
        ),
        ("minting.poll_interval_ms", config.minting.poll_interval_ms),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.wallet.private_keys_env.trim().is_empty() {
        errors.push(ValidationError::EmptyKeyVariable);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
