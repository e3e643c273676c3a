//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check Solana addresses and endpoints are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PlatformConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::PlatformConfig;
use crate::solana::pubkey::is_valid_public_key;
use crate::solana::types::{Cluster, Commitment};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `solana.rpc_url`).
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &PlatformConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }
    if config.server.max_body_size == 0 {
        errors.push(ValidationError::new("server.max_body_size", "must be greater than 0"));
    }

    if !config.database.url.starts_with("sqlite:") {
        errors.push(ValidationError::new("database.url", "only sqlite: URLs are supported"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be greater than 0"));
    }

    let solana = &config.solana;
    if solana.network.parse::<Cluster>().is_err() {
        errors.push(ValidationError::new(
            "solana.network",
            format!("unknown network '{}'", solana.network),
        ));
    }
    if !solana.rpc_url.is_empty() && !is_http_url(&solana.rpc_url) {
        errors.push(ValidationError::new("solana.rpc_url", "must be an http(s) URL"));
    }
    for (i, failover) in solana.failover_urls.iter().enumerate() {
        if !is_http_url(failover) {
            errors.push(ValidationError::new(
                &format!("solana.failover_urls[{i}]"),
                "must be an http(s) URL",
            ));
        }
    }
    if solana.commitment.parse::<Commitment>().is_err() {
        errors.push(ValidationError::new(
            "solana.commitment",
            "must be processed, confirmed or finalized",
        ));
    }
    if !solana.charity_token_mint.is_empty() && !is_valid_public_key(&solana.charity_token_mint) {
        errors.push(ValidationError::new("solana.charity_token_mint", "not a valid public key"));
    }
    if !solana.zakat_pool_address.is_empty() && !is_valid_public_key(&solana.zakat_pool_address) {
        errors.push(ValidationError::new("solana.zakat_pool_address", "not a valid public key"));
    }
    if solana.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("solana.rpc_timeout_secs", "must be greater than 0"));
    }
    if solana.confirmation_retries == 0 {
        errors.push(ValidationError::new("solana.confirmation_retries", "must be greater than 0"));
    }
    // Handlers poll for at most half the request timeout.
    let polling_ms = u64::from(solana.confirmation_retries).saturating_mul(solana.confirmation_delay_ms);
    let budget_ms = config.server.request_timeout_secs.saturating_mul(1000) / 2;
    if config.server.request_timeout_secs > 0 && polling_ms > budget_ms {
        errors.push(ValidationError::new(
            "solana.confirmation_retries",
            format!(
                "{} checks {}ms apart outlast half of server.request_timeout_secs ({budget_ms}ms)",
                solana.confirmation_retries, solana.confirmation_delay_ms
            ),
        ));
    }

    let observability = &config.observability;
    if !matches!(
        observability.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "is not a socket address",
        ));
    }

    if config.admin.enabled
        && (config.admin.api_key.is_empty() || config.admin.api_key == "CHANGE_ME_IN_PRODUCTION")
    {
        errors.push(ValidationError::new(
            "admin.api_key",
            "must be set when the admin API is enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&PlatformConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = PlatformConfig::default();
        config.server.bind_address = "not-an-address".to_string();
        config.solana.network = "moonnet".to_string();
        config.solana.commitment = "eventually".to_string();
        config.solana.charity_token_mint = "invalid".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "server.bind_address",
                "solana.network",
                "solana.commitment",
                "solana.charity_token_mint",
            ]
        );
    }

    #[test]
    fn test_admin_requires_real_key() {
        let mut config = PlatformConfig::default();
        config.admin.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "admin.api_key");

        config.admin.api_key = "s3cret".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_confirmation_polling_fits_request_timeout() {
        let mut config = PlatformConfig::default();
        config.server.request_timeout_secs = 30;
        config.solana.confirmation_retries = 30;
        config.solana.confirmation_delay_ms = 1000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "solana.confirmation_retries");

        config.server.request_timeout_secs = 60;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_non_http_rpc() {
        let mut config = PlatformConfig::default();
        config.solana.rpc_url = "ftp://rpc.example.com".to_string();
        config.solana.failover_urls = vec!["https://ok.example.com".to_string(), "nope".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].field, "solana.failover_urls[1]");
    }
}
