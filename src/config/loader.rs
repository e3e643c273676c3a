//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::PlatformConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable selecting the Solana cluster.
pub const SOLANA_NETWORK_ENV: &str = "SOLANA_NETWORK";
/// Environment variable overriding the RPC endpoint.
pub const RPC_ENDPOINT_ENV: &str = "RPC_ENDPOINT";
/// Environment variable holding the charity token mint address.
pub const CHARITY_TOKEN_MINT_ENV: &str = "CHARITY_TOKEN_MINT";
/// Environment variable holding the zakat pool address.
pub const ZAKAT_POOL_ADDRESS_ENV: &str = "ZAKAT_POOL_ADDRESS";
/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable holding the admin API key.
pub const ADMIN_API_KEY_ENV: &str = "ADMIN_API_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied after parsing and before validation.
pub fn load_config(path: &Path) -> Result<PlatformConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: PlatformConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
pub fn load_from_env() -> Result<PlatformConfig, ConfigError> {
    let mut config = PlatformConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut PlatformConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(network) = get(SOLANA_NETWORK_ENV) {
        config.solana.network = network;
    }
    if let Some(endpoint) = get(RPC_ENDPOINT_ENV) {
        config.solana.rpc_url = endpoint;
    }
    if let Some(mint) = get(CHARITY_TOKEN_MINT_ENV) {
        config.solana.charity_token_mint = mint;
    }
    if let Some(pool) = get(ZAKAT_POOL_ADDRESS_ENV) {
        config.solana.zakat_pool_address = pool;
    }
    if let Some(url) = get(DATABASE_URL_ENV) {
        config.database.url = url;
    }
    if let Some(key) = get(ADMIN_API_KEY_ENV) {
        config.admin.api_key = key;
        config.admin.enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            bind_address = "127.0.0.1:4000"

            [database]
            url = "sqlite::memory:"
            max_connections = 1
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:4000");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[solana]\nnetwork = \"moonnet\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("solana.network"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (SOLANA_NETWORK_ENV, "testnet"),
            (RPC_ENDPOINT_ENV, "http://127.0.0.1:8899"),
            (CHARITY_TOKEN_MINT_ENV, "So11111111111111111111111111111111111111112"),
            (ZAKAT_POOL_ADDRESS_ENV, ""),
            (ADMIN_API_KEY_ENV, "s3cret"),
        ]);

        let mut config = PlatformConfig::default();
        apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.solana.network, "testnet");
        assert_eq!(config.solana.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(
            config.solana.charity_token_mint,
            "So11111111111111111111111111111111111111112"
        );
        // Empty values leave the default untouched.
        assert!(config.solana.zakat_pool_address.is_empty());
        assert!(config.admin.enabled);
        assert_eq!(config.admin.api_key, "s3cret");
    }
}
