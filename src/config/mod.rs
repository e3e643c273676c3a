//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (SOLANA_NETWORK, RPC_ENDPOINT, ...)
//!     → validation.rs (semantic checks)
//!     → PlatformConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    AdminConfig, DatabaseConfig, ObservabilityConfig, PlatformConfig, ServerConfig, SolanaConfig,
};
pub use validation::ValidationError;
