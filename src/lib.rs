//! Islamic charity donation platform.
//!
//! REST API over a SQLite store (with a mock fallback) and a Solana
//! JSON-RPC client for wallets, charity tokens and the zakat pool.

pub mod admin;
pub mod config;
pub mod database;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod solana;
pub mod utils;

pub use config::PlatformConfig;
pub use database::{CharityStore, StoreHandle};
pub use http::{build_router, AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use solana::SolanaClient;
